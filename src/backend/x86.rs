//! x86_64 backend.
//!
//! SSE2 is part of the x86_64 baseline, so this backend is always available
//! on that target. Every register holds 4 lanes. Float, integer and mask
//! registers share one mask type: a float vector where each lane is either
//! all-1s (true) or all-0s (false).
//!
//! The 4 lanes of a float register are treated as a 2x2 pixel tile
//! (lanes 0,1 = top row, lanes 2,3 = bottom row) by the derivative ops.

use super::{Backend, FloatOps, IntOps, MaskOps, NumOps, Register};
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};
use core::ops::*;

// ============================================================================
// SSE2 Backend
// ============================================================================

/// SSE2 Backend (4 lanes).
#[derive(Copy, Clone, Debug, Default)]
pub struct Sse2;

impl Backend for Sse2 {
    const LANES: usize = 4;
    const NAME: &'static str = "sse2";

    type Mask = Mask4;
    type F32 = F32x4;
    type I32 = I32x4;
    type U32 = U32x4;

    #[inline(always)]
    fn f32_from_i32(v: I32x4) -> F32x4 {
        unsafe { F32x4(_mm_cvtepi32_ps(v.0)) }
    }

    #[inline(always)]
    fn f32_from_u32(v: U32x4) -> F32x4 {
        // SSE2 only converts signed integers: convert the two 16-bit halves
        // separately. hi * 65536 is exact, so the final add rounds once.
        unsafe {
            let lo = _mm_and_si128(v.0, _mm_set1_epi32(0xFFFF));
            let hi = _mm_srli_epi32::<16>(v.0);
            let hi_f = _mm_mul_ps(_mm_cvtepi32_ps(hi), _mm_set1_ps(65536.0));
            F32x4(_mm_add_ps(hi_f, _mm_cvtepi32_ps(lo)))
        }
    }

    #[inline(always)]
    fn i32_from_f32(v: F32x4) -> I32x4 {
        unsafe {
            // cvttps yields 0x80000000 for NaN and out-of-range lanes; that is
            // already the saturated value for large negative inputs.
            let truncated = _mm_cvttps_epi32(v.0);
            let too_big = _mm_castps_si128(_mm_cmpge_ps(v.0, _mm_set1_ps(2147483648.0)));
            let saturated = or_si(
                _mm_andnot_si128(too_big, truncated),
                _mm_and_si128(too_big, _mm_set1_epi32(i32::MAX)),
            );
            let ordered = _mm_castps_si128(_mm_cmpord_ps(v.0, v.0));
            I32x4(_mm_and_si128(saturated, ordered))
        }
    }

    #[inline(always)]
    fn u32_from_f32(v: F32x4) -> U32x4 {
        unsafe {
            // max_ps returns its second operand when either is NaN, so NaN
            // and negative lanes both collapse to 0 here.
            let x = _mm_max_ps(v.0, _mm_setzero_ps());
            let two31 = _mm_set1_ps(2147483648.0);
            let high = _mm_castps_si128(_mm_cmpge_ps(x, two31));
            let over = _mm_castps_si128(_mm_cmpge_ps(x, _mm_set1_ps(4294967296.0)));

            let low_part = _mm_cvttps_epi32(x);
            let high_part = _mm_xor_si128(
                _mm_cvttps_epi32(_mm_sub_ps(x, two31)),
                _mm_set1_epi32(i32::MIN),
            );
            let merged = or_si(
                _mm_andnot_si128(high, low_part),
                _mm_and_si128(high, high_part),
            );
            U32x4(_mm_or_si128(merged, over))
        }
    }

    #[inline(always)]
    fn u32_from_i32(v: I32x4) -> U32x4 {
        U32x4(v.0)
    }

    #[inline(always)]
    fn i32_from_u32(v: U32x4) -> I32x4 {
        I32x4(v.0)
    }

    #[inline(always)]
    fn f32_to_bits(v: F32x4) -> U32x4 {
        unsafe { U32x4(_mm_castps_si128(v.0)) }
    }

    #[inline(always)]
    fn f32_from_bits(v: U32x4) -> F32x4 {
        unsafe { F32x4(_mm_castsi128_ps(v.0)) }
    }

    #[inline(always)]
    fn f32_from_mask(m: Mask4) -> F32x4 {
        unsafe { F32x4(_mm_and_ps(m.0, _mm_set1_ps(1.0))) }
    }

    #[inline(always)]
    fn i32_from_mask(m: Mask4) -> I32x4 {
        unsafe { I32x4(_mm_and_si128(_mm_castps_si128(m.0), _mm_set1_epi32(1))) }
    }

    #[inline(always)]
    fn u32_from_mask(m: Mask4) -> U32x4 {
        unsafe { U32x4(_mm_and_si128(_mm_castps_si128(m.0), _mm_set1_epi32(1))) }
    }
}

#[inline(always)]
unsafe fn or_si(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_or_si128(a, b) }
}

#[inline(always)]
unsafe fn select_si(mask: __m128, if_true: __m128i, if_false: __m128i) -> __m128i {
    unsafe {
        let m = _mm_castps_si128(mask);
        _mm_or_si128(_mm_and_si128(m, if_true), _mm_andnot_si128(m, if_false))
    }
}

// ============================================================================
// Mask4 - 4-lane mask for SSE2 (float-based, no separate mask unit)
// ============================================================================

/// 4-lane mask for SSE2.
///
/// On SSE2, there's no separate mask register file like AVX-512's k-registers.
/// Masks are stored as float vectors where each lane is either all-1s (true)
/// or all-0s (false).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Mask4(__m128);

impl Default for Mask4 {
    fn default() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
    }
}

impl Debug for Mask4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mask4({:04b})", self.bitmask())
    }
}

impl Mask4 {
    #[inline(always)]
    fn from_bools(b: [bool; 4]) -> Self {
        unsafe {
            // _mm_set_epi32 args are in reverse order: e3, e2, e1, e0
            Self(_mm_castsi128_ps(_mm_set_epi32(
                -(b[3] as i32),
                -(b[2] as i32),
                -(b[1] as i32),
                -(b[0] as i32),
            )))
        }
    }
}

impl MaskOps for Mask4 {
    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) != 0 }
    }

    #[inline(always)]
    fn all(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) == 0xF }
    }

    #[inline(always)]
    fn bitmask(self) -> u32 {
        unsafe { _mm_movemask_ps(self.0) as u32 }
    }
}

impl Register<bool> for Mask4 {
    type Mask = Mask4;
    const LANES: usize = 4;
    const ALIGN: usize = 1;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        unsafe { Self(_mm_castsi128_ps(_mm_set1_epi32(-(value as i32)))) }
    }

    #[inline(always)]
    fn load(src: &[bool]) -> Self {
        assert!(src.len() >= 4);
        Self::from_bools([src[0], src[1], src[2], src[3]])
    }

    #[inline(always)]
    fn store(self, dst: &mut [bool]) {
        assert!(dst.len() >= 4);
        let bits = self.bitmask();
        for (i, d) in dst[..4].iter_mut().enumerate() {
            *d = bits & (1 << i) != 0;
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const bool) -> Self {
        // SAFETY: caller guarantees 4 readable bools at `ptr`.
        let src = unsafe { core::slice::from_raw_parts(ptr, 4) };
        Self::load(src)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut bool) {
        // SAFETY: caller guarantees 4 writable bools at `ptr`.
        let dst = unsafe { core::slice::from_raw_parts_mut(ptr, 4) };
        self.store(dst)
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> bool {
        assert!(lane < 4, "lane {lane} out of range");
        self.bitmask() & (1 << lane) != 0
    }

    #[inline(always)]
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        unsafe {
            let t = _mm_and_ps(mask.0, if_true.0);
            let f = _mm_andnot_ps(mask.0, if_false.0);
            Self(_mm_or_ps(t, f))
        }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        !(self ^ rhs)
    }
}

impl BitAnd for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, rhs.0)) }
    }
}

impl BitOr for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_ps(self.0, rhs.0)) }
    }
}

impl BitXor for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, rhs.0)) }
    }
}

impl Not for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let all_ones = _mm_castsi128_ps(_mm_set1_epi32(-1));
            Self(_mm_xor_ps(self.0, all_ones))
        }
    }
}

// ============================================================================
// F32x4
// ============================================================================

/// 4-lane f32 SIMD vector for SSE2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(__m128);

impl Default for F32x4 {
    fn default() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
    }
}

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

impl F32x4 {
    #[inline(always)]
    fn to_array(self) -> [f32; 4] {
        let mut arr = [0.0f32; 4];
        unsafe { _mm_storeu_ps(arr.as_mut_ptr(), self.0) };
        arr
    }
}

impl Register<f32> for F32x4 {
    type Mask = Mask4;
    const LANES: usize = 4;
    const ALIGN: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { Self(_mm_set1_ps(value)) }
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        assert!(src.len() >= 4);
        unsafe { Self(_mm_loadu_ps(src.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        assert!(dst.len() >= 4);
        unsafe { _mm_storeu_ps(dst.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { Self(_mm_load_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { _mm_store_ps(ptr, self.0) }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        unsafe {
            // (mask & if_true) | (!mask & if_false)
            // _mm_andnot_ps(a, b) computes (!a) & b
            let t = _mm_and_ps(mask.0, if_true.0);
            let f = _mm_andnot_ps(mask.0, if_false.0);
            Self(_mm_or_ps(t, f))
        }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmpeq_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmpneq_ps(self.0, rhs.0)) }
    }
}

impl NumOps<f32> for F32x4 {
    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmplt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmple_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_cmpge_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Self(_mm_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { Self(_mm_max_ps(self.0, rhs.0)) }
    }
}

impl FloatOps for F32x4 {
    #[inline(always)]
    fn abs(self) -> Self {
        unsafe {
            // Mask off sign bit (bit 31)
            let mask = _mm_castsi128_ps(_mm_set1_epi32(0x7FFFFFFF));
            Self(_mm_and_ps(self.0, mask))
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe {
            // Round-trip through i32. Lanes with |x| >= 2^23 are already
            // integral; cmpnlt is also true for NaN, so those pass through.
            let converted = _mm_cvtepi32_ps(_mm_cvttps_epi32(self.0));
            let magnitude = self.abs().0;
            let keep = _mm_cmpnlt_ps(magnitude, _mm_set1_ps(8388608.0));
            let t = Self::select(Mask4(keep), self, Self(converted));
            // Restore the sign of zero results: trunc(-0.3) is -0.0.
            let sign = _mm_and_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(i32::MIN)));
            Self(_mm_or_ps(t.0, sign))
        }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        // For negative non-integers, truncation rounds toward zero (wrong
        // direction): subtract 1 where self < trunc.
        let t = self.trunc();
        unsafe {
            let correction = _mm_and_ps(_mm_cmplt_ps(self.0, t.0), _mm_set1_ps(1.0));
            Self(_mm_sub_ps(t.0, correction))
        }
    }

    #[inline(always)]
    fn ddx(self) -> Self {
        unsafe {
            // left = (x0, x0, x2, x2), right = (x1, x1, x3, x3)
            let left = _mm_shuffle_ps::<0b10_10_00_00>(self.0, self.0);
            let right = _mm_shuffle_ps::<0b11_11_01_01>(self.0, self.0);
            Self(_mm_sub_ps(right, left))
        }
    }

    #[inline(always)]
    fn ddy(self) -> Self {
        unsafe {
            // top = (x0, x1, x0, x1), bottom = (x2, x3, x2, x3)
            let top = _mm_shuffle_ps::<0b01_00_01_00>(self.0, self.0);
            let bottom = _mm_shuffle_ps::<0b11_10_11_10>(self.0, self.0);
            Self(_mm_sub_ps(bottom, top))
        }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_ps(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_ps(self.0, rhs.0)) }
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm_mul_ps(self.0, rhs.0)) }
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm_div_ps(self.0, rhs.0)) }
    }
}

impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe {
            // Flip sign bit via XOR with -0.0 (0x80000000 = min i32 value)
            let neg_zero = _mm_castsi128_ps(_mm_set1_epi32(i32::MIN));
            Self(_mm_xor_ps(self.0, neg_zero))
        }
    }
}

// ============================================================================
// I32x4 / U32x4
// ============================================================================

/// 4-lane i32 SIMD vector for SSE2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(__m128i);

/// 4-lane u32 SIMD vector for SSE2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct U32x4(__m128i);

// Lanes 0 and 2 of each operand multiply into 64-bit products; shuffling
// lanes 1 and 3 down gives the other two. SSE4.1 would have pmulld.
#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let even = _mm_mul_epu32(a, b);
        let odd = _mm_mul_epu32(
            _mm_shuffle_epi32::<0b11_11_01_01>(a),
            _mm_shuffle_epi32::<0b11_11_01_01>(b),
        );
        _mm_unpacklo_epi32(
            _mm_shuffle_epi32::<0b00_00_10_00>(even),
            _mm_shuffle_epi32::<0b00_00_10_00>(odd),
        )
    }
}

macro_rules! impl_sse2_int {
    ($reg:ident, $t:ty, $name:literal) => {
        impl Default for $reg {
            fn default() -> Self {
                unsafe { Self(_mm_setzero_si128()) }
            }
        }

        impl Debug for $reg {
            fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({:?})", $name, self.to_array())
            }
        }

        impl $reg {
            #[inline(always)]
            fn to_array(self) -> [$t; 4] {
                let mut arr = [0 as $t; 4];
                unsafe { _mm_storeu_si128(arr.as_mut_ptr() as *mut __m128i, self.0) };
                arr
            }
        }

        impl Register<$t> for $reg {
            type Mask = Mask4;
            const LANES: usize = 4;
            const ALIGN: usize = 16;

            #[inline(always)]
            fn splat(value: $t) -> Self {
                unsafe { Self(_mm_set1_epi32(value as i32)) }
            }

            #[inline(always)]
            fn load(src: &[$t]) -> Self {
                assert!(src.len() >= 4);
                unsafe { Self(_mm_loadu_si128(src.as_ptr() as *const __m128i)) }
            }

            #[inline(always)]
            fn store(self, dst: &mut [$t]) {
                assert!(dst.len() >= 4);
                unsafe { _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, self.0) }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $t) -> Self {
                debug_assert_eq!(ptr as usize % 16, 0);
                unsafe { Self(_mm_load_si128(ptr as *const __m128i)) }
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $t) {
                debug_assert_eq!(ptr as usize % 16, 0);
                unsafe { _mm_store_si128(ptr as *mut __m128i, self.0) }
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> $t {
                self.to_array()[lane]
            }

            #[inline(always)]
            fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
                unsafe { Self(select_si(mask.0, if_true.0, if_false.0)) }
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Mask4 {
                unsafe { Mask4(_mm_castsi128_ps(_mm_cmpeq_epi32(self.0, rhs.0))) }
            }
        }

        impl Add for $reg {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                unsafe { Self(_mm_add_epi32(self.0, rhs.0)) }
            }
        }

        impl Sub for $reg {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                unsafe { Self(_mm_sub_epi32(self.0, rhs.0)) }
            }
        }

        impl Mul for $reg {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe { Self(mullo_epi32(self.0, rhs.0)) }
            }
        }

        // No SIMD integer division on x86: fall back to per-lane division.
        impl Div for $reg {
            type Output = Self;
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                IntOps::zip_lanes(self, rhs, <$t>::wrapping_div)
            }
        }

        impl Rem for $reg {
            type Output = Self;
            #[inline(always)]
            fn rem(self, rhs: Self) -> Self {
                IntOps::zip_lanes(self, rhs, <$t>::wrapping_rem)
            }
        }

        impl BitAnd for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                unsafe { Self(_mm_and_si128(self.0, rhs.0)) }
            }
        }

        impl BitOr for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                unsafe { Self(_mm_or_si128(self.0, rhs.0)) }
            }
        }

        impl BitXor for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                unsafe { Self(_mm_xor_si128(self.0, rhs.0)) }
            }
        }

        impl Not for $reg {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                // XOR with all 1s
                unsafe { Self(_mm_xor_si128(self.0, _mm_set1_epi32(-1))) }
            }
        }

        impl Shl<u32> for $reg {
            type Output = Self;
            #[inline(always)]
            fn shl(self, rhs: u32) -> Self {
                unsafe {
                    // _mm_sll_epi32 takes shift count in lower 64-bits of __m128i
                    let shift = _mm_cvtsi32_si128(rhs as i32);
                    Self(_mm_sll_epi32(self.0, shift))
                }
            }
        }

        impl IntOps<$t> for $reg {}
    };
}

impl_sse2_int!(I32x4, i32, "I32x4");
impl_sse2_int!(U32x4, u32, "U32x4");

impl Shr<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        unsafe {
            let shift = _mm_cvtsi32_si128(rhs as i32);
            Self(_mm_sra_epi32(self.0, shift))
        }
    }
}

impl Shr<u32> for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        unsafe {
            let shift = _mm_cvtsi32_si128(rhs as i32);
            Self(_mm_srl_epi32(self.0, shift))
        }
    }
}

impl NumOps<i32> for I32x4 {
    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_castsi128_ps(_mm_cmplt_epi32(self.0, rhs.0))) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Mask4 {
        !self.cmp_gt(rhs)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_castsi128_ps(_mm_cmpgt_epi32(self.0, rhs.0))) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Mask4 {
        !self.cmp_lt(rhs)
    }
}

impl U32x4 {
    // SSE2 only compares signed lanes: flipping the top bit maps unsigned
    // order onto signed order.
    #[inline(always)]
    fn biased(self) -> __m128i {
        unsafe { _mm_xor_si128(self.0, _mm_set1_epi32(i32::MIN)) }
    }
}

impl NumOps<u32> for U32x4 {
    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_castsi128_ps(_mm_cmplt_epi32(self.biased(), rhs.biased()))) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Mask4 {
        !self.cmp_gt(rhs)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(_mm_castsi128_ps(_mm_cmpgt_epi32(self.biased(), rhs.biased()))) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Mask4 {
        !self.cmp_lt(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mullo_matches_wrapping_mul() {
        let a = I32x4::load(&[3, -7, i32::MAX, 65537]);
        let b = I32x4::load(&[5, 9, 2, 65537]);
        let want = [15, -63, i32::MAX.wrapping_mul(2), 65537i32.wrapping_mul(65537)];
        assert_eq!((a * b).to_array(), want);
    }

    #[test]
    fn unsigned_compare_uses_full_range() {
        let a = U32x4::load(&[0, 1, 0x8000_0000, u32::MAX]);
        let b = U32x4::splat(2);
        assert_eq!(a.cmp_lt(b).bitmask(), 0b0011);
        assert_eq!(a.cmp_gt(b).bitmask(), 0b1100);
    }

    #[test]
    fn casts_saturate_like_rust() {
        let f = F32x4::load(&[f32::NAN, 3e9, -1e10, 1e10]);
        assert_eq!(Sse2::i32_from_f32(f).to_array(), [0, i32::MAX, i32::MIN, i32::MAX]);
        assert_eq!(Sse2::u32_from_f32(f).to_array(), [0, 3_000_000_000, 0, u32::MAX]);

        let u = U32x4::load(&[0, 65535, 65536, u32::MAX]);
        assert_eq!(
            Sse2::f32_from_u32(u).to_array(),
            [0.0, 65535.0, 65536.0, u32::MAX as f32]
        );
    }

    #[test]
    fn floor_and_trunc_edge_cases() {
        let x = F32x4::load(&[-0.5, 1e20, -3.0, 2.999]);
        assert_eq!(x.floor().to_array(), [-1.0, 1e20, -3.0, 2.0]);
        let t = F32x4::load(&[-0.3, 5.7, -5.7, f32::INFINITY]).trunc().to_array();
        assert!(t[0] == 0.0 && t[0].is_sign_negative());
        assert_eq!(&t[1..], &[5.0, -5.0, f32::INFINITY]);
    }

    #[test]
    fn derivatives_on_quad() {
        // 2x2 tile: (1, 2) / (5, 9)
        let x = F32x4::load(&[1.0, 2.0, 5.0, 9.0]);
        assert_eq!(x.ddx().to_array(), [1.0, 1.0, 4.0, 4.0]);
        assert_eq!(x.ddy().to_array(), [4.0, 7.0, 4.0, 7.0]);
    }
}
