//! ARM NEON backend (4 lanes).
//!
//! Lanes are laid out as a 2x2 pixel tile for the derivative ops:
//! lanes 0,1 are the top row, lanes 2,3 the bottom row.

use super::{Backend, FloatOps, IntOps, MaskOps, NumOps, Register};
use core::arch::aarch64::*;
use core::fmt::{Debug, Formatter};
use core::ops::*;

/// NEON Backend (4 lanes).
#[derive(Copy, Clone, Debug, Default)]
pub struct Neon;

impl Backend for Neon {
    const LANES: usize = 4;
    const NAME: &'static str = "neon";

    type Mask = Mask4;
    type F32 = F32x4;
    type I32 = I32x4;
    type U32 = U32x4;

    // The vcvtq conversions saturate and map NaN to 0, which is already the
    // behaviour of Rust's `as`.

    #[inline(always)]
    fn f32_from_i32(v: I32x4) -> F32x4 {
        unsafe { F32x4(vcvtq_f32_s32(v.0)) }
    }

    #[inline(always)]
    fn f32_from_u32(v: U32x4) -> F32x4 {
        unsafe { F32x4(vcvtq_f32_u32(v.0)) }
    }

    #[inline(always)]
    fn i32_from_f32(v: F32x4) -> I32x4 {
        unsafe { I32x4(vcvtq_s32_f32(v.0)) }
    }

    #[inline(always)]
    fn u32_from_f32(v: F32x4) -> U32x4 {
        unsafe { U32x4(vcvtq_u32_f32(v.0)) }
    }

    #[inline(always)]
    fn u32_from_i32(v: I32x4) -> U32x4 {
        unsafe { U32x4(vreinterpretq_u32_s32(v.0)) }
    }

    #[inline(always)]
    fn i32_from_u32(v: U32x4) -> I32x4 {
        unsafe { I32x4(vreinterpretq_s32_u32(v.0)) }
    }

    #[inline(always)]
    fn f32_to_bits(v: F32x4) -> U32x4 {
        unsafe { U32x4(vreinterpretq_u32_f32(v.0)) }
    }

    #[inline(always)]
    fn f32_from_bits(v: U32x4) -> F32x4 {
        unsafe { F32x4(vreinterpretq_f32_u32(v.0)) }
    }

    #[inline(always)]
    fn u32_from_mask(m: Mask4) -> U32x4 {
        unsafe { U32x4(vandq_u32(m.0, vdupq_n_u32(1))) }
    }
}

// ============================================================================
// Mask4 - 4-lane mask for NEON (integer-based)
// ============================================================================

/// 4-lane mask for ARM NEON.
///
/// NEON doesn't have dedicated mask registers like AVX-512's k-registers.
/// Masks are stored as u32 vectors where each lane is either all-1s (0xFFFFFFFF)
/// or all-0s (0x00000000).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Mask4(uint32x4_t);

impl Default for Mask4 {
    fn default() -> Self {
        unsafe { Self(vdupq_n_u32(0)) }
    }
}

impl Debug for Mask4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mask4({:04b})", self.bitmask())
    }
}

impl MaskOps for Mask4 {
    #[inline(always)]
    fn any(self) -> bool {
        unsafe { vmaxvq_u32(self.0) != 0 }
    }

    #[inline(always)]
    fn all(self) -> bool {
        unsafe { vminvq_u32(self.0) != 0 }
    }

    #[inline(always)]
    fn bitmask(self) -> u32 {
        const WEIGHTS: [u32; 4] = [1, 2, 4, 8];
        unsafe { vaddvq_u32(vandq_u32(self.0, vld1q_u32(WEIGHTS.as_ptr()))) }
    }
}

impl Register<bool> for Mask4 {
    type Mask = Mask4;
    const LANES: usize = 4;
    const ALIGN: usize = 1;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        unsafe { Self(vdupq_n_u32(if value { u32::MAX } else { 0 })) }
    }

    #[inline(always)]
    fn load(src: &[bool]) -> Self {
        assert!(src.len() >= 4);
        let lanes = [0, 1, 2, 3].map(|i| if src[i] { u32::MAX } else { 0 });
        unsafe { Self(vld1q_u32(lanes.as_ptr())) }
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
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(vbslq_u32(mask.0, if_true.0, if_false.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        unsafe { Self(vceqq_u32(self.0, rhs.0)) }
    }
}

impl BitAnd for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(vandq_u32(self.0, rhs.0)) }
    }
}

impl BitOr for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(vorrq_u32(self.0, rhs.0)) }
    }
}

impl BitXor for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(veorq_u32(self.0, rhs.0)) }
    }
}

impl Not for Mask4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(vmvnq_u32(self.0)) }
    }
}

// ============================================================================
// F32x4
// ============================================================================

/// 4-lane f32 SIMD vector for ARM NEON.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(float32x4_t);

impl Default for F32x4 {
    fn default() -> Self {
        unsafe { Self(vdupq_n_f32(0.0)) }
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
        unsafe { vst1q_f32(arr.as_mut_ptr(), self.0) };
        arr
    }
}

impl Register<f32> for F32x4 {
    type Mask = Mask4;
    const LANES: usize = 4;
    const ALIGN: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { Self(vdupq_n_f32(value)) }
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        assert!(src.len() >= 4);
        unsafe { Self(vld1q_f32(src.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        assert!(dst.len() >= 4);
        unsafe { vst1q_f32(dst.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { Self(vld1q_f32(ptr)) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { vst1q_f32(ptr, self.0) }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
        unsafe { Self(vbslq_f32(mask.0, if_true.0, if_false.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vceqq_f32(self.0, rhs.0)) }
    }
}

impl NumOps<f32> for F32x4 {
    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vcltq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vcleq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vcgtq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Mask4 {
        unsafe { Mask4(vcgeq_f32(self.0, rhs.0)) }
    }

    // vminq/vmaxq propagate NaN; the compare-and-select defaults match the
    // other backends instead.
}

impl FloatOps for F32x4 {
    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Self(vabsq_f32(self.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(vsqrtq_f32(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { Self(vrndmq_f32(self.0)) }
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        unsafe { Self(vrndq_f32(self.0)) }
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { Self(vrndpq_f32(self.0)) }
    }

    #[inline(always)]
    fn round(self) -> Self {
        // vrndaq rounds half away from zero.
        unsafe { Self(vrndaq_f32(self.0)) }
    }

    #[inline(always)]
    fn ddx(self) -> Self {
        unsafe {
            // left = (x0, x0, x2, x2), right = (x1, x1, x3, x3)
            let left = vtrn1q_f32(self.0, self.0);
            let right = vtrn2q_f32(self.0, self.0);
            Self(vsubq_f32(right, left))
        }
    }

    #[inline(always)]
    fn ddy(self) -> Self {
        unsafe {
            let top = vget_low_f32(self.0);
            let bottom = vget_high_f32(self.0);
            Self(vsubq_f32(vcombine_f32(bottom, bottom), vcombine_f32(top, top)))
        }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_f32(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_f32(self.0, rhs.0)) }
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_f32(self.0, rhs.0)) }
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(vdivq_f32(self.0, rhs.0)) }
    }
}

impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Self(vnegq_f32(self.0)) }
    }
}

// ============================================================================
// I32x4 / U32x4
// ============================================================================

/// 4-lane i32 SIMD vector for ARM NEON.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(int32x4_t);

/// 4-lane u32 SIMD vector for ARM NEON.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct U32x4(uint32x4_t);

macro_rules! impl_neon_int {
    (
        $reg:ident, $t:ty, $name:literal,
        dup = $dup:ident, ld = $ld:ident, st = $st:ident,
        add = $add:ident, sub = $sub:ident, mul = $mul:ident,
        and = $and:ident, or = $or:ident, xor = $xor:ident, not = $not:ident,
        shl = $shl:ident, bsl = $bsl:ident,
        eq = $eq:ident, lt = $lt:ident, le = $le:ident, gt = $gt:ident, ge = $ge:ident
    ) => {
        impl Default for $reg {
            fn default() -> Self {
                unsafe { Self($dup(0)) }
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
                unsafe { $st(arr.as_mut_ptr(), self.0) };
                arr
            }
        }

        impl Register<$t> for $reg {
            type Mask = Mask4;
            const LANES: usize = 4;
            const ALIGN: usize = 16;

            #[inline(always)]
            fn splat(value: $t) -> Self {
                unsafe { Self($dup(value)) }
            }

            #[inline(always)]
            fn load(src: &[$t]) -> Self {
                assert!(src.len() >= 4);
                unsafe { Self($ld(src.as_ptr())) }
            }

            #[inline(always)]
            fn store(self, dst: &mut [$t]) {
                assert!(dst.len() >= 4);
                unsafe { $st(dst.as_mut_ptr(), self.0) }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $t) -> Self {
                debug_assert_eq!(ptr as usize % 16, 0);
                unsafe { Self($ld(ptr)) }
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $t) {
                debug_assert_eq!(ptr as usize % 16, 0);
                unsafe { $st(ptr, self.0) }
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> $t {
                self.to_array()[lane]
            }

            #[inline(always)]
            fn select(mask: Mask4, if_true: Self, if_false: Self) -> Self {
                unsafe { Self($bsl(mask.0, if_true.0, if_false.0)) }
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Mask4 {
                unsafe { Mask4($eq(self.0, rhs.0)) }
            }
        }

        impl NumOps<$t> for $reg {
            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> Mask4 {
                unsafe { Mask4($lt(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_le(self, rhs: Self) -> Mask4 {
                unsafe { Mask4($le(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_gt(self, rhs: Self) -> Mask4 {
                unsafe { Mask4($gt(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_ge(self, rhs: Self) -> Mask4 {
                unsafe { Mask4($ge(self.0, rhs.0)) }
            }
        }

        impl Add for $reg {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                unsafe { Self($add(self.0, rhs.0)) }
            }
        }

        impl Sub for $reg {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                unsafe { Self($sub(self.0, rhs.0)) }
            }
        }

        impl Mul for $reg {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe { Self($mul(self.0, rhs.0)) }
            }
        }

        // NEON has no integer division: fall back to per-lane division.
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
                unsafe { Self($and(self.0, rhs.0)) }
            }
        }

        impl BitOr for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                unsafe { Self($or(self.0, rhs.0)) }
            }
        }

        impl BitXor for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                unsafe { Self($xor(self.0, rhs.0)) }
            }
        }

        impl Not for $reg {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                unsafe { Self($not(self.0)) }
            }
        }

        // vshlq shifts right for negative counts. Counts saturate at the lane
        // width, so clamping to 32 shifts every bit out.
        impl Shl<u32> for $reg {
            type Output = Self;
            #[inline(always)]
            fn shl(self, rhs: u32) -> Self {
                unsafe { Self($shl(self.0, vdupq_n_s32(rhs.min(32) as i32))) }
            }
        }

        impl Shr<u32> for $reg {
            type Output = Self;
            #[inline(always)]
            fn shr(self, rhs: u32) -> Self {
                unsafe { Self($shl(self.0, vdupq_n_s32(-(rhs.min(32) as i32)))) }
            }
        }

        impl IntOps<$t> for $reg {}
    };
}

impl_neon_int!(
    I32x4, i32, "I32x4",
    dup = vdupq_n_s32, ld = vld1q_s32, st = vst1q_s32,
    add = vaddq_s32, sub = vsubq_s32, mul = vmulq_s32,
    and = vandq_s32, or = vorrq_s32, xor = veorq_s32, not = vmvnq_s32,
    shl = vshlq_s32, bsl = vbslq_s32,
    eq = vceqq_s32, lt = vcltq_s32, le = vcleq_s32, gt = vcgtq_s32, ge = vcgeq_s32
);

impl_neon_int!(
    U32x4, u32, "U32x4",
    dup = vdupq_n_u32, ld = vld1q_u32, st = vst1q_u32,
    add = vaddq_u32, sub = vsubq_u32, mul = vmulq_u32,
    and = vandq_u32, or = vorrq_u32, xor = veorq_u32, not = vmvnq_u32,
    shl = vshlq_u32, bsl = vbslq_u32,
    eq = vceqq_u32, lt = vcltq_u32, le = vcleq_u32, gt = vcgtq_u32, ge = vcgeq_u32
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmask_weights_lanes() {
        let m = Mask4::load(&[true, false, true, true]);
        assert_eq!(m.bitmask(), 0b1101);
        assert!(m.any());
        assert!(!m.all());
    }

    #[test]
    fn shifts_past_width() {
        let v = I32x4::load(&[-8, 8, 1, -1]);
        assert_eq!((v >> 40).to_array(), [-1, 0, 0, -1]);
        assert_eq!((v << 32).to_array(), [0; 4]);
        assert_eq!((U32x4::splat(u32::MAX) >> 32).to_array(), [0; 4]);
    }

    #[test]
    fn derivatives_on_quad() {
        let x = F32x4::load(&[1.0, 2.0, 5.0, 9.0]);
        assert_eq!(x.ddx().to_array(), [1.0, 1.0, 4.0, 4.0]);
        assert_eq!(x.ddy().to_array(), [4.0, 7.0, 4.0, 7.0]);
    }
}
