//! Scalar backend (1 lane - no SIMD).
//!
//! Every other backend is checked against this one: it evaluates each lane
//! with plain Rust scalar arithmetic and `libm`.

use super::{Backend, FloatOps, IntOps, MaskOps, NumOps, Register};
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

/// Scalar fallback backend (1 lane).
#[derive(Copy, Clone, Debug, Default)]
pub struct Scalar;

impl Backend for Scalar {
    const LANES: usize = 1;
    const NAME: &'static str = "scalar";

    type Mask = ScalarMask;
    type F32 = ScalarF32;
    type I32 = ScalarI32;
    type U32 = ScalarU32;

    #[inline(always)]
    fn f32_from_i32(v: ScalarI32) -> ScalarF32 {
        ScalarF32(v.0 as f32)
    }

    #[inline(always)]
    fn f32_from_u32(v: ScalarU32) -> ScalarF32 {
        ScalarF32(v.0 as f32)
    }

    #[inline(always)]
    fn i32_from_f32(v: ScalarF32) -> ScalarI32 {
        ScalarI32(v.0 as i32)
    }

    #[inline(always)]
    fn u32_from_f32(v: ScalarF32) -> ScalarU32 {
        ScalarU32(v.0 as u32)
    }

    #[inline(always)]
    fn u32_from_i32(v: ScalarI32) -> ScalarU32 {
        ScalarU32(v.0 as u32)
    }

    #[inline(always)]
    fn i32_from_u32(v: ScalarU32) -> ScalarI32 {
        ScalarI32(v.0 as i32)
    }

    #[inline(always)]
    fn f32_to_bits(v: ScalarF32) -> ScalarU32 {
        ScalarU32(v.0.to_bits())
    }

    #[inline(always)]
    fn f32_from_bits(v: ScalarU32) -> ScalarF32 {
        ScalarF32(f32::from_bits(v.0))
    }

    #[inline(always)]
    fn f32_from_mask(m: ScalarMask) -> ScalarF32 {
        ScalarF32(if m.0 { 1.0 } else { 0.0 })
    }

    #[inline(always)]
    fn i32_from_mask(m: ScalarMask) -> ScalarI32 {
        ScalarI32(m.0 as i32)
    }

    #[inline(always)]
    fn u32_from_mask(m: ScalarMask) -> ScalarU32 {
        ScalarU32(m.0 as u32)
    }
}

// ============================================================================
// ScalarMask
// ============================================================================

/// Single-lane predicate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScalarMask(pub bool);

impl MaskOps for ScalarMask {
    #[inline(always)]
    fn any(self) -> bool {
        self.0
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.0
    }

    #[inline(always)]
    fn bitmask(self) -> u32 {
        self.0 as u32
    }
}

impl BitAnd for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for ScalarMask {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

// ============================================================================
// Register implementations
// ============================================================================

macro_rules! impl_scalar_register {
    ($reg:ident, $t:ty) => {
        impl Register<$t> for $reg {
            type Mask = ScalarMask;
            const LANES: usize = 1;
            const ALIGN: usize = core::mem::align_of::<$t>();

            #[inline(always)]
            fn splat(value: $t) -> Self {
                Self(value)
            }

            #[inline(always)]
            fn load(src: &[$t]) -> Self {
                Self(src[0])
            }

            #[inline(always)]
            fn store(self, dst: &mut [$t]) {
                dst[0] = self.0;
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $t) -> Self {
                debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
                // SAFETY: caller guarantees `ptr` is valid and aligned.
                Self(unsafe { ptr.read() })
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $t) {
                debug_assert_eq!(ptr as usize % Self::ALIGN, 0);
                // SAFETY: caller guarantees `ptr` is valid and aligned.
                unsafe { ptr.write(self.0) }
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> $t {
                assert!(lane == 0, "lane {lane} out of range");
                self.0
            }

            #[inline(always)]
            fn insert(self, lane: usize, value: $t) -> Self {
                assert!(lane == 0, "lane {lane} out of range");
                Self(value)
            }

            #[inline(always)]
            fn select(mask: ScalarMask, if_true: Self, if_false: Self) -> Self {
                if mask.0 {
                    if_true
                } else {
                    if_false
                }
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> ScalarMask {
                ScalarMask(self.0 == rhs.0)
            }

            #[inline(always)]
            fn cmp_ne(self, rhs: Self) -> ScalarMask {
                ScalarMask(self.0 != rhs.0)
            }
        }
    };
}

impl_scalar_register!(ScalarMask, bool);
impl_scalar_register!(ScalarF32, f32);
impl_scalar_register!(ScalarI32, i32);
impl_scalar_register!(ScalarU32, u32);

macro_rules! impl_scalar_ordering {
    ($reg:ident, $t:ty) => {
        impl NumOps<$t> for $reg {
            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> ScalarMask {
                ScalarMask(self.0 < rhs.0)
            }

            #[inline(always)]
            fn cmp_le(self, rhs: Self) -> ScalarMask {
                ScalarMask(self.0 <= rhs.0)
            }

            #[inline(always)]
            fn cmp_gt(self, rhs: Self) -> ScalarMask {
                ScalarMask(self.0 > rhs.0)
            }

            #[inline(always)]
            fn cmp_ge(self, rhs: Self) -> ScalarMask {
                ScalarMask(self.0 >= rhs.0)
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                Self(if self.0 < rhs.0 { self.0 } else { rhs.0 })
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                Self(if self.0 > rhs.0 { self.0 } else { rhs.0 })
            }
        }
    };
}

impl_scalar_ordering!(ScalarF32, f32);
impl_scalar_ordering!(ScalarI32, i32);
impl_scalar_ordering!(ScalarU32, u32);

// ============================================================================
// ScalarF32
// ============================================================================

/// Scalar f32 wrapper that implements all required ops.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct ScalarF32(pub f32);

impl FloatOps for ScalarF32 {
    #[inline(always)]
    fn abs(self) -> Self {
        Self(libm::fabsf(self.0))
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self(libm::sqrtf(self.0))
    }

    #[inline(always)]
    fn floor(self) -> Self {
        Self(libm::floorf(self.0))
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        Self(libm::truncf(self.0))
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        Self(libm::ceilf(self.0))
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(libm::roundf(self.0))
    }

    // A single lane has no neighbours to difference against.
    #[inline(always)]
    fn ddx(self) -> Self {
        Self(0.0)
    }

    #[inline(always)]
    fn ddy(self) -> Self {
        Self(0.0)
    }

    #[inline(always)]
    fn lanewise(self, f: impl Fn(f32) -> f32) -> Self {
        Self(f(self.0))
    }

    #[inline(always)]
    fn zip_lanes(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self(f(self.0, rhs.0))
    }
}

// Float arithmetic (no wrapping needed)
impl Add for ScalarF32 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for ScalarF32 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for ScalarF32 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Div for ScalarF32 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Neg for ScalarF32 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

// ============================================================================
// ScalarI32 / ScalarU32
// ============================================================================

/// Scalar i32 wrapper.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScalarI32(pub i32);

/// Scalar u32 wrapper.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScalarU32(pub u32);

// Integer arithmetic uses wrapping to match SIMD semantics
macro_rules! impl_scalar_int {
    ($reg:ident, $t:ty) => {
        impl Add for $reg {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self(self.0.wrapping_add(rhs.0))
            }
        }

        impl Sub for $reg {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0.wrapping_sub(rhs.0))
            }
        }

        impl Mul for $reg {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self(self.0.wrapping_mul(rhs.0))
            }
        }

        impl Div for $reg {
            type Output = Self;
            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                Self(self.0.wrapping_div(rhs.0))
            }
        }

        impl Rem for $reg {
            type Output = Self;
            #[inline(always)]
            fn rem(self, rhs: Self) -> Self {
                Self(self.0.wrapping_rem(rhs.0))
            }
        }

        impl BitAnd for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl BitOr for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitXor for $reg {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self(self.0 ^ rhs.0)
            }
        }

        impl Not for $reg {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                Self(!self.0)
            }
        }

        impl Shl<u32> for $reg {
            type Output = Self;
            #[inline(always)]
            fn shl(self, rhs: u32) -> Self {
                Self(self.0.checked_shl(rhs).unwrap_or(0))
            }
        }

        impl IntOps<$t> for $reg {
            #[inline(always)]
            fn zip_lanes(self, rhs: Self, f: impl Fn($t, $t) -> $t) -> Self {
                Self(f(self.0, rhs.0))
            }
        }
    };
}

impl_scalar_int!(ScalarI32, i32);
impl_scalar_int!(ScalarU32, u32);

impl Shr<u32> for ScalarI32 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        // Arithmetic shift: counts past the width fill with the sign.
        Self(self.0 >> rhs.min(31))
    }
}

impl Shr<u32> for ScalarU32 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        Self(self.0.checked_shr(rhs).unwrap_or(0))
    }
}
