//! Backend traits and register operations.
//!
//! A backend supplies one register type per primitive kind (`f32`, `i32`,
//! `u32`) plus a single mask type shared by all of them. Batches are built
//! purely from the operations defined here.
//!
//! # Architecture
//!
//! The operations are split into two layers:
//!
//! - **Primitives**: operations each backend must implement, mapping 1:1 (or
//!   near 1:1) to hardware instructions (add, compare, select, floor, ...).
//! - **Compounds**: default methods built from primitives or evaluated per
//!   lane through `libm` (sin, exp, pow, ...). Backends may override them
//!   with native sequences.

use core::fmt::Debug;
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod arm;

pub use scalar::Scalar;

#[cfg(target_arch = "x86_64")]
pub use x86::Sse2;

#[cfg(target_arch = "aarch64")]
pub use arm::Neon;

/// The widest hardware backend available for the compile target.
#[cfg(target_arch = "x86_64")]
pub type Native = x86::Sse2;

/// The widest hardware backend available for the compile target.
#[cfg(target_arch = "aarch64")]
pub type Native = arm::Neon;

/// The widest hardware backend available for the compile target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type Native = scalar::Scalar;

/// Upper bound on `LANES` for every backend. Sizes the stack buffers used by
/// per-lane fallbacks.
pub const MAX_LANES: usize = 16;

/// A backend provides the register types for one instruction set.
pub trait Backend: 'static + Copy + Clone + Debug + Default + Send + Sync {
    /// Number of lanes in every register of this backend.
    const LANES: usize;

    /// Human readable name, used in logs.
    const NAME: &'static str;

    /// Predicate register produced by comparisons.
    type Mask: MaskOps + Register<bool, Mask = Self::Mask>;

    /// Single precision float register.
    type F32: FloatOps<Mask = Self::Mask>;

    /// Signed 32-bit integer register.
    type I32: IntOps<i32, Mask = Self::Mask>;

    /// Unsigned 32-bit integer register.
    type U32: IntOps<u32, Mask = Self::Mask>;

    // =========================================================================
    // Value casts
    // =========================================================================

    /// Converts signed integers to the nearest float.
    fn f32_from_i32(v: Self::I32) -> Self::F32;

    /// Converts unsigned integers to the nearest float.
    fn f32_from_u32(v: Self::U32) -> Self::F32;

    /// Truncates floats toward zero. Out-of-range values saturate, NaN becomes 0.
    fn i32_from_f32(v: Self::F32) -> Self::I32;

    /// Truncates floats toward zero. Negative values and NaN become 0,
    /// values above `u32::MAX` saturate.
    fn u32_from_f32(v: Self::F32) -> Self::U32;

    /// Two's complement reinterpretation (`as u32`).
    fn u32_from_i32(v: Self::I32) -> Self::U32;

    /// Two's complement reinterpretation (`as i32`).
    fn i32_from_u32(v: Self::U32) -> Self::I32;

    // =========================================================================
    // Bit reinterpretation
    // =========================================================================

    /// Raw IEEE-754 bits of each lane.
    fn f32_to_bits(v: Self::F32) -> Self::U32;

    /// Float whose IEEE-754 bits are given by each lane.
    fn f32_from_bits(v: Self::U32) -> Self::F32;

    /// Raw IEEE-754 bits of each lane, as signed integers.
    #[inline(always)]
    fn f32_to_int_bits(v: Self::F32) -> Self::I32 {
        Self::i32_from_u32(Self::f32_to_bits(v))
    }

    /// Float whose IEEE-754 bits are given by each signed lane.
    #[inline(always)]
    fn f32_from_int_bits(v: Self::I32) -> Self::F32 {
        Self::f32_from_bits(Self::u32_from_i32(v))
    }

    // =========================================================================
    // Mask conversion
    // =========================================================================

    /// 1.0 where the mask is set, 0.0 elsewhere.
    #[inline(always)]
    fn f32_from_mask(m: Self::Mask) -> Self::F32 {
        Self::F32::select(m, Self::F32::splat(1.0), Self::F32::splat(0.0))
    }

    /// 1 where the mask is set, 0 elsewhere.
    #[inline(always)]
    fn i32_from_mask(m: Self::Mask) -> Self::I32 {
        Self::I32::select(m, Self::I32::splat(1), Self::I32::splat(0))
    }

    /// 1 where the mask is set, 0 elsewhere.
    #[inline(always)]
    fn u32_from_mask(m: Self::Mask) -> Self::U32 {
        Self::U32::select(m, Self::U32::splat(1), Self::U32::splat(0))
    }

    /// Set where the lane is non-zero (NaN counts as non-zero).
    #[inline(always)]
    fn mask_from_f32(v: Self::F32) -> Self::Mask {
        v.cmp_ne(Self::F32::splat(0.0))
    }

    /// Set where the lane is non-zero.
    #[inline(always)]
    fn mask_from_i32(v: Self::I32) -> Self::Mask {
        v.cmp_ne(Self::I32::splat(0))
    }

    /// Set where the lane is non-zero.
    #[inline(always)]
    fn mask_from_u32(v: Self::U32) -> Self::Mask {
        v.cmp_ne(Self::U32::splat(0))
    }
}

/// Storage and movement operations shared by every register kind.
pub trait Register<P: Copy + Default>: Copy + Clone + Debug + Default + Send + Sync + 'static {
    /// Predicate type produced by comparisons on this register.
    type Mask: MaskOps;

    /// Number of lanes.
    const LANES: usize;

    /// Required alignment, in bytes, of pointers passed to the aligned
    /// load/store entry points.
    const ALIGN: usize;

    /// Broadcast a scalar to all lanes.
    fn splat(value: P) -> Self;

    /// Load `LANES` values from the front of a slice.
    ///
    /// Panics if the slice is shorter than `LANES`.
    fn load(src: &[P]) -> Self;

    /// Store `LANES` values to the front of a slice.
    ///
    /// Panics if the slice is shorter than `LANES`.
    fn store(self, dst: &mut [P]);

    /// Load `LANES` consecutive values.
    ///
    /// # Safety
    /// `ptr` must be valid for reads of `LANES` values and aligned to `ALIGN`.
    unsafe fn load_aligned(ptr: *const P) -> Self;

    /// Store `LANES` consecutive values.
    ///
    /// # Safety
    /// `ptr` must be valid for writes of `LANES` values and aligned to `ALIGN`.
    unsafe fn store_aligned(self, ptr: *mut P);

    /// Read a single lane.
    #[inline(always)]
    fn extract(self, lane: usize) -> P {
        assert!(lane < Self::LANES, "lane {lane} out of range");
        let mut buf = [P::default(); MAX_LANES];
        self.store(&mut buf);
        buf[lane]
    }

    /// Return a copy with a single lane replaced.
    #[inline(always)]
    fn insert(self, lane: usize, value: P) -> Self {
        assert!(lane < Self::LANES, "lane {lane} out of range");
        let mut buf = [P::default(); MAX_LANES];
        self.store(&mut buf);
        buf[lane] = value;
        Self::load(&buf)
    }

    /// Per-lane `mask ? if_true : if_false`.
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;

    /// Lane-wise equality.
    fn cmp_eq(self, rhs: Self) -> Self::Mask;

    /// Lane-wise inequality (true for NaN lanes).
    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self::Mask {
        !self.cmp_eq(rhs)
    }
}

/// Operations on predicate registers.
pub trait MaskOps:
    Copy
    + Clone
    + Debug
    + Default
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Check if any lane is true.
    fn any(self) -> bool;

    /// Check if all lanes are true.
    fn all(self) -> bool;

    /// Bit `i` is set when lane `i` is true.
    fn bitmask(self) -> u32;
}

/// Arithmetic and ordering shared by the numeric registers.
pub trait NumOps<P: Copy + Default>:
    Register<P> + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    /// Less than.
    fn cmp_lt(self, rhs: Self) -> Self::Mask;

    /// Less than or equal.
    fn cmp_le(self, rhs: Self) -> Self::Mask;

    /// Greater than.
    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self::Mask {
        rhs.cmp_lt(self)
    }

    /// Greater than or equal.
    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self::Mask {
        rhs.cmp_le(self)
    }

    /// `self < rhs ? self : rhs`
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self::select(self.cmp_lt(rhs), self, rhs)
    }

    /// `self > rhs ? self : rhs`
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self::select(self.cmp_gt(rhs), self, rhs)
    }
}

/// Single precision float registers.
pub trait FloatOps: NumOps<f32> + Neg<Output = Self> {
    // =========================================================================
    // Primitives
    // =========================================================================

    /// Absolute value (clears the sign bit).
    fn abs(self) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Round toward negative infinity.
    fn floor(self) -> Self;

    /// Round toward zero.
    fn trunc(self) -> Self;

    /// Horizontal screen-space difference within the register's pixel tile.
    fn ddx(self) -> Self;

    /// Vertical screen-space difference within the register's pixel tile.
    fn ddy(self) -> Self;

    // =========================================================================
    // Per-lane fallback
    // =========================================================================

    /// Apply a scalar function to every lane.
    #[inline(always)]
    fn lanewise(self, f: impl Fn(f32) -> f32) -> Self {
        let mut buf = [0.0f32; MAX_LANES];
        self.store(&mut buf);
        for v in &mut buf[..Self::LANES] {
            *v = f(*v);
        }
        Self::load(&buf)
    }

    /// Apply a scalar function to every pair of lanes.
    #[inline(always)]
    fn zip_lanes(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut a = [0.0f32; MAX_LANES];
        let mut b = [0.0f32; MAX_LANES];
        self.store(&mut a);
        rhs.store(&mut b);
        for (x, y) in a[..Self::LANES].iter_mut().zip(&b[..Self::LANES]) {
            *x = f(*x, *y);
        }
        Self::load(&a)
    }

    // =========================================================================
    // Compounds
    // =========================================================================

    /// Round toward positive infinity.
    #[inline(always)]
    fn ceil(self) -> Self {
        -(-self).floor()
    }

    /// Round half away from zero.
    #[inline(always)]
    fn round(self) -> Self {
        let t = self.trunc();
        let half = (self - t).abs().cmp_ge(Self::splat(0.5));
        let away = Self::select(self.cmp_lt(Self::splat(0.0)), Self::splat(-1.0), Self::splat(1.0));
        Self::select(half, t + away, t)
    }

    /// Sine.
    #[inline(always)]
    fn sin(self) -> Self {
        self.lanewise(libm::sinf)
    }

    /// Cosine.
    #[inline(always)]
    fn cos(self) -> Self {
        self.lanewise(libm::cosf)
    }

    /// Tangent.
    #[inline(always)]
    fn tan(self) -> Self {
        self.lanewise(libm::tanf)
    }

    /// Arcsine.
    #[inline(always)]
    fn asin(self) -> Self {
        self.lanewise(libm::asinf)
    }

    /// Arccosine.
    #[inline(always)]
    fn acos(self) -> Self {
        self.lanewise(libm::acosf)
    }

    /// Arctangent.
    #[inline(always)]
    fn atan(self) -> Self {
        self.lanewise(libm::atanf)
    }

    /// Four-quadrant arctangent of `self / x`, in [-π, π].
    #[inline(always)]
    fn atan2(self, x: Self) -> Self {
        self.zip_lanes(x, libm::atan2f)
    }

    /// Hyperbolic sine.
    #[inline(always)]
    fn sinh(self) -> Self {
        self.lanewise(libm::sinhf)
    }

    /// Hyperbolic cosine.
    #[inline(always)]
    fn cosh(self) -> Self {
        self.lanewise(libm::coshf)
    }

    /// Hyperbolic tangent.
    #[inline(always)]
    fn tanh(self) -> Self {
        self.lanewise(libm::tanhf)
    }

    /// Inverse hyperbolic sine.
    #[inline(always)]
    fn asinh(self) -> Self {
        self.lanewise(libm::asinhf)
    }

    /// Inverse hyperbolic cosine.
    #[inline(always)]
    fn acosh(self) -> Self {
        self.lanewise(libm::acoshf)
    }

    /// Inverse hyperbolic tangent.
    #[inline(always)]
    fn atanh(self) -> Self {
        self.lanewise(libm::atanhf)
    }

    /// Natural exponential.
    #[inline(always)]
    fn exp(self) -> Self {
        self.lanewise(libm::expf)
    }

    /// Natural logarithm.
    #[inline(always)]
    fn ln(self) -> Self {
        self.lanewise(libm::logf)
    }

    /// Base-2 exponential.
    #[inline(always)]
    fn exp2(self) -> Self {
        self.lanewise(libm::exp2f)
    }

    /// Base-2 logarithm.
    #[inline(always)]
    fn log2(self) -> Self {
        self.lanewise(libm::log2f)
    }

    /// Power: self^exp.
    #[inline(always)]
    fn pow(self, exp: Self) -> Self {
        self.zip_lanes(exp, libm::powf)
    }
}

/// Integer registers (`i32` and `u32`).
///
/// `+`, `-` and `*` wrap on overflow. `/` and `%` wrap on overflow and panic
/// on a zero divisor. Shift counts of 32 or more shift every bit out (for
/// signed right shifts, the sign fills the lane).
pub trait IntOps<P: Copy + Default>:
    NumOps<P>
    + Rem<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Apply a scalar function to every pair of lanes.
    #[inline(always)]
    fn zip_lanes(self, rhs: Self, f: impl Fn(P, P) -> P) -> Self {
        let mut a = [P::default(); MAX_LANES];
        let mut b = [P::default(); MAX_LANES];
        self.store(&mut a);
        rhs.store(&mut b);
        for (x, y) in a[..Self::LANES].iter_mut().zip(&b[..Self::LANES]) {
            *x = f(*x, *y);
        }
        Self::load(&a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes<R: Register<f32>>(r: R) -> Vec<f32> {
        let mut out = vec![0.0; R::LANES];
        r.store(&mut out);
        out
    }

    #[test]
    fn native_lane_count_fits_buffers() {
        assert!(Native::LANES <= MAX_LANES);
        assert!(Scalar::LANES == 1);
    }

    #[test]
    fn compound_round_is_half_away_from_zero() {
        type F = <Native as Backend>::F32;
        for (x, want) in [(2.5f32, 3.0f32), (-2.5, -3.0), (0.49999997, 0.0), (-0.5, -1.0), (7.0, 7.0)] {
            let got = lanes(F::splat(x).round());
            assert!(got.iter().all(|&g| g == want), "round({x}) = {got:?}, want {want}");
        }
    }

    #[test]
    fn ceil_keeps_negative_zero() {
        type F = <Native as Backend>::F32;
        let got = lanes(F::splat(-0.5).ceil());
        assert!(got.iter().all(|g| *g == 0.0 && g.is_sign_negative()));
    }
}
