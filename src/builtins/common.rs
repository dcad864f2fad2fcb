//! Common float functions: rounding, remainders, interpolation, classification.

use crate::backend::{Backend, FloatOps, NumOps, Register};
use crate::batch::{Bool, Float};

impl<B: Backend, const N: usize> Float<B, N> {
    #[inline(always)]
    pub fn abs(self) -> Self {
        self.map_regs(|r| r.abs())
    }

    /// -1, 0 or 1 depending on the sign of each lane. Both zeros give 0,
    /// and so does NaN.
    #[inline(always)]
    pub fn sign(self) -> Self {
        let positive = self.cmp_gt(0.0f32).cast::<f32>();
        let negative = self.cmp_lt(0.0f32).cast::<f32>();
        positive - negative
    }

    #[inline(always)]
    pub fn floor(self) -> Self {
        self.map_regs(|r| r.floor())
    }

    #[inline(always)]
    pub fn trunc(self) -> Self {
        self.map_regs(|r| r.trunc())
    }

    /// Round to nearest, half-way values away from zero.
    #[inline(always)]
    pub fn round(self) -> Self {
        self.map_regs(|r| r.round())
    }

    /// Round to nearest, half-way values to the nearest even integer.
    ///
    /// Ties are detected with `fract(x) == 0.5`. The parity of the truncated
    /// integer part decides: even stays, odd moves one step away from zero.
    pub fn round_even(self) -> Self {
        let tie = self.fract().cmp_eq(0.5f32);
        if tie.none() {
            return self.round();
        }

        let int_part = self.trunc();
        let even = ((int_part * 0.5).trunc() * 2.0).cmp_eq(int_part);
        let step = Self::splat(1.0).assigned_where(self.cmp_le(0.0f32), Self::splat(-1.0));
        let tie_result = int_part.assigned_where(!even, int_part + step);

        self.round().assigned_where(tie, tie_result)
    }

    #[inline(always)]
    pub fn ceil(self) -> Self {
        self.map_regs(|r| r.ceil())
    }

    /// `self - floor(self)`, in [0, 1).
    #[inline(always)]
    pub fn fract(self) -> Self {
        self - self.floor()
    }

    /// Floored modulo: `self - y * floor(self / y)`. The result takes the
    /// sign of `y`.
    #[inline(always)]
    pub fn modulo(self, y: impl Into<Self>) -> Self {
        let y: Self = y.into();
        self - y * (self / y).floor()
    }

    /// Split into `(fractional, whole)` parts, both with the sign of `self`.
    /// Infinite lanes give a zero fractional part.
    pub fn modf(self) -> (Self, Self) {
        let whole = self.trunc();
        let fract = (self - whole).assigned_where(self.is_inf(), Self::splat(0.0));
        (fract, whole)
    }

    /// Lane-wise minimum. When either lane is NaN, `y` is returned.
    #[inline(always)]
    pub fn min(self, y: impl Into<Self>) -> Self {
        self.zip_regs(y.into(), |a, b| a.min(b))
    }

    /// Lane-wise maximum. When either lane is NaN, `y` is returned.
    #[inline(always)]
    pub fn max(self, y: impl Into<Self>) -> Self {
        self.zip_regs(y.into(), |a, b| a.max(b))
    }

    /// `min(max(self, lo), hi)`.
    #[inline(always)]
    pub fn clamp(self, lo: impl Into<Self>, hi: impl Into<Self>) -> Self {
        self.max(lo).min(hi)
    }

    /// Linear blend `self * (1 - a) + y * a`.
    #[inline(always)]
    pub fn mix(self, y: impl Into<Self>, a: impl Into<Self>) -> Self {
        let (y, a): (Self, Self) = (y.into(), a.into());
        self * (1.0 - a) + y * a
    }

    /// 1 where `x > self`, else 0 (`self` is the edge).
    #[inline(always)]
    pub fn step(self, x: impl Into<Self>) -> Self {
        let x: Self = x.into();
        x.cmp_gt(self).cast::<f32>()
    }

    /// Hermite interpolation between the edges `self` and `edge1`, with the
    /// parameter clamped to [0, 1] first.
    pub fn smoothstep(self, edge1: impl Into<Self>, x: impl Into<Self>) -> Self {
        let (edge1, x): (Self, Self) = (edge1.into(), x.into());
        let t = ((x - self) / (edge1 - self)).clamp(0.0f32, 1.0f32);
        t * t * (3.0 - 2.0 * t)
    }

    /// True on NaN lanes.
    #[inline(always)]
    pub fn is_nan(self) -> Bool<B, N> {
        self.zip_regs(self, |a, b| a.cmp_ne(b))
    }

    /// True on infinite lanes.
    #[inline(always)]
    pub fn is_inf(self) -> Bool<B, N> {
        self.abs().cmp_eq(f32::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::{Native, Scalar};
    use crate::batch::Float;

    fn f<const N: usize>(v: [f32; N]) -> Float<Scalar, N> {
        Float::from(v)
    }

    #[test]
    fn round_even_ties_go_to_even() {
        let x = f([2.5, 3.5, -2.5, -3.5, 0.5, -0.5, 1.5, -1.5]);
        assert_eq!(
            x.round_even().to_vec(),
            vec![2.0, 4.0, -2.0, -4.0, 0.0, 0.0, 2.0, -2.0]
        );
    }

    #[test]
    fn round_even_without_ties_rounds_normally() {
        let x = f([2.4, 2.6, -2.6, 7.0, 1e9]);
        assert_eq!(x.round_even().to_vec(), vec![2.0, 3.0, -3.0, 7.0, 1e9]);
    }

    #[test]
    fn modulo_is_floored() {
        assert_eq!(f([-3.0]).modulo(4.0).lane(0), 1.0);
        assert_eq!(f([3.0]).modulo(-4.0).lane(0), -1.0);
        assert_eq!(f([5.5]).modulo(2.0).lane(0), 1.5);
    }

    #[test]
    fn modf_splits_parts() {
        let (fract, whole) = f([-2.25, 3.5, f32::INFINITY]).modf();
        assert_eq!(whole.to_vec(), vec![-2.0, 3.0, f32::INFINITY]);
        assert_eq!(fract.to_vec(), vec![-0.25, 0.5, 0.0]);
    }

    #[test]
    fn sign_step_and_fract() {
        assert_eq!(f([-4.0, -0.0, 0.0, 9.0]).sign().to_vec(), vec![-1.0, 0.0, 0.0, 1.0]);
        // strictly greater: x == edge gives 0
        assert_eq!(f([1.0, 1.0, 1.0]).step(f([0.5, 1.0, 1.5])).to_vec(), vec![0.0, 0.0, 1.0]);
        assert_eq!(f([-0.25, 1.75]).fract().to_vec(), vec![0.75, 0.75]);
    }

    #[test]
    fn smoothstep_clamps_parameter() {
        let e0 = f([0.0, 0.0, 0.0, 0.0]);
        let got = e0.smoothstep(2.0, f([-1.0, 1.0, 2.0, 5.0])).to_vec();
        assert_eq!(got, vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn mix_clamp_min_max() {
        assert_eq!(f([0.0, 10.0]).mix(f([10.0, 20.0]), 0.25).to_vec(), vec![2.5, 12.5]);
        assert_eq!(f([-5.0, 0.5, 5.0]).clamp(0.0, 1.0).to_vec(), vec![0.0, 0.5, 1.0]);
        assert_eq!(f([1.0, 4.0]).min(f([3.0, 2.0])).to_vec(), vec![1.0, 2.0]);
        assert_eq!(f([1.0, 4.0]).max(f([3.0, 2.0])).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn classification_on_native() {
        let x = Float::<Native, 1>::from_fn(|i| match i % 4 {
            0 => f32::NAN,
            1 => f32::NEG_INFINITY,
            2 => 1.0,
            _ => f32::INFINITY,
        });
        let nan = x.is_nan();
        let inf = x.is_inf();
        for i in 0..Float::<Native, 1>::WIDTH {
            assert_eq!(nan.lane(i), i % 4 == 0);
            assert_eq!(inf.lane(i), i % 4 == 1 || i % 4 == 3);
        }
    }
}
