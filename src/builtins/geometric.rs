//! Geometric functions on single-component values.
//!
//! Multi-component vectors are assembled from several batches elsewhere; on
//! one component these functions collapse to their elementwise forms.

use crate::backend::Backend;
use crate::batch::Float;

impl<B: Backend, const N: usize> Float<B, N> {
    /// `|self|`.
    #[inline(always)]
    pub fn length(self) -> Self {
        self.abs()
    }

    /// `|self - p1|`.
    #[inline(always)]
    pub fn distance(self, p1: impl Into<Self>) -> Self {
        let p1: Self = p1.into();
        (self - p1).abs()
    }

    /// `self * y`.
    #[inline(always)]
    pub fn dot(self, y: impl Into<Self>) -> Self {
        let y: Self = y.into();
        self * y
    }

    /// 1 where `self > 0`, else -1.
    #[inline(always)]
    pub fn normalize(self) -> Self {
        Self::splat(0.0).step(self) * 2.0 - 1.0
    }

    /// `self` (the normal) where `dot(nref, i) < 0`, else `-self`.
    #[inline(always)]
    pub fn faceforward(self, i: impl Into<Self>, nref: impl Into<Self>) -> Self {
        let nref: Self = nref.into();
        let facing = nref.dot(i).cmp_lt(0.0f32);
        (-self).assigned_where(facing, self)
    }

    /// Reflection of the incident `self` about the normal `n`:
    /// `i - 2 * dot(n, i) * n`.
    #[inline(always)]
    pub fn reflect(self, n: impl Into<Self>) -> Self {
        let n: Self = n.into();
        self - 2.0 * n.dot(self) * n
    }

    /// Refraction of the incident `self` through the normal `n` with ratio
    /// of indices `eta`. Lanes with total internal reflection give 0.
    pub fn refract(self, n: impl Into<Self>, eta: impl Into<Self>) -> Self {
        let n: Self = n.into();
        let eta: Self = eta.into();
        let d = n.dot(self);
        let k = 1.0 - eta * eta * (1.0 - d * d);
        let refracted = eta * self - (eta * d + k.sqrt()) * n;
        refracted.assigned_where(k.cmp_lt(0.0f32), Self::splat(0.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::Scalar;
    use crate::batch::Float;

    fn f<const N: usize>(v: [f32; N]) -> Float<Scalar, N> {
        Float::from(v)
    }

    #[test]
    fn elementwise_forms() {
        assert_eq!(f([-3.0, 2.0]).length().to_vec(), vec![3.0, 2.0]);
        assert_eq!(f([1.0, -1.0]).distance(f([4.0, 1.0])).to_vec(), vec![3.0, 2.0]);
        assert_eq!(f([3.0]).dot(-2.0).lane(0), -6.0);
        assert_eq!(f([-0.1, 0.0, 7.0]).normalize().to_vec(), vec![-1.0, -1.0, 1.0]);
    }

    #[test]
    fn faceforward_flips_toward_viewer() {
        let n = f([1.0, 1.0]);
        let i = f([-1.0, 1.0]);
        assert_eq!(n.faceforward(i, f([1.0, 1.0])).to_vec(), vec![1.0, -1.0]);
    }

    #[test]
    fn faceforward_flips_on_grazing_and_nan() {
        let n = f([1.0, 1.0, 1.0]);
        let i = f([0.0, 1.0, f32::NAN]);
        let nref = f([1.0, 0.0, 1.0]);
        assert_eq!(n.faceforward(i, nref).to_vec(), vec![-1.0, -1.0, -1.0]);
        assert_eq!(f([-2.0]).length().lane(0), 2.0);
    }

    #[test]
    fn reflect_and_refract() {
        assert_eq!(f([0.5]).reflect(1.0).lane(0), -0.5);
        // eta = 1 passes straight through
        assert_eq!(f([-1.0]).refract(1.0, 1.0).lane(0), -1.0);
        // k = 1 - 4 * (1 - 0.25) < 0: total internal reflection
        assert_eq!(f([0.5]).refract(1.0, 2.0).lane(0), 0.0);
    }

    #[test]
    fn refract_keeps_the_critical_angle() {
        // n = 0, eta = 1: d = 0 and k = 0 exactly, which is not reflection
        assert_eq!(f([3.0, -1.5]).refract(0.0, 1.0).to_vec(), vec![3.0, -1.5]);
    }
}
