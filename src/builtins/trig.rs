//! Angle and trigonometry functions.

use crate::backend::{Backend, FloatOps};
use crate::batch::Float;
use core::f32::consts::PI;

impl<B: Backend, const N: usize> Float<B, N> {
    /// Degrees to radians.
    #[inline(always)]
    pub fn radians(self) -> Self {
        self * (PI / 180.0)
    }

    /// Radians to degrees.
    #[inline(always)]
    pub fn degrees(self) -> Self {
        self * (180.0 / PI)
    }

    #[inline(always)]
    pub fn sin(self) -> Self {
        self.map_regs(|r| r.sin())
    }

    #[inline(always)]
    pub fn cos(self) -> Self {
        self.map_regs(|r| r.cos())
    }

    #[inline(always)]
    pub fn tan(self) -> Self {
        self.map_regs(|r| r.tan())
    }

    #[inline(always)]
    pub fn asin(self) -> Self {
        self.map_regs(|r| r.asin())
    }

    #[inline(always)]
    pub fn acos(self) -> Self {
        self.map_regs(|r| r.acos())
    }

    /// Arctangent of `self`, in [-π/2, π/2].
    #[inline(always)]
    pub fn atan(self) -> Self {
        self.map_regs(|r| r.atan())
    }

    /// Two-argument arctangent: angle of the point `(x, self)`, in [-π, π].
    #[inline(always)]
    pub fn atan2(self, x: impl Into<Self>) -> Self {
        self.zip_regs(x.into(), |y, x| y.atan2(x))
    }

    #[inline(always)]
    pub fn sinh(self) -> Self {
        self.map_regs(|r| r.sinh())
    }

    #[inline(always)]
    pub fn cosh(self) -> Self {
        self.map_regs(|r| r.cosh())
    }

    #[inline(always)]
    pub fn tanh(self) -> Self {
        self.map_regs(|r| r.tanh())
    }

    #[inline(always)]
    pub fn asinh(self) -> Self {
        self.map_regs(|r| r.asinh())
    }

    #[inline(always)]
    pub fn acosh(self) -> Self {
        self.map_regs(|r| r.acosh())
    }

    #[inline(always)]
    pub fn atanh(self) -> Self {
        self.map_regs(|r| r.atanh())
    }
}
