//! Exponential functions.

use crate::backend::{Backend, FloatOps};
use crate::batch::Float;

impl<B: Backend, const N: usize> Float<B, N> {
    /// `self` raised to `y`.
    #[inline(always)]
    pub fn pow(self, y: impl Into<Self>) -> Self {
        self.zip_regs(y.into(), |x, y| x.pow(y))
    }

    #[inline(always)]
    pub fn exp(self) -> Self {
        self.map_regs(|r| r.exp())
    }

    /// Natural logarithm.
    #[inline(always)]
    pub fn log(self) -> Self {
        self.map_regs(|r| r.ln())
    }

    /// 2 raised to `self`.
    #[inline(always)]
    pub fn exp2(self) -> Self {
        self.map_regs(|r| r.exp2())
    }

    #[inline(always)]
    pub fn log2(self) -> Self {
        self.map_regs(|r| r.log2())
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        self.map_regs(|r| r.sqrt())
    }

    /// `1 / sqrt(self)`, computed exactly (no reciprocal estimate).
    #[inline(always)]
    pub fn inverse_sqrt(self) -> Self {
        1.0 / self.sqrt()
    }
}
