//! Screen-space derivatives.
//!
//! A hardware register of 4 lanes is a 2x2 pixel tile: lanes 0 and 1 form
//! the top row, lanes 2 and 3 the bottom row. Derivatives are finite
//! differences inside that tile, shared by both pixels of a row or column.
//! Backends without neighbouring lanes (the scalar one) return 0.

use crate::backend::{Backend, FloatOps};
use crate::batch::Float;

impl<B: Backend, const N: usize> Float<B, N> {
    /// Horizontal derivative: right column minus left column.
    #[inline(always)]
    pub fn dfdx(self) -> Self {
        self.map_regs(|r| r.ddx())
    }

    /// Vertical derivative: bottom row minus top row.
    #[inline(always)]
    pub fn dfdy(self) -> Self {
        self.map_regs(|r| r.ddy())
    }

    /// `|dfdx| + |dfdy|`.
    #[inline(always)]
    pub fn fwidth(self) -> Self {
        self.dfdx().abs() + self.dfdy().abs()
    }
}
