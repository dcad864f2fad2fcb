//! Integer built-ins.

use crate::backend::{Backend, NumOps};
use crate::batch::{Int, Uint};

macro_rules! impl_int_builtins {
    ($alias:ident) => {
        impl<B: Backend, const N: usize> $alias<B, N> {
            #[inline(always)]
            pub fn min(self, y: impl Into<Self>) -> Self {
                self.zip_regs(y.into(), |a, b| a.min(b))
            }

            #[inline(always)]
            pub fn max(self, y: impl Into<Self>) -> Self {
                self.zip_regs(y.into(), |a, b| a.max(b))
            }

            /// `min(max(self, lo), hi)`.
            #[inline(always)]
            pub fn clamp(self, lo: impl Into<Self>, hi: impl Into<Self>) -> Self {
                self.max(lo).min(hi)
            }
        }
    };
}

impl_int_builtins!(Int);
impl_int_builtins!(Uint);

impl<B: Backend, const N: usize> Int<B, N> {
    /// Absolute value; `i32::MIN` wraps to itself.
    #[inline(always)]
    pub fn abs(self) -> Self {
        (-self).assigned_where(self.cmp_ge(0), self)
    }

    /// -1, 0 or 1.
    #[inline(always)]
    pub fn sign(self) -> Self {
        self.cmp_gt(0).cast::<i32>() - self.cmp_lt(0).cast::<i32>()
    }
}
