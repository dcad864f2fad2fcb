//! Operator surface of the numeric batches.
//!
//! Every binary operator accepts a batch or a plain scalar on either side,
//! and has a compound-assignment form. Integer arithmetic wraps; integer
//! division or remainder by zero panics.

use crate::backend::{Backend, NumOps, Register};
use crate::batch::{Batch, Bool};
use core::ops::*;

macro_rules! impl_binary {
    ($p:ty, $trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident) => {
        impl<B: Backend, const N: usize> $trait for Batch<B, $p, N> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                self.zip_regs(rhs, $trait::$method)
            }
        }

        impl<B: Backend, const N: usize> $trait<$p> for Batch<B, $p, N> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: $p) -> Self {
                $trait::$method(self, Self::splat(rhs))
            }
        }

        impl<B: Backend, const N: usize> $trait<Batch<B, $p, N>> for $p {
            type Output = Batch<B, $p, N>;
            #[inline(always)]
            fn $method(self, rhs: Batch<B, $p, N>) -> Batch<B, $p, N> {
                $trait::$method(Batch::<B, $p, N>::splat(self), rhs)
            }
        }

        impl<B: Backend, const N: usize> $assign_trait for Batch<B, $p, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = $trait::$method(*self, rhs);
            }
        }

        impl<B: Backend, const N: usize> $assign_trait<$p> for Batch<B, $p, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: $p) {
                *self = $trait::$method(*self, Self::splat(rhs));
            }
        }
    };
}

macro_rules! impl_compare {
    ($p:ty) => {
        impl<B: Backend, const N: usize> Batch<B, $p, N> {
            /// Lane-wise `self == rhs`.
            #[inline(always)]
            pub fn cmp_eq(self, rhs: impl Into<Self>) -> Bool<B, N> {
                self.zip_regs(rhs.into(), |a, b| a.cmp_eq(b))
            }

            /// Lane-wise `self != rhs`.
            #[inline(always)]
            pub fn cmp_ne(self, rhs: impl Into<Self>) -> Bool<B, N> {
                self.zip_regs(rhs.into(), |a, b| a.cmp_ne(b))
            }

            /// Lane-wise `self < rhs`.
            #[inline(always)]
            pub fn cmp_lt(self, rhs: impl Into<Self>) -> Bool<B, N> {
                self.zip_regs(rhs.into(), |a, b| a.cmp_lt(b))
            }

            /// Lane-wise `self <= rhs`.
            #[inline(always)]
            pub fn cmp_le(self, rhs: impl Into<Self>) -> Bool<B, N> {
                self.zip_regs(rhs.into(), |a, b| a.cmp_le(b))
            }

            /// Lane-wise `self > rhs`.
            #[inline(always)]
            pub fn cmp_gt(self, rhs: impl Into<Self>) -> Bool<B, N> {
                self.zip_regs(rhs.into(), |a, b| a.cmp_gt(b))
            }

            /// Lane-wise `self >= rhs`.
            #[inline(always)]
            pub fn cmp_ge(self, rhs: impl Into<Self>) -> Bool<B, N> {
                self.zip_regs(rhs.into(), |a, b| a.cmp_ge(b))
            }
        }

        impl<B: Backend, const N: usize> From<$p> for Batch<B, $p, N> {
            #[inline(always)]
            fn from(value: $p) -> Self {
                Self::splat(value)
            }
        }
    };
}

macro_rules! impl_arith {
    ($p:ty) => {
        impl_binary!($p, Add, add, AddAssign, add_assign);
        impl_binary!($p, Sub, sub, SubAssign, sub_assign);
        impl_binary!($p, Mul, mul, MulAssign, mul_assign);
        impl_binary!($p, Div, div, DivAssign, div_assign);
        impl_compare!($p);
    };
}

macro_rules! impl_int_ops {
    ($p:ty) => {
        impl_arith!($p);
        impl_binary!($p, Rem, rem, RemAssign, rem_assign);
        impl_binary!($p, BitAnd, bitand, BitAndAssign, bitand_assign);
        impl_binary!($p, BitOr, bitor, BitOrAssign, bitor_assign);
        impl_binary!($p, BitXor, bitxor, BitXorAssign, bitxor_assign);

        impl<B: Backend, const N: usize> Not for Batch<B, $p, N> {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                self.map_regs(Not::not)
            }
        }

        impl<B: Backend, const N: usize> Shl<u32> for Batch<B, $p, N> {
            type Output = Self;
            #[inline(always)]
            fn shl(self, rhs: u32) -> Self {
                self.map_regs(|r| r << rhs)
            }
        }

        impl<B: Backend, const N: usize> Shr<u32> for Batch<B, $p, N> {
            type Output = Self;
            #[inline(always)]
            fn shr(self, rhs: u32) -> Self {
                self.map_regs(|r| r >> rhs)
            }
        }

        impl<B: Backend, const N: usize> ShlAssign<u32> for Batch<B, $p, N> {
            #[inline(always)]
            fn shl_assign(&mut self, rhs: u32) {
                *self = *self << rhs;
            }
        }

        impl<B: Backend, const N: usize> ShrAssign<u32> for Batch<B, $p, N> {
            #[inline(always)]
            fn shr_assign(&mut self, rhs: u32) {
                *self = *self >> rhs;
            }
        }
    };
}

impl_arith!(f32);
impl_int_ops!(i32);
impl_int_ops!(u32);

impl<B: Backend, const N: usize> Neg for Batch<B, f32, N> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        self.map_regs(Neg::neg)
    }
}

/// Wrapping negation.
impl<B: Backend, const N: usize> Neg for Batch<B, i32, N> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::splat(0) - self
    }
}

/// Double-precision literals are narrowed to `f32` once, then broadcast.
impl<B: Backend, const N: usize> From<f64> for Batch<B, f32, N> {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self::splat(value as f32)
    }
}
