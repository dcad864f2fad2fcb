//! Predicate batches.
//!
//! Logic on predicates is evaluated on every lane; there is no short
//! circuiting. A predicate collapses to a single decision through [`any`],
//! [`all`] or [`none`].
//!
//! [`any`]: Batch::any
//! [`all`]: Batch::all
//! [`none`]: Batch::none

use crate::backend::{Backend, MaskOps, Register};
use crate::batch::{Batch, Bool};
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

impl<B: Backend, const N: usize> Bool<B, N> {
    /// True if at least one lane is true.
    #[inline(always)]
    pub fn any(self) -> bool {
        self.parts.iter().any(|m| m.any())
    }

    /// True if every lane is true.
    #[inline(always)]
    pub fn all(self) -> bool {
        self.parts.iter().all(|m| m.all())
    }

    /// True if no lane is true.
    #[inline(always)]
    pub fn none(self) -> bool {
        !self.any()
    }

    /// Number of true lanes.
    pub fn count(self) -> usize {
        self.parts.iter().map(|m| m.bitmask().count_ones() as usize).sum()
    }

    /// Lane-wise equality of two predicates.
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Self {
        self.zip_regs(rhs, |a, b| a.cmp_eq(b))
    }

    /// Lane-wise inequality of two predicates.
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Self {
        self ^ rhs
    }
}

impl<B: Backend, const N: usize> From<bool> for Bool<B, N> {
    #[inline(always)]
    fn from(value: bool) -> Self {
        Self::splat(value)
    }
}

macro_rules! impl_bool_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident) => {
        impl<B: Backend, const N: usize> $trait for Bool<B, N> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                self.zip_regs(rhs, $trait::$method)
            }
        }

        impl<B: Backend, const N: usize> $trait<bool> for Bool<B, N> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: bool) -> Self {
                $trait::$method(self, Self::splat(rhs))
            }
        }

        impl<B: Backend, const N: usize> $trait<Bool<B, N>> for bool {
            type Output = Bool<B, N>;
            #[inline(always)]
            fn $method(self, rhs: Bool<B, N>) -> Bool<B, N> {
                $trait::$method(Bool::<B, N>::splat(self), rhs)
            }
        }

        impl<B: Backend, const N: usize> $assign_trait for Bool<B, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = $trait::$method(*self, rhs);
            }
        }
    };
}

impl_bool_op!(BitAnd, bitand, BitAndAssign, bitand_assign);
impl_bool_op!(BitOr, bitor, BitOrAssign, bitor_assign);
impl_bool_op!(BitXor, bitxor, BitXorAssign, bitxor_assign);

impl<B: Backend, const N: usize> Not for Batch<B, bool, N> {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        self.map_regs(Not::not)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Native, Scalar};

    #[test]
    fn logic_is_lane_wise() {
        let a = Bool::<Scalar, 4>::from([true, true, false, false]);
        let b = Bool::<Scalar, 4>::from([true, false, true, false]);
        assert_eq!((a & b).to_vec(), vec![true, false, false, false]);
        assert_eq!((a | b).to_vec(), vec![true, true, true, false]);
        assert_eq!((a ^ b).to_vec(), vec![false, true, true, false]);
        assert_eq!((!a).to_vec(), vec![false, false, true, true]);
        assert_eq!(a.cmp_eq(b).to_vec(), vec![true, false, false, true]);
        assert_eq!((a & true), a);
        assert_eq!((false | b), b);
    }

    #[test]
    fn reductions_on_native() {
        let mut m = Bool::<Native, 2>::splat(false);
        assert!(m.none());
        assert!(!m.any());
        m.set_lane(Bool::<Native, 2>::WIDTH - 1, true);
        assert!(m.any());
        assert!(!m.all());
        assert_eq!(m.count(), 1);
        assert!((!Bool::<Native, 2>::splat(false)).all());
    }
}
