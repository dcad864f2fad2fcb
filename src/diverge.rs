//! Divergent control flow on lock-step lanes.
//!
//! Lanes cannot branch independently. Instead every branch is executed and
//! writes are gated by a write mask: the set of lanes for which the current
//! branch is taken. `WriteMask` keeps one frame per nested conditional so
//! the mask can be narrowed on entry, switched for the `else` arm and
//! restored on exit.
//!
//! ```
//! use lockstep::{Float, Scalar, WriteMask};
//!
//! let x = Float::<Scalar, 4>::from([1.0, 2.0, 3.0, 4.0]);
//! let mut y = Float::<Scalar, 4>::splat(0.0);
//! let mut wm = WriteMask::new();
//!
//! // if (x > 2.0) y = x * 10.0; else y = -x;
//! wm.branch(
//!     &mut y,
//!     x.cmp_gt(2.0),
//!     |wm, y| wm.assign(y, x * 10.0),
//!     |wm, y| wm.assign(y, -x),
//! );
//! assert_eq!(y.to_vec(), vec![-1.0, -2.0, 30.0, 40.0]);
//! ```

use crate::backend::Backend;
use crate::batch::{Batch, Bool};
use crate::primitive::Primitive;

#[derive(Debug, Clone, Copy)]
struct Frame<B: Backend, const N: usize> {
    parent: Bool<B, N>,
    cond: Bool<B, N>,
}

/// Stack of nested branch conditions and the lanes they leave active.
#[derive(Debug, Clone)]
pub struct WriteMask<B: Backend, const N: usize> {
    active: Bool<B, N>,
    // Lanes that left the innermost loop (or the whole kernel, outside any
    // loop). Never reactivated by `flip` or `pop`.
    retired: Bool<B, N>,
    frames: Vec<Frame<B, N>>,
}

impl<B: Backend, const N: usize> Default for WriteMask<B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend, const N: usize> WriteMask<B, N> {
    /// All lanes active, no open branch.
    pub fn new() -> Self {
        Self {
            active: Bool::splat(true),
            retired: Bool::splat(false),
            frames: Vec::new(),
        }
    }

    /// Lanes currently allowed to write.
    #[inline(always)]
    pub fn active(&self) -> Bool<B, N> {
        self.active
    }

    /// Number of open branches.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True if any lane would take the current branch. Callers may skip the
    /// branch body entirely otherwise.
    #[inline(always)]
    pub fn any_active(&self) -> bool {
        self.active.any()
    }

    /// Enter the `then` arm of a conditional.
    pub fn push(&mut self, cond: Bool<B, N>) {
        self.frames.push(Frame {
            parent: self.active,
            cond,
        });
        self.active &= cond;
    }

    /// Switch from the `then` arm to the `else` arm of the innermost branch.
    pub fn flip(&mut self) {
        match self.frames.last() {
            Some(frame) => self.active = frame.parent & !frame.cond & !self.retired,
            None => log::debug!("write mask: flip with no open branch"),
        }
    }

    /// Leave the innermost branch.
    pub fn pop(&mut self) {
        match self.frames.pop() {
            Some(frame) => self.active = frame.parent & !self.retired,
            None => log::debug!("write mask: pop with no open branch"),
        }
    }

    /// Deactivate the active lanes where `cond` holds, through every branch
    /// they are nested in. Inside [`Self::repeat_while`] this is `break`: the
    /// lanes come back once the loop is left. Outside any loop it is
    /// `return`: they stay off for the life of this mask.
    pub fn retire(&mut self, cond: Bool<B, N>) {
        self.retired |= self.active & cond;
        self.active &= !cond;
    }

    /// `dst = src` on the active lanes only.
    #[inline(always)]
    pub fn assign<P: Primitive>(&self, dst: &mut Batch<B, P, N>, src: Batch<B, P, N>) {
        dst.assign_masked(self.active, src);
    }

    /// `if (cond) then(..) else otherwise(..)`. An arm no lane takes is
    /// skipped.
    pub fn branch<S>(
        &mut self,
        state: &mut S,
        cond: Bool<B, N>,
        then: impl FnOnce(&mut Self, &mut S),
        otherwise: impl FnOnce(&mut Self, &mut S),
    ) {
        self.push(cond);
        if self.any_active() {
            then(self, state);
        }
        self.flip();
        if self.any_active() {
            otherwise(self, state);
        }
        self.pop();
    }

    /// `while (cond) body(..)`. A lane leaves the loop the first time its
    /// condition is false (or it is retired) and stays out; the loop ends
    /// once no lane is left.
    pub fn repeat_while<S>(
        &mut self,
        state: &mut S,
        mut cond: impl FnMut(&S) -> Bool<B, N>,
        mut body: impl FnMut(&mut Self, &mut S),
    ) {
        let outer_retired = self.retired;
        self.retired = Bool::splat(false);
        self.push(Bool::splat(true));
        let mut iterations = 0usize;
        loop {
            self.active &= cond(&*state);
            if !self.any_active() {
                break;
            }
            body(self, state);
            iterations += 1;
        }
        log::trace!("write mask: loop finished after {iterations} iteration(s)");
        self.retired = outer_retired;
        self.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Native, Scalar};
    use crate::batch::{Bool, Float, Int};

    #[test]
    fn nested_branches_restore_mask() {
        let x = Int::<Scalar, 4>::from([0, 1, 2, 3]);
        let mut wm = WriteMask::<Scalar, 4>::new();
        wm.push(x.cmp_ge(2));
        wm.push(x.cmp_eq(3));
        assert_eq!(wm.active().to_vec(), vec![false, false, false, true]);
        wm.flip();
        assert_eq!(wm.active().to_vec(), vec![false, false, true, false]);
        wm.pop();
        assert_eq!(wm.depth(), 1);
        wm.flip();
        assert_eq!(wm.active().to_vec(), vec![true, true, false, false]);
        wm.pop();
        wm.pop();
        assert!(wm.active().all());
    }

    #[test]
    fn branch_merges_both_arms() {
        let x = Float::<Native, 2>::from_fn(|i| i as f32);
        let mut y = Float::<Native, 2>::splat(f32::NAN);
        let mut wm = WriteMask::new();
        wm.branch(
            &mut y,
            x.cmp_gt(2.0),
            |wm, y| wm.assign(y, x * 2.0),
            |wm, y| wm.assign(y, -x),
        );
        for i in 0..Float::<Native, 2>::WIDTH {
            let xi = i as f32;
            assert_eq!(y.lane(i), if xi > 2.0 { xi * 2.0 } else { -xi });
        }
    }

    #[test]
    fn loop_runs_each_lane_to_its_own_exit() {
        let mut x = Int::<Scalar, 4>::from([0, 5, 9, 12]);
        let mut wm = WriteMask::new();
        wm.repeat_while(
            &mut x,
            |x| x.cmp_lt(10),
            |wm, x| {
                let next = *x + 3;
                wm.assign(x, next)
            },
        );
        assert_eq!(x.to_vec(), vec![12, 11, 12, 12]);
        assert_eq!(wm.depth(), 0);
    }

    #[test]
    fn retire_acts_like_break() {
        let mut acc = Int::<Scalar, 3>::splat(0);
        let limit = Int::<Scalar, 3>::from([1, 2, 100]);
        let mut wm = WriteMask::new();
        wm.repeat_while(
            &mut acc,
            |acc| acc.cmp_lt(5),
            |wm, acc| {
                let next = *acc + 1;
                wm.assign(acc, next);
                wm.retire(acc.cmp_ge(limit));
            },
        );
        assert_eq!(acc.to_vec(), vec![1, 2, 5]);
    }

    #[test]
    fn break_inside_branch_leaves_the_loop() {
        let mut acc = Int::<Scalar, 3>::splat(0);
        let limit = Int::<Scalar, 3>::from([1, 2, 100]);
        let mut wm = WriteMask::new();
        wm.repeat_while(
            &mut acc,
            |acc| acc.cmp_lt(5),
            |wm, acc| {
                let next = *acc + 1;
                wm.assign(acc, next);
                let hit = acc.cmp_ge(limit);
                wm.branch(acc, hit, |wm, _| wm.retire(Bool::splat(true)), |_, _| {});
            },
        );
        assert_eq!(acc.to_vec(), vec![1, 2, 5]);
        assert!(wm.active().all());
    }

    #[test]
    fn inner_break_does_not_leave_outer_loop() {
        // for (i = 0; i < 3; i++) { for (;;) { n++; if (n >= 2) break; } }
        let mut state = (Int::<Scalar, 2>::splat(0), Int::<Scalar, 2>::from([0, 10]));
        let mut wm = WriteMask::new();
        wm.repeat_while(
            &mut state,
            |(i, _)| i.cmp_lt(3),
            |wm, state| {
                wm.repeat_while(
                    &mut state.1,
                    |_| Bool::splat(true),
                    |wm, n| {
                        let next = *n + 1;
                        wm.assign(n, next);
                        let hit = n.cmp_ge(2);
                        wm.branch(n, hit, |wm, _| wm.retire(Bool::splat(true)), |_, _| {});
                    },
                );
                let next = state.0 + 1;
                wm.assign(&mut state.0, next);
            },
        );
        assert_eq!(state.0.to_vec(), vec![3, 3]);
        assert_eq!(state.1.to_vec(), vec![4, 13]);
    }

    #[test]
    fn retire_outside_a_loop_acts_like_return() {
        let x = Int::<Scalar, 3>::from([0, 1, 2]);
        let mut y = Int::<Scalar, 3>::splat(0);
        let mut wm = WriteMask::new();
        wm.branch(&mut y, x.cmp_eq(1), |wm, _| wm.retire(Bool::splat(true)), |_, _| {});
        wm.assign(&mut y, Int::splat(7));
        assert_eq!(y.to_vec(), vec![7, 0, 7]);
    }

    #[test]
    fn unbalanced_pop_is_ignored() {
        let mut wm = WriteMask::<Scalar, 2>::new();
        wm.pop();
        wm.flip();
        assert!(wm.active().all());
    }
}
