//! Lane multiplexing: ternary select and indexed reads.

use crate::backend::Backend;
use crate::batch::{Batch, Bool};
use crate::config::CONFIG;
use crate::primitive::Primitive;
use once_cell::sync::Lazy;

/// `strict_masked_read`, captured from [`CONFIG`] once per process.
static STRICT_MASKED_READ: Lazy<bool> = Lazy::new(|| CONFIG.strict_masked_read);

/// Integer kinds usable as a per-lane candidate index.
pub trait LaneIndex: Primitive {
    /// Lanes of `index` equal to `k`.
    fn lanes_equal<B: Backend, const N: usize>(index: Batch<B, Self, N>, k: usize) -> Bool<B, N>;
}

impl LaneIndex for i32 {
    #[inline(always)]
    fn lanes_equal<B: Backend, const N: usize>(index: Batch<B, i32, N>, k: usize) -> Bool<B, N> {
        index.cmp_eq(k as i32)
    }
}

impl LaneIndex for u32 {
    #[inline(always)]
    fn lanes_equal<B: Backend, const N: usize>(index: Batch<B, u32, N>, k: usize) -> Bool<B, N> {
        index.cmp_eq(k as u32)
    }
}

impl<B: Backend, P: Primitive, const N: usize> Batch<B, P, N> {
    /// Per-lane `cond ? if_true : if_false`.
    #[inline(always)]
    pub fn select(cond: Bool<B, N>, if_true: Self, if_false: Self) -> Self {
        if_false.assigned_where(cond, if_true)
    }

    /// `y` where `a` is true, `self` elsewhere.
    #[inline(always)]
    pub fn mix_bool(self, y: Self, a: Bool<B, N>) -> Self {
        self.assigned_where(a, y)
    }

    /// Copy each lane from the candidate whose position in `candidates`
    /// equals that lane of `index`.
    ///
    /// Lanes whose index matches no candidate keep their current value.
    /// Such lanes are a caller bug: they trip a debug assertion, and panic in
    /// every build when `strict_masked_read` is configured. That setting is
    /// read once per process and fixed from then on; force [`CONFIG`] at
    /// start-up to keep the config load out of the first failing read.
    pub fn read_indexed<I: LaneIndex>(&mut self, index: Batch<B, I, N>, candidates: &[Self]) {
        let mut matched = Bool::<B, N>::splat(false);
        for (k, candidate) in candidates.iter().enumerate() {
            let hit = I::lanes_equal(index, k);
            self.assign_masked(hit, *candidate);
            matched |= hit;
        }

        if !matched.all() {
            let unmatched = (!matched).count();
            log::trace!(
                "indexed read: {unmatched} lane(s) out of range for {} candidates",
                candidates.len()
            );
            assert!(
                !*STRICT_MASKED_READ,
                "indexed read: {unmatched} lane(s) index past {} candidates",
                candidates.len()
            );
            debug_assert!(
                false,
                "indexed read: {unmatched} lane(s) index past {} candidates",
                candidates.len()
            );
        }
    }

    /// Value-returning form of [`Self::read_indexed`].
    pub fn read_indexed_from<I: LaneIndex>(mut self, index: Batch<B, I, N>, candidates: &[Self]) -> Self {
        self.read_indexed(index, candidates);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::STRICT_MASKED_READ;
    use crate::backend::{Native, Scalar};
    use crate::batch::{Bool, Float, Int, Uint};
    use crate::config::CONFIG;

    #[test]
    fn read_indexed_picks_per_lane() {
        let a = Float::<Scalar, 4>::splat(10.0);
        let b = Float::<Scalar, 4>::splat(20.0);
        let c = Float::<Scalar, 4>::splat(30.0);
        let index = Int::<Scalar, 4>::from([2, 0, 1, 2]);
        let got = Float::<Scalar, 4>::default().read_indexed_from(index, &[a, b, c]);
        assert_eq!(got.to_vec(), vec![30.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn read_indexed_with_unsigned_index_on_native() {
        let evens = Int::<Native, 2>::from_fn(|i| i as i32 * 2);
        let odds = evens + 1;
        let index = Uint::<Native, 2>::from_fn(|i| (i % 2) as u32);
        let got = Int::<Native, 2>::default().read_indexed_from(index, &[evens, odds]);
        for i in 0..Int::<Native, 2>::WIDTH {
            assert_eq!(got.lane(i), i as i32 * 2 + (i % 2) as i32);
        }
    }

    #[test]
    fn strict_flag_is_captured_from_config() {
        assert_eq!(*STRICT_MASKED_READ, CONFIG.strict_masked_read);
    }

    #[test]
    fn select_and_mix_bool() {
        let cond = Bool::<Scalar, 3>::from([true, false, true]);
        let t = Int::<Scalar, 3>::splat(1);
        let f = Int::<Scalar, 3>::splat(-1);
        assert_eq!(Int::select(cond, t, f).to_vec(), vec![1, -1, 1]);
        assert_eq!(f.mix_bool(t, cond).to_vec(), vec![1, -1, 1]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "index past")]
    fn out_of_range_index_is_asserted() {
        let mut dst = Float::<Scalar, 2>::splat(0.0);
        dst.read_indexed(Int::<Scalar, 2>::from([0, 5]), &[Float::splat(1.0)]);
    }
}
