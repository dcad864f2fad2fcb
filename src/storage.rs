//! Caller-owned aligned lane buffers.
//!
//! Hardware registers want their memory operands aligned. `AlignedLanes`
//! pins a fixed-size array to a 64-byte boundary, which satisfies every
//! backend's `ALIGN`.

use core::ops::{Deref, DerefMut};

/// `M` values aligned to 64 bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C, align(64))]
pub struct AlignedLanes<P, const M: usize>(pub [P; M]);

impl<P: Copy + Default, const M: usize> Default for AlignedLanes<P, M> {
    fn default() -> Self {
        Self([P::default(); M])
    }
}

impl<P, const M: usize> AlignedLanes<P, M> {
    pub const ALIGN: usize = 64;

    pub fn new(values: [P; M]) -> Self {
        Self(values)
    }

    pub fn as_ptr(&self) -> *const P {
        self.0.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut P {
        self.0.as_mut_ptr()
    }

    pub fn into_inner(self) -> [P; M] {
        self.0
    }
}

impl<P, const M: usize> Deref for AlignedLanes<P, M> {
    type Target = [P];

    fn deref(&self) -> &[P] {
        &self.0
    }
}

impl<P, const M: usize> DerefMut for AlignedLanes<P, M> {
    fn deref_mut(&mut self) -> &mut [P] {
        &mut self.0
    }
}

impl<P, const M: usize> From<[P; M]> for AlignedLanes<P, M> {
    fn from(values: [P; M]) -> Self {
        Self(values)
    }
}
