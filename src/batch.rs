//! The batch container.
//!
//! A `Batch<B, P, N>` holds `N` registers of backend `B`, each carrying
//! `B::LANES` values of primitive kind `P`, so `N * B::LANES` independent
//! lanes in total. Every operation is applied register by register; no lane
//! ever observes another lane, except through the explicit derivative
//! built-ins.

use crate::backend::{Backend, Register, Scalar, MAX_LANES};
use crate::error::BatchError;
use crate::primitive::{CastFrom, Primitive};
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;

/// `N` registers of backend `B` holding lanes of kind `P`.
pub struct Batch<B: Backend, P: Primitive, const N: usize> {
    pub(crate) parts: [P::Reg<B>; N],
    _backend: PhantomData<B>,
}

/// Float batch.
pub type Float<B, const N: usize> = Batch<B, f32, N>;

/// Signed integer batch.
pub type Int<B, const N: usize> = Batch<B, i32, N>;

/// Unsigned integer batch.
pub type Uint<B, const N: usize> = Batch<B, u32, N>;

/// Predicate batch, produced by comparisons and consumed by masked writes.
pub type Bool<B, const N: usize> = Batch<B, bool, N>;

impl<B: Backend, P: Primitive, const N: usize> Clone for Batch<B, P, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend, P: Primitive, const N: usize> Copy for Batch<B, P, N> {}

impl<B: Backend, P: Primitive, const N: usize> Default for Batch<B, P, N> {
    #[inline(always)]
    fn default() -> Self {
        Self::splat(P::default())
    }
}

impl<B: Backend, P: Primitive, const N: usize> Debug for Batch<B, P, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Batch<{}, {}, {}>{:?}", B::NAME, P::NAME, N, self.to_vec())
    }
}

/// Lane-wise equality of every lane (NaN lanes compare unequal).
impl<B: Backend, P: Primitive, const N: usize> PartialEq for Batch<B, P, N> {
    fn eq(&self, other: &Self) -> bool {
        (0..Self::WIDTH).all(|i| self.lane(i) == other.lane(i))
    }
}

// ============================================================================
// Construction
// ============================================================================

impl<B: Backend, P: Primitive, const N: usize> Batch<B, P, N> {
    /// Total number of lanes.
    pub const WIDTH: usize = N * B::LANES;

    /// Alignment required by [`Self::load_aligned`] and [`Self::store_aligned`].
    pub const ALIGN: usize = <P::Reg<B> as Register<P>>::ALIGN;

    /// Broadcast a scalar to every lane.
    #[inline(always)]
    pub fn splat(value: P) -> Self {
        Self::from_regs([<P::Reg<B>>::splat(value); N])
    }

    /// Wrap raw backend registers.
    #[inline(always)]
    pub fn from_regs(parts: [P::Reg<B>; N]) -> Self {
        Self {
            parts,
            _backend: PhantomData,
        }
    }

    /// The backend registers, in lane order.
    #[inline(always)]
    pub fn regs(&self) -> &[P::Reg<B>; N] {
        &self.parts
    }

    /// Build from exactly `N` single-register batches.
    #[inline(always)]
    pub fn from_parts(parts: [Batch<B, P, 1>; N]) -> Self {
        Self::from_regs(parts.map(|p| p.parts[0]))
    }

    /// Build lane by lane; `f` receives the lane index in `0..WIDTH`.
    pub fn from_fn(mut f: impl FnMut(usize) -> P) -> Self {
        let parts = core::array::from_fn(|k| {
            let mut buf = [P::default(); MAX_LANES];
            for (j, slot) in buf[..B::LANES].iter_mut().enumerate() {
                *slot = f(k * B::LANES + j);
            }
            <P::Reg<B>>::load(&buf)
        });
        Self::from_regs(parts)
    }

    /// Load the first `WIDTH` values of a slice, without alignment
    /// requirements.
    ///
    /// Panics if the slice is shorter than `WIDTH`.
    pub fn from_slice(src: &[P]) -> Self {
        assert!(
            src.len() >= Self::WIDTH,
            "slice holds {} lanes, batch needs {}",
            src.len(),
            Self::WIDTH
        );
        Self::from_regs(core::array::from_fn(|k| {
            <P::Reg<B>>::load(&src[k * B::LANES..])
        }))
    }

    // ========================================================================
    // Lane access
    // ========================================================================

    /// Read lane `i`.
    #[inline]
    pub fn lane(&self, i: usize) -> P {
        assert!(i < Self::WIDTH, "lane {i} out of range for width {}", Self::WIDTH);
        self.parts[i / B::LANES].extract(i % B::LANES)
    }

    /// Overwrite lane `i`.
    #[inline]
    pub fn set_lane(&mut self, i: usize, value: P) {
        assert!(i < Self::WIDTH, "lane {i} out of range for width {}", Self::WIDTH);
        let k = i / B::LANES;
        self.parts[k] = self.parts[k].insert(i % B::LANES, value);
    }

    /// Register `i` as a single-register batch.
    #[inline(always)]
    pub fn part(&self, i: usize) -> Batch<B, P, 1> {
        Batch::from_regs([self.parts[i]])
    }

    /// Overwrite register `i`.
    #[inline(always)]
    pub fn set_part(&mut self, i: usize, value: Batch<B, P, 1>) {
        self.parts[i] = value.parts[0];
    }

    /// All lanes, in order.
    pub fn to_vec(&self) -> Vec<P> {
        let mut out = vec![P::default(); Self::WIDTH];
        for (k, part) in self.parts.iter().enumerate() {
            part.store(&mut out[k * B::LANES..]);
        }
        out
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Overwrite every lane.
    #[inline(always)]
    pub fn assign(&mut self, src: Self) {
        *self = src;
    }

    /// Overwrite the lanes where `mask` is true; other lanes keep their
    /// value bit for bit.
    #[inline(always)]
    pub fn assign_masked(&mut self, mask: Bool<B, N>, src: Self) {
        for ((dst, m), s) in self.parts.iter_mut().zip(mask.parts).zip(src.parts) {
            *dst = <P::Reg<B>>::select(m, s, *dst);
        }
    }

    /// `mask ? src : self`, lane by lane.
    #[inline(always)]
    pub fn assigned_where(mut self, mask: Bool<B, N>, src: Self) -> Self {
        self.assign_masked(mask, src);
        self
    }

    // ========================================================================
    // Memory
    // ========================================================================

    /// Load `WIDTH` consecutive values.
    ///
    /// # Safety
    /// `ptr` must be valid for reads of `WIDTH` values and aligned to
    /// [`Self::ALIGN`].
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const P) -> Self {
        Self::from_regs(core::array::from_fn(|k| {
            // SAFETY: part k covers lanes k*LANES..(k+1)*LANES of the caller's
            // buffer; LANES * size_of::<P>() is a multiple of ALIGN.
            unsafe { <P::Reg<B>>::load_aligned(ptr.add(k * B::LANES)) }
        }))
    }

    /// Store `WIDTH` consecutive values.
    ///
    /// # Safety
    /// `ptr` must be valid for writes of `WIDTH` values and aligned to
    /// [`Self::ALIGN`].
    #[inline(always)]
    pub unsafe fn store_aligned(&self, ptr: *mut P) {
        for (k, part) in self.parts.iter().enumerate() {
            // SAFETY: see load_aligned.
            unsafe { part.store_aligned(ptr.add(k * B::LANES)) }
        }
    }

    /// Checked aligned load from the front of a slice.
    pub fn load(src: &[P]) -> Result<Self, BatchError> {
        Self::check_slice(src.len(), src.as_ptr() as usize)?;
        // SAFETY: length and alignment were checked above.
        Ok(unsafe { Self::load_aligned(src.as_ptr()) })
    }

    /// Checked aligned store to the front of a slice.
    pub fn store(&self, dst: &mut [P]) -> Result<(), BatchError> {
        Self::check_slice(dst.len(), dst.as_ptr() as usize)?;
        // SAFETY: length and alignment were checked above.
        unsafe { self.store_aligned(dst.as_mut_ptr()) };
        Ok(())
    }

    fn check_slice(len: usize, addr: usize) -> Result<(), BatchError> {
        if len < Self::WIDTH {
            return Err(BatchError::TooShort {
                needed: Self::WIDTH,
                got: len,
            });
        }
        if addr % Self::ALIGN != 0 {
            return Err(BatchError::Misaligned {
                align: Self::ALIGN,
                addr,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Per-lane value cast to another primitive kind.
    #[inline(always)]
    pub fn cast<Q: CastFrom<P>>(self) -> Batch<B, Q, N> {
        self.map_regs(Q::cast_reg::<B>)
    }

    /// Apply `f` to every register.
    #[inline(always)]
    pub(crate) fn map_regs<Q: Primitive>(self, f: impl FnMut(P::Reg<B>) -> Q::Reg<B>) -> Batch<B, Q, N> {
        Batch::from_regs(self.parts.map(f))
    }

    /// Apply `f` to every pair of registers.
    #[inline(always)]
    pub(crate) fn zip_regs<Q: Primitive>(
        self,
        rhs: Self,
        mut f: impl FnMut(P::Reg<B>, P::Reg<B>) -> Q::Reg<B>,
    ) -> Batch<B, Q, N> {
        Batch::from_regs(core::array::from_fn(|k| f(self.parts[k], rhs.parts[k])))
    }
}

impl<P: Primitive, const N: usize> From<[P; N]> for Batch<Scalar, P, N> {
    /// One value per lane; the scalar backend has exactly `N` lanes.
    fn from(values: [P; N]) -> Self {
        Self::from_regs(values.map(<P::Reg<Scalar>>::splat))
    }
}

// ============================================================================
// Bit reinterpretation
// ============================================================================

impl<B: Backend, const N: usize> Batch<B, f32, N> {
    /// IEEE-754 bit pattern of every lane.
    #[inline(always)]
    pub fn to_bits(self) -> Batch<B, u32, N> {
        self.map_regs(B::f32_to_bits)
    }

    /// IEEE-754 bit pattern of every lane, as signed integers.
    #[inline(always)]
    pub fn to_int_bits(self) -> Batch<B, i32, N> {
        self.map_regs(B::f32_to_int_bits)
    }

    /// Floats whose bit patterns are the given lanes.
    #[inline(always)]
    pub fn from_bits(bits: Batch<B, u32, N>) -> Self {
        bits.map_regs(B::f32_from_bits)
    }

    /// Floats whose bit patterns are the given signed lanes.
    #[inline(always)]
    pub fn from_int_bits(bits: Batch<B, i32, N>) -> Self {
        bits.map_regs(B::f32_from_int_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Native;
    use crate::storage::AlignedLanes;

    #[test]
    fn width_counts_elementary_lanes() {
        assert_eq!(Batch::<Scalar, f32, 3>::WIDTH, 3);
        assert_eq!(Batch::<Native, f32, 2>::WIDTH, 2 * Native::LANES);
    }

    #[test]
    fn lane_access_crosses_registers() {
        let mut b = Batch::<Native, i32, 3>::from_fn(|i| i as i32 * 10);
        let last = Batch::<Native, i32, 3>::WIDTH - 1;
        assert_eq!(b.lane(last), last as i32 * 10);
        b.set_lane(last, -1);
        assert_eq!(b.lane(last), -1);
        assert_eq!(b.lane(0), 0);
        assert_eq!(b.part(0).to_vec(), (0..Native::LANES as i32).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn from_parts_keeps_order() {
        let b = Batch::<Scalar, u32, 3>::from_parts([1u32.into(), 2u32.into(), 3u32.into()]);
        assert_eq!(b.to_vec(), vec![1, 2, 3]);
        assert_eq!(b, Batch::from([1u32, 2, 3]));
    }

    #[test]
    fn checked_load_reports_short_and_misaligned() {
        type F = Batch<Native, f32, 2>;
        let buf = AlignedLanes::<f32, 16>::default();
        assert!(F::load(&buf[..]).is_ok());
        assert_eq!(
            F::load(&buf[..1]).unwrap_err(),
            BatchError::TooShort { needed: F::WIDTH, got: 1 }
        );
        if F::ALIGN > core::mem::align_of::<f32>() {
            assert!(matches!(F::load(&buf[1..]), Err(BatchError::Misaligned { .. })));
        }
    }

    #[test]
    fn bit_reinterpretation_is_exact() {
        let x = Batch::<Scalar, f32, 3>::from([1.0, -0.0, f32::INFINITY]);
        assert_eq!(x.to_bits().to_vec(), vec![0x3F80_0000, 0x8000_0000, 0x7F80_0000]);
        assert_eq!(x.to_int_bits().lane(1), i32::MIN);
        let back = Batch::<Scalar, f32, 3>::from_bits(x.to_bits());
        assert!(back.lane(1).is_sign_negative());
    }
}
