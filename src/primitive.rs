//! Primitive lane kinds and the register each one maps to per backend.

use crate::backend::{Backend, Register};
use core::fmt::Debug;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for bool {}
}

/// A scalar kind that can fill a batch lane: `f32`, `i32`, `u32` or `bool`.
///
/// This trait is sealed. `Reg<B>` names the register that holds `B::LANES`
/// values of this kind, and every register of a backend shares the
/// backend's mask type.
pub trait Primitive: sealed::Sealed + Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Register holding `B::LANES` lanes of this kind.
    type Reg<B: Backend>: Register<Self, Mask = B::Mask>;

    /// Name used in `Debug` output and logs.
    const NAME: &'static str;
}

impl Primitive for f32 {
    type Reg<B: Backend> = B::F32;
    const NAME: &'static str = "f32";
}

impl Primitive for i32 {
    type Reg<B: Backend> = B::I32;
    const NAME: &'static str = "i32";
}

impl Primitive for u32 {
    type Reg<B: Backend> = B::U32;
    const NAME: &'static str = "u32";
}

impl Primitive for bool {
    type Reg<B: Backend> = B::Mask;
    const NAME: &'static str = "bool";
}

/// Value-preserving per-lane conversion from `P`.
///
/// Float to integer truncates toward zero and saturates (NaN becomes 0),
/// signed to unsigned wraps, numbers become `true` when non-zero, and
/// `true`/`false` become `1`/`0`. Never a bit reinterpretation.
pub trait CastFrom<P: Primitive>: Primitive {
    /// Convert one register.
    fn cast_reg<B: Backend>(v: P::Reg<B>) -> Self::Reg<B>;
}

macro_rules! impl_cast {
    ($($from:ty => $to:ty = $f:expr;)*) => {
        $(
            impl CastFrom<$from> for $to {
                #[inline(always)]
                fn cast_reg<B: Backend>(v: <$from as Primitive>::Reg<B>) -> <$to as Primitive>::Reg<B> {
                    $f(v)
                }
            }
        )*
    };
}

impl_cast! {
    f32 => f32 = |v| v;
    i32 => f32 = B::f32_from_i32;
    u32 => f32 = B::f32_from_u32;
    bool => f32 = B::f32_from_mask;

    f32 => i32 = B::i32_from_f32;
    i32 => i32 = |v| v;
    u32 => i32 = B::i32_from_u32;
    bool => i32 = B::i32_from_mask;

    f32 => u32 = B::u32_from_f32;
    i32 => u32 = B::u32_from_i32;
    u32 => u32 = |v| v;
    bool => u32 = B::u32_from_mask;

    f32 => bool = B::mask_from_f32;
    i32 => bool = B::mask_from_i32;
    u32 => bool = B::mask_from_u32;
    bool => bool = |v| v;
}
