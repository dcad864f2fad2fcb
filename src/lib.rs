//! Scalar-looking shader arithmetic evaluated one lane at a time or N lanes
//! in lock-step.
//!
//! A [`Batch<B, P, N>`](Batch) holds `N` registers of backend `B` full of
//! lanes of kind `P` (`f32`, `i32`, `u32` or `bool`). Expressions written
//! against batches read like scalar code; each operator runs on every lane.
//! Conditionals are emulated by evaluating both arms and merging them with
//! masked assignment ([`Batch::assign_masked`], [`WriteMask`]).
//!
//! ```
//! use lockstep::{Float, Native};
//!
//! let x = Float::<Native, 2>::from_fn(|i| i as f32 - 2.0);
//! let y = (x * x).sqrt().clamp(0.0, 1.5);
//! let mut out = x;
//! out.assign_masked(x.cmp_lt(0.0), y);
//! assert_eq!(out.lane(0), 1.5);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod arith;
pub mod backend;
pub mod batch;
mod boolean;
mod builtins;
pub mod config;
pub mod diverge;
pub mod error;
pub mod fastmath;
pub mod features;
mod integer;
pub mod primitive;
pub mod select;
pub mod storage;

pub use backend::{Backend, Native, Scalar};
pub use batch::{Batch, Bool, Float, Int, Uint};
pub use config::{Config, CONFIG};
pub use diverge::WriteMask;
pub use error::BatchError;
pub use fastmath::FastMathGuard;
pub use features::CpuFeatures;
pub use primitive::{CastFrom, Primitive};
pub use select::LaneIndex;
pub use storage::AlignedLanes;

#[cfg(target_arch = "x86_64")]
pub use backend::Sse2;

#[cfg(target_arch = "aarch64")]
pub use backend::Neon;
