//! Float built-in function library.
//!
//! Every function is an inherent method on [`Float`](crate::Float). When the
//! shading-language function takes several arguments, the receiver is the
//! first one: `step(edge, x)` is `edge.step(x)`, `atan(y, x)` is
//! `y.atan2(x)`. Extra arguments accept anything convertible into the batch,
//! so literals work directly.
//!
//! Transcendental functions are evaluated per lane through `libm` unless the
//! backend overrides them, so every backend produces the same bits as the
//! scalar one.

pub mod common;
pub mod derivative;
pub mod exponential;
pub mod geometric;
pub mod trig;
