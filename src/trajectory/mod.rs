//! trajectory — input trajectories and the shared sample arena.
//!
//! Purpose
//! -------
//! Own the one large data structure of an inference run: the concatenated
//! sample matrix `Y`. Every later stage reads it through [`Span`]s and row
//! indices and never copies rows.
//!
//! Key behaviors
//! -------------
//! - [`Trajectory`] is the caller-facing `(times, values)` pair.
//! - [`SampleArena`] validates trajectories against each other and the
//!   declared variable counts, stacks them, and records one span per
//!   trajectory.
//! - [`Span`] is a two-integer inclusive interval value type.
//!
//! Invariants & assumptions
//! ------------------------
//! - Trajectory spans are contiguous and partition `0..arena.len()`.
//! - All trajectories share one step size.

pub mod arena;
pub mod span;

pub use self::arena::{SampleArena, Trajectory};
pub use self::span::Span;

pub mod prelude {
    pub use super::arena::{SampleArena, Trajectory};
    pub use super::span::Span;
}
