//! inference — configuration, errors and assembly of the hybrid automaton.
//!
//! Purpose
//! -------
//! Host the public entry point [`infer`] together with everything a caller
//! touches around it: the run configuration, the crate-level error type, the
//! automaton model and the per-mode invariants.
//!
//! Key behaviors
//! -------------
//! - [`InferenceOptions`] carries every tunable with documented defaults and
//!   validates them up front.
//! - [`InferenceError`] / [`InferenceResult`] unify failures of all stages;
//!   lower-level polynomial and solver errors convert through `From`.
//! - [`compute_invariants`] derives bounding-box invariants per mode.
//! - [`Automaton`], [`Mode`] and [`Transition`] are the output model.
//! - [`infer`] runs the pipeline end to end.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every polynomial in an [`Automaton`] is over the input variables
//!   followed by the output variables.
//! - Mode ids are `0..n_modes` in clustering order; transition ids are in
//!   connection-discovery order.
//!
//! Downstream usage
//! ----------------
//! - Callers construct [`InferenceOptions`] (usually starting from
//!   `Default`), call [`infer`] and consume the [`Automaton`], e.g. through
//!   its `Display` output or, with the `serde` feature, a serializer.

pub mod automaton;
pub mod errors;
pub mod invariant;
pub mod options;
pub mod pipeline;

pub use self::automaton::{Automaton, Mode, Transition};
pub use self::errors::{InferenceError, InferenceResult};
pub use self::invariant::{compute_invariants, Invariant, Range};
pub use self::options::InferenceOptions;
pub use self::pipeline::infer;

pub mod prelude {
    pub use super::automaton::{Automaton, Mode, Transition};
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::invariant::{Invariant, Range};
    pub use super::options::InferenceOptions;
    pub use super::pipeline::infer;
}
