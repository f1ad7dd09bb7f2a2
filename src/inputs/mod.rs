//! Validated run inputs: window dates and fit parameters.
//!
//! Purpose
//! -------
//! Everything a run needs from the user passes through here and comes out
//! either validated or as a typed [`InputError`]. Construction is the
//! validation boundary: a [`TemporalWindow`] or [`FitConfig`] that exists
//! satisfies its invariants.
//!
//! Downstream usage
//! ----------------
//! - The CLI parses prompt text into these types; library callers construct
//!   them directly.
//! - The pipeline consumes them as-is, without re-validating.
pub mod errors;
pub mod params;
pub mod window;

pub use errors::{InputError, InputResult};
pub use params::{
    FitConfig, DEFAULT_LEARNING_RATE, DEFAULT_NUM_STEPS, LEARNING_RATE_FIELD, NUM_STEPS_FIELD,
};
pub use window::{
    suggest_window, TemporalWindow, TEST_END_FIELD, TEST_START_FIELD, TRAINING_END_FIELD,
    TRAINING_START_FIELD,
};
