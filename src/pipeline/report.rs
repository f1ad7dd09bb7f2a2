//! Run configuration and reporting types.
//!
//! Purpose
//! -------
//! Carry what a run needs beyond its datasets ([`RunOptions`]) and what it
//! leaves behind ([`EvaluationReport`], [`RunReport`]). The evaluation
//! report's `Display` is the user-facing summary and renders the two
//! metrics at two decimal places, one per line.
//!
//! Key behaviors
//! -------------
//! - [`RunOptions::default`] mirrors the application defaults: a
//!   `0.00015`-degree buffer margin, a `diagnostics/` output directory,
//!   and a 64-cell spatial grid.
//! - Range validation happens where the values are consumed (the domain
//!   builder rejects a bad margin, the grid builder a zero resolution);
//!   the options struct itself stays plain data.
//!
//! Downstream usage
//! ----------------
//! - The orchestrator threads [`RunOptions`] through the run sequence and
//!   assembles the final [`RunReport`]; the CLI prints the report and the
//!   artifact paths.
use std::path::PathBuf;

use crate::{model::capability::FitSummary, spatial::domain::DEFAULT_MARGIN_DEGREES};

/// Default directory diagnostic SVGs are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "diagnostics";
/// Default cells per axis for the spatial intensity surface.
pub const DEFAULT_GRID_RESOLUTION: usize = 64;

/// `RunOptions` — per-run settings outside the model configuration.
///
/// Purpose
/// -------
/// Everything a run needs that is neither data nor optimizer settings:
/// the spatial buffer margin, where diagnostics land, and how finely the
/// spatial surface is sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Buffer margin around road features, in degrees.
    pub margin: f64,
    /// Directory the diagnostic files are written to.
    pub out_dir: PathBuf,
    /// Cells per axis for the spatial intensity surface.
    pub grid_resolution: usize,
}

impl Default for RunOptions {
    fn default() -> RunOptions {
        RunOptions {
            margin: DEFAULT_MARGIN_DEGREES,
            out_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            grid_resolution: DEFAULT_GRID_RESOLUTION,
        }
    }
}

/// `EvaluationReport` — the two held-out metrics of a run.
///
/// Purpose
/// -------
/// The numbers the application reports after a run. `Display` renders
/// exactly two lines, each metric at two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    /// Log-likelihood of the held-out events under the fitted model.
    pub log_expected_likelihood: f64,
    /// `2k − 2·ℓ_train` at the fitted parameters.
    pub expected_aic: f64,
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Log Expected Likelihood: {:.2}", self.log_expected_likelihood)?;
        write!(f, "Expected AIC: {:.2}", self.expected_aic)
    }
}

/// `RunReport` — everything one successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Fit accounting committed to the session.
    pub fit: FitSummary,
    /// The two held-out metrics.
    pub evaluation: EvaluationReport,
    /// Diagnostic artifact paths, in render order.
    pub artifacts: Vec<PathBuf>,
    /// Number of events in the training partition.
    pub training_events: usize,
    /// Number of events in the evaluation partition.
    pub evaluation_events: usize,
}
