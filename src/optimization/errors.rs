//! Error surface for the numerical back-ends (least squares and SVM).

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Least squares ----
    /// Design and target matrices disagree on the number of rows.
    RowCountMismatch {
        design: usize,
        targets: usize,
    },

    /// A regression was requested with zero observations.
    EmptyDesign,

    /// The decomposition backend refused the system.
    DecompositionFailed {
        reason: String,
    },

    /// A fitted coefficient came out NaN or infinite.
    NonFiniteSolution {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- SVM options ----
    /// Penalty `C` must be positive and finite.
    InvalidPenalty {
        value: f64,
        reason: &'static str,
    },

    /// A kernel hyper-parameter is out of its domain.
    InvalidKernelParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Solver tolerance must be positive and finite.
    InvalidTolerance {
        value: f64,
        reason: &'static str,
    },

    // ---- SVM data ----
    /// Class labels must be exactly `+1.0` or `-1.0`.
    InvalidLabel {
        index: usize,
        value: f64,
    },

    /// Labels and feature rows differ in count.
    LabelCountMismatch {
        rows: usize,
        labels: usize,
    },

    /// Training data contains only one class.
    SingleClass,

    /// Too few samples for the requested procedure.
    InsufficientSamples {
        needed: usize,
        found: usize,
    },

    /// Model selection was given an empty candidate grid.
    EmptyGrid,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Least squares ----
            OptError::RowCountMismatch { design, targets } => write!(
                f,
                "Optimization Error: design has {} rows but targets have {}",
                design, targets
            ),
            OptError::EmptyDesign => write!(f, "Optimization Error: regression with zero observations"),
            OptError::DecompositionFailed { reason } => {
                write!(f, "Optimization Error: decomposition failed ({})", reason)
            }
            OptError::NonFiniteSolution { row, col, value } => write!(
                f,
                "Optimization Error: non-finite coefficient {} at ({}, {})",
                value, row, col
            ),

            // ---- SVM options ----
            OptError::InvalidPenalty { value, reason } => {
                write!(f, "Optimization Error: invalid penalty C = {}: {}", value, reason)
            }
            OptError::InvalidKernelParameter { name, value, reason } => {
                write!(f, "Optimization Error: invalid kernel {} = {}: {}", name, value, reason)
            }
            OptError::InvalidTolerance { value, reason } => {
                write!(f, "Optimization Error: invalid tolerance {}: {}", value, reason)
            }

            // ---- SVM data ----
            OptError::InvalidLabel { index, value } => write!(
                f,
                "Optimization Error: label {} at index {} is not +1 or -1",
                value, index
            ),
            OptError::LabelCountMismatch { rows, labels } => write!(
                f,
                "Optimization Error: {} feature rows but {} labels",
                rows, labels
            ),
            OptError::SingleClass => {
                write!(f, "Optimization Error: training data contains a single class")
            }
            OptError::InsufficientSamples { needed, found } => write!(
                f,
                "Optimization Error: need at least {} samples, found {}",
                needed, found
            ),
            OptError::EmptyGrid => write!(f, "Optimization Error: empty hyper-parameter grid"),
        }
    }
}
