//! Error types shared by every solver in the crate.
//!
//! File and configuration errors are raised before the first iteration of a
//! run. Numeric edge cases that appear mid-run (a zero-score solution, a
//! zero-length edge) are absorbed by the runners and never surface here,
//! except through [`HiveError::DegenerateScore`] when a caller asks for a
//! reciprocal directly via [`reciprocal_score`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading problems or validating configurations.
#[derive(Debug, Error)]
pub enum HiveError {
    /// The problem file does not exist.
    #[error("problem file not found: {}", path.display())]
    ProblemFileNotFound { path: PathBuf },

    /// The problem file exists but could not be parsed.
    #[error("malformed problem file {}{}: {cause}", path.display(), line_suffix(*line))]
    ProblemFileMalformed {
        path: PathBuf,
        line: Option<usize>,
        cause: String,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A solution scored exactly zero (or non-finite), so `1/score` is undefined.
    #[error("degenerate score {score}: reciprocal is undefined")]
    DegenerateScore { score: f64 },

    /// Any other I/O failure while reading a problem file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Crate-wide result alias.
pub type HiveResult<T> = Result<T, HiveError>;

fn line_suffix(line: Option<usize>) -> String {
    match line {
        Some(l) => format!(" (line {l})"),
        None => String::new(),
    }
}

impl HiveError {
    /// Shorthand for [`HiveError::InvalidConfiguration`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        HiveError::InvalidConfiguration(msg.into())
    }

    /// Shorthand for [`HiveError::ProblemFileMalformed`].
    pub fn malformed(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        cause: impl Into<String>,
    ) -> Self {
        HiveError::ProblemFileMalformed {
            path: path.into(),
            line,
            cause: cause.into(),
        }
    }
}

/// Returns `1 / score`, or [`HiveError::DegenerateScore`] when the score is
/// zero, negative or non-finite.
pub fn reciprocal_score(score: f64) -> HiveResult<f64> {
    if score > 0.0 && score.is_finite() {
        Ok(1.0 / score)
    } else {
        Err(HiveError::DegenerateScore { score })
    }
}
