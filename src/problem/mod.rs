//! Problem adapters.
//!
//! Solvers are written once against the [`Problem`] trait and serve both
//! concrete problems:
//!
//! - [`TspInstance`]: symmetric Euclidean TSP, scored by open path length
//! - [`SmtwtpInstance`]: single-machine total weighted tardiness
//!
//! [`AnyProblem`] wraps either one when the kind is only known at runtime
//! (for example, when it is detected from a file).

mod smtwtp;
mod tsp;
mod types;

use std::path::Path;
use std::str::FromStr;

pub use smtwtp::{Job, SmtwtpHeuristic, SmtwtpInstance};
pub use tsp::{City, TspInstance};
pub use types::{is_permutation, path_cost, Problem, MIN_COST};

use crate::error::{HiveError, HiveResult};

/// Reads a problem file, mapping a missing file to
/// [`HiveError::ProblemFileNotFound`].
pub(crate) fn read_problem_file(path: &Path) -> HiveResult<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HiveError::ProblemFileNotFound {
            path: path.to_path_buf(),
        },
        _ => HiveError::Io(e),
    })
}

/// The two supported problem kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProblemKind {
    Tsp,
    Smtwtp,
}

impl ProblemKind {
    /// Guesses the kind from file content: a `NODE_COORD_SECTION` marker
    /// means TSP, anything else is treated as SMTWTP.
    pub fn detect(content: &str) -> Self {
        if content.lines().any(|l| l.trim() == "NODE_COORD_SECTION") {
            ProblemKind::Tsp
        } else {
            ProblemKind::Smtwtp
        }
    }
}

impl FromStr for ProblemKind {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsp" => Ok(ProblemKind::Tsp),
            "smtwtp" => Ok(ProblemKind::Smtwtp),
            other => Err(HiveError::invalid(format!(
                "unknown problem kind `{other}` (expected tsp or smtwtp)"
            ))),
        }
    }
}

/// Either concrete problem, dispatching [`Problem`] to the inner instance.
#[derive(Debug, Clone)]
pub enum AnyProblem {
    Tsp(TspInstance),
    Smtwtp(SmtwtpInstance),
}

impl AnyProblem {
    /// Loads a problem file. With `kind = None` the kind is detected from the content.
    pub fn load(path: impl AsRef<Path>, kind: Option<ProblemKind>) -> HiveResult<Self> {
        let path = path.as_ref();
        let content = read_problem_file(path)?;
        match kind.unwrap_or_else(|| ProblemKind::detect(&content)) {
            ProblemKind::Tsp => TspInstance::parse(&content, path).map(AnyProblem::Tsp),
            ProblemKind::Smtwtp => SmtwtpInstance::parse(&content, path).map(AnyProblem::Smtwtp),
        }
    }

    /// The kind of the wrapped instance.
    pub fn kind(&self) -> ProblemKind {
        match self {
            AnyProblem::Tsp(_) => ProblemKind::Tsp,
            AnyProblem::Smtwtp(_) => ProblemKind::Smtwtp,
        }
    }

    /// Applies an SMTWTP heuristic strategy; TSP instances are returned unchanged.
    pub fn with_smtwtp_heuristic(self, heuristic: SmtwtpHeuristic) -> Self {
        match self {
            AnyProblem::Smtwtp(inst) => AnyProblem::Smtwtp(inst.with_heuristic(heuristic)),
            other => other,
        }
    }

    fn inner(&self) -> &dyn Problem {
        match self {
            AnyProblem::Tsp(p) => p,
            AnyProblem::Smtwtp(p) => p,
        }
    }
}

impl Problem for AnyProblem {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn size(&self) -> usize {
        self.inner().size()
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        self.inner().cost(from, to)
    }

    fn heuristic(&self, from: usize, to: usize) -> f64 {
        self.inner().heuristic(from, to)
    }

    fn score(&self, sequence: &[usize]) -> f64 {
        self.inner().score(sequence)
    }

    fn accumulate(&self, elapsed: f64, item: usize) -> f64 {
        self.inner().accumulate(elapsed, item)
    }

    fn contextual_heuristic(&self, from: usize, to: usize, elapsed: f64) -> Option<f64> {
        self.inner().contextual_heuristic(from, to, elapsed)
    }

    fn is_contextual(&self) -> bool {
        self.inner().is_contextual()
    }
}
