//! Single-Machine Total Weighted Tardiness Problem.
//!
//! Jobs run back to back on one machine in the order of the sequence. A job
//! finishing at `C_j` after its due date `d_j` contributes
//! `w_j * max(0, C_j - d_j)` to the score.
//!
//! # File format
//!
//! Three whitespace-separated lines of non-negative integers, in order:
//! processing times, due dates, weights. All three lines hold one token
//! per job.

use std::path::Path;

use super::types::Problem;
use super::read_problem_file;
use crate::error::{HiveError, HiveResult};

/// A job with its processing time, due date and tardiness weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub processing_time: u64,
    pub due_date: u64,
    pub weight: u64,
}

/// How the desirability of scheduling a job next is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SmtwtpHeuristic {
    /// Earliest due date: `1 / d_j` (1 when `d_j = 0`).
    ///
    /// Independent of the position in the schedule, so selection values
    /// can be cached per pair.
    #[default]
    DueDate,

    /// Modified due date: `1 / max(elapsed + p_j, d_j)`.
    ///
    /// `elapsed` is the processing time already scheduled, so the value is
    /// evaluated during construction.
    ///
    /// Reference: Baker & Bertrand (1982), "A dynamic priority rule for
    /// scheduling against due-dates".
    ModifiedDueDate,
}

/// A parsed SMTWTP instance.
#[derive(Debug, Clone)]
pub struct SmtwtpInstance {
    name: String,
    jobs: Vec<Job>,
    heuristic: SmtwtpHeuristic,
}

impl SmtwtpInstance {
    /// Builds an instance from jobs, using [`SmtwtpHeuristic::DueDate`].
    pub fn new(name: impl Into<String>, jobs: Vec<Job>) -> Self {
        Self {
            name: name.into(),
            jobs,
            heuristic: SmtwtpHeuristic::default(),
        }
    }

    /// Builds an instance from parallel attribute slices.
    ///
    /// # Panics
    /// Panics if the slices differ in length. See
    /// [`try_from_columns`](Self::try_from_columns) for the fallible form.
    pub fn from_columns(
        name: impl Into<String>,
        processing_times: &[u64],
        due_dates: &[u64],
        weights: &[u64],
    ) -> Self {
        match Self::try_from_columns(name, processing_times, due_dates, weights) {
            Ok(instance) => instance,
            Err(e) => panic!("{e}"),
        }
    }

    /// Builds an instance from parallel attribute slices, rejecting slices
    /// of different lengths with [`HiveError::InvalidConfiguration`].
    pub fn try_from_columns(
        name: impl Into<String>,
        processing_times: &[u64],
        due_dates: &[u64],
        weights: &[u64],
    ) -> HiveResult<Self> {
        let n = processing_times.len();
        if due_dates.len() != n || weights.len() != n {
            return Err(HiveError::invalid(format!(
                "column lengths differ: {n} processing times, {} due dates, {} weights",
                due_dates.len(),
                weights.len()
            )));
        }
        let jobs = processing_times
            .iter()
            .zip(due_dates)
            .zip(weights)
            .map(|((&p, &d), &w)| Job {
                processing_time: p,
                due_date: d,
                weight: w,
            })
            .collect();
        Ok(Self::new(name, jobs))
    }

    /// Selects the heuristic strategy.
    pub fn with_heuristic(mut self, heuristic: SmtwtpHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Reads and parses an SMTWTP file.
    pub fn load(path: impl AsRef<Path>) -> HiveResult<Self> {
        let path = path.as_ref();
        let content = read_problem_file(path)?;
        Self::parse(&content, path)
    }

    /// Parses SMTWTP content. Blank lines are skipped; anything after the
    /// third data line is ignored.
    pub fn parse(content: &str, path: &Path) -> HiveResult<Self> {
        const SECTIONS: [&str; 3] = ["processing times", "due dates", "weights"];

        let mut columns: Vec<Vec<u64>> = Vec::with_capacity(3);
        for (line_idx, raw) in content.lines().enumerate() {
            if columns.len() == SECTIONS.len() {
                break;
            }
            if raw.trim().is_empty() {
                continue;
            }
            let section = SECTIONS[columns.len()];
            let values = raw
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<u64>().map_err(|_| {
                        HiveError::malformed(
                            path,
                            Some(line_idx + 1),
                            format!("invalid value `{tok}` in {section}"),
                        )
                    })
                })
                .collect::<HiveResult<Vec<u64>>>()?;
            if let Some(first) = columns.first() {
                if values.len() != first.len() {
                    return Err(HiveError::malformed(
                        path,
                        Some(line_idx + 1),
                        format!("{section} has {} values, expected {}", values.len(), first.len()),
                    ));
                }
            }
            columns.push(values);
        }

        if columns.len() < SECTIONS.len() {
            return Err(HiveError::malformed(
                path,
                None,
                format!("missing {} line", SECTIONS[columns.len()]),
            ));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("smtwtp")
            .to_string();
        Self::try_from_columns(name, &columns[0], &columns[1], &columns[2])
    }

    /// All jobs, indexed by their 0-based id.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// The active heuristic strategy.
    pub fn heuristic_strategy(&self) -> SmtwtpHeuristic {
        self.heuristic
    }

    /// Total weighted tardiness of a schedule.
    ///
    /// Accumulated in `f64` so any `u64` job attributes score without
    /// overflow; totals above 2^53 lose integer precision.
    pub fn weighted_tardiness(&self, sequence: &[usize]) -> f64 {
        let mut finish = 0.0;
        let mut total = 0.0;
        for &j in sequence {
            let job = &self.jobs[j];
            finish += job.processing_time as f64;
            let late = finish - job.due_date as f64;
            if late > 0.0 {
                total += job.weight as f64 * late;
            }
        }
        total
    }

    fn due_date_desirability(due_date: u64) -> f64 {
        if due_date == 0 {
            1.0
        } else {
            1.0 / due_date as f64
        }
    }
}

impl Problem for SmtwtpInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.jobs.len()
    }

    /// Reciprocal of the static heuristic of `to`.
    fn cost(&self, from: usize, to: usize) -> f64 {
        1.0 / self.heuristic(from, to)
    }

    fn heuristic(&self, _from: usize, to: usize) -> f64 {
        let job = &self.jobs[to];
        match self.heuristic {
            SmtwtpHeuristic::DueDate => Self::due_date_desirability(job.due_date),
            SmtwtpHeuristic::ModifiedDueDate => {
                Self::due_date_desirability(job.processing_time.max(job.due_date))
            }
        }
    }

    fn score(&self, sequence: &[usize]) -> f64 {
        self.weighted_tardiness(sequence)
    }

    fn accumulate(&self, elapsed: f64, item: usize) -> f64 {
        elapsed + self.jobs[item].processing_time as f64
    }

    fn contextual_heuristic(&self, _from: usize, to: usize, elapsed: f64) -> Option<f64> {
        match self.heuristic {
            SmtwtpHeuristic::DueDate => None,
            SmtwtpHeuristic::ModifiedDueDate => {
                let job = &self.jobs[to];
                let mdd = (elapsed + job.processing_time as f64).max(job.due_date as f64);
                Some(if mdd > 0.0 { 1.0 / mdd } else { 1.0 })
            }
        }
    }

    fn is_contextual(&self) -> bool {
        self.heuristic == SmtwtpHeuristic::ModifiedDueDate
    }
}
