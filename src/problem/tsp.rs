//! Symmetric Euclidean Traveling Salesman Problem.
//!
//! # File format
//!
//! ```text
//! NAME: square4
//! DIMENSION: 4
//! NODE_COORD_SECTION
//! 1 0 0
//! 2 0 1
//! 3 1 1
//! 4 1 0
//! EOF
//! ```
//!
//! The city count is the last token of the `DIMENSION` line, so both
//! `DIMENSION: 4` and `DIMENSION 4` are accepted. City ids are 1-based in
//! the file and 0-based everywhere else. Other header lines are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use super::types::Problem;
use super::read_problem_file;
use crate::error::{HiveError, HiveResult};
use crate::matrix::SymmetricMatrix;

const DIMENSION: &str = "DIMENSION";
const NODE_COORD_SECTION: &str = "NODE_COORD_SECTION";
const EOF_MARKER: &str = "EOF";

/// A city with 2D coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    /// 0-based index.
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl City {
    /// Euclidean distance to another city.
    pub fn distance(&self, other: &City) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A parsed TSP instance with its distance matrix.
///
/// The score of a tour is the sum of its consecutive legs; no return leg
/// to the start city is added.
#[derive(Debug, Clone)]
pub struct TspInstance {
    name: String,
    cities: Vec<City>,
    distances: SymmetricMatrix<f64>,
}

impl TspInstance {
    /// Builds an instance from coordinates, indexed in order.
    pub fn from_coords(name: impl Into<String>, coords: &[(f64, f64)]) -> Self {
        let cities: Vec<City> = coords
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| City { id, x, y })
            .collect();
        let distances =
            SymmetricMatrix::from_fn(cities.len(), |i, j| cities[i].distance(&cities[j]));
        Self {
            name: name.into(),
            cities,
            distances,
        }
    }

    /// Reads and parses a TSP file.
    pub fn load(path: impl AsRef<Path>) -> HiveResult<Self> {
        let path = path.as_ref();
        let content = read_problem_file(path)?;
        Self::parse(&content, path)
    }

    /// Parses TSP content. `path` is used for naming and error messages.
    pub fn parse(content: &str, path: &Path) -> HiveResult<Self> {
        let mut dimension: Option<usize> = None;
        let mut in_coords = false;
        let mut seen_eof = false;
        // Keyed by id so an untrusted DIMENSION never sizes an allocation.
        let mut slots: BTreeMap<usize, (f64, f64)> = BTreeMap::new();

        for (line_idx, raw) in content.lines().enumerate() {
            let line_no = Some(line_idx + 1);
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            let Some(&first) = tokens.first() else {
                continue;
            };

            if first == EOF_MARKER {
                seen_eof = true;
                break;
            }

            if in_coords {
                let n = dimension.unwrap_or(0);
                if tokens.len() < 3 {
                    return Err(HiveError::malformed(
                        path,
                        line_no,
                        format!("expected `id x y`, got `{}`", raw.trim()),
                    ));
                }
                let id: usize = tokens[0].parse().map_err(|_| {
                    HiveError::malformed(path, line_no, format!("invalid city id `{}`", tokens[0]))
                })?;
                if id == 0 || id > n {
                    return Err(HiveError::malformed(
                        path,
                        line_no,
                        format!("city id {id} outside 1..={n}"),
                    ));
                }
                let x = parse_coord(tokens[1], path, line_no)?;
                let y = parse_coord(tokens[2], path, line_no)?;
                if slots.insert(id, (x, y)).is_some() {
                    return Err(HiveError::malformed(
                        path,
                        line_no,
                        format!("duplicate city id {id}"),
                    ));
                }
                continue;
            }

            if first.starts_with(DIMENSION) {
                let value = raw.trim()[DIMENSION.len()..].trim().trim_start_matches(':').trim();
                let n: usize = value.parse().map_err(|_| {
                    let cause = format!("invalid DIMENSION `{}`", raw.trim());
                    HiveError::malformed(path, line_no, cause)
                })?;
                dimension = Some(n);
            } else if first == NODE_COORD_SECTION {
                if dimension.is_none() {
                    return Err(HiveError::malformed(
                        path,
                        line_no,
                        "NODE_COORD_SECTION before DIMENSION",
                    ));
                }
                in_coords = true;
            }
        }

        let Some(n) = dimension else {
            return Err(HiveError::malformed(path, None, "missing DIMENSION"));
        };
        if !in_coords {
            return Err(HiveError::malformed(path, None, "missing NODE_COORD_SECTION"));
        }
        if !seen_eof {
            return Err(HiveError::malformed(path, None, "missing EOF marker"));
        }
        let parsed = slots.len();
        if parsed != n {
            return Err(HiveError::malformed(
                path,
                None,
                format!("DIMENSION is {n} but {parsed} cities were listed"),
            ));
        }

        let coords: Vec<(f64, f64)> = slots.into_values().collect();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("tsp")
            .to_string();
        Ok(Self::from_coords(name, &coords))
    }

    /// All cities, indexed by their 0-based id.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Distance between two distinct cities.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.distances.get(a, b)
    }

    /// The distance matrix.
    pub fn distances(&self) -> &SymmetricMatrix<f64> {
        &self.distances
    }
}

fn parse_coord(token: &str, path: &Path, line: Option<usize>) -> HiveResult<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| HiveError::malformed(path, line, format!("invalid coordinate `{token}`")))
}

impl Problem for TspInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.cities.len()
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    fn score(&self, sequence: &[usize]) -> f64 {
        super::path_cost(self, sequence)
    }
}
