//! Algorithm identifiers and trace dispatch.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::search::{generate_search_trace, SearchStep};
use crate::sort::{generate_sort_trace, SortStep};
use crate::trace::Trace;

/// Algorithms with a precomputed trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    BubbleSort,
    LinearSearch,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::BubbleSort, Algorithm::LinearSearch];

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "Bubble Sort",
            Algorithm::LinearSearch => "Linear Search",
        }
    }

    /// Whether the algorithm takes a search target.
    pub fn needs_target(&self) -> bool {
        matches!(self, Algorithm::LinearSearch)
    }

    /// Run the algorithm's generator. `target` is ignored by sorts.
    pub fn generate(&self, array: &[i64], target: i64) -> AnyTrace {
        match self {
            Algorithm::BubbleSort => AnyTrace::Sort(generate_sort_trace(array)),
            Algorithm::LinearSearch => AnyTrace::Search(generate_search_trace(array, target)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label did not name a known algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "bubblesort" | "bubble" | "sort" => Ok(Algorithm::BubbleSort),
            "linearsearch" | "linear" | "search" => Ok(Algorithm::LinearSearch),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A trace of any supported algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm", content = "steps"))]
pub enum AnyTrace {
    #[cfg_attr(feature = "serde", serde(rename = "bubble_sort"))]
    Sort(Trace<SortStep>),
    #[cfg_attr(feature = "serde", serde(rename = "linear_search"))]
    Search(Trace<SearchStep>),
}

impl AnyTrace {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            AnyTrace::Sort(_) => Algorithm::BubbleSort,
            AnyTrace::Search(_) => Algorithm::LinearSearch,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyTrace::Sort(trace) => trace.len(),
            AnyTrace::Search(trace) => trace.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
