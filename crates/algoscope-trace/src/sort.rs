//! Bubble sort trace generation.

use std::collections::BTreeSet;

use crate::trace::{Step, Trace};

/// Snapshot of a bubble sort at one comparison or swap.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortStep {
    /// Array contents after this step.
    pub array: Vec<i64>,
    /// The adjacent pair under comparison; `None` only on the final step.
    pub comparing: Option<(usize, usize)>,
    /// Whether the pair was just swapped.
    pub swapping: bool,
    /// Indices already in their final position.
    pub sorted: BTreeSet<usize>,
}

impl SortStep {
    /// Whether `index` is part of the pair under comparison.
    pub fn is_comparing(&self, index: usize) -> bool {
        self.comparing
            .is_some_and(|(left, right)| left == index || right == index)
    }

    pub fn is_sorted(&self, index: usize) -> bool {
        self.sorted.contains(&index)
    }
}

impl Step for SortStep {
    fn array(&self) -> &[i64] {
        &self.array
    }

    fn is_terminal(&self) -> bool {
        self.comparing.is_none() && self.sorted.len() == self.array.len()
    }
}

/// Generate the full bubble sort trace for `input`.
///
/// For pass `i` and inner index `j` a comparing step is emitted for
/// `(j, j + 1)`; when the pair is out of order it is swapped and a second,
/// swapping step shows the post-swap array. Index `n - 1 - i` joins the
/// sorted set after each pass. The last step has every index sorted and no
/// comparison.
///
/// # Examples
///
/// ```
/// use algoscope_trace::generate_sort_trace;
///
/// let trace = generate_sort_trace(&[3, 1, 2]);
/// assert_eq!(trace.last().unwrap().array, vec![1, 2, 3]);
/// ```
pub fn generate_sort_trace(input: &[i64]) -> Trace<SortStep> {
    let n = input.len();
    let mut array = input.to_vec();
    let mut sorted = BTreeSet::new();
    let mut steps = Vec::new();

    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - pass {
            steps.push(SortStep {
                array: array.clone(),
                comparing: Some((j, j + 1)),
                swapping: false,
                sorted: sorted.clone(),
            });

            if array[j] > array[j + 1] {
                array.swap(j, j + 1);
                steps.push(SortStep {
                    array: array.clone(),
                    comparing: Some((j, j + 1)),
                    swapping: true,
                    sorted: sorted.clone(),
                });
            }
        }
        sorted.insert(n - 1 - pass);
    }

    steps.push(SortStep {
        array,
        comparing: None,
        swapping: false,
        sorted: (0..n).collect(),
    });

    Trace::new(steps)
}

impl Trace<SortStep> {
    /// Number of comparison steps (swap steps excluded).
    pub fn comparisons(&self) -> usize {
        self.iter()
            .filter(|step| step.comparing.is_some() && !step.swapping)
            .count()
    }

    /// Number of swaps performed.
    pub fn swaps(&self) -> usize {
        self.iter().filter(|step| step.swapping).count()
    }
}
