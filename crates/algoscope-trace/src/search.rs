//! Linear search trace generation.

use crate::trace::{Step, Trace};

/// Snapshot of a linear search after visiting one index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStep {
    /// The searched array (unchanged by the search).
    pub array: Vec<i64>,
    /// Index being examined; equals `array.len()` on the not-found sentinel.
    pub current_index: usize,
    /// Every index examined so far, in visiting order.
    pub visited: Vec<usize>,
    pub is_found: bool,
    pub found_index: Option<usize>,
}

impl SearchStep {
    /// Whether this is the past-the-end step of an unsuccessful search.
    pub fn is_sentinel(&self) -> bool {
        self.current_index >= self.array.len()
    }
}

impl Step for SearchStep {
    fn array(&self) -> &[i64] {
        &self.array
    }

    fn is_terminal(&self) -> bool {
        self.is_found || self.is_sentinel()
    }
}

/// Generate the linear search trace for `target` in `input`.
///
/// One step is emitted per visited index, stopping at the first match. When
/// the target is absent a final sentinel step with `current_index ==
/// input.len()` closes the trace; an empty array produces only the sentinel.
pub fn generate_search_trace(input: &[i64], target: i64) -> Trace<SearchStep> {
    let mut steps = Vec::with_capacity(input.len() + 1);
    let mut visited = Vec::with_capacity(input.len());

    for (index, &value) in input.iter().enumerate() {
        visited.push(index);
        let is_found = value == target;

        steps.push(SearchStep {
            array: input.to_vec(),
            current_index: index,
            visited: visited.clone(),
            is_found,
            found_index: is_found.then_some(index),
        });

        if is_found {
            return Trace::new(steps);
        }
    }

    steps.push(SearchStep {
        array: input.to_vec(),
        current_index: input.len(),
        visited,
        is_found: false,
        found_index: None,
    });

    Trace::new(steps)
}

impl Trace<SearchStep> {
    /// Index where the search succeeded, if it did.
    pub fn found_index(&self) -> Option<usize> {
        self.last().and_then(|step| step.found_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finds_target_and_stops() {
        let trace = generate_search_trace(&[5, 3, 8, 1], 8);
        assert_eq!(trace.len(), 3);

        let last = trace.last().unwrap();
        assert!(last.is_found);
        assert_eq!(last.found_index, Some(2));
        assert_eq!(last.visited, vec![0, 1, 2]);
        assert_eq!(trace.found_index(), Some(2));
    }

    #[test]
    fn missing_target_ends_on_sentinel() {
        let trace = generate_search_trace(&[5, 3, 8, 1], 42);
        assert_eq!(trace.len(), 5);

        let last = trace.last().unwrap();
        assert!(last.is_sentinel());
        assert!(!last.is_found);
        assert_eq!(last.found_index, None);
        assert_eq!(last.current_index, 4);
        assert_eq!(last.visited, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_array_is_single_sentinel() {
        let trace = generate_search_trace(&[], 1);
        assert_eq!(trace.len(), 1);
        assert!(trace[0].is_sentinel());
        assert!(trace[0].visited.is_empty());
        assert!(trace[0].is_terminal());
    }

    #[test]
    fn duplicates_stop_on_first_occurrence() {
        let trace = generate_search_trace(&[4, 7, 7, 7], 7);
        assert_eq!(trace.found_index(), Some(1));
        assert_eq!(trace.len(), 2);
    }

    proptest! {
        #[test]
        fn at_most_one_found_step_and_it_is_last(
            input in prop::collection::vec(0i64..10, 0..30),
            target in 0i64..12,
        ) {
            let trace = generate_search_trace(&input, target);
            let found: Vec<_> = trace
                .iter()
                .enumerate()
                .filter(|(_, step)| step.is_found)
                .map(|(i, _)| i)
                .collect();

            match input.iter().position(|&v| v == target) {
                Some(first) => {
                    prop_assert_eq!(found, vec![trace.len() - 1]);
                    prop_assert_eq!(trace.found_index(), Some(first));
                }
                None => {
                    prop_assert!(found.is_empty());
                    let last = trace.last().unwrap();
                    prop_assert_eq!(last.current_index, input.len());
                    prop_assert_eq!(last.found_index, None);
                }
            }
        }

        #[test]
        fn visited_grows_by_one_without_duplicates(
            input in prop::collection::vec(0i64..10, 1..30),
            target in 0i64..12,
        ) {
            let trace = generate_search_trace(&input, target);
            for step in trace.iter().filter(|step| !step.is_sentinel()) {
                prop_assert_eq!(step.visited.len(), step.current_index + 1);
                prop_assert_eq!(step.visited.clone(), (0..=step.current_index).collect::<Vec<_>>());
            }
            for pair in trace.as_slice().windows(2) {
                prop_assert!(pair[1].visited.starts_with(&pair[0].visited));
            }
        }
    }
}
