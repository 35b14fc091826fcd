//! Immutable step traces.

use std::ops::Index;
use std::slice;
use std::sync::Arc;

/// A single snapshot of algorithm state.
pub trait Step: Clone {
    /// The array as it looks at this step.
    fn array(&self) -> &[i64];

    /// Whether playback stops on this step.
    fn is_terminal(&self) -> bool;
}

/// An ordered, immutable sequence of steps.
///
/// Steps are shared behind an [`Arc`], so cloning a trace is cheap and never
/// copies snapshots. There is no way to mutate a trace after construction.
#[derive(Debug)]
pub struct Trace<S> {
    steps: Arc<[S]>,
}

impl<S> Trace<S> {
    /// Wrap a list of steps.
    pub fn new(steps: Vec<S>) -> Self {
        Self { steps: steps.into() }
    }

    /// An empty trace.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    pub fn first(&self) -> Option<&S> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&S> {
        self.steps.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, S> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.steps
    }

    /// Whether two handles point at the same generated trace.
    pub fn same_trace(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.steps, &other.steps)
    }
}

impl<S> Clone for Trace<S> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<S> Default for Trace<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: PartialEq> PartialEq for Trace<S> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl<S> From<Vec<S>> for Trace<S> {
    fn from(steps: Vec<S>) -> Self {
        Self::new(steps)
    }
}

impl<S> Index<usize> for Trace<S> {
    type Output = S;

    fn index(&self, index: usize) -> &S {
        &self.steps[index]
    }
}

/// Serialized as the plain list of steps.
#[cfg(feature = "serde")]
impl<S: serde::Serialize> serde::Serialize for Trace<S> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.steps.iter())
    }
}

impl<'a, S> IntoIterator for &'a Trace<S> {
    type Item = &'a S;
    type IntoIter = slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trace_has_no_last_index() {
        let trace: Trace<u8> = Trace::empty();
        assert!(trace.is_empty());
        assert_eq!(trace.last_index(), None);
        assert!(trace.last().is_none());
    }

    #[test]
    fn clones_share_steps() {
        let trace = Trace::new(vec![1, 2, 3]);
        let copy = trace.clone();
        assert!(trace.same_trace(&copy));
        assert_eq!(copy.last_index(), Some(2));

        // Equal content, different generation.
        let regenerated = Trace::new(vec![1, 2, 3]);
        assert_eq!(trace, regenerated);
        assert!(!trace.same_trace(&regenerated));
    }
}
