use std::collections::HashSet;
use std::sync::Arc;

use crate::stroke::{Stroke, StrokeRef};

/// The full, ordered set of strokes visible at one point in time.
///
/// Cloning is cheap and clones share storage, so "did anything change" can be
/// answered with [`StrokeSnapshot::ptr_eq`].
#[derive(Debug, Clone)]
pub struct StrokeSnapshot {
    strokes: Arc<[StrokeRef]>,
}

impl Default for StrokeSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl StrokeSnapshot {
    pub fn new(strokes: Vec<StrokeRef>) -> Self {
        Self {
            strokes: strokes.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_strokes(strokes: impl IntoIterator<Item = Stroke>) -> Self {
        Self::new(strokes.into_iter().map(Arc::new).collect())
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrokeRef> + '_ {
        self.strokes.iter()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// True when both snapshots are the same instance, not merely equal.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.strokes, &other.strokes)
    }

    /// New snapshot with `added` appended after the existing strokes.
    pub fn with_added(&self, added: impl IntoIterator<Item = StrokeRef>) -> Self {
        let mut strokes = self.strokes.to_vec();
        strokes.extend(added);
        Self::new(strokes)
    }

    /// Set difference: drops every stroke equal to one in `removed`.
    pub fn without(&self, removed: &[StrokeRef]) -> Self {
        let removed: HashSet<&Stroke> = removed.iter().map(|stroke| stroke.as_ref()).collect();
        Self::new(
            self.strokes
                .iter()
                .filter(|stroke| !removed.contains(stroke.as_ref()))
                .cloned()
                .collect(),
        )
    }

    pub fn to_vec(&self) -> Vec<StrokeRef> {
        self.strokes.to_vec()
    }
}

impl PartialEq for StrokeSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.strokes == other.strokes
    }
}

impl Eq for StrokeSnapshot {}

impl<'a> IntoIterator for &'a StrokeSnapshot {
    type Item = &'a StrokeRef;
    type IntoIter = std::slice::Iter<'a, StrokeRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}
