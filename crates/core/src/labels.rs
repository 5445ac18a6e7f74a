//! Node label sets.
//!
//! A `LabelSet` behaves as a set (no duplicates, order-insensitive equality)
//! but remembers insertion order so output stays deterministic.

use serde::{Deserialize, Serialize};

/// Insertion-ordered set of labels.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Create an empty label set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a label. Returns `true` if it was not already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.0.push(label);
        true
    }

    /// Remove a label. Returns `true` if it was present.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|l| l != label);
        self.0.len() != before
    }

    /// Whether `label` is in the set (exact, case-sensitive).
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate labels in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Labels in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Union `labels` into the set. Returns `true` if anything was added.
    pub fn extend_from<I, S>(&mut self, labels: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut changed = false;
        for label in labels {
            changed |= self.insert(label);
        }
        changed
    }

    /// The set that would remain after removing `labels`.
    pub fn without<S: AsRef<str>>(&self, labels: &[S]) -> LabelSet {
        LabelSet(
            self.0
                .iter()
                .filter(|l| !labels.iter().any(|r| r.as_ref() == l.as_str()))
                .cloned()
                .collect(),
        )
    }
}

impl PartialEq for LabelSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|l| other.contains(l))
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        labels.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.0
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        set.extend_from(iter);
        set
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
