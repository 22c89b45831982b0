use reqsync_schema::{CanonicalSpec, Manifest};
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of comparing two manifests as sets of canonical specifications.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComparisonReport {
    pub left: String,
    pub right: String,
    pub only_in_left: Vec<CanonicalSpec>,
    pub only_in_right: Vec<CanonicalSpec>,
    pub matches: bool,
}

impl ComparisonReport {
    #[must_use]
    pub fn with_labels(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left = left.into();
        self.right = right.into();
        self
    }

    pub fn mismatch_count(&self) -> usize {
        self.only_in_left.len() + self.only_in_right.len()
    }
}

/// Compute the set difference in both directions. Order and duplicates are ignored.
pub fn compare(left: &[CanonicalSpec], right: &[CanonicalSpec]) -> ComparisonReport {
    let left_set: BTreeSet<&CanonicalSpec> = left.iter().collect();
    let right_set: BTreeSet<&CanonicalSpec> = right.iter().collect();

    let only_in_left: Vec<CanonicalSpec> = left_set
        .difference(&right_set)
        .map(|s| (*s).clone())
        .collect();
    let only_in_right: Vec<CanonicalSpec> = right_set
        .difference(&left_set)
        .map(|s| (*s).clone())
        .collect();

    let matches = only_in_left.is_empty() && only_in_right.is_empty();

    ComparisonReport {
        left: "left".to_owned(),
        right: "right".to_owned(),
        only_in_left,
        only_in_right,
        matches,
    }
}

/// Compare two manifests, labelling each side with its source path.
pub fn compare_manifests(left: &Manifest, right: &Manifest) -> ComparisonReport {
    compare(&left.canonical_specs(), &right.canonical_specs())
        .with_labels(left.label(), right.label())
}
