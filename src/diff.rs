// src/diff.rs

//! Package set reconciliation
//!
//! Classifies every package name found in a "current" and a "baseline"
//! package set as added, upgraded, downgraded, removed or unchanged.
//! Unchanged packages are omitted from the result.

use crate::release::Package;
use crate::version::{FieldOrdering, VersionComponents};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::debug;

/// Mapping of package name to version string for one release snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageSet(BTreeMap<String, String>);

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package, returning the version it replaced
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), version.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate packages in ascending name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for PackageSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, version) in iter {
            set.insert(name, version);
        }
        set
    }
}

impl FromIterator<Package> for PackageSet {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        iter.into_iter().map(|p| (p.name, p.version)).collect()
    }
}

impl<'a> FromIterator<&'a Package> for PackageSet {
    fn from_iter<I: IntoIterator<Item = &'a Package>>(iter: I) -> Self {
        iter.into_iter()
            .map(|p| (p.name.as_str(), p.version.as_str()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PackageSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One changed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDiffEntry {
    pub name: String,

    /// Version in the current set, absent for removed packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,

    /// Version in the baseline set, absent for added packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
}

impl PackageDiffEntry {
    pub fn added(name: &str, new_version: &str) -> Self {
        Self {
            name: name.to_string(),
            new_version: Some(new_version.to_string()),
            previous_version: None,
        }
    }

    pub fn removed(name: &str, previous_version: &str) -> Self {
        Self {
            name: name.to_string(),
            new_version: None,
            previous_version: Some(previous_version.to_string()),
        }
    }

    pub fn changed(name: &str, previous_version: &str, new_version: &str) -> Self {
        Self {
            name: name.to_string(),
            new_version: Some(new_version.to_string()),
            previous_version: Some(previous_version.to_string()),
        }
    }
}

/// Classification of two package sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub added: Vec<PackageDiffEntry>,
    pub upgraded: Vec<PackageDiffEntry>,
    pub downgraded: Vec<PackageDiffEntry>,
    pub removed: Vec<PackageDiffEntry>,
}

impl DiffResult {
    /// True when the two sets held the same packages at equal versions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of changed packages across all buckets
    pub fn len(&self) -> usize {
        self.added.len() + self.upgraded.len() + self.downgraded.len() + self.removed.len()
    }
}

/// Options controlling how versions are compared during a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    pub ordering: FieldOrdering,
}

impl DiffOptions {
    pub fn with_ordering(ordering: FieldOrdering) -> Self {
        Self { ordering }
    }
}

/// Diff `current` against `baseline` with default options
pub fn diff(current: &PackageSet, baseline: &PackageSet) -> DiffResult {
    diff_with(current, baseline, &DiffOptions::default())
}

/// Diff `current` against `baseline`.
///
/// Buckets are filled in ascending package name order, so identical inputs
/// always produce identical results.
pub fn diff_with(current: &PackageSet, baseline: &PackageSet, options: &DiffOptions) -> DiffResult {
    let mut remaining = baseline.0.clone();
    let mut result = DiffResult::default();
    let mut unchanged = 0usize;

    for (name, new_version) in current {
        let Some(previous_version) = remaining.remove(name) else {
            result.added.push(PackageDiffEntry::added(name, new_version));
            continue;
        };

        let new = VersionComponents::parse(new_version);
        let previous = VersionComponents::parse(&previous_version);

        match new.compare_with(&previous, options.ordering) {
            Ordering::Greater => result
                .upgraded
                .push(PackageDiffEntry::changed(name, &previous_version, new_version)),
            Ordering::Less => result
                .downgraded
                .push(PackageDiffEntry::changed(name, &previous_version, new_version)),
            Ordering::Equal => unchanged += 1,
        }
    }

    for (name, previous_version) in &remaining {
        result.removed.push(PackageDiffEntry::removed(name, previous_version));
    }

    debug!(
        "Diffed {} current against {} baseline packages: {} added, {} upgraded, {} downgraded, {} removed, {} unchanged",
        current.len(),
        baseline.len(),
        result.added.len(),
        result.upgraded.len(),
        result.downgraded.len(),
        result.removed.len(),
        unchanged
    );

    result
}
