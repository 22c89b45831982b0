//! `Pipfile.lock` reader.
//!
//! The lock file is a JSON object whose sections (`default`, `develop`) map a
//! package name to an info object. Only the keys that decide the canonical form
//! are read; hashes, index names and the `_meta` block are ignored.

use crate::manifest::ManifestError;
use crate::package::PackageSpec;
use crate::types::CanonicalSpec;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_SECTION: &str = "default";
pub const DEVELOP_SECTION: &str = "develop";

/// A single package entry inside a lock file section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LockEntry {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(default)]
    pub markers: Option<String>,
    #[serde(default)]
    pub git: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
}

impl LockEntry {
    /// Build the package specification for this entry.
    ///
    /// A `version` wins over a `git` source. An entry with neither is rejected
    /// rather than guessed at.
    pub fn to_package(&self, name: &str) -> Result<PackageSpec, ManifestError> {
        if let Some(version) = &self.version {
            let mut spec = PackageSpec::pinned(name, version).with_extras(&self.extras);
            if let Some(markers) = &self.markers {
                spec = spec.with_markers(markers);
            }
            return Ok(spec);
        }

        match (&self.git, &self.reference) {
            (Some(url), Some(reference)) => {
                Ok(PackageSpec::vcs(name, url, reference).with_extras(&self.extras))
            }
            (Some(_), None) => Err(ManifestError::InvalidEntry {
                name: name.to_owned(),
                reason: "git source has no 'ref'".to_owned(),
            }),
            (None, _) => Err(ManifestError::UnsupportedEntry {
                name: name.to_owned(),
            }),
        }
    }
}

/// Parse lock file content, collecting the packages of every requested section.
///
/// Every requested section must exist. A declaration that appears identically in
/// more than one section is returned once.
pub fn parse_lock_str<S: AsRef<str>>(
    input: &str,
    sections: &[S],
) -> Result<Vec<PackageSpec>, ManifestError> {
    let mut document: BTreeMap<String, Value> = serde_json::from_str(input)?;

    let mut seen: BTreeSet<CanonicalSpec> = BTreeSet::new();
    let mut packages = Vec::new();

    for section in sections {
        let section = section.as_ref();
        let raw = document
            .remove(section)
            .ok_or_else(|| ManifestError::MissingSection(section.to_owned()))?;
        let entries: BTreeMap<String, LockEntry> = serde_json::from_value(raw)?;
        tracing::debug!("lock section '{section}': {} entries", entries.len());

        for (name, entry) in &entries {
            let spec = entry.to_package(name)?;
            if seen.insert(spec.canonical()) {
                packages.push(spec);
            }
        }
    }

    Ok(packages)
}
