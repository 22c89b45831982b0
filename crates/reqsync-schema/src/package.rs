use crate::types::{CanonicalSpec, PackageName};
use std::fmt;

const VCS_PREFIX: &str = "git+";

/// One dependency declaration, independent of the manifest format it came from.
///
/// Both readers build this type; [`PackageSpec::canonical`] is the only place
/// a comparable string is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: PackageName,
    /// Sorted and deduplicated.
    pub extras: Vec<String>,
    pub source: SpecSource,
}

/// Where a package is installed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    /// A registry release. `version` keeps its operator, e.g. `==2.25.1`.
    Pinned {
        version: String,
        markers: Option<String>,
    },
    /// A git checkout. `url` is stored without the `git+` prefix.
    Vcs { url: String, reference: String },
}

impl PackageSpec {
    pub fn pinned(name: impl Into<PackageName>, version: &str) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            source: SpecSource::Pinned {
                version: version.trim().to_owned(),
                markers: None,
            },
        }
    }

    pub fn vcs(name: impl Into<PackageName>, url: &str, reference: &str) -> Self {
        let url = url.trim();
        Self {
            name: name.into(),
            extras: Vec::new(),
            source: SpecSource::Vcs {
                url: url.strip_prefix(VCS_PREFIX).unwrap_or(url).to_owned(),
                reference: reference.trim().to_owned(),
            },
        }
    }

    #[must_use]
    pub fn with_extras<I, S>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = extras
            .into_iter()
            .map(|e| e.as_ref().trim().to_owned())
            .filter(|e| !e.is_empty())
            .collect();
        out.sort();
        out.dedup();
        self.extras = out;
        self
    }

    /// Attach an environment marker. Blank markers are dropped; VCS specs carry none.
    #[must_use]
    pub fn with_markers(mut self, markers: &str) -> Self {
        if let SpecSource::Pinned { markers: slot, .. } = &mut self.source {
            let collapsed = markers.split_whitespace().collect::<Vec<_>>().join(" ");
            *slot = (!collapsed.is_empty()).then_some(collapsed);
        }
        self
    }

    /// Serialize to the canonical requirement string.
    ///
    /// Pinned: `name[extras]version ; markers`, with the bracket and marker
    /// parts omitted when empty. VCS: `git+<url>@<ref>#egg=<name>`.
    pub fn canonical(&self) -> CanonicalSpec {
        CanonicalSpec::new(self.to_string())
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            SpecSource::Pinned { version, markers } => {
                f.write_str(&self.name)?;
                if !self.extras.is_empty() {
                    write!(f, "[{}]", self.extras.join(","))?;
                }
                f.write_str(version)?;
                if let Some(markers) = markers {
                    write!(f, " ; {markers}")?;
                }
                Ok(())
            }
            SpecSource::Vcs { url, reference } => {
                write!(f, "{VCS_PREFIX}{url}@{reference}#egg={}", self.name)
            }
        }
    }
}
