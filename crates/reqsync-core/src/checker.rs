use crate::compare::{compare_manifests, ComparisonReport};
use crate::config::Config;
use crate::CoreError;
use reqsync_schema::{read_manifest, ManifestFormat, DEVELOP_SECTION};
use std::path::PathBuf;
use tracing::{debug, info};

const NO_SECTIONS: &[&str] = &[];

/// What to compare: a lock file (restricted to `sections`) against a requirements file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub lock: PathBuf,
    pub requirements: PathBuf,
    pub sections: Vec<String>,
}

impl CheckOptions {
    /// Add the `develop` section if it is not already selected.
    #[must_use]
    pub fn with_develop(mut self) -> Self {
        if !self.sections.iter().any(|s| s == DEVELOP_SECTION) {
            self.sections.push(DEVELOP_SECTION.to_owned());
        }
        self
    }
}

impl From<Config> for CheckOptions {
    fn from(config: Config) -> Self {
        Self {
            lock: config.lock,
            requirements: config.requirements,
            sections: config.sections,
        }
    }
}

/// Reads both manifests and compares them.
pub struct Checker {
    options: CheckOptions,
}

impl Checker {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    /// Run the comparison. A mismatch is an `Ok` report with `matches == false`;
    /// only unreadable or malformed manifests produce an error.
    pub fn run(&self) -> Result<ComparisonReport, CoreError> {
        info!(
            "comparing {} [{}] against {}",
            self.options.lock.display(),
            self.options.sections.join(", "),
            self.options.requirements.display()
        );

        let lock = read_manifest(
            &self.options.lock,
            ManifestFormat::Lock,
            self.options.sections.as_slice(),
        )?;
        let requirements = read_manifest(
            &self.options.requirements,
            ManifestFormat::Requirements,
            NO_SECTIONS,
        )?;

        let report = compare_manifests(&lock, &requirements);
        debug!(
            "{} only in lock, {} only in requirements",
            report.only_in_left.len(),
            report.only_in_right.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_default_config() {
        let options = CheckOptions::from(Config::default());
        assert_eq!(options.lock, PathBuf::from("Pipfile.lock"));
        assert_eq!(options.sections, vec!["default"]);
    }

    #[test]
    fn with_develop_is_idempotent() {
        let options = CheckOptions::from(Config::default()).with_develop().with_develop();
        assert_eq!(options.sections, vec!["default", "develop"]);
    }
}
