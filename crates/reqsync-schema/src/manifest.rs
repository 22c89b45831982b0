use crate::lock::parse_lock_str;
use crate::package::PackageSpec;
use crate::requirements::parse_requirements_str;
use crate::types::CanonicalSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("lock file has no '{0}' section")]
    MissingSection(String),
    #[error("lock entry '{name}' has neither 'version' nor 'git'/'ref'")]
    UnsupportedEntry { name: String },
    #[error("invalid lock entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },
}

/// The two manifest layouts reqsync understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    /// JSON lock file (`Pipfile.lock`).
    Lock,
    /// One requirement per line (`requirements.txt`).
    Requirements,
}

impl ManifestFormat {
    /// Guess the format from a file name: anything ending in `.lock` is a lock file.
    pub fn detect(path: &Path) -> Self {
        let is_lock = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_ascii_lowercase().ends_with(".lock"));
        if is_lock {
            Self::Lock
        } else {
            Self::Requirements
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock => f.write_str("lock"),
            Self::Requirements => f.write_str("requirements"),
        }
    }
}

/// Packages read from one manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub format: ManifestFormat,
    pub packages: Vec<PackageSpec>,
}

impl Manifest {
    /// Canonical strings of every package, sorted and deduplicated.
    pub fn canonical_specs(&self) -> Vec<CanonicalSpec> {
        let mut out: Vec<CanonicalSpec> = self.packages.iter().map(PackageSpec::canonical).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Label used when reporting on this manifest.
    pub fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse manifest content already in memory. `sections` only applies to lock files.
///
/// A leading UTF-8 byte order mark is ignored, as pip does.
pub fn parse_manifest_str<S: AsRef<str>>(
    input: &str,
    format: ManifestFormat,
    sections: &[S],
) -> Result<Vec<PackageSpec>, ManifestError> {
    let input = input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input);
    match format {
        ManifestFormat::Lock => parse_lock_str(input, sections),
        ManifestFormat::Requirements => Ok(parse_requirements_str(input)),
    }
}

/// Read one manifest file. `sections` only applies to lock files.
pub fn read_manifest<S: AsRef<str>>(
    path: impl AsRef<Path>,
    format: ManifestFormat,
    sections: &[S],
) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let packages = parse_manifest_str(&content, format, sections)?;
    tracing::debug!(
        "read {} packages from {} ({format})",
        packages.len(),
        path.display()
    );
    Ok(Manifest {
        path: path.to_path_buf(),
        format,
        packages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::DEFAULT_SECTION;

    const NO_SECTIONS: &[&str] = &[];

    #[test]
    fn detects_lock_by_suffix() {
        assert_eq!(ManifestFormat::detect(Path::new("Pipfile.lock")), ManifestFormat::Lock);
        assert_eq!(ManifestFormat::detect(Path::new("ci/PIPFILE.LOCK")), ManifestFormat::Lock);
        assert_eq!(
            ManifestFormat::detect(Path::new("requirements.txt")),
            ManifestFormat::Requirements
        );
        assert_eq!(ManifestFormat::detect(Path::new("locks")), ManifestFormat::Requirements);
    }

    #[test]
    fn reads_lock_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Pipfile.lock");
        fs::write(&path, r#"{"default": {"requests": {"version": "==2.25.1"}}}"#).unwrap();

        let manifest = read_manifest(&path, ManifestFormat::Lock, &[DEFAULT_SECTION]).unwrap();
        assert_eq!(manifest.format, ManifestFormat::Lock);
        assert_eq!(manifest.canonical_specs(), vec![CanonicalSpec::from("requests==2.25.1")]);
    }

    #[test]
    fn reads_requirements_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "-i https://pypi.org/simple\nsix==1.16.0\nattrs==21.2.0\nsix==1.16.0\n").unwrap();

        let manifest = read_manifest(&path, ManifestFormat::Requirements, NO_SECTIONS).unwrap();
        assert_eq!(manifest.packages.len(), 3);
        assert_eq!(
            manifest.canonical_specs(),
            vec![CanonicalSpec::from("attrs==21.2.0"), CanonicalSpec::from("six==1.16.0")]
        );
    }

    #[test]
    fn byte_order_mark_is_ignored_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let reqs = dir.path().join("requirements.txt");
        fs::write(&reqs, "\u{feff}certifi==2020.12.5\r\nsix==1.16.0\r\n").unwrap();
        let lock = dir.path().join("Pipfile.lock");
        fs::write(&lock, "\u{feff}{\"default\": {\"certifi\": {\"version\": \"==2020.12.5\"}}}").unwrap();

        let from_reqs = read_manifest(&reqs, ManifestFormat::Requirements, NO_SECTIONS).unwrap();
        assert_eq!(
            from_reqs.canonical_specs(),
            vec![CanonicalSpec::from("certifi==2020.12.5"), CanonicalSpec::from("six==1.16.0")]
        );

        let from_lock = read_manifest(&lock, ManifestFormat::Lock, &[DEFAULT_SECTION]).unwrap();
        assert_eq!(from_lock.canonical_specs(), vec![CanonicalSpec::from("certifi==2020.12.5")]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest(dir.path().join("nope.txt"), ManifestFormat::Requirements, NO_SECTIONS)
            .unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
        assert!(err.to_string().starts_with("failed to read manifest"));
    }

    #[test]
    fn same_packages_canonicalize_identically_across_formats() {
        let lock = r#"{
            "default": {
                "requests": {
                    "extras": ["socks", "security"],
                    "markers": "python_version >= '3.6'",
                    "version": "==2.25.1"
                },
                "mylib": {"git": "https://github.com/org/mylib.git", "ref": "v1.0.0"}
            }
        }"#;
        let flat = "\
requests[security,socks]==2.25.1 ;python_version >= '3.6' --hash=sha256:abc
-e git+https://github.com/org/mylib.git@v1.0.0#egg=mylib
";
        let mut from_lock: Vec<_> = parse_manifest_str(lock, ManifestFormat::Lock, &[DEFAULT_SECTION])
            .unwrap()
            .iter()
            .map(PackageSpec::canonical)
            .collect();
        let mut from_flat: Vec<_> = parse_manifest_str(flat, ManifestFormat::Requirements, NO_SECTIONS)
            .unwrap()
            .iter()
            .map(PackageSpec::canonical)
            .collect();

        from_lock.sort();
        from_flat.sort();
        assert_eq!(from_lock, from_flat);
    }

    #[test]
    fn format_serializes_lowercase() {
        let json = serde_json::to_string(&ManifestFormat::Requirements).unwrap();
        assert_eq!(json, "\"requirements\"");
        assert_eq!(ManifestFormat::Lock.to_string(), "lock");
    }
}
