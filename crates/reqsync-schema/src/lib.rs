//! Package specification model and manifest readers for reqsync.
//!
//! This crate defines the schema layer: the format-independent `PackageSpec`
//! and its canonical string form (`CanonicalSpec`), the `Pipfile.lock` reader,
//! the `requirements.txt` reader, and `read_manifest`, which dispatches between
//! them by `ManifestFormat`.

pub mod lock;
pub mod manifest;
pub mod package;
pub mod requirements;
pub mod types;

pub use lock::{parse_lock_str, LockEntry, DEFAULT_SECTION, DEVELOP_SECTION};
pub use manifest::{parse_manifest_str, read_manifest, Manifest, ManifestError, ManifestFormat};
pub use package::{PackageSpec, SpecSource};
pub use requirements::{parse_requirement_line, parse_requirements_str};
pub use types::{CanonicalSpec, PackageName};
