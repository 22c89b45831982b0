//! Comparison and check orchestration for reqsync.
//!
//! This crate ties the schema readers together: `Checker` reads a lock file and
//! a requirements file according to `CheckOptions` (usually built from a
//! `Config`), and `compare` turns two lists of canonical specifications into a
//! `ComparisonReport`.

pub mod checker;
pub mod compare;
pub mod config;

pub use checker::{CheckOptions, Checker};
pub use compare::{compare, compare_manifests, ComparisonReport};
pub use config::{Config, CONFIG_FILE_NAME};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] reqsync_schema::ManifestError),
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Config(String),
}
