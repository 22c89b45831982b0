use crate::CoreError;
use reqsync_schema::DEFAULT_SECTION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "reqsync.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_lock")]
    pub lock: PathBuf,
    #[serde(default = "default_requirements")]
    pub requirements: PathBuf,
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock: default_lock(),
            requirements: default_requirements(),
            sections: default_sections(),
        }
    }
}

fn default_lock() -> PathBuf {
    PathBuf::from("Pipfile.lock")
}

fn default_requirements() -> PathBuf {
    PathBuf::from("requirements.txt")
}

fn default_sections() -> Vec<String> {
    vec![DEFAULT_SECTION.to_owned()]
}

impl Config {
    pub fn parse_str(input: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(input)?;
        if config.sections.is_empty() {
            return Err(CoreError::Config(
                "'sections' must name at least one lock file section".to_owned(),
            ));
        }
        Ok(config)
    }

    /// Load a config file. Relative manifest paths are resolved against the
    /// directory containing the file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse_str(&content)?;
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.lock = base.join(&config.lock);
            config.requirements = base.join(&config.requirements);
        }
        Ok(config)
    }

    /// Use `explicit` if given (it must exist), else `reqsync.toml` in `dir`
    /// if present, else the built-in defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, CoreError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("using config {}", candidate.display());
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }
}
