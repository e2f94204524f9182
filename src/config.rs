//! Configuration file
//!
//! ```json
//! {
//!   "state_path": "./document.state.json",
//!   "auto_revision_label": "Autorevision",
//!   "fsync": true,
//!   "log_level": "INFO"
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{DocError, DocResult};
use crate::identity::StaticStrings;
use crate::observability::{log_event, Event, Severity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Where the document state file lives
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Description given to automatically created revisions
    #[serde(default = "default_auto_revision_label")]
    pub auto_revision_label: String,

    /// fsync the state file after every write
    #[serde(default = "default_fsync")]
    pub fsync: bool,

    /// Lowest log severity written
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_state_path() -> String {
    "./document.state.json".to_string()
}
fn default_auto_revision_label() -> String {
    StaticStrings::DEFAULT_AUTO_REVISION_LABEL.to_string()
}
fn default_fsync() -> bool {
    true
}
fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            auto_revision_label: default_auto_revision_label(),
            fsync: default_fsync(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> DocResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| DocError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
        Ok(config)
    }

    /// `Config::load` if a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> DocResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> DocResult<()> {
        if self.state_path.trim().is_empty() {
            return Err(DocError::Config("state_path must not be empty".into()));
        }

        if self.auto_revision_label.trim().is_empty() {
            return Err(DocError::Config(
                "auto_revision_label must not be empty".into(),
            ));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(DocError::Config(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.state_path)
    }

    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}
