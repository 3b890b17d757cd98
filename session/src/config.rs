//! FILENAME: session/src/config.rs
//! PURPOSE: Connection settings for a SmartView provider.

use crate::SessionError;
use grid_engine::Preferences;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CLIENT_XML_VERSION: &str = "3.1.0.0.0";
pub const DEFAULT_LANGUAGE: &str = "en_US";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Provider endpoint every request is posted to.
    pub provider_url: String,
    /// Protocol version announced in ConnectToProvider.
    pub client_xml_version: String,
    pub language: String,
    /// HTTP timeout; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// JSON file holding the grid preferences for this session.
    pub preferences_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            provider_url: String::new(),
            client_xml_version: CLIENT_XML_VERSION.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: None,
            preferences_path: None,
        }
    }
}

impl SessionConfig {
    pub fn new(provider_url: impl Into<String>) -> Self {
        SessionConfig {
            provider_url: provider_url.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Preferences from `preferences_path`, or the defaults when unset.
    pub fn load_preferences(&self) -> Result<Preferences, SessionError> {
        match &self.preferences_path {
            Some(path) => Ok(Preferences::load(path)?),
            None => Ok(Preferences::default()),
        }
    }
}
