//! Bridge configuration, passed from the page as a JS object or JSON.

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::BridgeError;

/// Port the UI sends sound-state snapshots on.
pub const UPDATE_SOUND_STATE_PORT: &str = "updateSoundState";
/// Port the bridge notifies on every document-wide pointer release.
pub const POINTER_UP_PORT: &str = "pointerUpOutsideOfTheApp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Id of the element the UI mounts on.
    pub mount_id: String,
    /// Dotted path of the UI module under the global `Elm` namespace.
    pub elm_module: String,
    /// Shown by the UI as a link to the source repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    pub log_level: LogLevel,
    pub update_sound_state_port: String,
    pub pointer_up_port: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            mount_id: "app".to_string(),
            elm_module: "Menro.App".to_string(),
            repository_url: None,
            log_level: LogLevel::default(),
            update_sound_state_port: UPDATE_SOUND_STATE_PORT.to_string(),
            pointer_up_port: POINTER_UP_PORT.to_string(),
        }
    }
}

/// Flags handed to the UI at init.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(json).map_err(|e| BridgeError::decode_json("config", e))
    }

    pub fn flags(&self) -> AppFlags {
        AppFlags {
            repository_url: self.repository_url.clone(),
        }
    }

    /// `elm_module` split into its path segments, empty segments dropped.
    pub fn elm_module_path(&self) -> Vec<&str> {
        self.elm_module.split('.').filter(|s| !s.is_empty()).collect()
    }
}
