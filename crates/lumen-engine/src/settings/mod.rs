//! Engine settings shared between the host application and render effects.
//!
//! Settings are plain data. Effects read one immutable snapshot per frame and
//! write back through explicit change requests, so a value can never change
//! halfway through encoding a frame.

mod outline;
mod store;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use outline::{OutlineChange, OutlineSettings, MAX_OUTLINE_GROUPS, MAX_OUTLINE_PIXEL};
pub use store::{SettingsStore, SharedSettings};

/// Root of the engine configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub post_processing: PostProcessingSettings,
}

/// Per-effect settings of the post-processing stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostProcessingSettings {
    pub outline: OutlineSettings,
}

impl EngineSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    ///
    /// Values are stored as given; range clamping happens when they are
    /// applied through [`OutlineChange`] or consumed by an effect.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse engine settings")
    }

    /// Serializes settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize engine settings")
    }
}
