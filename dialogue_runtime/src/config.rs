//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Settings for a [`crate::Runtime`]. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Forward focus directives to the host.
    pub focus_on_actor: bool,

    /// Ask the host to restore its viewpoint when a session ends.
    pub restore_viewpoint_on_exit: bool,

    /// Include the actor's name in presentations.
    pub display_actor_names: bool,

    /// Label of the single option offered by basic nodes.
    pub continue_label: String,

    /// Reject graphs with dangling links or doubly bound ports at registration.
    pub strict_links: bool,

    /// Maximum consecutive auto-advancing nodes in one call.
    pub max_auto_advance: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            focus_on_actor: true,
            restore_viewpoint_on_exit: true,
            display_actor_names: false,
            continue_label: "Continue".to_string(),
            strict_links: false,
            max_auto_advance: 10_000,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
