//! Settings read from the optional JSON config file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use soft_heart::{Controls, HeartConfig, ModelPreset, SoftBodyConfig};

/// Overrides for the model gallery and the control forces.
///
/// `body` and `heart` replace the settings of the selected preset only. Missing fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Replaces the body settings of the selected preset.
    pub body: Option<SoftBodyConfig>,
    /// Replaces the heart of the selected preset.
    pub heart: Option<HeartConfig>,
    /// The forces behind gravity and the control events.
    pub controls: Controls,
}

impl ShellConfig {
    /// Reads a config from a JSON file.
    ///
    /// # Errors
    ///
    /// - If the file cannot be read.
    /// - If the file is not a valid config.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| format!("Failed to read config {path:?}: {e}"))?;
        let config = serde_json::from_str(&contents).map_err(|e| format!("Failed to parse config {path:?}: {e}"))?;
        ftlog::info!("Read config from {path:?}");
        Ok(config)
    }

    /// The gallery, with the overrides applied to the preset named `model`.
    #[must_use]
    pub fn presets(&self, model: Option<&str>) -> Vec<ModelPreset> {
        let mut presets = ModelPreset::gallery();
        for preset in presets.iter_mut().filter(|p| model.is_some_and(|m| p.name == m)) {
            if let Some(body) = self.body {
                preset.config = body;
            }
            if let Some(heart) = self.heart {
                preset.heart = Some(heart);
            }
        }
        presets
    }
}
