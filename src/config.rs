use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ConfigurationError, LoadConfigError};
use crate::heuristic::HeuristicKind;
use crate::render::Palette;

/// Settings for a [Visualizer](crate::Visualizer) session. Every field is optional in the
/// TOML representation:
///
/// ```toml
/// rows = 50
/// width = 700
/// heuristic = "manhattan"
///
/// [palette]
/// path = [1, 174, 0]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub rows: usize,
    pub width: u32,
    pub heuristic: HeuristicKind,
    pub palette: Palette,
}

impl Default for VisualizerConfig {
    fn default() -> VisualizerConfig {
        VisualizerConfig {
            rows: 50,
            width: 700,
            heuristic: HeuristicKind::Manhattan,
            palette: Palette::default(),
        }
    }
}

impl VisualizerConfig {
    pub fn from_toml_str(text: &str) -> Result<VisualizerConfig, LoadConfigError> {
        let config: VisualizerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<VisualizerConfig, LoadConfigError> {
        let text = fs::read_to_string(path)?;
        VisualizerConfig::from_toml_str(&text)
    }

    /// Checks that a grid can be built from these dimensions.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rows == 0 {
            return Err(ConfigurationError::InvalidRowCount);
        }
        if (self.width as usize) < self.rows {
            return Err(ConfigurationError::InvalidWidth {
                rows: self.rows,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Side length of a cell in pixels.
    pub fn cell_size(&self) -> u32 {
        self.width / self.rows.max(1) as u32
    }
}
