//! Configuration types for arbconv

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ArbError, Result};

/// How amplitudes outside [-1.0, 1.0] are treated on encode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Reject any amplitude outside [-1.0, 1.0]
    #[default]
    Strict,
    /// Encode as long as the code fits in an i16
    Permissive,
}

/// How the reserved header bytes are treated on decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCheck {
    /// Only the magic is checked
    #[default]
    Lenient,
    /// Reserved bytes must match the literal written by the encoder
    Strict,
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Binary codec settings
    #[serde(default)]
    pub codec: CodecConfig,
    /// Tabular text settings
    #[serde(default)]
    pub table: TableConfig,
    /// Plot settings
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Binary codec settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Out-of-range amplitude handling
    #[serde(default)]
    pub range_policy: RangePolicy,
    /// Reserved header byte handling
    #[serde(default)]
    pub header_check: HeaderCheck,
}

/// Tabular text settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Fractional digits written per value
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    8
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

/// Plot settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Border around the plot area in pixels
    pub margin: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            margin: 40,
        }
    }
}

/// Largest precision that still distinguishes every f64
const PRECISION_MAX: usize = 17;

/// Largest plot width or height in pixels
const PLOT_SIZE_MAX: u32 = 8192;

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArbError::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ArbError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.table.precision > PRECISION_MAX {
            return Err(ArbError::Config(format!(
                "table.precision must be at most {PRECISION_MAX}, got {}",
                self.table.precision
            )));
        }

        let PlotConfig {
            width,
            height,
            margin,
        } = self.plot;

        if width > PLOT_SIZE_MAX || height > PLOT_SIZE_MAX {
            return Err(ArbError::Config(format!(
                "plot of {width}x{height} exceeds the {PLOT_SIZE_MAX}px limit"
            )));
        }

        // The plot area needs at least a few pixels in each direction
        let inset = 2 * u64::from(margin) + 4;
        if u64::from(width) <= inset || u64::from(height) <= inset {
            return Err(ArbError::Config(format!(
                "plot of {width}x{height} leaves no room inside a {margin}px margin"
            )));
        }

        Ok(())
    }
}
