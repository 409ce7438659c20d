//! # Codec Configuration
//!
//! Scaling factors both ends of the wire must agree on. Loaded once at
//! startup from TOML:
//!
//! ```toml
//! tile_width = 32.0
//! tile_height = 24.0
//! max_velocity = 40.0
//! ```
//!
//! Missing keys fall back to the compiled-in defaults from `meadow_shared`.

use std::path::Path;

use meadow_shared::{MAX_VELOCITY, TILE_HEIGHT, TILE_WIDTH};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Quantization parameters for coordinates and velocities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Coordinate X scale (wire units per tile).
    pub tile_width: f64,
    /// Coordinate Y scale (wire units per tile).
    pub tile_height: f64,
    /// Exclusive upper bound on velocity magnitude.
    pub max_velocity: f64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            max_velocity: MAX_VELOCITY,
        }
    }
}

impl CodecConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] if a scale is not strictly positive.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`CodecConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            "Loaded codec config from {}: tile {}x{}, max velocity {}",
            path.display(),
            config.tile_width,
            config.tile_height,
            config.max_velocity
        );
        Ok(config)
    }

    /// Checks that every scale is finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("tile_width", self.tile_width),
            ("tile_height", self.tile_height),
            ("max_velocity", self.max_velocity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Smallest velocity difference the wire can represent.
    #[must_use]
    pub fn velocity_step(&self) -> f64 {
        self.max_velocity / 32768.0
    }
}
