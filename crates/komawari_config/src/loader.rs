//! Configuration file discovery and deserialization.

use crate::OracleConfig;
use config::{Config, File, FileFormat};
use komawari_core::SegmentationConfig;
use komawari_error::{ConfigError, KomawariError, KomawariResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../komawari.toml");

/// Complete Komawari configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct KomawariConfig {
    /// Windowing and cut lengths
    #[serde(default)]
    segmentation: SegmentationConfig,
    /// Oracle connection
    #[serde(default)]
    oracle: OracleConfig,
}

impl KomawariConfig {
    /// Build a configuration from parts.
    pub fn new(segmentation: SegmentationConfig, oracle: OracleConfig) -> Self {
        Self {
            segmentation,
            oracle,
        }
    }

    /// Load configuration from the standard locations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use komawari_config::KomawariConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = KomawariConfig::load()?;
    /// println!("window size: {}", config.segmentation().window_size());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> KomawariResult<Self> {
        Self::load_with(None)
    }

    /// Load configuration, layering `explicit` on top when given.
    ///
    /// Unlike the home and current-directory files, an explicit file must exist.
    #[instrument]
    pub fn load_with(explicit: Option<&Path>) -> KomawariResult<Self> {
        debug!("Loading configuration: explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/komawari/komawari.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("komawari").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let loaded: Self = builder
            .build()
            .map_err(|e| {
                KomawariError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KomawariError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a single file, ignoring every other source.
    pub fn from_file(path: impl AsRef<Path>) -> KomawariResult<Self> {
        let loaded: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                KomawariError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KomawariError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> KomawariResult<()> {
        self.segmentation.validate()?;
        if *self.oracle.timeout_secs() == 0 {
            return Err(ConfigError::new("oracle.timeout_secs must be positive").into());
        }
        if self.oracle.base_url().trim().is_empty() {
            return Err(ConfigError::new("oracle.base_url must not be empty").into());
        }
        Ok(())
    }

    /// Replace the segmentation settings.
    pub fn with_segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Replace the oracle settings.
    pub fn with_oracle(mut self, oracle: OracleConfig) -> Self {
        self.oracle = oracle;
        self
    }
}
