//! Codec configuration.
//!
//! Encoder settings can be loaded from a TOML file. Every key is optional and
//! unknown keys are rejected to catch typos early.
//!
//! ```toml
//! [jpeg]
//! quality = 75   # 1-100
//! ```
//!
//! GIF and PNG are always written with the encoders' default settings.

use crate::codec::{EncodeParams, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Encoder settings for [`ImageIo`](crate::ImageIo).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub jpeg: JpegConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegConfig {
    /// Encoding quality, 1 (smallest) to 100 (best).
    pub quality: Quality,
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg.quality.value()) {
            return Err(ConfigError::Validation(
                "jpeg.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    pub fn encode_params(&self) -> EncodeParams {
        EncodeParams {
            quality: self.jpeg.quality,
        }
    }
}

/// Parse and validate a config from TOML text.
pub fn parse_config(content: &str) -> Result<CodecConfig, ConfigError> {
    let config: CodecConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<CodecConfig, ConfigError> {
    if !path.exists() {
        return Ok(CodecConfig::default());
    }
    load_config_strict(path)
}

/// Load a config file the user named explicitly. A missing file is an error.
pub fn load_config_strict(path: &Path) -> Result<CodecConfig, ConfigError> {
    parse_config(&fs::read_to_string(path)?)
}

/// Fully-commented default config, printed by `fimage gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# fimage codec configuration
# All keys are optional; defaults are shown.

[jpeg]
# Encoding quality, 1 (smallest file) to 100 (best quality).
quality = 75
"#
}
