//! Encoder settings.
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 75). Clamped on construction.
//! - [`EncodeParams`]: everything a [`Codec`](super::Codec) may consult while encoding.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Parameters passed to [`Codec::encode`](super::Codec::encode).
///
/// Codecs ignore the fields that do not apply to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeParams {
    /// JPEG quality.
    pub quality: Quality,
}
