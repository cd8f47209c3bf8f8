/// Preset resolution for codec parameters
///
/// A preset names a point on the speed/quality curve. Explicit flags always
/// beat the preset: a quality value replaces the preset quality, and the
/// negative flags switch individual behaviors off.
use crate::constants::{
    BALANCED_PRESET_QUALITY, FAST_PRESET_QUALITY, MAX_QUALITY, MIN_QUALITY, QUALITY_PRESET_QUALITY,
};
use crate::error::{CompressionError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    Fast,
    #[default]
    Balanced,
    Quality,
}

impl Preset {
    pub fn quality(&self) -> u8 {
        match self {
            Preset::Fast => FAST_PRESET_QUALITY,
            Preset::Balanced => BALANCED_PRESET_QUALITY,
            Preset::Quality => QUALITY_PRESET_QUALITY,
        }
    }

    pub fn optimize(&self) -> bool {
        !matches!(self, Preset::Fast)
    }

    pub fn progressive(&self) -> bool {
        !matches!(self, Preset::Fast)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Fast => "fast",
            Preset::Balanced => "balanced",
            Preset::Quality => "quality",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Preset {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Preset::Fast),
            "balanced" => Ok(Preset::Balanced),
            "quality" => Ok(Preset::Quality),
            _ => Err(CompressionError::InvalidPreset(s.to_string())),
        }
    }
}

/// Fully resolved codec parameters shared by every job in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetConfig {
    pub quality: u8,
    pub optimize: bool,
    pub progressive: bool,
    pub strip_metadata: bool,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl PresetConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            quality: preset.quality(),
            optimize: preset.optimize(),
            progressive: preset.progressive(),
            strip_metadata: false,
        }
    }

    /// Resolve a preset name and explicit overrides into one parameter set.
    ///
    /// An unknown preset name and an out-of-range quality are both fatal:
    /// nothing downstream runs with half-resolved parameters.
    pub fn resolve(
        preset: Option<&str>,
        quality: Option<u8>,
        no_optimize: bool,
        no_progressive: bool,
        strip_metadata: bool,
    ) -> Result<Self> {
        let preset = match preset {
            Some(name) => name.parse::<Preset>()?,
            None => Preset::default(),
        };

        let quality = quality.unwrap_or_else(|| preset.quality());
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        Ok(Self {
            quality,
            optimize: preset.optimize() && !no_optimize,
            progressive: preset.progressive() && !no_progressive,
            strip_metadata,
        })
    }
}
