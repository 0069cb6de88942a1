// Run configuration and up-front validation.
//
// A SketchConfig describes one generation run: output format (sample rate,
// total duration), the tempo range, the harmonic material (progression
// catalog and scale), and per-layer mix volumes. Defaults reproduce the
// built-in catalog from theory.rs; a JSON file can override any field.
//
// Validation happens once, before any events are generated. Everything past
// validate() is infallible arithmetic, so the error taxonomy stays narrow.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::theory;

/// Rejected configurations. All variants are caught before generation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("duration_seconds must be positive and finite, got {0}")]
    BadDuration(f64),
    #[error("sample_rate must be positive")]
    ZeroSampleRate,
    #[error("bpm_range must satisfy 0 < min <= max, got [{0}, {1}]")]
    BadBpmRange(u32, u32),
    #[error("progression catalog is empty")]
    EmptyCatalog,
    #[error("progression {0} in the catalog is empty")]
    EmptyProgression(usize),
    #[error("scale is empty")]
    EmptyScale,
}

/// Per-layer mix volumes applied when events are rendered into the buffer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerVolumes {
    pub melody: f32,
    pub arpeggio: f32,
    pub bass: f32,
    pub pads: f32,
    pub drums: f32,
}

impl Default for LayerVolumes {
    fn default() -> Self {
        LayerVolumes {
            melody: 0.9,
            arpeggio: 0.3,
            bass: 0.7,
            pads: 0.2,
            drums: 1.0,
        }
    }
}

/// Configuration for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Total length of the piece in seconds.
    pub duration_seconds: f64,
    /// Inclusive tempo range the plan draws from.
    pub bpm_range: (u32, u32),
    /// Candidate progressions; one is drawn uniformly per run.
    pub progression_catalog: Vec<Vec<String>>,
    /// Note pool for free melodic choices and the motif.
    pub scale: Vec<String>,
    pub volumes: LayerVolumes,
}

impl Default for SketchConfig {
    fn default() -> Self {
        SketchConfig {
            sample_rate: 44100,
            duration_seconds: 15.0,
            bpm_range: (110, 140),
            progression_catalog: theory::PROGRESSIONS
                .iter()
                .map(|p| p.iter().map(|s| s.to_string()).collect())
                .collect(),
            scale: theory::SCALE.iter().map(|s| s.to_string()).collect(),
            volumes: LayerVolumes::default(),
        }
    }
}

impl SketchConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: SketchConfig = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Reject invalid configurations before generation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(ConfigError::BadDuration(self.duration_seconds));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        let (min, max) = self.bpm_range;
        if min == 0 || min > max {
            return Err(ConfigError::BadBpmRange(min, max));
        }
        if self.progression_catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (i, prog) in self.progression_catalog.iter().enumerate() {
            if prog.is_empty() {
                return Err(ConfigError::EmptyProgression(i));
            }
        }
        if self.scale.is_empty() {
            return Err(ConfigError::EmptyScale);
        }
        Ok(())
    }

    /// Length of the output buffer in samples.
    pub fn num_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration_seconds) as usize
    }
}
