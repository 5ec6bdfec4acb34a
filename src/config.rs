use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;

/// Which explosion recipe fires at a rocket's apex. Read at apex time only;
/// switching mode mid-flight affects the next explosion, not the rocket.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Real,
    Cartoon,
    Premium,
    Mixed,
}

/// Tuning knobs for the show. Time-valued fields are in ticks: one tick is one
/// display frame at 60 Hz, the unit the whole simulation integrates in.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub mode: Mode,
    pub auto_launch: bool,
    /// Phrase spelled out by the bouncing letters of the cartoon burst.
    pub phrase: String,
    /// Caption faded in by the realistic burst.
    pub smoke_text: String,
    /// Caption faded in by the premium burst.
    pub premium_text: String,
    /// Short-lived accent shown mid-way through the premium caption.
    pub clap_text: String,
    /// Vertical velocity above which an ascending rocket is considered spent.
    pub apex_threshold: f32,
    /// Simulation speed relative to wall time.
    pub time_scale: f32,
    /// Largest amount of pending simulation time carried across a frame,
    /// in ticks. Bounds the catch-up after a stall.
    pub max_step: f32,
    /// Ticks between automatic rocket launches.
    pub auto_interval: f32,
    /// Ticks between particle-pool size checks.
    pub guard_interval: f32,
    /// Pool size that trips the guard.
    pub particle_cap: usize,
    /// Oldest particles dropped when the guard trips.
    pub particle_drop: usize,
    /// Night-sky color the surface fades toward each frame.
    pub backdrop: Rgb,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Real,
            auto_launch: true,
            phrase: "Happy Birthday!".to_string(),
            smoke_text: "Happy Birthday".to_string(),
            premium_text: "Best Wishes".to_string(),
            clap_text: "\u{1f44f}".to_string(),
            apex_threshold: -1.2,
            time_scale: 1.0,
            max_step: 2.4,
            auto_interval: 96.0,
            guard_interval: 180.0,
            particle_cap: 6000,
            particle_drop: 3000,
            backdrop: Rgb::new(3, 4, 8),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ShowConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = ShowConfig::default();
        assert_eq!(config.mode, Mode::Real);
        assert_eq!(config.apex_threshold, -1.2);
        assert_eq!(config.particle_cap, 6000);
        assert_eq!(config.particle_drop, 3000);
        assert_eq!(config.backdrop, Rgb::new(3, 4, 8));
        assert!(config.auto_launch);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ShowConfig = toml::from_str(
            r#"
            mode = "premium"
            phrase = "Congrats!"
            backdrop = "101018"
            auto_launch = false
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::Premium);
        assert_eq!(config.phrase, "Congrats!");
        assert_eq!(config.backdrop, Rgb::new(16, 16, 24));
        assert!(!config.auto_launch);
        // untouched fields keep their defaults
        assert_eq!(config.guard_interval, 180.0);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let result: Result<ShowConfig, _> = toml::from_str(r#"backdrop = "not-a-color""#);
        assert!(result.is_err());
    }
}
