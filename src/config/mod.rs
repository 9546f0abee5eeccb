//! Configuration management for padbank
//!
//! Handles loading, parsing and validation of the YAML configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::warn;

use crate::input::gamepad::{BackendKind, Deadzones, SLOT_COUNT};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    /// Thresholds used by every slot without an override
    #[serde(default)]
    pub deadzones: Deadzones,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<SlotConfig>>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: u32,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub rumble: RumbleConfig,
}

/// Per-slot deadzone override; missing fields inherit the global value
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SlotConfig {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_stick: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_stick: Option<i16>,
}

/// Rumble feedback played by the host loop when A goes down
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RumbleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rumble_left")]
    pub left: f32,
    #[serde(default = "default_rumble_right")]
    pub right: f32,
    #[serde(default = "default_rumble_seconds")]
    pub seconds: f32,
}

impl Default for RumbleConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            left: default_rumble_left(),
            right: default_rumble_right(),
            seconds: default_rumble_seconds(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deadzones: Deadzones::default(),
            slots: None,
            frame_rate_hz: default_frame_rate(),
            backend: BackendKind::default(),
            rumble: RumbleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to load config: {}", path))?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            warn!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path).await
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        validate_deadzones(&self.deadzones).context("Invalid global deadzones")?;

        if let Some(slots) = &self.slots {
            let mut seen = HashSet::new();
            for slot in slots {
                if slot.index >= SLOT_COUNT {
                    anyhow::bail!(
                        "Slot index {} is out of range (must be 0-{})",
                        slot.index,
                        SLOT_COUNT - 1
                    );
                }
                if !seen.insert(slot.index) {
                    anyhow::bail!("Slot {} is configured more than once", slot.index);
                }
                validate_deadzones(&self.resolve(slot))
                    .with_context(|| format!("Invalid deadzones for slot {}", slot.index))?;
            }
        }

        if self.frame_rate_hz == 0 || self.frame_rate_hz > 1000 {
            anyhow::bail!(
                "frame_rate_hz {} is invalid (must be 1-1000)",
                self.frame_rate_hz
            );
        }

        if self.rumble.seconds.is_nan() || self.rumble.seconds < 0.0 {
            anyhow::bail!("rumble.seconds cannot be negative");
        }

        Ok(())
    }

    fn resolve(&self, slot: &SlotConfig) -> Deadzones {
        Deadzones {
            trigger: slot.trigger.unwrap_or(self.deadzones.trigger),
            left_stick: slot.left_stick.unwrap_or(self.deadzones.left_stick),
            right_stick: slot.right_stick.unwrap_or(self.deadzones.right_stick),
        }
    }

    /// Effective deadzones for one slot
    pub fn slot_deadzones(&self, index: usize) -> Deadzones {
        self.slots
            .as_ref()
            .and_then(|slots| slots.iter().find(|s| s.index == index))
            .map(|slot| self.resolve(slot))
            .unwrap_or(self.deadzones)
    }

    /// Effective deadzones for every slot, in index order
    pub fn all_deadzones(&self) -> [Deadzones; SLOT_COUNT] {
        std::array::from_fn(|index| self.slot_deadzones(index))
    }

    /// Target duration of one host frame
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz.max(1)))
    }
}

fn validate_deadzones(deadzones: &Deadzones) -> Result<()> {
    if deadzones.left_stick < 0 {
        anyhow::bail!("left_stick deadzone {} cannot be negative", deadzones.left_stick);
    }
    if deadzones.right_stick < 0 {
        anyhow::bail!("right_stick deadzone {} cannot be negative", deadzones.right_stick);
    }
    Ok(())
}

// Default value functions
fn default_true() -> bool { true }
fn default_frame_rate() -> u32 { 60 }
fn default_rumble_left() -> f32 { 1.0 }
fn default_rumble_right() -> f32 { 0.0 }
fn default_rumble_seconds() -> f32 { 0.5 }
