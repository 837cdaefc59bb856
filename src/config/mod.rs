// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for keydrill.
//!
//! A trainer file chooses the practice mode, the starting root and the
//! MIDI device. YAML and TOML are both accepted, picked by file extension.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::TheoryError;
use crate::music::pitch::{parse_note_label, Pitch};
use crate::music::scale::{degree_index, MAJOR_CHORD_DEGREES, PRACTICE_DEGREES};
use crate::practice::{Mode, SessionSettings};

/// Root configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrainerFile {
    /// Practice settings
    #[serde(default)]
    pub session: SessionConfig,
    /// MIDI device selection
    #[serde(default)]
    pub midi: MidiDeviceConfig,
}

impl TrainerFile {
    /// Load a configuration file (.yaml, .yml or .toml)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }
}

/// Practice settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// "scales" or "chords"
    #[serde(default)]
    pub mode: Mode,
    /// Lowest root for random scales (e.g. "C3")
    #[serde(default = "default_baseline")]
    pub baseline: String,
    /// Starting root (e.g. "A3")
    #[serde(default = "default_root")]
    pub root: String,
    /// Chords mode: natural root as a pitch number (e.g. 60 for C4)
    #[serde(default)]
    pub root_setting: Option<Pitch>,
    /// Chords mode: -1 flat, 0 natural, 1 sharp
    #[serde(default)]
    pub root_sharp_flat: i32,
    /// Chord degrees to practise ("I", "ii", ... "vi")
    #[serde(default = "default_degrees")]
    pub degrees: Vec<String>,
    /// Seed for reproducible roots and chords
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_baseline() -> String {
    "C3".to_string()
}
fn default_root() -> String {
    "A3".to_string()
}
fn default_degrees() -> Vec<String> {
    PRACTICE_DEGREES
        .iter()
        .map(|&d| MAJOR_CHORD_DEGREES[d].label.to_string())
        .collect()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            baseline: default_baseline(),
            root: default_root(),
            root_setting: None,
            root_sharp_flat: 0,
            degrees: default_degrees(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Root controls, when the file sets a chords-mode root
    pub fn root_controls(&self) -> Option<RootSetting> {
        if self.mode != Mode::Chords {
            return None;
        }
        self.root_setting.map(|natural| RootSetting {
            natural,
            sharp_flat: self.root_sharp_flat,
        })
    }

    /// Root picker for the starting root.
    ///
    /// Uses the chords-mode controls when set, otherwise splits the `root`
    /// label into its natural letter and accidental.
    pub fn root_picker(&self) -> Result<RootSetting> {
        match self.root_controls() {
            Some(controls) => Ok(controls),
            None => RootSetting::from_label(&self.root)
                .with_context(|| format!("Invalid root {:?}", self.root)),
        }
    }

    /// Starting root pitch
    pub fn root_pitch(&self) -> Result<Pitch> {
        if let Some(controls) = self.root_controls() {
            return Ok(controls.pitch());
        }
        parse_note_label(&self.root).with_context(|| format!("Invalid root {:?}", self.root))
    }

    /// Resolve labels into session settings
    pub fn settings(&self) -> Result<SessionSettings> {
        let baseline = parse_note_label(&self.baseline)
            .with_context(|| format!("Invalid baseline {:?}", self.baseline))?;
        let root = self.root_pitch()?;

        let mut degrees = Vec::with_capacity(self.degrees.len());
        for label in &self.degrees {
            let index = degree_index(label)?;
            if !PRACTICE_DEGREES.contains(&index) {
                bail!("Chord degree {:?} cannot be practised", label);
            }
            degrees.push(index);
        }
        if degrees.is_empty() {
            bail!("At least one chord degree is required");
        }

        Ok(SessionSettings {
            mode: self.mode,
            baseline,
            root,
            degrees,
        })
    }
}

/// Chords-mode root picker: a natural plus a sharp/flat offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootSetting {
    /// Pitch of the natural note
    pub natural: Pitch,
    /// -1 flat, 0 natural, 1 sharp
    pub sharp_flat: i32,
}

impl RootSetting {
    /// Split a note label such as "Eb3" into natural E3 and a flat
    pub fn from_label(label: &str) -> Result<Self, TheoryError> {
        let pitch = parse_note_label(label)?;
        let sharp_flat = match label.trim().chars().nth(1) {
            Some('#') => 1,
            Some('b') => -1,
            _ => 0,
        };
        Ok(Self {
            natural: pitch - sharp_flat,
            sharp_flat,
        })
    }

    /// Resulting root pitch
    pub fn pitch(&self) -> Pitch {
        self.natural + self.sharp_flat
    }
}

/// MIDI device configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MidiDeviceConfig {
    /// Device name to connect to (substring match)
    #[serde(default)]
    pub device: Option<String>,
    /// Source index, used when no name is given
    #[serde(default)]
    pub source: Option<usize>,
}
