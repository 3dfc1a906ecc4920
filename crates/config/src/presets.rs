//! Saved slideshow presets
//!
//! Presets live in `presets.json` next to the config file. At most
//! [`MAX_PRESETS`] are kept; overwriting an existing preset is always allowed.

use crate::persistence::write_atomic;
use crate::{ConfigError, ConfigResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagecast_core::{QueueEntry, Slideshow, SlideshowId, SlideshowSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of stored presets
pub const MAX_PRESETS: usize = 3;

/// A named slideshow queue with its playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideshowPreset {
    pub id: String,
    pub name: String,
    pub entries: Vec<QueueEntry>,
    pub settings: SlideshowSettings,
    pub updated_at: DateTime<Utc>,
}

impl SlideshowPreset {
    pub fn new(name: impl Into<String>, entries: Vec<QueueEntry>, settings: SlideshowSettings) -> Self {
        Self {
            id: SlideshowId::generate().to_string(),
            name: name.into(),
            entries,
            settings,
            updated_at: Utc::now(),
        }
    }

    /// Captures a slideshow, with its pending edits folded in
    ///
    /// The preset keeps the slideshow's id so saving again overwrites it.
    pub fn from_slideshow(name: impl Into<String>, show: &Slideshow) -> Self {
        let mut settled = show.clone();
        settled.apply_pending();
        Self {
            id: show.id.to_string(),
            name: name.into(),
            entries: settled.queue,
            settings: show.settings(),
            updated_at: Utc::now(),
        }
    }

    /// A slideshow ready to stage, positioned at the first entry
    pub fn to_slideshow(&self) -> Slideshow {
        Slideshow::new(
            SlideshowId::from(self.id.as_str()),
            self.entries.clone(),
            self.settings,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PresetFile {
    presets: Vec<SlideshowPreset>,
    active_preset_id: Option<String>,
}

/// Preset collection backed by a JSON file
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    file: PresetFile,
}

impl PresetStore {
    /// Opens the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let file = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&contents).map_err(|e| ConfigError::PresetFormat {
                path: path.clone(),
                source: e,
            })?
        } else {
            PresetFile::default()
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[SlideshowPreset] {
        &self.file.presets
    }

    pub fn len(&self) -> usize {
        self.file.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.presets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SlideshowPreset> {
        self.file.presets.iter().find(|p| p.id == id)
    }

    /// Name offered for a new preset
    pub fn default_name(&self) -> String {
        format!("Slideshow {}", self.file.presets.len() + 1)
    }

    /// Inserts or overwrites a preset
    ///
    /// A new preset when the store is full fails with `CapacityExceeded`
    /// and writes nothing.
    pub fn save(&mut self, mut preset: SlideshowPreset) -> ConfigResult<()> {
        let mut next = self.file.clone();
        preset.updated_at = Utc::now();
        match next.presets.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) => *existing = preset,
            None => {
                if next.presets.len() >= MAX_PRESETS {
                    return Err(ConfigError::CapacityExceeded { limit: MAX_PRESETS });
                }
                next.presets.push(preset);
            }
        }
        self.commit(next)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> ConfigResult<()> {
        let mut next = self.file.clone();
        let preset = next
            .presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ConfigError::PresetNotFound(id.to_string()))?;
        preset.name = name.trim().to_string();
        preset.updated_at = Utc::now();
        self.commit(next)
    }

    /// Removes a preset, un-selecting it if it was active
    pub fn delete(&mut self, id: &str) -> ConfigResult<SlideshowPreset> {
        let mut next = self.file.clone();
        let position = next
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ConfigError::PresetNotFound(id.to_string()))?;
        let removed = next.presets.remove(position);
        if next.active_preset_id.as_deref() == Some(id) {
            next.active_preset_id = None;
        }
        self.commit(next)?;
        Ok(removed)
    }

    pub fn set_active(&mut self, id: Option<&str>) -> ConfigResult<()> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(ConfigError::PresetNotFound(id.to_string()));
            }
        }
        let mut next = self.file.clone();
        next.active_preset_id = id.map(str::to_string);
        self.commit(next)
    }

    pub fn active(&self) -> Option<&SlideshowPreset> {
        self.file.active_preset_id.as_deref().and_then(|id| self.get(id))
    }

    /// Writes `next` to disk, adopting it only once the write succeeded
    fn commit(&mut self, next: PresetFile) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(&next).map_err(|e| ConfigError::PresetFormat {
            path: self.path.clone(),
            source: e,
        })?;
        write_atomic(&self.path, &json)?;
        self.file = next;
        log::debug!("Saved {} preset(s) to {}", self.file.presets.len(), self.path.display());
        Ok(())
    }
}
