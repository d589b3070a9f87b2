//! Game settings and preferences
//!
//! Persisted separately from level records.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_or_default, save_json};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Global mute, remembered across sessions
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Controls ===
    /// Show on-screen touch buttons
    pub touch_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            touch_controls: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pollo_loco_settings";

    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Flip the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_mute_persists() {
        let mut store = MemoryStore::default();
        let mut settings = Settings::load(&store);
        assert!(!settings.muted);
        assert!(settings.toggle_mute());
        settings.save(&mut store).unwrap();
        assert!(Settings::load(&store).muted);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let mut store = MemoryStore::default();
        store.set(Settings::STORAGE_KEY, r#"{"muted":true}"#).unwrap();
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }
}
