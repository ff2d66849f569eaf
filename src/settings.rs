//! Player preferences
//!
//! Persisted separately from scores in LocalStorage: who is playing, which
//! difficulty they last picked, and whether they have seen the intro.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Per-player preferences carried across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Prefs {
    /// Display name entered on the landing screen
    pub username: String,
    /// Last selected difficulty
    pub difficulty: Difficulty,
    /// Skip the landing screen on the next visit
    pub intro_seen: bool,
}

impl Prefs {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "planet_dash_prefs";

    pub fn new() -> Self {
        Self::default()
    }

    /// Set the username, trimming surrounding whitespace
    pub fn set_username(&mut self, name: &str) {
        self.username = name.trim().to_string();
    }

    /// Load preferences from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(prefs) = serde_json::from_str(&json) {
                    log::info!("Loaded preferences");
                    return prefs;
                }
            }
        }

        log::info!("Using default preferences");
        Self::default()
    }

    /// Save preferences to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Preferences saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Prefs::new();
        assert!(prefs.username.is_empty());
        assert_eq!(prefs.difficulty, Difficulty::Medium);
        assert!(!prefs.intro_seen);
    }

    #[test]
    fn test_username_is_trimmed() {
        let mut prefs = Prefs::new();
        prefs.set_username("  martin  ");
        assert_eq!(prefs.username, "martin");
    }

    #[test]
    fn test_json_round_trip() {
        let mut prefs = Prefs::new();
        prefs.set_username("ana");
        prefs.difficulty = Difficulty::Nightmare;
        prefs.intro_seen = true;
        let json = serde_json::to_string(&prefs).unwrap();
        let back: Prefs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
        // Difficulty serializes as the lowercase card name
        assert!(json.contains("\"nightmare\""));
    }
}
