use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::io::recovery::atomic_write;
use crate::model::locale::Language;

/// Persisted user preferences (written to .prefs.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub language: Option<Language>,
    /// Favorite item IDs, in the order they were added
    #[serde(default)]
    pub favorites: IndexSet<String>,
}

/// Preferences loaded once at startup and saved after every change
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferenceStore {
    /// Load from `market_dir`. A missing or unreadable file yields defaults.
    pub fn load(market_dir: &Path) -> Self {
        let path = market_dir.join(".prefs.json");
        let prefs = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt preferences");
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        };
        PreferenceStore { path, prefs }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    /// The chosen language, or `fallback` if none was chosen yet
    pub fn language_or(&self, fallback: Language) -> Language {
        self.prefs.language.unwrap_or(fallback)
    }

    pub fn set_language(&mut self, lang: Language) -> std::io::Result<()> {
        if self.prefs.language == Some(lang) {
            return Ok(());
        }
        self.prefs.language = Some(lang);
        self.save()
    }

    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.prefs.favorites.contains(item_id)
    }

    /// Add or remove a favorite. Returns true if the item is now a favorite.
    pub fn toggle_favorite(&mut self, item_id: &str) -> std::io::Result<bool> {
        let now_favorite = if self.prefs.favorites.shift_remove(item_id) {
            false
        } else {
            self.prefs.favorites.insert(item_id.to_string());
            true
        };
        self.save()?;
        Ok(now_favorite)
    }

    fn save(&self) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(&self.prefs)?;
        atomic_write(&self.path, content.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
