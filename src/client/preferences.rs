//! Persisted client preferences.
//!
//! Stored as JSON in `~/.olasis_prefs.json`. A missing or unreadable file
//! yields the defaults; it is never an error.

use crate::error::{OlasisError, Result};
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn default_prefs_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".olasis_prefs.json"))
        .ok_or_else(|| OlasisError::Config("Cannot determine home directory".to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: Language,
    /// Last server the CLI talked to
    pub server: Option<String>,
}

pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_prefs_path()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            debug!(path = ?self.path, "Preference file not found");
            return Preferences::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = ?self.path, error = %e, "Failed to parse preferences");
                Preferences::default()
            }),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read preferences");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        std::fs::write(&self.path, serde_json::to_string_pretty(prefs)?)?;
        info!(path = ?self.path, language = %prefs.language, "Saved preferences");
        Ok(())
    }

    /// Update only the language, keeping other fields.
    pub fn set_language(&self, language: Language) -> Result<Preferences> {
        let prefs = Preferences {
            language,
            ..self.load()
        };
        self.save(&prefs)?;
        Ok(prefs)
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!(path = ?self.path, "Cleared preferences");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_missing_file_gives_defaults() {
        let store = PreferenceStore::with_path(PathBuf::from("/nonexistent/olasis/prefs.json"));
        assert_eq!(store.load(), Preferences::default());
        assert_eq!(store.load().language, Language::Es);
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = tempdir()?;
        let store = PreferenceStore::with_path(dir.path().join("prefs.json"));

        store.save(&Preferences {
            language: Language::Pt,
            server: Some("http://localhost:8080".to_string()),
        })?;
        let prefs = store.set_language(Language::En)?;
        assert_eq!(prefs.language, Language::En);
        assert_eq!(store.load(), prefs);
        assert_eq!(store.load().server.as_deref(), Some("http://localhost:8080"));

        store.clear()?;
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_gives_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{{not json")?;
        let store = PreferenceStore::with_path(file.path().to_path_buf());
        assert_eq!(store.load(), Preferences::default());
        Ok(())
    }
}
