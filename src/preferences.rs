//! Persisted user identity and UI settings.
//!
//! Stored in a small key-value JSON file (`~/.portview/storage.json`). The
//! dashboard owns a single key, `app-store`, whose value wraps the persisted
//! slice of app state together with a schema version:
//!
//! ```json
//! { "app-store": { "state": { "user": {..}, "settings": {..} }, "version": 0 } }
//! ```
//!
//! Loading flags are runtime-only and never written.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Key the dashboard's blob lives under.
pub const STORE_KEY: &str = "app-store";
pub const STORE_VERSION: u32 = 0;
const STORAGE_FILE: &str = "storage.json";

// =============================================================================
// Persisted shape
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: default_language(),
            notifications: default_notifications(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_notifications() -> bool {
    true
}

/// The persisted slice of app state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub user: UserProfile,
    #[serde(default)]
    pub settings: Settings,
}

/// Partial user update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_authenticated: Option<bool>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut UserProfile) {
        if let Some(id) = &self.id {
            user.id = Some(id.clone());
        }
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(flag) = self.is_authenticated {
            user.is_authenticated = flag;
        }
    }
}

/// Partial settings update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub notifications: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }
        if let Some(flag) = self.notifications {
            settings.notifications = flag;
        }
    }
}

// =============================================================================
// Key-value file
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct VersionedBlob {
    state: Preferences,
    #[serde(default)]
    version: u32,
}

/// String-keyed JSON values persisted as a single file. Writes go through
/// a temp file and rename so a crash never leaves a half-written store.
#[derive(Debug, Clone)]
pub struct KvFile {
    path: PathBuf,
}

impl KvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, serde_json::Value>, DashboardError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DashboardError::StorageError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            DashboardError::StorageError(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<(), DashboardError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    DashboardError::StorageError(format!("Failed to create storage dir: {}", e))
                })?;
            }
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| DashboardError::StorageError(format!("Serialize error: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| DashboardError::StorageError(format!("Write error: {}", e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| DashboardError::StorageError(format!("Rename error: {}", e)))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DashboardError> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: serde_json::Value) -> Result<(), DashboardError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<bool, DashboardError> {
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }
}

// =============================================================================
// Preference store
// =============================================================================

/// Reads and writes [`Preferences`] under [`STORE_KEY`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    kv: KvFile,
}

impl PreferenceStore {
    /// Store backed by `<dir>/storage.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            kv: KvFile::new(dir.join(STORAGE_FILE)),
        }
    }

    pub fn path(&self) -> &Path {
        self.kv.path()
    }

    /// Saved preferences, or defaults when nothing has been stored.
    ///
    /// A blob written by a different schema version is ignored with a warning
    /// rather than half-applied.
    pub fn load(&self) -> Result<Preferences, DashboardError> {
        let Some(raw) = self.kv.get(STORE_KEY)? else {
            return Ok(Preferences::default());
        };
        let blob: VersionedBlob = serde_json::from_value(raw).map_err(|e| {
            DashboardError::StorageError(format!("Failed to parse '{}': {}", STORE_KEY, e))
        })?;
        if blob.version != STORE_VERSION {
            log::warn!(
                "Ignoring stored preferences with version {} (expected {})",
                blob.version,
                STORE_VERSION
            );
            return Ok(Preferences::default());
        }
        Ok(blob.state)
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), DashboardError> {
        let blob = VersionedBlob {
            state: prefs.clone(),
            version: STORE_VERSION,
        };
        let value = serde_json::to_value(&blob)
            .map_err(|e| DashboardError::StorageError(format!("Serialize error: {}", e)))?;
        self.kv.set(STORE_KEY, value)?;
        log::debug!("Saved preferences to {}", self.kv.path().display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), DashboardError> {
        self.kv.remove(STORE_KEY).map(|_| ())
    }
}
