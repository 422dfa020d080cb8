use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::Scope;
use crate::preferences::{Preferences, SettingsPatch, UserPatch};
use crate::types::{Config, RegionCode};

/// Overrides `~/.portview` as the state directory.
pub const HOME_ENV: &str = "PORTVIEW_HOME";

// =============================================================================
// Application state
// =============================================================================

/// Top-level dashboard tabs. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    #[default]
    Overview,
    Map,
    Portfolio,
    Projects,
    User,
}

/// Segmented control on the portfolio tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortfolioView {
    #[default]
    Portfolio,
    Projects,
}

/// Which region / entity / project is focused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub region: Option<RegionCode>,
    pub entity_id: Option<String>,
    pub project_id: Option<String>,
}

impl Selection {
    /// Narrowest scope the selection pins down.
    pub fn scope(&self) -> Scope {
        match (&self.entity_id, self.region) {
            (Some(id), _) => Scope::Entity(id.clone()),
            (None, Some(code)) => Scope::Region(code),
            (None, None) => Scope::Global,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFlags {
    pub auth: bool,
    pub data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingKey {
    Auth,
    Data,
}

/// Everything the dashboard shell needs to draw a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub tab: Tab,
    pub portfolio_view: PortfolioView,
    pub selection: Selection,
    pub preferences: Preferences,
    pub loading: LoadingFlags,
}

impl AppState {
    /// Fresh state carrying previously saved preferences.
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(Tab),
    SelectPortfolioView(PortfolioView),
    /// Clears the entity and project selection.
    SelectRegion(Option<RegionCode>),
    /// Clears the project selection.
    SelectEntity(Option<String>),
    SelectProject(Option<String>),
    /// Drop the deepest active selection.
    Back,
    SetUser(UserPatch),
    Logout,
    UpdateSettings(SettingsPatch),
    SetLoading(LoadingKey, bool),
    Reset,
}

/// Apply `action` and return the next state. `state` is never modified.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::SelectTab(tab) => next.tab = tab,
        Action::SelectPortfolioView(view) => next.portfolio_view = view,
        Action::SelectRegion(code) => {
            next.selection = Selection {
                region: code,
                entity_id: None,
                project_id: None,
            };
        }
        Action::SelectEntity(id) => {
            next.selection.entity_id = id;
            next.selection.project_id = None;
        }
        Action::SelectProject(id) => next.selection.project_id = id,
        Action::Back => {
            let sel = &mut next.selection;
            if sel.project_id.is_some() {
                sel.project_id = None;
            } else if sel.entity_id.is_some() {
                sel.entity_id = None;
            } else {
                sel.region = None;
            }
        }
        Action::SetUser(patch) => patch.apply(&mut next.preferences.user),
        Action::Logout => next.preferences.user = Default::default(),
        Action::UpdateSettings(patch) => patch.apply(&mut next.preferences.settings),
        Action::SetLoading(key, value) => match key {
            LoadingKey::Auth => next.loading.auth = value,
            LoadingKey::Data => next.loading.data = value,
        },
        Action::Reset => next = AppState::default(),
    }
    next
}

// =============================================================================
// Config & state directory
// =============================================================================

/// Get the state directory (`$PORTVIEW_HOME` or `~/.portview`)
pub fn state_dir() -> Result<PathBuf, String> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".portview"))
}

/// Get the canonical config file path (<state dir>/config.json)
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.json")
}

/// Load configuration from `<dir>/config.json`. A missing file yields the
/// defaults.
pub fn load_config(dir: &Path) -> Result<Config, String> {
    let path = config_path(dir);
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;
    if !value.is_object() {
        return Err("Failed to parse config: expected object".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Write configuration to `<dir>/config.json`, creating the directory.
pub fn save_config(dir: &Path, config: &Config) -> Result<(), String> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
    }
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(config_path(dir), content).map_err(|e| format!("Failed to write config: {}", e))
}
