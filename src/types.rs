use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// =============================================================================
// Hierarchy: Region → Business Entity → Project
// =============================================================================

/// Geographic region codes. The set is closed; fixtures naming any other
/// code fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionCode {
    Amr,
    Sco,
    Eur,
    Afr,
    Mea,
    Apac,
}

impl RegionCode {
    pub const ALL: [RegionCode; 6] = [
        RegionCode::Amr,
        RegionCode::Sco,
        RegionCode::Eur,
        RegionCode::Afr,
        RegionCode::Mea,
        RegionCode::Apac,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegionCode::Amr => "AMR",
            RegionCode::Sco => "SCO",
            RegionCode::Eur => "EUR",
            RegionCode::Afr => "AFR",
            RegionCode::Mea => "MEA",
            RegionCode::Apac => "APAC",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionCode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RegionCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::ParseError(format!("region code '{}'", s)))
    }
}

/// Project lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectPhase {
    #[serde(rename = "Pre Projects")]
    PreProjects,
    Initiating,
    Planning,
    Executing,
    Closing,
    Closed,
}

impl ProjectPhase {
    /// All phases in lifecycle order.
    pub const ALL: [ProjectPhase; 6] = [
        ProjectPhase::PreProjects,
        ProjectPhase::Initiating,
        ProjectPhase::Planning,
        ProjectPhase::Executing,
        ProjectPhase::Closing,
        ProjectPhase::Closed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectPhase::PreProjects => "Pre Projects",
            ProjectPhase::Initiating => "Initiating",
            ProjectPhase::Planning => "Planning",
            ProjectPhase::Executing => "Executing",
            ProjectPhase::Closing => "Closing",
            ProjectPhase::Closed => "Closed",
        }
    }

    /// Position in [`ProjectPhase::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectPhase {
    type Err = DashboardError;

    /// Accepts display labels ("Pre Projects") and their kebab form ("pre-projects").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', '_'], " ");
        ProjectPhase::ALL
            .into_iter()
            .find(|phase| phase.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| DashboardError::ParseError(format!("project phase '{}'", s)))
    }
}

/// `[longitude, latitude]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Coordinate { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

/// `[[west, south], [east, north]]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Coordinate; 2]", into = "[Coordinate; 2]")]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl From<[Coordinate; 2]> for Bounds {
    fn from([south_west, north_east]: [Coordinate; 2]) -> Self {
        Bounds {
            south_west,
            north_east,
        }
    }
}

impl From<Bounds> for [Coordinate; 2] {
    fn from(b: Bounds) -> Self {
        [b.south_west, b.north_east]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub code: RegionCode,
    pub name: String,
    pub center: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Count as reported by the source system; not derived from projects.
    pub active_projects: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessEntity {
    pub id: String,
    pub name: String,
    pub region: RegionCode,
    pub location: Coordinate,
    /// Count as reported by the source system; not derived from projects.
    pub active_projects: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub entity_id: String,
    pub title: String,
    pub phase: ProjectPhase,
    /// 0-100
    pub completion_pct: f64,
    /// USD millions
    pub afe_amount: f64,
    pub location: Coordinate,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub satellite_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ProjectDetails>,
}

/// Narrative and financial detail shown on the project screen.
/// Amounts are USD millions except `afe_total_usd`, which is whole dollars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afe_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afe_total_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

// =============================================================================
// Portfolio-level figures
// =============================================================================

/// Headline portfolio numbers. Amounts are USD millions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub projects: u32,
    #[serde(rename = "valueAFE")]
    pub value_afe: f64,
    pub afe_amount: f64,
    pub spent: f64,
    pub remaining: f64,
    pub spent_pct: f64,
}

/// Share of projects per schedule health bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    pub on_track: f64,
    pub recovered: f64,
    pub delayed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Everything the dashboard renders, as loaded from the fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub regions: Vec<Region>,
    pub entities: Vec<BusinessEntity>,
    pub projects: Vec<Project>,
    #[serde(default)]
    pub portfolio: PortfolioSummary,
    #[serde(default)]
    pub schedule_status: ScheduleStatus,
    #[serde(default)]
    pub afe_by_project: Vec<LabeledValue>,
    #[serde(default)]
    pub hopm_distribution: Vec<LabeledValue>,
}

// =============================================================================
// Configuration (~/.portview/config.json)
// =============================================================================

/// Configuration stored in ~/.portview/config.json. Every field is optional
/// on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    /// Portfolio JSON to load instead of the embedded fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default)]
    pub chart: ChartDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_timeout_secs: default_api_timeout_secs(),
            data_path: None,
            chart: ChartDefaults::default(),
        }
    }
}

pub const API_URL_ENV: &str = "PORTVIEW_API_URL";

fn default_api_base_url() -> String {
    "https://api.example.com".to_string()
}

fn default_api_timeout_secs() -> u64 {
    10
}

impl Config {
    /// `PORTVIEW_API_URL` wins over the configured base URL when set and non-empty.
    pub fn resolved_api_base_url(&self) -> String {
        self.resolve_api_base_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_base_url_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_base_url.clone())
    }
}

/// Default sizes for the chart primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDefaults {
    #[serde(default = "default_ring_size")]
    pub ring_size: f64,
    #[serde(default = "default_ring_stroke")]
    pub ring_stroke: f64,
    #[serde(default = "default_donut_size")]
    pub donut_size: f64,
    #[serde(default = "default_donut_stroke")]
    pub donut_stroke: f64,
    #[serde(default = "default_pie_size")]
    pub pie_size: f64,
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            ring_size: default_ring_size(),
            ring_stroke: default_ring_stroke(),
            donut_size: default_donut_size(),
            donut_stroke: default_donut_stroke(),
            pie_size: default_pie_size(),
            bar_width: default_bar_width(),
        }
    }
}

fn default_ring_size() -> f64 {
    54.0
}

fn default_ring_stroke() -> f64 {
    6.0
}

fn default_donut_size() -> f64 {
    180.0
}

fn default_donut_stroke() -> f64 {
    16.0
}

fn default_pie_size() -> f64 {
    120.0
}

fn default_bar_width() -> f64 {
    320.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_code_parse_case_insensitive() {
        assert_eq!("eur".parse::<RegionCode>().unwrap(), RegionCode::Eur);
        assert_eq!("APAC".parse::<RegionCode>().unwrap(), RegionCode::Apac);
        assert!("NAM".parse::<RegionCode>().is_err());
    }

    #[test]
    fn test_region_code_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RegionCode::Apac).unwrap(), "\"APAC\"");
    }

    #[test]
    fn test_phase_serde_uses_labels() {
        let phase: ProjectPhase = serde_json::from_str("\"Pre Projects\"").unwrap();
        assert_eq!(phase, ProjectPhase::PreProjects);
        assert!(serde_json::from_str::<ProjectPhase>("\"Cancelled\"").is_err());
    }

    #[test]
    fn test_phase_from_str_accepts_kebab() {
        assert_eq!(
            "pre-projects".parse::<ProjectPhase>().unwrap(),
            ProjectPhase::PreProjects
        );
        assert_eq!("closing".parse::<ProjectPhase>().unwrap(), ProjectPhase::Closing);
    }

    #[test]
    fn test_phase_index_matches_all_order() {
        for (i, phase) in ProjectPhase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
    }

    #[test]
    fn test_coordinate_wire_format() {
        let c: Coordinate = serde_json::from_str("[-77.1, -12.05]").unwrap();
        assert_eq!(c.lon, -77.1);
        assert_eq!(c.lat, -12.05);
        assert_eq!(serde_json::to_string(&c).unwrap(), "[-77.1,-12.05]");
    }

    #[test]
    fn test_config_defaults_from_empty_object() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_timeout_secs, 10);
        assert_eq!(config.chart.ring_size, 54.0);
        assert_eq!(config.chart.donut_stroke, 16.0);
    }

    #[test]
    fn test_api_base_url_env_override() {
        let config = Config::default();
        assert_eq!(
            config.resolve_api_base_url_with(Some("http://localhost:8080".into())),
            "http://localhost:8080"
        );
        assert_eq!(
            config.resolve_api_base_url_with(Some("  ".into())),
            "https://api.example.com"
        );
        assert_eq!(config.resolve_api_base_url_with(None), "https://api.example.com");
    }
}
