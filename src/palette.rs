//! Colours for phases and charts. Every phase maps to exactly one style.

use serde::Serialize;

use crate::types::ProjectPhase;

pub const TEXT: &str = "#111827";
pub const HEADING: &str = "#1F2937";
pub const MUTED_TEXT: &str = "#6B7280";
pub const TRACK: &str = "#E5E7EB";
pub const CARD: &str = "#FFFFFF";
pub const PAGE: &str = "#F3F4F6";
pub const BAR: &str = "#2D2A6A";
pub const DONUT: &str = "#2D2A6A";
pub const RING: &str = "#4B4EFF";
pub const CHIP_SELECTED: &str = "#4F46E5";

pub const ON_TRACK: &str = "#10B981";
pub const RECOVERED: &str = "#F59E0B";
pub const DELAYED: &str = "#EF4444";

/// Rotating colours for ad-hoc series (HO PM distribution and the like).
pub const SERIES: [&str; 4] = ["#10B981", "#F59E0B", "#EF4444", "#8B5CF6"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStyle {
    pub label: &'static str,
    /// Foreground colour: badges, progress rings.
    pub accent: &'static str,
    /// Background of the phase count card.
    pub tint: &'static str,
}

pub fn phase_style(phase: ProjectPhase) -> PhaseStyle {
    let (accent, tint) = match phase {
        ProjectPhase::PreProjects => ("#6B7280", "#EEF2FF"),
        ProjectPhase::Initiating => ("#4F46E5", "#FEF3C7"),
        ProjectPhase::Planning => ("#F59E0B", "#FFE9B5"),
        ProjectPhase::Executing => ("#10B981", "#D1FAE5"),
        ProjectPhase::Closing => ("#EF4444", "#FEE2E2"),
        ProjectPhase::Closed => ("#4F46E5", "#E0E7FF"),
    };
    PhaseStyle {
        label: phase.label(),
        accent,
        tint,
    }
}

pub fn series_color(index: usize) -> &'static str {
    SERIES[index % SERIES.len()]
}
