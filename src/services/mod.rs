//! Screen assembly: turn catalog data plus app state into view models.

pub mod dashboard;
pub mod projects;
pub mod regions;
pub mod user;

use serde::Serialize;

use crate::aggregate::PhaseCounts;
use crate::catalog::Catalog;
use crate::error::DashboardError;
use crate::palette::phase_style;
use crate::state::{AppState, PortfolioView, Tab};
use crate::types::{ChartDefaults, ProjectPhase};

pub use dashboard::{OverviewScreen, PortfolioScreen, ProjectsScreen};
pub use projects::ProjectScreen;
pub use regions::RegionScreen;
pub use user::UserScreen;

/// A fully assembled screen, tagged by kind for JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
#[allow(clippy::large_enum_variant)]
pub enum Screen {
    Overview(OverviewScreen),
    Region(RegionScreen),
    Project(ProjectScreen),
    Portfolio(PortfolioScreen),
    Projects(ProjectsScreen),
    User(UserScreen),
}

/// Headline number card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub value: String,
    pub label: String,
    pub tint: String,
}

impl StatCard {
    pub fn new(value: impl Into<String>, label: impl Into<String>, tint: &str) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            tint: tint.to_string(),
        }
    }
}

/// Count card for one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCard {
    pub phase: ProjectPhase,
    pub label: String,
    pub count: u32,
    pub tint: String,
    pub accent: String,
}

pub fn phase_cards(counts: &PhaseCounts) -> Vec<PhaseCard> {
    counts
        .iter()
        .map(|(phase, count)| {
            let style = phase_style(phase);
            PhaseCard {
                phase,
                label: style.label.to_string(),
                count,
                tint: style.tint.to_string(),
                accent: style.accent.to_string(),
            }
        })
        .collect()
}

/// Pick the screen for the current tab and selection.
///
/// A selected project always wins; otherwise a selected region turns the
/// overview and map tabs into the region screen.
pub fn build_screen(
    catalog: &Catalog,
    chart: &ChartDefaults,
    state: &AppState,
) -> Result<Screen, DashboardError> {
    if let Some(project_id) = &state.selection.project_id {
        return projects::project_screen(catalog, chart, project_id).map(Screen::Project);
    }

    match state.tab {
        Tab::Overview | Tab::Map => match state.selection.region {
            Some(_) => regions::region_screen(catalog, chart, &state.selection).map(Screen::Region),
            None => dashboard::overview_screen(catalog).map(Screen::Overview),
        },
        Tab::Portfolio => match state.portfolio_view {
            PortfolioView::Portfolio => {
                dashboard::portfolio_screen(catalog, chart).map(Screen::Portfolio)
            }
            PortfolioView::Projects => Ok(Screen::Projects(dashboard::projects_screen(
                catalog, chart,
            ))),
        },
        Tab::Projects => Ok(Screen::Projects(dashboard::projects_screen(catalog, chart))),
        Tab::User => Ok(Screen::User(user::user_screen(&state.preferences))),
    }
}
