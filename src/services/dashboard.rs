// Dashboard service
// Overview, portfolio and projects tabs.

use serde::Serialize;

use super::{phase_cards, PhaseCard, StatCard};
use crate::aggregate::{self, PhaseCounts, Scope};
use crate::catalog::Catalog;
use crate::error::DashboardError;
use crate::format::{format_millions, format_number, format_percent};
use crate::geometry::{BarLayout, BarStyle, PieEntry, PieLayout, RingGeometry};
use crate::palette;
use crate::types::{ChartDefaults, LabeledValue, RegionCode};

/// Projects shown on the AFE bar chart.
const MAX_PROJECT_BARS: usize = 8;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionChip {
    pub code: RegionCode,
    pub name: String,
    pub reported_projects: u32,
    pub project_count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewScreen {
    pub regions: Vec<RegionChip>,
    pub total_projects: u32,
    pub phase_counts: PhaseCounts,
    pub phase_cards: Vec<PhaseCard>,
    pub stats: Vec<StatCard>,
}

pub fn overview_screen(catalog: &Catalog) -> Result<OverviewScreen, DashboardError> {
    let summary = aggregate::summarize(catalog, &Scope::Global)?;
    let regions = aggregate::rollup(catalog)
        .into_iter()
        .map(|r| RegionChip {
            code: r.code,
            name: r.name,
            reported_projects: r.reported_projects,
            project_count: r.project_count,
        })
        .collect();

    for gap in aggregate::count_discrepancies(catalog) {
        log::warn!(
            "Reported project count differs from data for {:?}: reported {}, found {}",
            gap.scope,
            gap.reported,
            gap.derived
        );
    }

    let portfolio = catalog.portfolio();
    Ok(OverviewScreen {
        regions,
        total_projects: summary.project_count,
        phase_counts: summary.phase_counts,
        phase_cards: phase_cards(&summary.phase_counts),
        stats: vec![
            StatCard::new(portfolio.projects.to_string(), "Portfolio Projects", "#EEF2FF"),
            StatCard::new(
                format_millions(portfolio.value_afe),
                "Portfolio Value AFE",
                "#D1FAE5",
            ),
        ],
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioScreen {
    pub stats: Vec<StatCard>,
    pub spent_label: String,
    pub spent_donut: RingGeometry,
    pub spent_breakdown: Vec<StatCard>,
    pub schedule: PieLayout,
    /// `None` when the distribution is empty or all zero.
    pub hopm: Option<PieLayout>,
}

pub fn portfolio_screen(
    catalog: &Catalog,
    chart: &ChartDefaults,
) -> Result<PortfolioScreen, DashboardError> {
    let portfolio = catalog.portfolio();
    let spent_donut = RingGeometry::new(chart.donut_size, chart.donut_stroke, portfolio.spent_pct)?;

    let status = catalog.schedule_status();
    let schedule = PieLayout::new(
        &[
            PieEntry::new("On Track", status.on_track, palette::ON_TRACK),
            PieEntry::new("Recovered", status.recovered, palette::RECOVERED),
            PieEntry::new("Delayed", status.delayed, palette::DELAYED),
        ],
        chart.pie_size,
    )?;

    let hopm_entries: Vec<PieEntry> = catalog
        .hopm_distribution()
        .iter()
        .enumerate()
        .map(|(i, item)| PieEntry::new(item.label.clone(), item.value, palette::series_color(i)))
        .collect();
    let hopm = match PieLayout::new(&hopm_entries, chart.pie_size) {
        Ok(layout) => Some(layout),
        Err(e) => {
            log::debug!("Skipping HO PM distribution: {}", e);
            None
        }
    };

    Ok(PortfolioScreen {
        stats: vec![
            StatCard::new(portfolio.projects.to_string(), "Projects", "#EEF2FF"),
            StatCard::new(format_millions(portfolio.value_afe), "Value AFE", "#FEF3C7"),
        ],
        spent_label: format_percent(spent_donut.percent),
        spent_donut,
        spent_breakdown: vec![
            StatCard::new(format_millions(portfolio.afe_amount), "AFE Amount", "#EEF2FF"),
            StatCard::new(format_millions(portfolio.spent), "Spent", "#FEE2E2"),
            StatCard::new(format_millions(portfolio.remaining), "Remaining", "#D1FAE5"),
        ],
        schedule,
        hopm,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsScreen {
    /// AFE per project from the project list (first eight).
    pub project_afe: BarLayout,
    /// AFE per project as reported for the whole portfolio.
    pub afe_by_project: BarLayout,
    pub value_labels: Vec<String>,
}

pub fn projects_screen(catalog: &Catalog, chart: &ChartDefaults) -> ProjectsScreen {
    let style = BarStyle::with_width(chart.bar_width);
    let project_items: Vec<LabeledValue> = catalog
        .projects()
        .iter()
        .take(MAX_PROJECT_BARS)
        .map(|p| LabeledValue::new(p.title.clone(), p.afe_amount))
        .collect();

    ProjectsScreen {
        project_afe: BarLayout::new(&project_items, style),
        afe_by_project: BarLayout::new(catalog.afe_by_project(), style),
        value_labels: catalog
            .afe_by_project()
            .iter()
            .map(|i| format_number(i.value))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectPhase;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    #[test]
    fn test_overview_counts_and_stats() {
        let screen = overview_screen(&catalog()).unwrap();
        assert_eq!(screen.regions.len(), 6);
        assert_eq!(screen.total_projects, 2);
        assert_eq!(screen.phase_counts.get(ProjectPhase::PreProjects), 1);
        assert_eq!(screen.phase_cards.len(), 6);
        assert_eq!(screen.stats[1].value, "$5,489.5M");

        let amr = screen.regions.iter().find(|r| r.code == RegionCode::Amr).unwrap();
        assert_eq!(amr.reported_projects, 21);
        assert_eq!(amr.project_count, 2);
    }

    #[test]
    fn test_portfolio_donut_and_schedule() {
        let screen = portfolio_screen(&catalog(), &ChartDefaults::default()).unwrap();
        assert_eq!(screen.spent_label, "45%");
        assert_eq!(screen.spent_donut.radius, 82.0);
        let starts: Vec<f64> = screen.schedule.slices.iter().map(|s| s.start_angle).collect();
        assert!((starts[1] - 180.0).abs() < 1e-9);
        assert!((starts[2] - 216.0).abs() < 1e-9);
        assert_eq!(screen.hopm.as_ref().unwrap().slices.len(), 4);
    }

    #[test]
    fn test_portfolio_rejects_degenerate_chart_config() {
        let chart = ChartDefaults {
            donut_size: 10.0,
            donut_stroke: 16.0,
            ..ChartDefaults::default()
        };
        assert!(matches!(
            portfolio_screen(&catalog(), &chart),
            Err(DashboardError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_projects_screen_bars() {
        let screen = projects_screen(&catalog(), &ChartDefaults::default());
        assert_eq!(screen.project_afe.bars.len(), 2);
        assert_eq!(screen.project_afe.bars[0].length, 280.0);
        assert_eq!(screen.afe_by_project.bars.len(), 8);
        assert_eq!(screen.afe_by_project.max, 5829.0);
        assert_eq!(screen.value_labels[0], "5,829");
    }
}
