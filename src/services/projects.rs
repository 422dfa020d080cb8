// Projects service
// Project cards for lists and the project detail screen.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::DashboardError;
use crate::format::{format_dollars_as_millions, format_millions, format_percent};
use crate::geometry::RingGeometry;
use crate::palette::{phase_style, PhaseStyle};
use crate::types::{ChartDefaults, Coordinate, Project, ProjectPhase, RegionCode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub phase: ProjectPhase,
    pub accent: String,
    pub afe_label: String,
    pub completion_label: String,
    pub ring: RingGeometry,
}

pub fn project_card(project: &Project, chart: &ChartDefaults) -> Result<ProjectCard, DashboardError> {
    let ring = RingGeometry::new(chart.ring_size, chart.ring_stroke, project.completion_pct)?;
    Ok(ProjectCard {
        id: project.id.clone(),
        title: project.title.clone(),
        phase: project.phase,
        accent: phase_style(project.phase).accent.to_string(),
        afe_label: format_millions(project.afe_amount),
        completion_label: format_percent(ring.percent),
        ring,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScreen {
    pub id: String,
    pub title: String,
    pub phase: PhaseStyle,
    pub region: RegionCode,
    pub entity_id: String,
    pub entity_name: String,
    pub location: Coordinate,
    pub completion_label: String,
    pub completion: RingGeometry,
    pub afe_label: String,
    pub description: Option<String>,
    pub details: Vec<DetailRow>,
    pub images: Vec<String>,
    pub satellite_images: Vec<String>,
    pub video: Option<String>,
}

/// Get full detail for a project by ID.
pub fn project_screen(
    catalog: &Catalog,
    chart: &ChartDefaults,
    project_id: &str,
) -> Result<ProjectScreen, DashboardError> {
    let project = catalog.project(project_id)?;
    let entity = catalog.entity(&project.entity_id)?;
    let completion = RingGeometry::new(chart.donut_size, chart.donut_stroke, project.completion_pct)?;

    Ok(ProjectScreen {
        id: project.id.clone(),
        title: project.title.clone(),
        phase: phase_style(project.phase),
        region: entity.region,
        entity_id: entity.id.clone(),
        entity_name: entity.name.clone(),
        location: project.location,
        completion_label: format_percent(completion.percent),
        completion,
        afe_label: format_millions(project.afe_amount),
        description: project.details.as_ref().and_then(|d| d.description.clone()),
        details: detail_rows(project),
        images: project.images.clone(),
        satellite_images: project.satellite_images.clone(),
        video: project.video.clone(),
    })
}

/// Label/value rows for the fields a project actually carries.
fn detail_rows(project: &Project) -> Vec<DetailRow> {
    let Some(details) = &project.details else {
        return Vec::new();
    };

    let text_fields = [
        ("Project Manager", &details.project_manager),
        ("Section", &details.section),
        ("Project Class", &details.project_class),
        ("AFE Code", &details.afe_code),
    ];
    let money_fields = [
        ("Committed", details.committed),
        ("Actual", details.actual),
        ("Spent", details.spent),
    ];

    let mut rows: Vec<DetailRow> = text_fields
        .into_iter()
        .filter_map(|(label, value)| {
            value.as_ref().map(|v| DetailRow {
                label: label.to_string(),
                value: v.clone(),
            })
        })
        .collect();
    if let Some(total) = details.afe_total_usd {
        rows.push(DetailRow {
            label: "AFE Total".to_string(),
            value: format_dollars_as_millions(total),
        });
    }
    rows.extend(money_fields.into_iter().filter_map(|(label, value)| {
        value.map(|v| DetailRow {
            label: label.to_string(),
            value: format_millions(v),
        })
    }));
    if let Some(updated) = &details.last_update {
        rows.push(DetailRow {
            label: "Last Update".to_string(),
            value: updated.clone(),
        });
    }
    rows
}
