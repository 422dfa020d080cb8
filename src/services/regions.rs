// Regions service
// Region screen: entity chips, map markers, scoped phase counts, project cards.

use serde::Serialize;

use super::{phase_cards, projects::project_card, projects::ProjectCard, PhaseCard};
use crate::aggregate::{self, PhaseCounts, Scope};
use crate::catalog::Catalog;
use crate::error::{DashboardError, EntityKind};
use crate::state::Selection;
use crate::types::{ChartDefaults, Coordinate, RegionCode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityChip {
    pub id: String,
    pub name: String,
    pub reported_projects: u32,
    pub project_count: u32,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: String,
    pub coordinate: Coordinate,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionScreen {
    pub code: RegionCode,
    pub name: String,
    pub center: Coordinate,
    pub scope: Scope,
    pub entities: Vec<EntityChip>,
    pub markers: Vec<MapMarker>,
    pub phase_counts: PhaseCounts,
    pub phase_cards: Vec<PhaseCard>,
    pub section_title: String,
    pub projects: Vec<ProjectCard>,
}

/// Region screen for `selection.region`, narrowed to `selection.entity_id`
/// when set. The entity must belong to the region.
pub fn region_screen(
    catalog: &Catalog,
    chart: &ChartDefaults,
    selection: &Selection,
) -> Result<RegionScreen, DashboardError> {
    let code = selection.region.ok_or_else(|| {
        DashboardError::ConfigurationError("region screen needs a selected region".to_string())
    })?;
    let region = catalog.region(code)?;

    let section_title = match &selection.entity_id {
        Some(id) => {
            let entity = catalog.entity(id)?;
            if entity.region != code {
                log::warn!("Entity {} is in {}, not {}", id, entity.region, code);
                return Err(DashboardError::not_found(
                    EntityKind::BusinessEntity,
                    format!("{} in {}", id, code),
                ));
            }
            entity.name.clone()
        }
        None => "Projects".to_string(),
    };

    let scope = selection.scope();
    let projects = aggregate::projects_in_scope(catalog, &scope)?;
    let phase_counts = aggregate::count_phases(projects.iter().copied());

    let entities_in_region = catalog.entities_in(code);
    let entities = entities_in_region
        .iter()
        .map(|e| EntityChip {
            id: e.id.clone(),
            name: e.name.clone(),
            reported_projects: e.active_projects,
            project_count: catalog.projects_for_entity(&e.id).len() as u32,
            selected: selection.entity_id.as_deref() == Some(e.id.as_str()),
        })
        .collect();
    let markers = entities_in_region
        .iter()
        .map(|e| MapMarker {
            id: e.id.clone(),
            coordinate: e.location,
            count: e.active_projects,
        })
        .collect();

    let projects = projects
        .into_iter()
        .map(|p| project_card(p, chart))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RegionScreen {
        code,
        name: region.name.clone(),
        center: region.center,
        scope,
        entities,
        markers,
        phase_counts,
        phase_cards: phase_cards(&phase_counts),
        section_title,
        projects,
    })
}
