//! Phase counts and AFE rollups over the region → entity → project tree.
//!
//! Counts are always derived from the projects in scope. The per-region and
//! per-entity `active_projects` figures in the data are reported numbers and
//! are only compared against, never trusted.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::catalog::Catalog;
use crate::error::DashboardError;
use crate::types::{Project, ProjectPhase, RegionCode};

/// Which slice of the hierarchy an aggregate covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "id", rename_all = "camelCase")]
pub enum Scope {
    Global,
    Region(RegionCode),
    Entity(String),
}

/// Project count per phase. Every phase is present; absent phases count 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    counts: [u32; 6],
}

impl PhaseCounts {
    pub fn get(&self, phase: ProjectPhase) -> u32 {
        self.counts[phase.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(phase, count)` in lifecycle order.
    pub fn iter(&self) -> impl Iterator<Item = (ProjectPhase, u32)> + '_ {
        ProjectPhase::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    fn record(&mut self, phase: ProjectPhase) {
        self.counts[phase.index()] += 1;
    }
}

impl Serialize for PhaseCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ProjectPhase::ALL.len()))?;
        for (phase, count) in self.iter() {
            map.serialize_entry(phase.label(), &count)?;
        }
        map.end()
    }
}

pub fn count_phases<'a>(projects: impl IntoIterator<Item = &'a Project>) -> PhaseCounts {
    let mut counts = PhaseCounts::default();
    for project in projects {
        counts.record(project.phase);
    }
    counts
}

/// Projects covered by `scope`, in fixture order.
pub fn projects_in_scope<'a>(
    catalog: &'a Catalog,
    scope: &Scope,
) -> Result<Vec<&'a Project>, DashboardError> {
    match scope {
        Scope::Global => Ok(catalog.projects().iter().collect()),
        Scope::Region(code) => {
            catalog.region(*code)?;
            Ok(catalog.projects_in_region(*code))
        }
        Scope::Entity(id) => {
            catalog.entity(id)?;
            Ok(catalog.projects_for_entity(id))
        }
    }
}

pub fn phase_counts(catalog: &Catalog, scope: &Scope) -> Result<PhaseCounts, DashboardError> {
    Ok(count_phases(projects_in_scope(catalog, scope)?))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSummary {
    pub scope: Scope,
    pub project_count: u32,
    pub phase_counts: PhaseCounts,
    /// USD millions
    pub afe_total: f64,
    /// Mean completion, `None` when the scope has no projects.
    pub average_completion: Option<f64>,
}

pub fn summarize(catalog: &Catalog, scope: &Scope) -> Result<ScopeSummary, DashboardError> {
    let projects = projects_in_scope(catalog, scope)?;
    Ok(summarize_projects(scope.clone(), &projects))
}

fn summarize_projects(scope: Scope, projects: &[&Project]) -> ScopeSummary {
    let afe_total = projects.iter().map(|p| p.afe_amount).sum();
    let average_completion = if projects.is_empty() {
        None
    } else {
        let sum: f64 = projects.iter().map(|p| p.completion_pct).sum();
        Some(sum / projects.len() as f64)
    };
    ScopeSummary {
        scope,
        project_count: projects.len() as u32,
        phase_counts: count_phases(projects.iter().copied()),
        afe_total,
        average_completion,
    }
}

// =============================================================================
// Hierarchy rollup
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRollup {
    pub id: String,
    pub name: String,
    pub reported_projects: u32,
    pub project_count: u32,
    pub afe_total: f64,
    pub phase_counts: PhaseCounts,
    pub project_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRollup {
    pub code: RegionCode,
    pub name: String,
    pub reported_projects: u32,
    pub project_count: u32,
    pub afe_total: f64,
    pub phase_counts: PhaseCounts,
    pub entities: Vec<EntityRollup>,
}

/// Region → entity → project tree with derived counts and AFE sums.
pub fn rollup(catalog: &Catalog) -> Vec<RegionRollup> {
    catalog
        .regions()
        .iter()
        .map(|region| {
            let entities: Vec<EntityRollup> = catalog
                .entities_in(region.code)
                .into_iter()
                .map(|entity| {
                    let projects = catalog.projects_for_entity(&entity.id);
                    EntityRollup {
                        id: entity.id.clone(),
                        name: entity.name.clone(),
                        reported_projects: entity.active_projects,
                        project_count: projects.len() as u32,
                        afe_total: projects.iter().map(|p| p.afe_amount).sum(),
                        phase_counts: count_phases(projects.iter().copied()),
                        project_ids: projects.iter().map(|p| p.id.clone()).collect(),
                    }
                })
                .collect();

            let mut phase_counts = PhaseCounts::default();
            for entity in &entities {
                for (i, count) in entity.phase_counts.counts.iter().enumerate() {
                    phase_counts.counts[i] += count;
                }
            }

            RegionRollup {
                code: region.code,
                name: region.name.clone(),
                reported_projects: region.active_projects,
                project_count: entities.iter().map(|e| e.project_count).sum(),
                afe_total: entities.iter().map(|e| e.afe_total).sum(),
                phase_counts,
                entities,
            }
        })
        .collect()
}

/// A reported active-project count that disagrees with the projects present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountDiscrepancy {
    pub scope: Scope,
    pub reported: u32,
    pub derived: u32,
}

pub fn count_discrepancies(catalog: &Catalog) -> Vec<CountDiscrepancy> {
    let mut found = Vec::new();
    for region in rollup(catalog) {
        if region.reported_projects != region.project_count {
            found.push(CountDiscrepancy {
                scope: Scope::Region(region.code),
                reported: region.reported_projects,
                derived: region.project_count,
            });
        }
        for entity in region.entities {
            if entity.reported_projects != entity.project_count {
                found.push(CountDiscrepancy {
                    scope: Scope::Entity(entity.id),
                    reported: entity.reported_projects,
                    derived: entity.project_count,
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    #[test]
    fn test_zero_phases_are_present() {
        let counts = phase_counts(&catalog(), &Scope::Entity("callao".into())).unwrap();
        assert_eq!(counts.get(ProjectPhase::PreProjects), 1);
        assert_eq!(counts.get(ProjectPhase::Closed), 0);
        assert_eq!(counts.iter().count(), 6);

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["Closed"], 0);
        assert_eq!(json["Pre Projects"], 1);
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_empty_scope_counts_zero() {
        let counts = phase_counts(&catalog(), &Scope::Region(RegionCode::Eur)).unwrap();
        assert_eq!(counts.total(), 0);
        for (_, count) in counts.iter() {
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_scope_widening() {
        let c = catalog();
        let entity = phase_counts(&c, &Scope::Entity("santos".into())).unwrap();
        let region = phase_counts(&c, &Scope::Region(RegionCode::Amr)).unwrap();
        let global = phase_counts(&c, &Scope::Global).unwrap();
        assert_eq!(entity.total(), 1);
        assert_eq!(region.total(), 2);
        assert_eq!(global.total(), c.projects().len() as u32);
        assert_eq!(region.get(ProjectPhase::Planning), 1);
    }

    #[test]
    fn test_unknown_scope_is_not_found() {
        assert!(matches!(
            phase_counts(&catalog(), &Scope::Entity("ghost".into())),
            Err(DashboardError::NotFound { .. })
        ));
    }

    #[test]
    fn test_summary_afe_and_completion() {
        let summary = summarize(&catalog(), &Scope::Region(RegionCode::Amr)).unwrap();
        assert_eq!(summary.project_count, 2);
        assert!((summary.afe_total - 1482.65).abs() < 1e-9);
        assert_eq!(summary.average_completion, Some(57.5));

        let empty = summarize(&catalog(), &Scope::Region(RegionCode::Eur)).unwrap();
        assert_eq!(empty.average_completion, None);
        assert_eq!(empty.afe_total, 0.0);
    }

    #[test]
    fn test_rollup_tree_sums_children() {
        let tree = rollup(&catalog());
        let amr = tree.iter().find(|r| r.code == RegionCode::Amr).unwrap();
        assert_eq!(amr.entities.len(), 3);
        assert_eq!(amr.project_count, 2);
        assert_eq!(amr.phase_counts.total(), 2);
        let entity_sum: f64 = amr.entities.iter().map(|e| e.afe_total).sum();
        assert_eq!(amr.afe_total, entity_sum);
        let callao = &amr.entities[0];
        assert_eq!(callao.project_ids, vec!["sndkr".to_string()]);
    }

    #[test]
    fn test_discrepancies_reported_not_reconciled() {
        let c = catalog();
        let found = count_discrepancies(&c);
        assert!(found.contains(&CountDiscrepancy {
            scope: Scope::Entity("callao".into()),
            reported: 4,
            derived: 1,
        }));
        assert_eq!(c.entity("callao").unwrap().active_projects, 4);
    }
}
