//! Validated, indexed view over a portfolio [`Dataset`].
//!
//! A `Catalog` is built once at startup and never mutated. Building it checks
//! referential integrity (entity → region, project → entity), id uniqueness
//! and value ranges, so lookups downstream only fail for ids that genuinely
//! are not in the data.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{DashboardError, EntityKind};
use crate::types::{
    BusinessEntity, Dataset, LabeledValue, PortfolioSummary, Project, Region, RegionCode,
    ScheduleStatus,
};

#[derive(Debug, Clone)]
pub struct Catalog {
    dataset: Dataset,
    region_index: HashMap<RegionCode, usize>,
    entity_index: HashMap<String, usize>,
    project_index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate and index a dataset.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, DashboardError> {
        let mut region_index = HashMap::new();
        for (i, region) in dataset.regions.iter().enumerate() {
            if region_index.insert(region.code, i).is_some() {
                return Err(DashboardError::InvalidData(format!(
                    "duplicate region code {}",
                    region.code
                )));
            }
        }

        let mut entity_index = HashMap::new();
        for (i, entity) in dataset.entities.iter().enumerate() {
            if !region_index.contains_key(&entity.region) {
                return Err(DashboardError::InvalidData(format!(
                    "entity '{}' references unknown region {}",
                    entity.id, entity.region
                )));
            }
            if entity_index.insert(entity.id.clone(), i).is_some() {
                return Err(DashboardError::InvalidData(format!(
                    "duplicate entity id '{}'",
                    entity.id
                )));
            }
        }

        let mut project_index = HashMap::new();
        for (i, project) in dataset.projects.iter().enumerate() {
            if !entity_index.contains_key(&project.entity_id) {
                return Err(DashboardError::InvalidData(format!(
                    "project '{}' references unknown entity '{}'",
                    project.id, project.entity_id
                )));
            }
            if !(0.0..=100.0).contains(&project.completion_pct) {
                return Err(DashboardError::InvalidData(format!(
                    "project '{}' completion {} outside 0-100",
                    project.id, project.completion_pct
                )));
            }
            if !project.afe_amount.is_finite() || project.afe_amount < 0.0 {
                return Err(DashboardError::InvalidData(format!(
                    "project '{}' has invalid AFE amount {}",
                    project.id, project.afe_amount
                )));
            }
            if project_index.insert(project.id.clone(), i).is_some() {
                return Err(DashboardError::InvalidData(format!(
                    "duplicate project id '{}'",
                    project.id
                )));
            }
        }

        log::debug!(
            "Catalog indexed: {} regions, {} entities, {} projects",
            region_index.len(),
            entity_index.len(),
            project_index.len()
        );

        Ok(Self {
            dataset,
            region_index,
            entity_index,
            project_index,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let dataset: Dataset = serde_json::from_str(json)
            .map_err(|e| DashboardError::ParseError(format!("portfolio data: {}", e)))?;
        Self::from_dataset(dataset)
    }

    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, DashboardError> {
        Self::from_json(crate::fixtures::default_dataset())
    }

    /// Load from `path` when given, otherwise fall back to the embedded fixture.
    pub fn load(path: Option<&Path>) -> Result<Self, DashboardError> {
        match path {
            Some(path) => {
                log::info!("Loading portfolio data from {}", path.display());
                let content = fs::read_to_string(path).map_err(|e| {
                    DashboardError::IoError(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_json(&content)
            }
            None => Self::embedded(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn regions(&self) -> &[Region] {
        &self.dataset.regions
    }

    pub fn entities(&self) -> &[BusinessEntity] {
        &self.dataset.entities
    }

    pub fn projects(&self) -> &[Project] {
        &self.dataset.projects
    }

    pub fn portfolio(&self) -> &PortfolioSummary {
        &self.dataset.portfolio
    }

    pub fn schedule_status(&self) -> &ScheduleStatus {
        &self.dataset.schedule_status
    }

    pub fn afe_by_project(&self) -> &[LabeledValue] {
        &self.dataset.afe_by_project
    }

    pub fn hopm_distribution(&self) -> &[LabeledValue] {
        &self.dataset.hopm_distribution
    }

    pub fn region(&self, code: RegionCode) -> Result<&Region, DashboardError> {
        self.region_index
            .get(&code)
            .map(|&i| &self.dataset.regions[i])
            .ok_or_else(|| DashboardError::not_found(EntityKind::Region, code.as_str()))
    }

    pub fn entity(&self, id: &str) -> Result<&BusinessEntity, DashboardError> {
        self.entity_index
            .get(id)
            .map(|&i| &self.dataset.entities[i])
            .ok_or_else(|| DashboardError::not_found(EntityKind::BusinessEntity, id))
    }

    pub fn project(&self, id: &str) -> Result<&Project, DashboardError> {
        self.project_index
            .get(id)
            .map(|&i| &self.dataset.projects[i])
            .ok_or_else(|| DashboardError::not_found(EntityKind::Project, id))
    }

    /// Entities of a region, in fixture order.
    pub fn entities_in(&self, code: RegionCode) -> Vec<&BusinessEntity> {
        self.dataset
            .entities
            .iter()
            .filter(|e| e.region == code)
            .collect()
    }

    /// Projects of an entity, in fixture order.
    pub fn projects_for_entity(&self, entity_id: &str) -> Vec<&Project> {
        self.dataset
            .projects
            .iter()
            .filter(|p| p.entity_id == entity_id)
            .collect()
    }

    /// Projects of every entity in a region, in fixture order.
    pub fn projects_in_region(&self, code: RegionCode) -> Vec<&Project> {
        let entity_ids: HashSet<&str> = self
            .entities_in(code)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        self.dataset
            .projects
            .iter()
            .filter(|p| entity_ids.contains(p.entity_id.as_str()))
            .collect()
    }

    /// Region a project rolls up to.
    pub fn region_of(&self, project: &Project) -> Result<RegionCode, DashboardError> {
        self.entity(&project.entity_id).map(|e| e.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinate, ProjectPhase};

    fn region(code: RegionCode) -> Region {
        Region {
            code,
            name: code.to_string(),
            center: Coordinate { lon: 0.0, lat: 0.0 },
            bounds: None,
            active_projects: 0,
        }
    }

    fn entity(id: &str, region: RegionCode) -> BusinessEntity {
        BusinessEntity {
            id: id.to_string(),
            name: id.to_uppercase(),
            region,
            location: Coordinate { lon: 0.0, lat: 0.0 },
            active_projects: 0,
        }
    }

    fn project(id: &str, entity_id: &str) -> Project {
        Project {
            id: id.to_string(),
            entity_id: entity_id.to_string(),
            title: id.to_string(),
            phase: ProjectPhase::Planning,
            completion_pct: 50.0,
            afe_amount: 10.0,
            location: Coordinate { lon: 0.0, lat: 0.0 },
            images: Vec::new(),
            satellite_images: Vec::new(),
            video: None,
            details: None,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            regions: vec![region(RegionCode::Amr), region(RegionCode::Eur)],
            entities: vec![entity("callao", RegionCode::Amr), entity("rotterdam", RegionCode::Eur)],
            projects: vec![project("p1", "callao"), project("p2", "rotterdam"), project("p3", "callao")],
            ..Dataset::default()
        }
    }

    #[test]
    fn test_embedded_fixture_loads() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.regions().len(), 6);
        assert_eq!(catalog.entity("callao").unwrap().region, RegionCode::Amr);
        assert_eq!(catalog.project("sndkr").unwrap().phase, ProjectPhase::PreProjects);
    }

    #[test]
    fn test_lookup_missing_ids() {
        let catalog = Catalog::from_dataset(dataset()).unwrap();
        assert!(matches!(
            catalog.project("nope"),
            Err(DashboardError::NotFound { kind: EntityKind::Project, .. })
        ));
        assert!(matches!(
            catalog.region(RegionCode::Apac),
            Err(DashboardError::NotFound { kind: EntityKind::Region, .. })
        ));
    }

    #[test]
    fn test_projects_in_region_preserves_order() {
        let catalog = Catalog::from_dataset(dataset()).unwrap();
        let ids: Vec<&str> = catalog
            .projects_in_region(RegionCode::Amr)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(catalog.region_of(catalog.project("p2").unwrap()).unwrap(), RegionCode::Eur);
    }

    #[test]
    fn test_rejects_dangling_entity_reference() {
        let mut data = dataset();
        data.projects.push(project("p4", "ghost"));
        let err = Catalog::from_dataset(data).unwrap_err();
        assert!(err.to_string().contains("unknown entity 'ghost'"));
    }

    #[test]
    fn test_rejects_entity_in_unknown_region() {
        let mut data = dataset();
        data.entities.push(entity("perth", RegionCode::Apac));
        assert!(matches!(
            Catalog::from_dataset(data),
            Err(DashboardError::InvalidData(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_project_id() {
        let mut data = dataset();
        data.projects.push(project("p1", "rotterdam"));
        let err = Catalog::from_dataset(data).unwrap_err();
        assert!(err.to_string().contains("duplicate project id"));
    }

    #[test]
    fn test_rejects_out_of_range_completion() {
        let mut data = dataset();
        data.projects[0].completion_pct = 120.0;
        assert!(Catalog::from_dataset(data).is_err());
    }

    #[test]
    fn test_unknown_phase_is_parse_error() {
        let json = r#"{"regions":[],"entities":[],"projects":[{"id":"x","entityId":"y","title":"t","phase":"Paused","completionPct":1,"afeAmount":1,"location":[0,0]}]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(DashboardError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, serde_json::to_string(&dataset()).unwrap()).unwrap();
        let catalog = Catalog::load(Some(&path)).unwrap();
        assert_eq!(catalog.projects().len(), 3);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Catalog::load(Some(&missing)),
            Err(DashboardError::IoError(_))
        ));
    }
}
