use serde::Serialize;
use strategist_effects::MissionCounts;
use strategist_model::World;
use strategist_templates::{TemplateCatalog, MISSION_TEMPLATE, PROJECT_TEMPLATE, TECH_TEMPLATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResearchStatus {
    Completed,
    InProgress,
    Available,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub data_name: String,
    pub display_name: String,
    pub category: String,
    pub cost: f64,
    pub progress: f64,
    pub status: ResearchStatus,
}

/// Global tech tree in template order
#[must_use]
pub fn tech_catalog(world: &World, catalog: &TemplateCatalog) -> Vec<CatalogEntry> {
    let research = &world.globals.research;
    catalog
        .techs()
        .iter()
        .map(|tech| {
            let progress = research
                .tech_progress
                .get(&tech.data_name)
                .copied()
                .unwrap_or(0.0);
            let status = if research.finished_techs.contains(&tech.data_name) {
                ResearchStatus::Completed
            } else if progress > 0.0 {
                ResearchStatus::InProgress
            } else if tech
                .prereqs
                .iter()
                .all(|p| research.finished_techs.contains(p))
            {
                ResearchStatus::Available
            } else {
                ResearchStatus::Locked
            };
            CatalogEntry {
                data_name: tech.data_name.clone(),
                display_name: catalog.display_name(TECH_TEMPLATE, &tech.data_name),
                category: tech.tech_category.clone(),
                cost: tech.research_cost,
                progress,
                status,
            }
        })
        .collect()
}

/// The player faction's projects in template order
#[must_use]
pub fn project_catalog(world: &World, catalog: &TemplateCatalog) -> Vec<CatalogEntry> {
    let player = &world.player;
    let finished_techs = &world.globals.research.finished_techs;
    catalog
        .projects()
        .iter()
        .map(|project| {
            let name = &project.data_name;
            let progress = player.project_progress.get(name).copied().unwrap_or(0.0);
            let prereqs_met = project
                .prereqs
                .iter()
                .all(|p| finished_techs.contains(p) || player.completed_projects.contains(p));
            let status = if player.completed_projects.contains(name) && !project.repeatable {
                ResearchStatus::Completed
            } else if progress > 0.0 {
                ResearchStatus::InProgress
            } else if player.available_projects.contains(name) || prereqs_met {
                ResearchStatus::Available
            } else {
                ResearchStatus::Locked
            };
            CatalogEntry {
                data_name: name.clone(),
                display_name: catalog.display_name(PROJECT_TEMPLATE, name),
                category: project.tech_category.clone(),
                cost: project.research_cost,
                progress,
                status,
            }
        })
        .collect()
}

/// How many player-side sources grant each mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionCoverage {
    pub data_name: String,
    pub display_name: String,
    pub count: usize,
}

/// Every mission template, then any granted mission without a template
#[must_use]
pub fn mission_coverage(counts: &MissionCounts, catalog: &TemplateCatalog) -> Vec<MissionCoverage> {
    let mut coverage: Vec<MissionCoverage> = catalog
        .missions()
        .iter()
        .map(|m| MissionCoverage {
            data_name: m.data_name.clone(),
            display_name: catalog.display_name(MISSION_TEMPLATE, &m.data_name),
            count: counts.count(&m.data_name),
        })
        .collect();
    for (name, count) in counts.iter() {
        if !coverage.iter().any(|c| c.data_name == name) {
            coverage.push(MissionCoverage {
                data_name: name.to_string(),
                display_name: catalog.display_name(MISSION_TEMPLATE, name),
                count,
            });
        }
    }
    coverage
}
