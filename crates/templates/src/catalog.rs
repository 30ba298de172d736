use crate::error::{Result, TemplateError};
use crate::localization::Localization;
use crate::store::TemplateStore;
use crate::types::{
    CouncilorTypeTemplate, HabModuleTemplate, MissionTemplate, Named, OrgTemplate,
    ProjectTemplate, TechTemplate, TraitTemplate,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ORG_TEMPLATE: &str = "TIOrgTemplate";
pub const TRAIT_TEMPLATE: &str = "TITraitTemplate";
pub const HAB_MODULE_TEMPLATE: &str = "TIHabModuleTemplate";
pub const COUNCILOR_TYPE_TEMPLATE: &str = "TICouncilorTypeTemplate";
pub const TECH_TEMPLATE: &str = "TITechTemplate";
pub const PROJECT_TEMPLATE: &str = "TIProjectTemplate";
pub const MISSION_TEMPLATE: &str = "TIMissionTemplate";

const LOCALIZED: [&str; 5] = [
    ORG_TEMPLATE,
    TECH_TEMPLATE,
    PROJECT_TEMPLATE,
    MISSION_TEMPLATE,
    TRAIT_TEMPLATE,
];

/// Typed view over every template set the analysis reads.
///
/// Keyed sets resolve by `dataName`; ordered sets keep file order.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    orgs: BTreeMap<String, OrgTemplate>,
    traits: BTreeMap<String, TraitTemplate>,
    hab_modules: BTreeMap<String, HabModuleTemplate>,
    councilor_types: BTreeMap<String, CouncilorTypeTemplate>,
    techs: Vec<TechTemplate>,
    projects: Vec<ProjectTemplate>,
    missions: Vec<MissionTemplate>,
    text: Localization,
}

impl TemplateCatalog {
    /// Load all sets through the store.
    ///
    /// The org and trait sets are required. Other sets and every
    /// localization file may be missing; they come back empty.
    pub async fn load(store: &TemplateStore) -> Result<Self> {
        let (orgs, traits, modules, types, techs, projects, missions) = tokio::join!(
            store.template_set(ORG_TEMPLATE),
            store.template_set(TRAIT_TEMPLATE),
            store.template_set(HAB_MODULE_TEMPLATE),
            store.template_set(COUNCILOR_TYPE_TEMPLATE),
            store.template_set(TECH_TEMPLATE),
            store.template_set(PROJECT_TEMPLATE),
            store.template_set(MISSION_TEMPLATE),
        );

        let mut text = Localization::default();
        for name in LOCALIZED {
            match store.localization(name).await {
                Ok(file) => text.extend(&file),
                Err(err) if err.is_not_found() => {
                    log::warn!("No localization for {name}; display names fall back to data names");
                }
                Err(err) => return Err(err),
            }
        }

        let catalog = Self {
            orgs: keyed(ORG_TEMPLATE, &orgs?)?,
            traits: keyed(TRAIT_TEMPLATE, &traits?)?,
            hab_modules: keyed(HAB_MODULE_TEMPLATE, &optional(HAB_MODULE_TEMPLATE, modules)?)?,
            councilor_types: keyed(
                COUNCILOR_TYPE_TEMPLATE,
                &optional(COUNCILOR_TYPE_TEMPLATE, types)?,
            )?,
            techs: typed(TECH_TEMPLATE, &optional(TECH_TEMPLATE, techs)?)?,
            projects: typed(PROJECT_TEMPLATE, &optional(PROJECT_TEMPLATE, projects)?)?,
            missions: typed(MISSION_TEMPLATE, &optional(MISSION_TEMPLATE, missions)?)?,
            text,
        };
        log::debug!(
            "Template catalog: {} orgs, {} traits, {} modules, {} techs, {} projects",
            catalog.orgs.len(),
            catalog.traits.len(),
            catalog.hab_modules.len(),
            catalog.techs.len(),
            catalog.projects.len()
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn org(&self, data_name: &str) -> Option<&OrgTemplate> {
        self.orgs.get(data_name)
    }

    #[must_use]
    pub fn trait_template(&self, data_name: &str) -> Option<&TraitTemplate> {
        self.traits.get(data_name)
    }

    #[must_use]
    pub fn hab_module(&self, data_name: &str) -> Option<&HabModuleTemplate> {
        self.hab_modules.get(data_name)
    }

    #[must_use]
    pub fn councilor_type(&self, data_name: &str) -> Option<&CouncilorTypeTemplate> {
        self.councilor_types.get(data_name)
    }

    #[must_use]
    pub fn techs(&self) -> &[TechTemplate] {
        &self.techs
    }

    #[must_use]
    pub fn projects(&self) -> &[ProjectTemplate] {
        &self.projects
    }

    #[must_use]
    pub fn missions(&self) -> &[MissionTemplate] {
        &self.missions
    }

    #[must_use]
    pub fn localization(&self) -> &Localization {
        &self.text
    }

    /// Localized display name, or the data name when no text exists
    #[must_use]
    pub fn display_name(&self, template: &str, data_name: &str) -> String {
        self.text
            .display_name(template, data_name)
            .unwrap_or(data_name)
            .to_string()
    }
}

fn optional(name: &str, loaded: Result<Arc<Vec<Value>>>) -> Result<Arc<Vec<Value>>> {
    match loaded {
        Err(err) if err.is_not_found() => {
            log::warn!("Template set {name} not found; treating it as empty");
            Ok(Arc::new(Vec::new()))
        }
        other => other,
    }
}

fn typed<T: DeserializeOwned>(name: &str, records: &[Value]) -> Result<Vec<T>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            T::deserialize(record).map_err(|err| TemplateError::InvalidRecord {
                name: name.to_string(),
                message: format!("record {idx}: {err}"),
            })
        })
        .collect()
}

fn keyed<T: DeserializeOwned + Named>(
    name: &str,
    records: &[Value],
) -> Result<BTreeMap<String, T>> {
    let mut out = BTreeMap::new();
    for record in typed::<T>(name, records)? {
        let key = record.data_name().to_string();
        if out.insert(key.clone(), record).is_some() {
            log::warn!("Duplicate {name} record `{key}`; keeping the later one");
        }
    }
    Ok(out)
}
