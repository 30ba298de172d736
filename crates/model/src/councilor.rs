use crate::collection::Record;
use crate::error::Result;
use crate::ids::{CouncilorId, FactionId, OrgId};
use crate::raw::{self, RawRecord};
use serde::Serialize;
use strategist_effects::{EffectBag, EffectGroup, EffectKey};
use strategist_templates::{TemplateCatalog, ORG_TEMPLATE};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Councilor {
    pub id: CouncilorId,
    pub type_template: String,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub status: String,
    /// The eight named stats as recorded, before traits
    pub attributes: EffectBag,
    pub traits: Vec<String>,
    pub orgs: Vec<OrgId>,
}

impl Record for Councilor {
    type Id = CouncilorId;
    const KIND: &'static str = "TICouncilorState";

    fn id(&self) -> CouncilorId {
        self.id
    }
}

impl Councilor {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        let mut attributes = EffectBag::new();
        if let Some(stats) = node.field("attributes") {
            for (name, value) in stats.entries() {
                match (EffectKey::from_name(name), value.as_f64()) {
                    (Some(key), Some(amount)) if key.group() == EffectGroup::Attribute => {
                        attributes.set(key, amount);
                    }
                    _ => log::debug!("Councilor {}: ignoring attribute `{name}`", record.id),
                }
            }
        }
        Ok(Self {
            id: CouncilorId::new(record.id),
            type_template: raw::text(node, "typeTemplateName"),
            display_name: raw::text(node, "displayName"),
            faction: raw::link(node, "faction", Self::KIND)?,
            status: raw::text(node, "status"),
            attributes,
            traits: raw::strings(node, "traitTemplateNames"),
            orgs: raw::links(node, "orgs", Self::KIND)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Org {
    pub id: OrgId,
    pub template_name: String,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub assigned_councilor: Option<CouncilorId>,
    pub tier: f64,
    /// Scalar effect fields written on the record itself
    pub stat_overrides: EffectBag,
}

impl Record for Org {
    type Id = OrgId;
    const KIND: &'static str = "TIOrgState";

    fn id(&self) -> OrgId {
        self.id
    }
}

impl Org {
    pub(crate) fn project(record: RawRecord<'_>, catalog: &TemplateCatalog) -> Result<Self> {
        let node = record.value;
        let template_name = raw::text(node, "templateName");
        let template = catalog.org(&template_name);
        if template.is_none() {
            log::warn!("Org {} uses unknown template `{template_name}`", record.id);
        }

        let stat_overrides = raw::scalar_effects(node);
        let tier = Some(stat_overrides.get(EffectKey::Tier))
            .filter(|t| *t > 0.0)
            .or_else(|| {
                template
                    .map(|t| t.scalar_effects().get(EffectKey::Tier))
                    .filter(|t| *t > 0.0)
            })
            .unwrap_or(1.0);
        let display_name = Some(raw::text(node, "displayName"))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| catalog.display_name(ORG_TEMPLATE, &template_name));

        Ok(Self {
            id: OrgId::new(record.id),
            template_name,
            display_name,
            faction: raw::link(node, "faction", Self::KIND)?,
            assigned_councilor: raw::link(node, "assignedCouncilor", Self::KIND)?,
            tier,
            stat_overrides,
        })
    }
}
