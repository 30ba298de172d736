use crate::error::{ModelError, Result};
use crate::raw::{self, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use strategist_snapshot::NodeRef;

pub(crate) const GLOBAL_VALUES: &str = "TIGlobalValuesState";
pub(crate) const TIME: &str = "TITimeState";
pub(crate) const GLOBAL_RESEARCH: &str = "TIGlobalResearchState";

pub const DEFAULT_DIFFICULTY: &str = "Normal";

/// Campaign-wide singletons
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Globals {
    pub difficulty: String,
    pub current_date: NaiveDate,
    pub research: Research,
}

/// Shared tech tree progress
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Research {
    pub finished_techs: BTreeSet<String>,
    pub tech_progress: BTreeMap<String, f64>,
}

fn singleton<'a>(records: &[RawRecord<'a>], kind: &'static str) -> Option<NodeRef<'a>> {
    if records.len() > 1 {
        log::warn!("{} {kind} records; using the first", records.len());
    }
    records.first().map(|r| r.value)
}

impl Globals {
    pub(crate) fn project(gamestates: NodeRef<'_>) -> Result<Self> {
        let values = raw::raw_records(gamestates, GLOBAL_VALUES)?;
        let difficulty = singleton(&values, GLOBAL_VALUES)
            .map(|node| raw::text(node, "difficulty"))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| {
                log::debug!("No difficulty recorded; assuming {DEFAULT_DIFFICULTY}");
                DEFAULT_DIFFICULTY.to_string()
            });

        let time = raw::raw_records(gamestates, TIME)?;
        let current_date = match singleton(&time, TIME) {
            Some(node) => raw::date(node, "currentDateTime", TIME)?,
            None => None,
        }
        .ok_or_else(|| ModelError::anchor("game time"))?;

        let research = raw::raw_records(gamestates, GLOBAL_RESEARCH)?;
        let research = singleton(&research, GLOBAL_RESEARCH)
            .map(|node| Research {
                finished_techs: raw::strings(node, "finishedTechsNames").into_iter().collect(),
                tech_progress: raw::named_amounts(
                    node,
                    "techProgress",
                    "techName",
                    "accumulatedResearch",
                )
                .into_iter()
                .collect(),
            })
            .unwrap_or_default();

        Ok(Self {
            difficulty,
            current_date,
            research,
        })
    }
}
