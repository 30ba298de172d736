use crate::config::SpoilsConfig;
use serde::Serialize;
use std::collections::BTreeSet;
use strategist_model::{Nation, NationId, World};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationSpoils {
    pub id: NationId,
    pub display_name: String,
    pub gdp: f64,
    pub control_points: usize,
    pub resource_regions: usize,
    /// Money a looting faction collects per month
    pub spoils: f64,
    /// `(gdp / 1e9)^0.6 / 2`
    pub control_point_cost: f64,
    pub spoils_per_control_point: f64,
    pub spoils_per_cost: f64,
}

#[must_use]
pub fn control_point_cost(gdp: f64) -> f64 {
    if gdp <= 0.0 {
        return 0.0;
    }
    (gdp / 1e9).powf(0.6) / 2.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[must_use]
pub fn spoils(
    investment_points: f64,
    resource_regions: usize,
    democracy: f64,
    config: &SpoilsConfig,
) -> f64 {
    let missing_democracy = (config.democracy_ceiling - democracy).max(0.0);
    investment_points * config.money_per_investment_point
        + resource_regions as f64 * config.money_per_resource_region
        + missing_democracy * config.money_per_missing_democracy
}

#[must_use]
pub fn nation_spoils(nation: &Nation, world: &World, config: &SpoilsConfig) -> NationSpoils {
    let resource_regions = world
        .regions
        .iter()
        .filter(|r| r.nation == Some(nation.id) || nation.regions.contains(&r.id))
        .filter(|r| r.resource_region)
        .count();
    let control_points: BTreeSet<_> = world
        .control_points
        .iter()
        .filter(|cp| cp.nation == nation.id)
        .map(|cp| cp.id)
        .chain(nation.control_points.iter().copied())
        .collect();

    let money = spoils(
        nation.investment_points,
        resource_regions,
        nation.democracy,
        config,
    );
    let cost = control_point_cost(nation.gdp);
    NationSpoils {
        id: nation.id,
        display_name: nation.display_name.clone(),
        gdp: nation.gdp,
        control_points: control_points.len(),
        resource_regions,
        spoils: money,
        control_point_cost: cost,
        spoils_per_control_point: ratio(money, control_points.len() as f64),
        spoils_per_cost: ratio(money, cost),
    }
}
