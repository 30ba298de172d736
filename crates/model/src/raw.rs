//! Field readers over resolved snapshot nodes.
//!
//! Optional scalar fields default to zero/empty. Typed links are
//! `{"value": <id>}` objects; a link of any other shape is malformed.

use crate::error::{ModelError, Result};
use chrono::NaiveDate;
use strategist_effects::EffectBag;
use strategist_snapshot::{NodeKind, NodeRef};

pub(crate) const TYPE_NAMESPACE: &str = "PavonisInteractive.TerraInvicta.";

/// One `{"Key": {"value": id}, "Value": {...}}` entry of a raw collection
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawRecord<'a> {
    pub id: u64,
    pub value: NodeRef<'a>,
}

/// Entries of the collection `kind` under `gamestates`; absent ⇒ empty
pub(crate) fn raw_records<'a>(
    gamestates: NodeRef<'a>,
    kind: &'static str,
) -> Result<Vec<RawRecord<'a>>> {
    let Some(list) = gamestates.field(&format!("{TYPE_NAMESPACE}{kind}")) else {
        log::debug!("No {kind} collection in snapshot");
        return Ok(Vec::new());
    };
    list.items()
        .enumerate()
        .map(|(pos, entry)| {
            let id = entry
                .path(&["Key", "value"])
                .and_then(|n| n.as_u64())
                .ok_or_else(|| {
                    ModelError::malformed(kind, format!("entry {pos} has no unsigned Key.value"))
                })?;
            let value = entry
                .field("Value")
                .filter(|v| v.kind() == NodeKind::Object)
                .ok_or_else(|| {
                    ModelError::malformed(kind, format!("entry {id} has no Value object"))
                })?;
            Ok(RawRecord { id, value })
        })
        .collect()
}

pub(crate) fn link<I: From<u64>>(
    node: NodeRef<'_>,
    field: &str,
    kind: &'static str,
) -> Result<Option<I>> {
    let Some(target) = node.field(field) else {
        return Ok(None);
    };
    target
        .get("value")
        .and_then(|v| v.as_u64())
        .map(|raw| Some(I::from(raw)))
        .ok_or_else(|| ModelError::malformed(kind, format!("`{field}` is not a typed link")))
}

pub(crate) fn required_link<I: From<u64>>(
    node: NodeRef<'_>,
    field: &str,
    kind: &'static str,
) -> Result<I> {
    link(node, field, kind)?
        .ok_or_else(|| ModelError::malformed(kind, format!("missing required link `{field}`")))
}

pub(crate) fn links<I: From<u64>>(
    node: NodeRef<'_>,
    field: &str,
    kind: &'static str,
) -> Result<Vec<I>> {
    let Some(list) = node.field(field) else {
        return Ok(Vec::new());
    };
    list.items()
        .filter(|item| !item.is_null())
        .map(|item| {
            item.get("value")
                .and_then(|v| v.as_u64())
                .map(I::from)
                .ok_or_else(|| {
                    ModelError::malformed(kind, format!("`{field}` holds a non-link item"))
                })
        })
        .collect()
}

pub(crate) fn text(node: NodeRef<'_>, field: &str) -> String {
    node.field(field)
        .and_then(|n| n.as_str())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn number(node: NodeRef<'_>, field: &str) -> f64 {
    node.field(field).and_then(|n| n.as_f64()).unwrap_or(0.0)
}

pub(crate) fn flag(node: NodeRef<'_>, field: &str) -> bool {
    node.field(field).and_then(|n| n.as_bool()).unwrap_or(false)
}

pub(crate) fn strings(node: NodeRef<'_>, field: &str) -> Vec<String> {
    node.field(field)
        .map(|list| {
            list.items()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// `{"year", "month", "day"}` object; extra fields are ignored
pub(crate) fn date(
    node: NodeRef<'_>,
    field: &str,
    kind: &'static str,
) -> Result<Option<NaiveDate>> {
    let Some(raw) = node.field(field) else {
        return Ok(None);
    };
    let part = |name: &str| raw.get(name).and_then(|n| n.as_i64());
    let parsed = match (part("year"), part("month"), part("day")) {
        (Some(year), Some(month), Some(day)) => i32::try_from(year)
            .ok()
            .zip(u32::try_from(month).ok())
            .zip(u32::try_from(day).ok())
            .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d)),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| ModelError::malformed(kind, format!("`{field}` is not a valid date")))
}

/// Numeric fields of an object whose names are effect keys
pub(crate) fn scalar_effects(node: NodeRef<'_>) -> EffectBag {
    EffectBag::from_fields(
        node.entries()
            .filter_map(|(name, value)| value.as_f64().map(|v| (name, v))),
    )
}

/// `[{<name_field>: "...", <amount_field>: n}]` as ordered pairs
pub(crate) fn named_amounts(
    node: NodeRef<'_>,
    field: &str,
    name_field: &str,
    amount_field: &str,
) -> Vec<(String, f64)> {
    node.field(field)
        .map(|list| {
            list.items()
                .filter_map(|item| {
                    let name = item.field(name_field)?.as_str()?.to_string();
                    Some((name, number(item, amount_field)))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FactionId;
    use serde_json::json;
    use strategist_snapshot::SnapshotGraph;

    fn graph(value: serde_json::Value) -> SnapshotGraph {
        SnapshotGraph::resolve(value).expect("resolve")
    }

    #[test]
    fn links_accept_value_objects_and_null() {
        let g = graph(json!({"faction": {"value": 4}, "none": null, "bad": 4}));
        let root = g.root();
        assert_eq!(
            link::<FactionId>(root, "faction", "TITest").expect("link"),
            Some(FactionId::new(4))
        );
        assert_eq!(link::<FactionId>(root, "none", "TITest").expect("null"), None);
        assert_eq!(link::<FactionId>(root, "absent", "TITest").expect("absent"), None);
        assert!(link::<FactionId>(root, "bad", "TITest").is_err());
    }

    #[test]
    fn dates_ignore_extra_fields_and_reject_nonsense() {
        let g = graph(json!({
            "ok": {"year": 2027, "month": 2, "day": 28, "hour": 5},
            "bad": {"year": 2027, "month": 2, "day": 30}
        }));
        let root = g.root();
        assert_eq!(
            date(root, "ok", "TITest").expect("date"),
            NaiveDate::from_ymd_opt(2027, 2, 28)
        );
        assert!(date(root, "bad", "TITest").is_err());
        assert_eq!(date(root, "missing", "TITest").expect("missing"), None);
    }

    #[test]
    fn records_require_numeric_keys() {
        let g = graph(json!({
            "PavonisInteractive.TerraInvicta.TIRowState": [
                {"Key": {"value": 1}, "Value": {"a": 1}},
                {"Key": {"value": "x"}, "Value": {"a": 2}}
            ]
        }));
        let err = raw_records(g.root(), "TIRowState").unwrap_err();
        assert!(matches!(err, ModelError::MalformedRecord { kind: "TIRowState", .. }));
        assert!(raw_records(g.root(), "TIOtherState").expect("absent").is_empty());
    }
}
