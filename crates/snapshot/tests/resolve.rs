use pretty_assertions::assert_eq;
use serde_json::json;
use strategist_snapshot::{SnapshotError, SnapshotGraph};

#[test]
fn two_references_share_the_canonical_object() {
    let doc = json!({
        "designs": [
            {"$id": "5", "dataName": "Frigate_A", "hullName": "Frigate", "modules": [{"slot": 1}]}
        ],
        "ships": [
            {"name": "Alpha", "design": {"$ref": "5"}},
            {"name": "Beta", "design": {"$ref": "5"}}
        ]
    });
    let graph = SnapshotGraph::resolve(doc).expect("resolve");
    let root = graph.root();

    let canonical = root.get("designs").and_then(|d| d.index(0)).expect("design");
    let ships: Vec<_> = root.get("ships").expect("ships").items().collect();
    let alpha = ships[0].get("design").expect("alpha design");
    let beta = ships[1].get("design").expect("beta design");

    assert!(alpha.same_node(&beta));
    assert!(alpha.same_node(&canonical));
    assert_eq!(alpha.to_value(), beta.to_value());
    assert_eq!(
        beta.to_value(),
        json!({"dataName": "Frigate_A", "hullName": "Frigate", "modules": [{"slot": 1}]})
    );
}

#[test]
fn references_may_precede_their_target() {
    let doc = json!({
        "a_first": {"$ref": "12"},
        "z_later": {"$id": "12", "value": 99}
    });
    let graph = SnapshotGraph::resolve(doc).expect("resolve");
    let first = graph.root().get("a_first").expect("a_first");
    assert_eq!(first.get("value").and_then(|n| n.as_u64()), Some(99));
}

#[test]
fn nested_shared_objects_resolve_transitively() {
    let doc = json!({
        "orbits": [{"$id": "1", "name": "LEO", "barycenter": {"$id": "2", "name": "Earth"}}],
        "habs": [{"orbit": {"$ref": "1"}}],
        "bodies": [{"$ref": "2"}]
    });
    let graph = SnapshotGraph::resolve(doc).expect("resolve");
    let root = graph.root();
    let via_hab = root
        .path(&["habs"])
        .and_then(|h| h.index(0))
        .and_then(|h| h.path(&["orbit", "barycenter"]))
        .expect("barycenter");
    let direct = root.get("bodies").and_then(|b| b.index(0)).expect("body");
    assert!(via_hab.same_node(&direct));
    assert_eq!(direct.get("name").and_then(|n| n.as_str()), Some("Earth"));
}

#[test]
fn mutual_cycle_terminates() {
    let doc = json!({
        "a": {"$id": "a", "peer": {"$id": "b", "peer": {"$ref": "a"}}}
    });
    let graph = SnapshotGraph::resolve(doc).expect("resolve");
    let a = graph.root().get("a").expect("a");
    let back = a.path(&["peer", "peer"]).expect("back to a");
    assert!(back.same_node(&a));
    assert_eq!(a.to_value(), json!({"peer": {"peer": null}}));
}

#[test]
fn missing_target_is_an_integrity_failure() {
    let doc = json!({"x": {"$ref": "404"}});
    let err = SnapshotGraph::resolve(doc).unwrap_err();
    assert!(err.is_integrity());
    match err {
        SnapshotError::DanglingReference { id } => assert_eq!(id, "404"),
        other => panic!("expected dangling reference, got {other:?}"),
    }
}

#[test]
fn duplicate_share_ids_keep_the_later_object() {
    let doc = json!({
        "a": {"$id": "1", "tag": "first"},
        "b": {"$id": "1", "tag": "second"},
        "c": {"$ref": "1"}
    });
    let graph = SnapshotGraph::resolve(doc).expect("resolve");
    let c = graph.root().get("c").expect("c");
    // serde_json maps iterate in key order, so "b" is interned after "a".
    assert_eq!(c.get("tag").and_then(|n| n.as_str()), Some("second"));
}
