use behat_model::{Draft, EntityHandle, EntityId};
use pretty_assertions::assert_eq;
use serde_json::json;

fn draft(value: serde_json::Value) -> Draft {
    Draft::from_value(value).unwrap()
}

// ── Draft ────────────────────────────────────────────────────────

#[test]
fn from_value_rejects_non_objects() {
    assert!(Draft::from_value(json!([1, 2])).is_none());
    assert!(Draft::from_value(json!("node")).is_none());
    assert!(Draft::from_value(json!(null)).is_none());
}

#[test]
fn typed_accessors() {
    let d = draft(json!({"title": "Example page", "status": true, "uid": 7}));
    assert_eq!(d.get_str("title"), Some("Example page"));
    assert_eq!(d.get_bool("status"), Some(true));
    assert_eq!(d.get_u64("uid"), Some(7));
    assert_eq!(d.get_str("uid"), None);
    assert_eq!(d.get_str("missing"), None);
}

#[test]
fn null_values_are_not_set() {
    let d = draft(json!({"author": null, "title": ""}));
    assert!(!d.is_set("author"));
    assert!(d.is_set("title"));
    assert!(!d.is_set("missing"));
}

#[test]
fn key_order_follows_payload() {
    let d = draft(json!({"type": "page", "title": "t", "author": "admin"}));
    let keys: Vec<&str> = d.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["type", "title", "author"]);
}

#[test]
fn take_leaves_key_in_place() {
    let mut d = draft(json!({"tags": "3"}));
    assert_eq!(d.take("tags"), Some(json!("3")));
    assert_eq!(d.get("tags"), Some(&json!(null)));
    assert_eq!(d.take("missing"), None);
}

#[test]
fn insert_and_remove() {
    let mut d = Draft::new();
    assert!(d.is_empty());
    d.insert("nid", EntityId::new(4));
    assert_eq!(d.get_u64("nid"), Some(4));
    assert_eq!(d.remove("nid"), Some(json!(4)));
    assert!(d.is_empty());
}

#[test]
fn into_value_round_trips_object() {
    let value = json!({"name": "Tag", "vid": "tags"});
    assert_eq!(draft(value.clone()).into_value(), value);
}

// ── EntityId ─────────────────────────────────────────────────────

#[test]
fn id_from_number_and_numeric_string() {
    assert_eq!(EntityId::from_value(&json!(12)), Some(EntityId::new(12)));
    assert_eq!(EntityId::from_value(&json!(" 12 ")), Some(EntityId::new(12)));
}

#[test]
fn id_rejects_other_shapes() {
    assert_eq!(EntityId::from_value(&json!(-1)), None);
    assert_eq!(EntityId::from_value(&json!("twelve")), None);
    assert_eq!(EntityId::from_value(&json!(null)), None);
    assert_eq!(EntityId::from_value(&json!({"nid": 1})), None);
}

#[test]
fn id_serializes_as_plain_number() {
    assert_eq!(serde_json::to_value(EntityId::new(9)).unwrap(), json!(9));
    assert_eq!(EntityId::new(9).to_string(), "9");
}

#[test]
fn draft_id_accessor() {
    let d = draft(json!({"nid": "5", "tid": 6}));
    assert_eq!(d.get_id("nid"), Some(EntityId::new(5)));
    assert_eq!(d.get_id("tid"), Some(EntityId::new(6)));
    assert_eq!(d.get_id("uid"), None);
}

// ── EntityHandle ─────────────────────────────────────────────────

#[test]
fn handle_pointer_access() {
    let handle = EntityHandle {
        entity_type: "node".into(),
        id: EntityId::new(1),
        fields: draft(json!({
            "title": "Example page",
            "field_tags": [{"target_id": 3}]
        })),
    };
    assert_eq!(handle.id(), EntityId::new(1));
    assert_eq!(handle.get_str("/title"), Some("Example page"));
    assert_eq!(handle.get("/field_tags/0/target_id"), Some(&json!(3)));
    assert_eq!(handle.get("/field_tags/1"), None);
    assert_eq!(handle.get_str("/missing"), None);
}

#[test]
fn handle_serde_shape() {
    let handle = EntityHandle {
        entity_type: "taxonomy_term".into(),
        id: EntityId::new(2),
        fields: draft(json!({"name": "Rust"})),
    };
    let value = serde_json::to_value(&handle).unwrap();
    assert_eq!(
        value,
        json!({"entity_type": "taxonomy_term", "id": 2, "fields": {"name": "Rust"}})
    );
    let back: EntityHandle = serde_json::from_value(value).unwrap();
    assert_eq!(back, handle);
}
