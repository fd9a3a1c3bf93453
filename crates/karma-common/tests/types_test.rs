//! Tests for the shared domain types.

use std::collections::HashMap;
use karma_common::{GroupId, Handle, KarmaError};

#[test]
fn test_group_id_implements_expected_traits() {
    let group = GroupId(100);

    assert_eq!(format!("{:?}", group), "GroupId(100)");
    assert_eq!(format!("{}", group), "100");

    let mut map = HashMap::new();
    map.insert(group, "test_group");
    assert_eq!(map.get(&GroupId(100)), Some(&"test_group"));

    let serialized = serde_json::to_string(&group).unwrap();
    assert_eq!(serialized, "100");
    let deserialized: GroupId = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, group);
}

#[test]
fn test_handle_serializes_as_plain_string() {
    let handle: Handle = "@bob".parse().unwrap();
    let serialized = serde_json::to_string(&handle).unwrap();
    assert_eq!(serialized, "\"@bob\"");

    let deserialized: Handle = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, handle);
}

#[test]
fn test_handle_deserialization_validates() {
    let result: Result<Handle, _> = serde_json::from_str("\"bob\"");
    assert!(result.is_err());
}

#[test]
fn test_handles_order_by_text() {
    let mut handles: Vec<Handle> = ["@carol", "@alice", "@bob"]
        .iter()
        .map(|h| h.parse().unwrap())
        .collect();
    handles.sort();
    let names: Vec<&str> = handles.iter().map(Handle::as_str).collect();
    assert_eq!(names, ["@alice", "@bob", "@carol"]);
}

#[test]
fn test_error_display() {
    let err = KarmaError::Config("token missing".to_string());
    assert_eq!(err.to_string(), "Configuration error: token missing");
    assert!(err.is_fatal());

    let err = KarmaError::database("locked", None);
    assert_eq!(err.to_string(), "Database error: locked");
    assert!(!err.is_fatal());
}
