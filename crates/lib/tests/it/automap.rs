//! AutoMap integration tests
//!
//! Covers auto-vivification through indexing and path methods, non-creating
//! membership queries, and the equality and formatting guarantees relative to
//! a plain `IndexMap`.

use automap::{AutoMap, AutoMapError, Value};
use indexmap::IndexMap;

use crate::helpers::*;

#[test]
fn test_chained_index_assignment_creates_every_level() {
    for depth in 1..6 {
        let keys = gen_path(depth);
        let mut map = AutoMap::new();

        let mut slot = map.get_or_create(keys[0].clone());
        for key in &keys[1..] {
            slot = &mut slot[key.as_str()];
        }
        *slot = Value::from("leaf");

        assert!(map.contains_path(&keys));
        for i in 1..depth {
            let prefix = map.get_path(&keys[..i]).unwrap();
            assert!(prefix.as_map().is_some(), "level {i} of {depth} is not a map");
        }
        assert_eq!(map.get_path(&keys), Some(&Value::from("leaf")));
    }
}

#[test]
fn test_mutable_access_vivifies() {
    let mut map = AutoMap::new();
    let key = gen_string(12);
    assert!(!map.contains_path(&[key.as_str()]));

    let _ = &mut map[key.as_str()];

    assert!(map.contains_path(&[key.as_str()]));
    assert_eq!(map[key.as_str()], Value::Map(AutoMap::new()));
}

#[test]
fn test_shared_access_does_not_vivify() {
    let map = AutoMap::new();
    assert!(map.get("missing").is_none());
    assert!(map.get_path(&["missing", "deeper"]).is_none());
    assert!(!map.contains("missing"));
    assert!(map.is_empty());
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn test_shared_index_on_missing_key_panics() {
    let map = AutoMap::new();
    let _ = &map["missing"];
}

#[test]
fn test_contains_path_scenarios() {
    let mut full = AutoMap::new();
    full["a"]["b"]["c"] = Value::from(1);
    assert!(full.contains_path(&["a", "b", "c"]));

    let mut partial = AutoMap::new();
    let _ = &mut partial["a"]["b"];
    assert!(!partial.contains_path(&["a", "b", "c"]));
    assert_eq!(
        partial.get_path(&["a", "b"]),
        Some(&Value::Map(AutoMap::new())),
        "contains_path must not insert the missing key"
    );
}

#[test]
fn test_contains_path_outside_automaps() {
    let mut map = AutoMap::new();
    map.insert("tags", vec!["x", "y"]);
    map.insert("pairs", vec![vec!["k", "v"], vec!["a", "b"]]);

    let mut plain = IndexMap::new();
    plain.insert("inner".to_string(), Value::from(1));
    map.insert("plain", plain);

    assert!(map.contains_path(&["tags", "x"]));
    assert!(!map.contains_path(&["tags", "z"]));
    assert!(map.contains_path(&["pairs", "k", "v"]));
    assert!(!map.contains_path(&["pairs", "v", "k"]));
    assert!(map.contains_path(&["plain", "inner"]));
    assert!(!map.contains_path(&["plain", "inner", "deeper"]));
    assert!(!map.contains_path::<&str>(&[]));
}

#[test]
fn test_contains_path_into_text_is_substring() {
    let mut map = AutoMap::new();
    map["user"]["motto"] = Value::from("carpe diem");

    assert!(map.contains_path(&["user", "motto", "diem"]));
    assert!(map.contains_path(&["user", "motto", ""]));
    assert!(!map.contains_path(&["user", "motto", "noctem"]));
    assert!(!map.contains_path(&["user", "motto", "carpe", "diem"]));
}

#[test]
fn test_set_path_and_get_path_or_create() {
    let mut map = AutoMap::new();
    assert_eq!(map.set_path(&["a", "b", "c"], 1).unwrap(), None);
    assert_eq!(map.set_path(&["a", "b", "c"], 2).unwrap(), Some(Value::Int(1)));

    let created = map.get_path_or_create(&["a", "x", "y"]).unwrap();
    assert_eq!(*created, Value::Map(AutoMap::new()));
    *created = Value::from("set");

    assert_eq!(map.get_path(&["a", "x", "y"]), Some(&Value::from("set")));
    assert_eq!(map.get_path(&["a", "b", "c"]), Some(&Value::Int(2)));
}

#[test]
fn test_set_path_errors() {
    let mut map = AutoMap::new();
    map.insert("scalar", 5);
    let before = map.clone();

    let err = map.set_path(&["scalar", "child"], 1).unwrap_err();
    assert!(err.is_path_conflict());
    assert_eq!(err.key(), Some("scalar"));
    assert_eq!(map, before);

    let err = map.set_path::<&str>(&[], 1).unwrap_err();
    assert_eq!(err, AutoMapError::EmptyPath);

    let err: automap::Error = map.get_path_or_create(&["scalar", "x"]).unwrap_err().into();
    assert!(err.is_path_error());
    assert_eq!(err.module(), "automap");
}

#[test]
fn test_equality_and_debug_match_index_map() {
    let map: AutoMap = [("b", 1), ("a", 2)].into_iter().collect();

    let mut plain = IndexMap::new();
    plain.insert("b".to_string(), Value::from(1));
    plain.insert("a".to_string(), Value::from(2));

    assert_eq!(map, plain);
    assert_eq!(plain, map);
    assert_eq!(format!("{map:?}"), format!("{plain:?}"));
    assert_eq!(AutoMap::from(plain.clone()).into_inner(), plain);
}

#[test]
fn test_iteration_follows_insertion_order() {
    let mut map = AutoMap::new();
    let keys: Vec<String> = (0..20).map(|i| format!("{i}-{}", gen_string(4))).collect();
    for key in &keys {
        map.insert(key.clone(), Value::Null);
    }

    let seen: Vec<&String> = map.keys().collect();
    assert_eq!(seen, keys.iter().collect::<Vec<_>>());
    assert_eq!(map.len(), 20);
}

#[test]
fn test_display_is_compact_json() {
    let mut map = AutoMap::new();
    map["a"]["b"] = Value::from(vec![1, 2]);
    map.insert("when", sample_date());
    assert_eq!(map.to_string(), r#"{"a":{"b":[1,2]},"when":"2000-09-01"}"#);
}

#[test]
fn test_value_index_vivifies_nested_maps_only() {
    let mut map = AutoMap::new();
    map.insert("list", vec![1, 2, 3]);
    map["list"][1] = Value::from(20);
    assert_eq!(map["list"], Value::from(vec![1, 20, 3]));

    map["nested"]["deeper"]["leaf"] = Value::from(true);
    assert_eq!(map["nested"]["deeper"]["leaf"], true);
}
