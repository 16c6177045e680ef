use std::path::{Path, PathBuf};

use automap::{AutoMap, TypedValue, Value};
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::{Rng, distributions::Alphanumeric};
use tempfile::TempDir;
use uuid::Uuid;

/// Random alphanumeric string, used for keys that must not collide.
pub fn gen_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Random key path of the given depth.
pub fn gen_path(depth: usize) -> Vec<String> {
    (0..depth).map(|_| gen_string(8)).collect()
}

/// Temporary directory plus a document path inside a not yet created
/// subdirectory.
pub fn temp_doc_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("doc.json");
    (dir, path)
}

/// Path of a file in the shared fixture directory.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/it/data")
        .join(name)
}

pub fn sample_timestamp() -> Value {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    Value::from(offset.with_ymd_and_hms(2000, 9, 1, 21, 55, 2).unwrap())
}

pub fn sample_date() -> Value {
    Value::from(NaiveDate::from_ymd_opt(2000, 9, 1).unwrap())
}

pub fn sample_time() -> Value {
    Value::from(NaiveTime::from_hms_micro_opt(21, 55, 2, 250_000).unwrap())
}

pub fn sample_uuid() -> Value {
    Value::from(Uuid::parse_str("5d1e22eb-d9b2-48cd-b081-d1056d267f28").unwrap())
}

/// A tree exercising nested maps, lists and every built-in extension type.
pub fn sample_tree() -> AutoMap {
    let mut tree = AutoMap::new();
    tree["user"]["name"] = Value::from("ada");
    tree["user"]["born"] = sample_date();
    tree["user"]["id"] = sample_uuid();
    tree["events"]["last"]["at"] = sample_timestamp();
    tree["events"]["last"]["alarm"] = sample_time();
    tree["events"]["utc"] = Value::from(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    tree.insert(
        "history",
        vec![
            sample_date(),
            Value::from(1),
            Value::from(2.5),
            Value::Null,
            Value::from(vec!["nested", "list"]),
        ],
    );
    tree.insert("enabled", true);
    tree
}

/// Sample tree with a user-defined typed value, for codecs that register it.
pub fn sample_tree_with_typed() -> AutoMap {
    let mut tree = sample_tree();
    tree["shapes"]["origin"] = Value::from(TypedValue::new("point", vec![0, 0]));
    tree
}
