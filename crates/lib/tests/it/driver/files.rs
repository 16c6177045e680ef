//! File-based dump and load tests.

use std::fs;

use automap::{AutoMap, Driver, DriverError, JsonDriver, StreamingJsonDriver, Value};

use super::helpers::*;
use crate::helpers::*;

#[test]
fn test_dump_creates_parent_directories() {
    for driver in all_drivers(Default::default()) {
        let (_dir, path) = temp_doc_path();
        let tree = sample_tree();

        driver.dump(&tree, &path, Some(2)).unwrap();

        assert!(path.exists(), "{} did not write the file", driver.name());
        assert_eq!(JsonDriver::default().load(&path).unwrap(), tree);
    }
}

#[test]
fn test_dump_replaces_file_without_leftovers() {
    let (dir, path) = temp_doc_path();
    let driver = JsonDriver::default();

    let mut tree = AutoMap::new();
    tree.insert("version", 1);
    driver.dump(&tree, &path, None).unwrap();

    tree.insert("version", 2);
    driver.dump(&tree, &path, None).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"version":2}"#);
    let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["doc.json"]);
    drop(dir);
}

#[test]
fn test_failed_dump_keeps_previous_file() {
    let (_dir, path) = temp_doc_path();
    let driver = StreamingJsonDriver::default();

    let mut tree = AutoMap::new();
    tree.insert("ok", true);
    driver.dump(&tree, &path, None).unwrap();

    tree.insert("bad", f64::NAN);
    let err = driver.dump(&tree, &path, None).unwrap_err();
    assert!(err.is_unsupported_type());

    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"ok":true}"#);
    assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn test_dump_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let mode = |path: &std::path::Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;

    for driver in all_drivers(Default::default()) {
        let (_dir, path) = temp_doc_path();
        driver.dump(&sample_tree(), &path, None).unwrap();

        let plain = path.with_file_name("plain.json");
        fs::File::create(&plain).unwrap();
        assert_eq!(mode(&path), mode(&plain), "{} new file mode", driver.name());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        driver.dump(&sample_tree(), &path, Some(2)).unwrap();
        assert_eq!(mode(&path), 0o640, "{} replaced file mode", driver.name());
    }
}

#[test]
fn test_load_missing_file() {
    let (_dir, path) = temp_doc_path();
    let driver = JsonDriver::default();

    let err = driver.load(&path).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.is_io_error());
    match err {
        automap::Error::Driver(DriverError::FileIo { path: reported, .. }) => {
            assert_eq!(reported, path)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(driver.load_or_default(&path).unwrap().is_empty());
    assert!(!path.exists(), "load_or_default must not create the file");
}

#[test]
fn test_load_or_default_propagates_other_errors() {
    let (_dir, path) = temp_doc_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json").unwrap();

    let err = JsonDriver::default().load_or_default(&path).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_load_fixture_file() {
    let tree = JsonDriver::default().load(&fixture("basic.json")).unwrap();
    assert_eq!(tree.get_path(&["nested", "tags"]), Some(&Value::from(vec!["a", "b"])));
}
