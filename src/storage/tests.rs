use super::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

#[test]
fn test_write_then_read_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data.json");

    let mut value = BTreeMap::new();
    value.insert("книга".to_string(), 3u32);
    value.insert("журнал".to_string(), 7u32);

    write_json_atomic(&path, &value).unwrap();
    let loaded: BTreeMap<String, u32> = read_json(&path).unwrap();

    assert_eq!(loaded, value);
}

#[test]
fn test_write_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");

    write_json_atomic(&path, &vec![1, 2, 3]).unwrap();
    write_json_atomic(&path, &vec![4]).unwrap();

    let loaded: Vec<i32> = read_json(&path).unwrap();
    assert_eq!(loaded, vec![4]);

    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1, "temp files must not be left behind");
}

#[test]
fn test_read_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");

    assert!(matches!(
        read_json::<Vec<i32>>(&path),
        Err(StorageError::NotFound { .. })
    ));
    assert!(read_json_if_exists::<Vec<i32>>(&path).unwrap().is_none());
}

#[test]
fn test_read_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(matches!(
        read_json::<Vec<i32>>(&path),
        Err(StorageError::Serialization { .. })
    ));
}
