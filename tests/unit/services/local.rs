use super::*;
use tempfile::tempdir;

#[test]
fn test_write_read_round_trip() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    let path = dir.path().join("note.txt");

    provider.write_file(&path, "hello").unwrap();
    assert_eq!(provider.read_file(&path).unwrap(), "hello");

    provider.write_file(&path, "replaced").unwrap();
    assert_eq!(provider.read_file(&path).unwrap(), "replaced");

    // the temp sibling used for the atomic write is gone
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("note.txt")]);
}

#[test]
fn test_read_missing_is_not_found() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    let err = provider.read_file(&dir.path().join("gone.txt")).unwrap_err();
    assert!(matches!(err, FileError::NotFound(_)));
}

#[test]
fn test_rename_guards() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    provider.write_file(&a, "a").unwrap();
    provider.write_file(&b, "b").unwrap();

    let err = provider.rename(&a, &b).unwrap_err();
    assert!(matches!(err, FileError::AlreadyExists(_)));
    assert_eq!(provider.read_file(&b).unwrap(), "b");

    let err = provider
        .rename(&dir.path().join("gone.txt"), &dir.path().join("c.txt"))
        .unwrap_err();
    assert!(matches!(err, FileError::NotFound(_)));

    provider.rename(&a, &dir.path().join("c.txt")).unwrap();
    assert!(!provider.exists(&a));
    assert_eq!(provider.read_file(&dir.path().join("c.txt")).unwrap(), "a");
}

#[test]
fn test_delete_dir_requires_empty() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    let sub = dir.path().join("sub");
    provider.create_dir(&sub).unwrap();
    provider.write_file(&sub.join("x.txt"), "x").unwrap();

    let err = provider.delete_dir(&sub).unwrap_err();
    assert!(matches!(err, FileError::NotEmpty(_)));

    provider.delete_file(&sub.join("x.txt")).unwrap();
    provider.delete_dir(&sub).unwrap();
    assert!(!provider.exists(&sub));
}

#[test]
fn test_read_dir_lists_entries() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    provider.write_file(&dir.path().join("a.txt"), "").unwrap();
    provider.create_dir(&dir.path().join("sub")).unwrap();

    let mut entries = provider.read_dir(dir.path()).unwrap();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "a.txt");
    assert!(!entries[0].is_dir);
    assert_eq!(entries[1].name, "sub");
    assert!(entries[1].is_dir);
}
