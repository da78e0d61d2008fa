use super::*;
use crate::services::file::LocalFileProvider;
use std::fs;
use tempfile::{tempdir, TempDir};

fn setup() -> (TempDir, LocalFileProvider, ExplorerTree) {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    let tree = ExplorerTree::open(dir.path());
    (dir, provider, tree)
}

fn child_names(tree: &ExplorerTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .map(|iter| {
            iter.map(|(name, _)| name.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_expand_excludes_desc_and_unrecognized() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("note.txt"), "n").unwrap();
    fs::write(dir.path().join("page.html"), "p").unwrap();
    fs::write(dir.path().join("skip.md"), "s").unwrap();
    fs::write(dir.path().join("desc.txt"), "folder note").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let root = tree.root();
    expand(&mut tree, &provider, root);

    assert!(tree.is_expanded(root));
    assert!(!tree.is_unexpanded(root));
    assert_eq!(tree.desc_name(root), Some("desc.txt".into()));

    let mut names = child_names(&tree, root);
    names.sort();
    assert_eq!(names, vec!["note.txt", "page.html", "sub"]);
}

#[test]
fn test_expand_missing_dir_yields_empty_folder() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);

    let sub = *tree
        .children(root)
        .unwrap()
        .find(|(name, _)| *name == "sub")
        .unwrap()
        .1;
    fs::remove_dir(dir.path().join("sub")).unwrap();

    expand(&mut tree, &provider, sub);
    assert!(tree.is_expanded(sub));
    assert_eq!(tree.child_count(sub), 0);
}

#[test]
fn test_expand_is_idempotent() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("note.txt"), "n").unwrap();
    let root = tree.root();

    expand(&mut tree, &provider, root);
    let first = child_names(&tree, root);
    expand(&mut tree, &provider, root);
    assert_eq!(child_names(&tree, root), first);
}

#[test]
fn test_rename_appends_primary_extension() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("note.txt"), "n").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let file = *tree.children(root).unwrap().next().unwrap().1;

    let outcome = rename(&mut tree, &provider, file, "renamed").unwrap();
    assert!(outcome.new_path.ends_with("renamed.txt"));
    assert!(dir.path().join("renamed.txt").is_file());
    assert!(!dir.path().join("note.txt").exists());
    assert_eq!(tree.name(file), Some(&std::ffi::OsString::from("renamed.txt")));
}

#[test]
fn test_rename_keeps_recognized_extension() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("note.txt"), "n").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let file = *tree.children(root).unwrap().next().unwrap().1;

    let outcome = rename(&mut tree, &provider, file, "page.HTML").unwrap();
    assert!(outcome.new_path.ends_with("page.HTML"));
}

#[test]
fn test_rename_collision_aborts_without_mutation() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let a = *tree
        .children(root)
        .unwrap()
        .find(|(name, _)| *name == "a.txt")
        .unwrap()
        .1;

    let err = rename(&mut tree, &provider, a, "b.txt").unwrap_err();
    assert!(matches!(err, FileError::AlreadyExists(_)));
    assert_eq!(tree.name(a), Some(&std::ffi::OsString::from("a.txt")));
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "b");
}

#[test]
fn test_rename_vanished_source_aborts() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let a = *tree.children(root).unwrap().next().unwrap().1;

    fs::remove_file(dir.path().join("a.txt")).unwrap();
    let err = rename(&mut tree, &provider, a, "b.txt").unwrap_err();
    assert!(matches!(err, FileError::NotFound(_)));
    assert_eq!(tree.name(a), Some(&std::ffi::OsString::from("a.txt")));
}

#[test]
fn test_rename_folder_rescans_children() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/inner.txt"), "i").unwrap();
    fs::write(dir.path().join("sub/desc.html"), "d").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let sub = *tree.children(root).unwrap().next().unwrap().1;
    expand(&mut tree, &provider, sub);
    assert_eq!(tree.desc_name(sub), Some("desc.html".into()));

    let outcome = rename(&mut tree, &provider, sub, "moved").unwrap();
    assert!(dir.path().join("moved/inner.txt").is_file());
    assert!(outcome.new_path.ends_with("moved"));

    // rescan happened against the new path and re-resolved the description
    assert!(tree.is_expanded(sub));
    assert_eq!(child_names(&tree, sub), vec!["inner.txt"]);
    assert_eq!(tree.desc_name(sub), Some("desc.html".into()));
}

#[test]
fn test_create_new_numbering() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("memo1.txt"), "").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    tree.set_selected(Some(root));

    let outcome = create_new(&mut tree, &provider, None).unwrap();
    assert_eq!(outcome.name, "memo2.txt");
    assert!(dir.path().join("memo2.txt").is_file());
    assert!(outcome.node.is_some());
}

#[test]
fn test_create_new_targets_parent_of_selected_file() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/inner.txt"), "").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let sub = *tree.children(root).unwrap().next().unwrap().1;
    expand(&mut tree, &provider, sub);
    let inner = *tree.children(sub).unwrap().next().unwrap().1;
    tree.set_selected(Some(inner));

    let outcome = create_new(&mut tree, &provider, None).unwrap();
    assert_eq!(outcome.parent, sub);
    assert!(dir.path().join("sub/memo1.txt").is_file());
}

#[test]
fn test_create_new_expands_unexpanded_target() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let sub = *tree.children(root).unwrap().next().unwrap().1;
    tree.set_selected(Some(sub));
    assert!(tree.is_unexpanded(sub));

    let outcome = create_new(&mut tree, &provider, None).unwrap();
    assert_eq!(outcome.parent, sub);
    assert!(!tree.is_unexpanded(sub));
    assert_eq!(child_names(&tree, sub), vec!["memo1.txt"]);
}

#[test]
fn test_create_new_desc_name_stays_invisible() {
    let (dir, provider, mut tree) = setup();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    tree.set_selected(Some(root));

    let outcome = create_new(&mut tree, &provider, Some("desc.txt")).unwrap();
    assert!(outcome.node.is_none());
    assert!(dir.path().join("desc.txt").is_file());
    assert_eq!(tree.child_count(root), 0);
    assert_eq!(tree.desc_name(root), Some("desc.txt".into()));
    assert!(tree.is_expanded(root));
}

#[test]
fn test_create_new_explicit_collision() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("memo1.txt"), "keep").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    tree.set_selected(Some(root));

    let err = create_new(&mut tree, &provider, Some("memo1.txt")).unwrap_err();
    assert!(matches!(err, FileError::AlreadyExists(_)));
    assert_eq!(fs::read_to_string(dir.path().join("memo1.txt")).unwrap(), "keep");
}

#[test]
fn test_create_new_folder_probe() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("folder1")).unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    tree.set_selected(Some(root));

    let outcome = create_new_folder(&mut tree, &provider).unwrap();
    assert_eq!(outcome.name, "folder2");
    assert!(dir.path().join("folder2").is_dir());
    let id = outcome.node.unwrap();
    assert!(tree.is_unexpanded(id));
}

#[test]
fn test_delete_file() {
    let (dir, provider, mut tree) = setup();
    fs::write(dir.path().join("note.txt"), "n").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let file = *tree.children(root).unwrap().next().unwrap().1;

    let outcome = delete(&mut tree, &provider, file).unwrap();
    assert_eq!(outcome.parent, Some(root));
    assert!(!dir.path().join("note.txt").exists());
    assert!(!tree.contains(file));
}

#[test]
fn test_delete_folder_with_only_desc_file() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/desc.txt"), "d").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let sub = *tree.children(root).unwrap().next().unwrap().1;

    delete(&mut tree, &provider, sub).unwrap();
    assert!(!dir.path().join("sub").exists());
    assert!(!tree.contains(sub));
}

#[test]
fn test_delete_nonempty_folder_fails_unchanged() {
    let (dir, provider, mut tree) = setup();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/note.txt"), "n").unwrap();
    let root = tree.root();
    expand(&mut tree, &provider, root);
    let sub = *tree.children(root).unwrap().next().unwrap().1;

    let err = delete(&mut tree, &provider, sub).unwrap_err();
    assert!(matches!(err, FileError::NotEmpty(_)));
    assert!(dir.path().join("sub/note.txt").is_file());
    assert!(tree.contains(sub));
}

#[test]
fn test_ensure_description() {
    let (dir, provider, mut tree) = setup();
    let root = tree.root();
    expand(&mut tree, &provider, root);

    // nothing there yet: an empty primary-extension file appears
    let path = ensure_description(&mut tree, &provider, root).unwrap();
    assert!(path.ends_with("desc.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
    assert_eq!(tree.desc_name(root), Some("desc.txt".into()));

    // a markup description wins only when no text one exists
    fs::remove_file(&path).unwrap();
    fs::write(dir.path().join("desc.html"), "d").unwrap();
    let path = ensure_description(&mut tree, &provider, root).unwrap();
    assert!(path.ends_with("desc.html"));
}

#[test]
fn test_recognized_extensions() {
    assert!(has_recognized_extension("a.txt"));
    assert!(has_recognized_extension("a.HTML"));
    assert!(!has_recognized_extension("a.md"));
    assert!(!has_recognized_extension("txt"));
    assert!(is_desc_name("desc.txt"));
    assert!(is_desc_name("desc.html"));
    assert!(!is_desc_name("describe.txt"));
}
