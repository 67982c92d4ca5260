mod common;

use common::{git, git_available, init_repo};
use stagetree::filetree::{FileTree, StatusFilter};
use stagetree::git::{load_status, parse_porcelain, repo_root, stage, unstage};
use tempfile::TempDir;

#[test]
fn test_parse_mixed_porcelain_into_tree() {
    let raw = b"M  src/lib.rs\0 M src/main.rs\0?? notes/todo.md\0UU Cargo.toml\0R  docs/new.md\0docs/old.md\0";
    let files = parse_porcelain(raw);
    assert_eq!(files.len(), 5);

    let mut tree = FileTree::new(files, true);
    tree.rebuild();
    let rows: Vec<&str> = tree.get_all_items().iter().map(|n| n.path()).collect();
    assert_eq!(
        rows,
        vec![
            "Cargo.toml",
            "docs",
            "docs/new.md",
            "notes",
            "notes/todo.md",
            "src",
            "src/lib.rs",
            "src/main.rs",
        ]
    );

    tree.set_filter(StatusFilter::CONFLICTED);
    assert_eq!(tree.len(), 1);
    assert_eq!(
        tree.get_file("docs/new.md").and_then(|f| f.previous_path.as_deref()),
        Some("docs/old.md")
    );
}

#[test]
fn test_status_of_scratch_repo() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo(&[("staged.txt", "a"), ("dir/untracked.txt", "b")]);
    git(repo.path(), &["add", "staged.txt"]);

    let root = repo_root(repo.path()).unwrap();
    let files = load_status(&root).unwrap();
    let staged = files.iter().find(|f| f.path == "staged.txt").unwrap();
    assert!(staged.tracked);
    assert!(staged.has_staged_changes);
    assert!(!staged.has_unstaged_changes);

    let untracked = files.iter().find(|f| f.path == "dir/untracked.txt").unwrap();
    assert!(!untracked.tracked);
}

#[test]
fn test_stage_then_unstage_round_trip() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo(&[("base.txt", "v1")]);
    git(repo.path(), &["add", "base.txt"]);
    git(repo.path(), &["commit", "-q", "-m", "init"]);
    std::fs::write(repo.path().join("base.txt"), "v2").unwrap();

    let root = repo_root(repo.path()).unwrap();
    let before = load_status(&root).unwrap();
    assert_eq!(before[0].short_status, " M");

    stage(&root, &["base.txt"]).unwrap();
    let after = load_status(&root).unwrap();
    assert_eq!(after[0].short_status, "M ");
    assert!(after[0].is_fully_staged());

    unstage(&root, &["base.txt"]).unwrap();
    let reverted = load_status(&root).unwrap();
    assert_eq!(reverted[0].short_status, " M");
}

#[test]
fn test_non_repo_directory_is_an_error() {
    let tmp = TempDir::new().unwrap();
    // tempdirs normally live outside any repository; skip if this one doesn't
    if git_available() && repo_root(tmp.path()).is_ok() {
        return;
    }
    let err = repo_root(tmp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("not a git repository"));
}

#[test]
fn test_stage_nothing_is_a_noop() {
    let tmp = TempDir::new().unwrap();
    assert!(stage::<&str>(tmp.path(), &[]).is_ok());
    assert!(unstage::<&str>(tmp.path(), &[]).is_ok());
}

#[test]
fn test_nested_repo_record_is_found_by_node_path() {
    let files = parse_porcelain(b"?? vendor/lib/\0");
    let mut tree = FileTree::new(files, true);
    tree.rebuild();
    let node = tree.get(1).unwrap();
    assert_eq!(node.path(), "vendor/lib");
    assert!(tree.get_file(node.path()).is_some());
}

// Linux filesystems accept arbitrary bytes in names; macOS and Windows don't.
#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_name_can_be_staged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo(&[]);
    let name = OsStr::from_bytes(b"bad\xffname.txt");
    std::fs::write(repo.path().join(name), "x").unwrap();

    let root = repo_root(repo.path()).unwrap();
    let files = load_status(&root).unwrap();
    assert_eq!(files.len(), 1);
    let file = &files[0];
    assert_eq!(file.path, "bad\u{fffd}name.txt");
    assert_eq!(file.pathspec().as_os_str(), name);

    stage(&root, &[file.pathspec()]).unwrap();
    let after = load_status(&root).unwrap();
    assert_eq!(after[0].short_status, "A ");
    assert!(after[0].is_fully_staged());
}
