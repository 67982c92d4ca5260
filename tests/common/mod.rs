#![allow(dead_code)]

use stagetree::filetree::{FileStatus, FileTree};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A tracked file with unstaged edits (` M`).
pub fn modified(path: &str) -> FileStatus {
    FileStatus {
        path: path.to_string(),
        tracked: true,
        has_unstaged_changes: true,
        short_status: " M".to_string(),
        ..FileStatus::default()
    }
}

/// A tracked file whose edits are all staged (`M `).
pub fn staged(path: &str) -> FileStatus {
    FileStatus {
        path: path.to_string(),
        tracked: true,
        has_staged_changes: true,
        short_status: "M ".to_string(),
        ..FileStatus::default()
    }
}

/// An untracked file (`??`).
pub fn untracked(path: &str) -> FileStatus {
    FileStatus::untracked(path)
}

/// A file with merge conflicts (`UU`).
pub fn conflicted(path: &str) -> FileStatus {
    FileStatus {
        path: path.to_string(),
        tracked: true,
        has_unstaged_changes: true,
        has_merge_conflicts: true,
        short_status: "UU".to_string(),
        ..FileStatus::default()
    }
}

/// A built tree over untracked files at `paths`.
pub fn tree_of(paths: &[&str], show_tree: bool) -> FileTree<Vec<FileStatus>> {
    tree_with(paths.iter().map(|p| untracked(p)).collect(), show_tree)
}

pub fn tree_with(files: Vec<FileStatus>, show_tree: bool) -> FileTree<Vec<FileStatus>> {
    let mut tree = FileTree::new(files, show_tree);
    tree.rebuild();
    tree
}

/// Paths of the visible rows, in order.
pub fn visible(tree: &FileTree<Vec<FileStatus>>) -> Vec<String> {
    tree.get_all_items()
        .iter()
        .map(|n| n.path().to_string())
        .collect()
}

/// A mixed snapshot spanning every status category and a few directory levels.
pub fn mixed_snapshot() -> Vec<FileStatus> {
    vec![
        staged("src/app.rs"),
        modified("src/filetree/node.rs"),
        untracked("src/filetree/new.rs"),
        conflicted("src/git.rs"),
        modified("README.md"),
        untracked("docs/guide/intro.md"),
        staged("docs/guide/setup.md"),
        untracked("Cargo.lock"),
    ]
}

/// Whether a usable `git` binary is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

/// Create a scratch repository containing `files` (relative path, contents).
pub fn init_repo(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q"]);
    for (path, contents) in files {
        let full = tmp.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, contents).unwrap();
    }
    tmp
}
