//! Thin wrapper around the `git` CLI: status snapshots and staging.

use crate::filetree::FileStatus;
use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const CONFLICT_CODES: &[&str] = &["DD", "AA", "UU", "AU", "UA", "UD", "DU"];

fn run_git<S: AsRef<OsStr>>(dir: &Path, args: &[S]) -> Result<Output> {
    let shown = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::trace!(dir = %dir.display(), args = %shown, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        // keep `git status` from refreshing the index behind our back
        .env("GIT_OPTIONAL_LOCKS", "0")
        .output()
        .context("failed to run git")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git {}: {}", shown, stderr.trim());
    }
    Ok(output)
}

/// Resolve the top-level directory of the repository containing `path`.
pub fn repo_root(path: &Path) -> Result<PathBuf> {
    let output = run_git(path, &["rev-parse", "--show-toplevel"])
        .with_context(|| format!("{}: not a git repository", path.display()))?;
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Take a fresh status snapshot of the working tree at `root`.
pub fn load_status(root: &Path) -> Result<Vec<FileStatus>> {
    let output = run_git(
        root,
        &["status", "--porcelain=v1", "-z", "--untracked-files=all"],
    )?;
    let files = parse_porcelain(&output.stdout);
    tracing::debug!(count = files.len(), "loaded git status");
    Ok(files)
}

/// Parse `git status --porcelain=v1 -z` output.
///
/// Records are NUL-terminated `XY path`; renames and copies are followed by
/// one extra record holding the source path. Ignored (`!!`) entries and
/// malformed records are skipped. Paths that are not valid UTF-8 keep their
/// original bytes next to the lossy display string.
pub fn parse_porcelain(raw: &[u8]) -> Vec<FileStatus> {
    let mut records = raw.split(|b| *b == 0).filter(|r| !r.is_empty());
    let mut files = Vec::new();

    while let Some(record) = records.next() {
        let Some(code) = status_code(record) else {
            tracing::warn!(
                record = %String::from_utf8_lossy(record),
                "skipping malformed status record"
            );
            continue;
        };
        let (path, raw_path) = decode_path(&record[3..]);
        let mut chars = code.chars();
        let x = chars.next().unwrap_or(' ');
        let y = chars.next().unwrap_or(' ');

        let (previous_path, raw_previous_path) = if matches!(x, 'R' | 'C') {
            match records.next().map(decode_path) {
                Some((prev, raw_prev)) => (Some(prev), raw_prev),
                None => (None, None),
            }
        } else {
            (None, None)
        };
        if code == "!!" {
            continue;
        }

        let untracked = code == "??";
        files.push(FileStatus {
            path,
            tracked: !untracked,
            has_staged_changes: !matches!(x, ' ' | 'U' | '?'),
            has_unstaged_changes: y != ' ',
            has_merge_conflicts: CONFLICT_CODES.contains(&code),
            short_status: code.to_string(),
            previous_path,
            raw_path,
            raw_previous_path,
        });
    }
    files
}

/// The `XY` code of a record, or `None` unless the record reads `XY path`.
fn status_code(record: &[u8]) -> Option<&str> {
    match record {
        [_, _, b' ', _, ..] => std::str::from_utf8(&record[..2]).ok(),
        _ => None,
    }
}

/// Display string for a path record, plus its bytes when they are not UTF-8.
///
/// Untracked nested repositories are reported as `dir/`; the trailing slash
/// is dropped so the record path matches its tree node.
fn decode_path(bytes: &[u8]) -> (String, Option<Vec<u8>>) {
    let bytes = bytes.strip_suffix(b"/").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(path) => (path.to_string(), None),
        Err(_) => (String::from_utf8_lossy(bytes).into_owned(), Some(bytes.to_vec())),
    }
}

/// `git add` the given paths.
pub fn stage<S: AsRef<OsStr>>(root: &Path, paths: &[S]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    let mut args = vec![OsStr::new("add"), OsStr::new("--")];
    args.extend(paths.iter().map(|p| p.as_ref()));
    run_git(root, &args)?;
    tracing::info!(count = paths.len(), "staged files");
    Ok(())
}

/// Remove the given paths from the index, keeping worktree contents.
pub fn unstage<S: AsRef<OsStr>>(root: &Path, paths: &[S]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    let mut args = vec![OsStr::new("reset"), OsStr::new("-q"), OsStr::new("--")];
    args.extend(paths.iter().map(|p| p.as_ref()));
    run_git(root, &args)?;
    tracing::info!(count = paths.len(), "unstaged files");
    Ok(())
}
