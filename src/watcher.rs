//! Repository watcher using `notify-debouncer-full` with crossbeam channels.
//!
//! Raw filesystem churn inside `.git` (object writes, lock files, reflogs)
//! would otherwise trigger a status refresh loop, so paths matching the
//! ignore set are dropped before an event is sent.

use crossbeam_channel::{self, Receiver, Sender};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, Debouncer, RecommendedCache};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Events emitted by the repository watcher.
#[derive(Debug)]
pub enum WatchEvent {
    /// Relevant paths changed; the status snapshot should be refreshed.
    Changed(Vec<PathBuf>),
    /// The repository root was deleted.
    RootDeleted,
    /// A watcher error occurred.
    Error(String),
}

const DEFAULT_IGNORES: &[&str] = &[
    ".git/objects/**",
    ".git/logs/**",
    ".git/fsmonitor--daemon/**",
    ".git/**/*.lock",
];

/// Build the ignore set from the defaults plus user patterns.
/// Invalid patterns are skipped and logged.
pub fn build_ignore_set(user_patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_IGNORES {
        if let Ok(g) = Glob::new(pattern) {
            builder.add(g);
        }
    }
    for pattern in user_patterns {
        match Glob::new(pattern) {
            Ok(g) => {
                builder.add(g);
            }
            Err(e) => {
                tracing::warn!(%pattern, error = %e, "invalid ignore pattern, skipped");
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to build ignore set");
        GlobSet::empty()
    })
}

/// Keep only the paths not matched by `ignore`, tested relative to `root`.
pub fn relevant_paths<I>(root: &Path, paths: I, ignore: &GlobSet) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|p| {
            let rel = p.strip_prefix(root).unwrap_or(p.as_path());
            !ignore.is_match(rel)
        })
        .collect()
}

/// Start watching a repository. Returns the debouncer (must be kept alive!) and a receiver.
pub fn start_watcher(
    path: &Path,
    debounce_ms: u64,
    ignore: GlobSet,
) -> Result<(Debouncer<RecommendedWatcher, RecommendedCache>, Receiver<WatchEvent>), String> {
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()));
    }

    let (tx, rx): (Sender<WatchEvent>, Receiver<WatchEvent>) = crossbeam_channel::unbounded();
    let root_path = path.to_path_buf();

    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        None,
        move |result: Result<Vec<notify_debouncer_full::DebouncedEvent>, Vec<notify::Error>>| {
            match result {
                Ok(events) => {
                    if std::fs::metadata(&root_path).is_err() {
                        let _ = tx.send(WatchEvent::RootDeleted);
                        return;
                    }
                    let paths = relevant_paths(
                        &root_path,
                        events.iter().flat_map(|e| e.paths.iter().cloned()),
                        &ignore,
                    );
                    if paths.is_empty() {
                        tracing::trace!(events = events.len(), "ignored watcher batch");
                    } else {
                        tracing::debug!(paths = paths.len(), "repository changed");
                        let _ = tx.send(WatchEvent::Changed(paths));
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = tx.send(WatchEvent::Error(format!("{}", error)));
                    }
                }
            }
        },
    )
    .map_err(|e| format!("Failed to create debouncer: {}", e))?;

    debouncer
        .watch(path, RecursiveMode::Recursive)
        .map_err(|e| format!("Failed to watch path {}: {}", path.display(), e))?;

    Ok((debouncer, rx))
}
