//! Main event loop: multiplexes repository change events and keyboard input.

use crate::app::{Action, App};
use crate::git;
use crate::render::{draw, RenderConfig};
use crate::terminal::{terminal_size, Term};
use crate::watcher::WatchEvent;
use anyhow::Result;
use crossbeam_channel::{select, Receiver};
use crossterm::event::{self, Event};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Rows taken by the status and help bars.
const CHROME_ROWS: u16 = 2;

/// Reload the status snapshot into `app`. A successful reload clears any
/// status-bar message; failures replace it.
pub fn refresh(app: &mut App, root: &Path) {
    match git::load_status(root) {
        Ok(files) => {
            app.set_files(files);
            app.last_refresh = Some(wall_clock_now());
            app.message = None;
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "status refresh failed");
            app.message = Some(format!("{e:#}"));
        }
    }
}

/// Carry out an [`Action`]. Returns false when the loop should stop.
pub fn apply(action: Action, app: &mut App, root: &Path) -> bool {
    let result = match action {
        Action::None => return true,
        Action::Quit => return false,
        Action::Refresh => Ok(()),
        Action::Stage(paths) => git::stage(root, &paths),
        Action::Unstage(paths) => git::unstage(root, &paths),
    };
    let failure = result.err().map(|e| format!("{e:#}"));
    refresh(app, root);
    if let Some(msg) = failure {
        tracing::warn!(error = %msg, "git command failed");
        app.message = Some(msg);
    }
    true
}

/// Run the main application loop. Blocks until the user quits.
pub fn run(
    term: &mut Term,
    root: &Path,
    app: &mut App,
    render_config: &RenderConfig,
    fs_rx: Receiver<WatchEvent>,
) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));

    // Spawn keyboard input reader
    let (key_tx, key_rx) = crossbeam_channel::unbounded();
    let shutdown_clone = shutdown.clone();
    let input_handle = thread::spawn(move || {
        while !shutdown_clone.load(Ordering::Relaxed) {
            // Poll with a timeout so we can check the shutdown flag
            if event::poll(std::time::Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if key_tx.send(evt).is_err() {
                        break;
                    }
                }
            }
        }
    });

    refresh(app, root);

    let result = loop {
        if let Err(e) = term.draw(|frame| draw(frame, app, render_config)) {
            break Err(anyhow::Error::new(e).context("failed to draw frame"));
        }

        select! {
            recv(fs_rx) -> msg => {
                match msg {
                    Ok(WatchEvent::Changed(paths)) => {
                        tracing::debug!(paths = paths.len(), "refresh after repository change");
                        refresh(app, root);
                    }
                    Ok(WatchEvent::RootDeleted) => {
                        break Err(anyhow::anyhow!("repository deleted: {}", root.display()));
                    }
                    Ok(WatchEvent::Error(e)) => {
                        tracing::warn!(error = %e, "watcher error");
                        app.message = Some(format!("Watcher error: {}", e));
                    }
                    Err(_) => {
                        // Channel closed, watcher thread died
                        break Ok(());
                    }
                }
            }
            recv(key_rx) -> msg => {
                match msg {
                    Ok(Event::Key(key)) => {
                        let (_, rows) = terminal_size();
                        let page = rows.saturating_sub(CHROME_ROWS) as usize;
                        let action = app.handle_key(key, page);
                        tracing::trace!(?key, ?action, "key");
                        if !apply(action, app, root) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {} // resize and friends: the next draw picks it up
                    Err(_) => break Ok(()),
                }
            }
        }
    };

    // Signal shutdown to input thread and wait
    shutdown.store(true, Ordering::Relaxed);
    let _ = input_handle.join();

    result
}

/// Current time as `HH:MM:SS UTC` for the status bar.
fn wall_clock_now() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    let h = (secs % 86400) / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02} UTC", h, m, s)
}
