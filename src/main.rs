#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use stagetree::app::App;
use stagetree::cli::Args;
use stagetree::render::RenderConfig;
use stagetree::watcher::build_ignore_set;
use stagetree::{event_loop, git, logging, terminal, watcher};
use std::path::Path;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("stagetree: {e:#}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let args = Args::parse().validated();
    logging::init(args.log_file.as_deref(), args.verbose)?;

    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("{}: failed to resolve path", args.path.display()))?;

    anyhow::ensure!(path.is_dir(), "{}: Not a directory", path.display());

    let root = git::repo_root(&path)?;
    tracing::info!(root = %root.display(), flat = args.flat, "starting");

    let (term_width, _) = terminal::terminal_size();
    let title = build_terminal_title(&root, term_width as usize);

    let render_config = RenderConfig {
        use_color: !args.no_color,
    };
    let label = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());
    let mut app = App::new(label, !args.flat, args.status_filter());

    let (_debouncer, fs_rx) =
        watcher::start_watcher(&root, args.debounce_ms, build_ignore_set(&args.ignore))
            .map_err(anyhow::Error::msg)
            .context("failed to start watcher")?;

    // Set the window/pane title so multiplexers can show which repo this is.
    if let Some(title) = title {
        use std::io::Write as _;
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\x1b]0;{}\x07", title);
        let _ = stdout.flush();
    }

    let (guard, mut term) = terminal::init().context("failed to initialize terminal")?;
    let result = event_loop::run(&mut term, &root, &mut app, &render_config, fs_rx);
    drop(guard);
    tracing::info!(ok = result.is_ok(), "exiting");
    result
}

/// Build a title of the form "stagetree <repo>", truncated with a middle
/// ellipsis so it does not exceed `max_cols` characters.
fn build_terminal_title(path: &Path, max_cols: usize) -> Option<String> {
    if max_cols == 0 {
        return None;
    }

    let display = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let raw_title = format!("stagetree {}", display);
    let sanitized = sanitize_title(&raw_title);
    Some(truncate_middle(&sanitized, max_cols))
}

/// Remove control characters that might interfere with terminal behavior.
fn sanitize_title(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .collect()
}

/// Truncate a string in the middle with "..." so its length does not exceed
/// `max_cols` characters.
fn truncate_middle(input: &str, max_cols: usize) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= max_cols {
        return input.to_string();
    }
    if max_cols <= 3 {
        return ".".repeat(max_cols);
    }

    let ellipsis = "...";
    let keep = max_cols - ellipsis.len();
    let prefix_len = keep / 2 + keep % 2;
    let suffix_len = keep / 2;

    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - suffix_len..].iter().collect();

    format!("{prefix}{ellipsis}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn truncate_middle_short_strings_unchanged() {
        assert_eq!(truncate_middle("short", 10), "short");
    }

    #[test]
    fn truncate_middle_basic_case() {
        let s = "current_path_too_long";
        let truncated = truncate_middle(s, 16);
        assert_eq!(truncated, "current...o_long");
        assert_eq!(truncated.len(), 16);
    }

    #[test]
    fn truncate_middle_counts_chars_not_bytes() {
        let truncated = truncate_middle("ññññññññññ", 7);
        assert_eq!(truncated.chars().count(), 7);
    }

    #[test]
    fn title_shows_repo_dir_name_only() {
        let path = PathBuf::from("/home/testuser/projects/widget");
        let title = build_terminal_title(&path, 80).unwrap();
        assert_eq!(title, "stagetree widget");
    }

    #[test]
    fn title_strips_control_characters() {
        let path = PathBuf::from("/tmp/bad\x07name");
        let title = build_terminal_title(&path, 80).unwrap();
        assert_eq!(title, "stagetree badname");
    }
}
