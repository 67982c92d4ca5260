use crate::filetree::StatusFilter;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  stagetree                      Show the repository containing the current directory
  stagetree --flat ~/src/app     Start with a flat path list
  stagetree -f staged -f conflicted
                                 Only show staged or conflicted files
  stagetree --log-file /tmp/st.log -vv
                                 Write trace logs while running

Keys: j/k move, Enter fold, Space stage, ` tree/flat, f filter, r refresh, q quit";

/// Status category selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Staged,
    Unstaged,
    Untracked,
    Conflicted,
    All,
}

impl From<FilterKind> for StatusFilter {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Staged => StatusFilter::STAGED,
            FilterKind::Unstaged => StatusFilter::UNSTAGED,
            FilterKind::Untracked => StatusFilter::UNTRACKED,
            FilterKind::Conflicted => StatusFilter::CONFLICTED,
            FilterKind::All => StatusFilter::ALL,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "stagetree",
    version,
    about = "Live, foldable tree view of git working tree status",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Path inside the repository (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Start with a flat path list instead of a directory tree
    #[arg(long = "flat")]
    pub flat: bool,

    /// Status categories to show (repeatable, OR-combined)
    #[arg(short = 'f', long = "filter", value_enum, action = ArgAction::Append)]
    pub filter: Vec<FilterKind>,

    /// Glob patterns, relative to the repo root, whose changes do not trigger a refresh
    #[arg(short = 'I', long = "ignore", action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Debounce interval in milliseconds (minimum 50)
    #[arg(long = "debounce", default_value = "200")]
    pub debounce_ms: u64,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.debounce_ms < 50 {
            self.debounce_ms = 50;
        }
        // Respect NO_COLOR env var
        if std::env::var_os("NO_COLOR").is_some() {
            self.no_color = true;
        }
        self
    }

    /// Combined display filter; all categories when none were given.
    pub fn status_filter(&self) -> StatusFilter {
        if self.filter.is_empty() {
            return StatusFilter::ALL;
        }
        StatusFilter::combine(self.filter.iter().copied().map(StatusFilter::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_combine() {
        let args = Args::parse_from(["stagetree", "-f", "staged", "--filter", "untracked"]);
        assert_eq!(
            args.status_filter(),
            StatusFilter::STAGED | StatusFilter::UNTRACKED
        );
    }

    #[test]
    fn default_filter_is_all() {
        let args = Args::parse_from(["stagetree"]);
        assert_eq!(args.status_filter(), StatusFilter::ALL);
        assert!(!args.flat);
    }

    #[test]
    fn debounce_is_clamped() {
        let args = Args::parse_from(["stagetree", "--debounce", "5"]).validated();
        assert_eq!(args.debounce_ms, 50);
    }

    #[test]
    fn unknown_filter_is_rejected() {
        assert!(Args::try_parse_from(["stagetree", "-f", "nonsense"]).is_err());
    }
}
