use std::ffi::OsString;

/// One entry of a working-tree status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileStatus {
    /// Slash-separated path relative to the repository root.
    pub path: String,
    /// Whether git knows about this file (false for `??` entries).
    pub tracked: bool,
    /// Whether the index differs from HEAD for this file.
    pub has_staged_changes: bool,
    /// Whether the working copy differs from the index for this file.
    pub has_unstaged_changes: bool,
    /// Whether the file is in an unmerged state.
    pub has_merge_conflicts: bool,
    /// Two-character porcelain status code, e.g. `"M "` or `"??"`.
    pub short_status: String,
    /// Source path of a rename or copy.
    pub previous_path: Option<String>,
    /// Bytes git reported for `path`, kept only when they are not valid UTF-8.
    pub raw_path: Option<Vec<u8>>,
    /// Bytes git reported for `previous_path`, kept only when not valid UTF-8.
    pub raw_previous_path: Option<Vec<u8>>,
}

impl FileStatus {
    /// An untracked file, as reported by `??`.
    pub fn untracked(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tracked: false,
            has_unstaged_changes: true,
            short_status: "??".to_string(),
            ..Self::default()
        }
    }

    /// Whether this entry is a rename staged in the index (`R` in the X column).
    pub fn is_rename(&self) -> bool {
        self.short_status.starts_with('R')
    }

    /// The path to hand back to git, byte-exact even when `path` is lossy.
    pub fn pathspec(&self) -> OsString {
        to_os_string(self.raw_path.as_deref(), &self.path)
    }

    /// Like [`FileStatus::pathspec`], for the rename or copy source.
    pub fn previous_pathspec(&self) -> Option<OsString> {
        self.previous_path
            .as_deref()
            .map(|prev| to_os_string(self.raw_previous_path.as_deref(), prev))
    }

    /// True when everything about this file is staged and nothing is left in the worktree.
    pub fn is_fully_staged(&self) -> bool {
        self.has_staged_changes && !self.has_unstaged_changes && !self.has_merge_conflicts
    }
}

#[cfg(unix)]
fn to_os_string(raw: Option<&[u8]>, lossy: &str) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    match raw {
        Some(bytes) => std::ffi::OsStr::from_bytes(bytes).to_os_string(),
        None => OsString::from(lossy),
    }
}

// git emits UTF-8 paths on non-unix platforms, so the lossy form is exact.
#[cfg(not(unix))]
fn to_os_string(_raw: Option<&[u8]>, lossy: &str) -> OsString {
    OsString::from(lossy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_constructor_sets_flags() {
        let f = FileStatus::untracked("notes/todo.md");
        assert!(!f.tracked);
        assert!(f.has_unstaged_changes);
        assert!(!f.has_staged_changes);
        assert_eq!(f.short_status, "??");
    }

    #[test]
    fn pathspec_defaults_to_path() {
        let f = FileStatus::untracked("a/b.rs");
        assert_eq!(f.pathspec(), OsString::from("a/b.rs"));
        assert_eq!(f.previous_pathspec(), None);
    }

    #[cfg(unix)]
    #[test]
    fn pathspec_prefers_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let f = FileStatus {
            path: "bad\u{fffd}.txt".into(),
            raw_path: Some(b"bad\xff.txt".to_vec()),
            ..FileStatus::default()
        };
        assert_eq!(f.pathspec().as_bytes(), b"bad\xff.txt");
    }

    #[test]
    fn only_index_renames_count_as_renames() {
        let mut f = FileStatus::untracked("new.rs");
        f.short_status = "R ".into();
        assert!(f.is_rename());
        f.short_status = "C ".into();
        assert!(!f.is_rename());
    }

    #[test]
    fn fully_staged_requires_clean_worktree() {
        let mut f = FileStatus {
            path: "x".into(),
            tracked: true,
            has_staged_changes: true,
            ..FileStatus::default()
        };
        assert!(f.is_fully_staged());
        f.has_unstaged_changes = true;
        assert!(!f.is_fully_staged());
    }
}
