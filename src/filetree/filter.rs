//! Status-based display filter.

use super::FileStatus;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask selecting which status categories are shown.
///
/// Flags combine with `|`. A filter with no bits set is never valid at
/// evaluation time: [`StatusFilter::matches`] panics on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusFilter(u8);

impl StatusFilter {
    pub const STAGED: Self = Self(1 << 0);
    pub const UNSTAGED: Self = Self(1 << 1);
    pub const UNTRACKED: Self = Self(1 << 2);
    /// Files with merge conflicts.
    pub const CONFLICTED: Self = Self(1 << 3);
    pub const ALL: Self = Self(Self::STAGED.0 | Self::UNSTAGED.0 | Self::UNTRACKED.0 | Self::CONFLICTED.0);

    /// Build a filter from raw bits. Bits outside the four flags are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// OR together any number of filters.
    pub fn combine<I: IntoIterator<Item = StatusFilter>>(filters: I) -> Self {
        filters.into_iter().fold(Self(0), |acc, f| acc | f)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_all(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Panics if no flag is set. An empty filter means the caller forgot to
    /// pick a category, which must not degrade into "show nothing".
    pub fn assert_valid(self) {
        assert!(
            !self.is_empty(),
            "unexpected file display filter: {:#06b}",
            self.0
        );
    }

    /// Whether `file` passes at least one of the active flags.
    pub fn matches(self, file: &FileStatus) -> bool {
        self.assert_valid();
        (self.contains(Self::STAGED) && file.has_staged_changes)
            || (self.contains(Self::UNSTAGED) && file.has_unstaged_changes && file.tracked)
            || (self.contains(Self::UNTRACKED) && !file.tracked)
            || (self.contains(Self::CONFLICTED) && file.has_merge_conflicts)
    }

    /// Next entry in the UI filter cycle: all, then each single flag.
    pub fn next(self) -> Self {
        match self {
            Self::ALL => Self::STAGED,
            Self::STAGED => Self::UNSTAGED,
            Self::UNSTAGED => Self::UNTRACKED,
            Self::UNTRACKED => Self::CONFLICTED,
            _ => Self::ALL,
        }
    }

    /// Short human label for the status bar.
    pub fn label(self) -> String {
        if self.is_all() {
            return "all".to_string();
        }
        let names: Vec<&str> = [
            (Self::STAGED, "staged"),
            (Self::UNSTAGED, "unstaged"),
            (Self::UNTRACKED, "untracked"),
            (Self::CONFLICTED, "conflicted"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join("+")
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for StatusFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatusFilter {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusFilter({})", self.label())
    }
}
