use std::collections::HashSet;

/// Directory paths whose children are hidden in the flattened view.
///
/// Only path strings are stored, so fold state outlives any particular tree:
/// a path stays collapsed across rebuilds even while it is absent from the
/// current tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapsedPaths {
    paths: HashSet<String>,
}

impl CollapsedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn toggle_collapsed(&mut self, path: &str) {
        if !self.paths.remove(path) {
            self.paths.insert(path.to_string());
        }
    }

    /// Expand every ancestor of `path`, and `path` itself, so it becomes visible.
    pub fn expand_to_path(&mut self, path: &str) {
        for (i, _) in path.match_indices('/') {
            self.paths.remove(&path[..i]);
        }
        self.paths.remove(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut c = CollapsedPaths::new();
        c.toggle_collapsed("src");
        assert!(c.is_collapsed("src"));
        c.toggle_collapsed("src");
        assert!(!c.is_collapsed("src"));
        assert!(c.is_empty());
    }

    #[test]
    fn membership_is_exact() {
        let mut c = CollapsedPaths::new();
        c.toggle_collapsed("src/app");
        assert!(!c.is_collapsed("src"));
        assert!(!c.is_collapsed("src/app/main.rs"));
        assert!(!c.is_collapsed("src/ap"));
    }

    #[test]
    fn expand_to_path_clears_ancestors_only() {
        let mut c = CollapsedPaths::new();
        for p in ["a", "a/b", "a/b/c.txt", "a/bc", "z"] {
            c.toggle_collapsed(p);
        }
        c.expand_to_path("a/b/c.txt");
        assert!(!c.is_collapsed("a"));
        assert!(!c.is_collapsed("a/b"));
        assert!(!c.is_collapsed("a/b/c.txt"));
        assert!(c.is_collapsed("a/bc"));
        assert!(c.is_collapsed("z"));
        assert_eq!(c.len(), 2);
    }
}
