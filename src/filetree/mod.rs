//! Status tree: filtering, folding, and index mapping over a status snapshot.
//!
//! [`FileTree`] is what the list view talks to. External row indices are
//! 0-based over non-root nodes; the traversal methods on [`Node`] count the
//! root as element 0. The translation between the two happens only here.

mod builder;
mod collapsed;
mod file;
mod filter;
mod node;

pub use builder::{build_flat_tree, build_tree};
pub use collapsed::CollapsedPaths;
pub use file::FileStatus;
pub use filter::StatusFilter;
pub use node::Node;

/// Supplies the current status snapshot. Each call is treated as complete.
pub trait FileSource {
    fn files(&self) -> &[FileStatus];
}

impl FileSource for Vec<FileStatus> {
    fn files(&self) -> &[FileStatus] {
        self
    }
}

/// Filterable, foldable view over a [`FileSource`].
///
/// The tree is rebuilt from scratch by [`FileTree::rebuild`],
/// [`FileTree::set_filter`] and [`FileTree::toggle_show_tree`]. Fold state
/// lives outside the tree and survives rebuilds. Until the first rebuild
/// every index accessor behaves as if the tree were empty.
#[derive(Debug)]
pub struct FileTree<S> {
    source: S,
    tree: Option<Node>,
    show_tree: bool,
    filter: StatusFilter,
    collapsed: CollapsedPaths,
}

impl<S: FileSource> FileTree<S> {
    pub fn new(source: S, show_tree: bool) -> Self {
        Self {
            source,
            tree: None,
            show_tree,
            filter: StatusFilter::ALL,
            collapsed: CollapsedPaths::new(),
        }
    }

    /// Mutable access to the snapshot. Call [`FileTree::rebuild`] afterwards.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn in_tree_mode(&self) -> bool {
        self.show_tree
    }

    pub fn toggle_show_tree(&mut self) {
        self.show_tree = !self.show_tree;
        self.rebuild();
    }

    /// Replace the filter and rebuild. Panics on an empty filter.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.rebuild();
    }

    pub fn get_filter(&self) -> StatusFilter {
        self.filter
    }

    /// Files in the snapshot satisfying `test`, in snapshot order.
    pub fn filter_files<F>(&self, test: F) -> Vec<FileStatus>
    where
        F: Fn(&FileStatus) -> bool,
    {
        self.source
            .files()
            .iter()
            .filter(|f| test(*f))
            .cloned()
            .collect()
    }

    fn files_for_display(&self) -> Vec<FileStatus> {
        let filter = self.filter;
        filter.assert_valid();
        if filter.is_all() {
            self.source.files().to_vec()
        } else {
            self.filter_files(|f| filter.matches(f))
        }
    }

    /// Re-read the source and rebuild the tree in the current mode.
    pub fn rebuild(&mut self) {
        let files = self.files_for_display();
        let tree = if self.show_tree {
            build_tree(&files)
        } else {
            build_flat_tree(&files)
        };
        tracing::debug!(
            total = self.source.files().len(),
            shown = files.len(),
            tree_mode = self.show_tree,
            filter = %self.filter.label(),
            "rebuilt file tree"
        );
        self.tree = Some(tree);
    }

    pub fn expand_to_path(&mut self, path: &str) {
        self.collapsed.expand_to_path(path);
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.is_collapsed(path)
    }

    /// Fold or unfold `path`. Changes visibility only; no rebuild.
    pub fn toggle_collapsed(&mut self, path: &str) {
        self.collapsed.toggle_collapsed(path);
    }

    pub fn collapsed_paths(&self) -> &CollapsedPaths {
        &self.collapsed
    }

    /// Visible row `index`, or `None` if the index is past [`FileTree::len`].
    pub fn get(&self, index: usize) -> Option<&Node> {
        // +1 skips the root
        self.tree
            .as_ref()?
            .node_at_index(index.checked_add(1)?, &self.collapsed)
    }

    /// Row index of `path`, or `None` if it is absent or folded away.
    pub fn get_index_for_path(&self, path: &str) -> Option<usize> {
        self.tree
            .as_ref()?
            .index_for_path(path, &self.collapsed)?
            .checked_sub(1)
    }

    /// Number of visible rows, root excluded.
    pub fn len(&self) -> usize {
        self.tree
            .as_ref()
            .map_or(0, |t| t.size(&self.collapsed) - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All visible rows in order, including those scrolled off screen.
    /// Filtered-out files and folded subtrees are absent.
    pub fn get_all_items(&self) -> Vec<&Node> {
        match &self.tree {
            Some(tree) => tree.flatten(&self.collapsed).split_off(1),
            None => Vec::new(),
        }
    }

    /// The unfiltered snapshot.
    pub fn get_all_files(&self) -> &[FileStatus] {
        self.source.files()
    }

    /// Look a file up in the unfiltered snapshot by exact path.
    pub fn get_file(&self, path: &str) -> Option<&FileStatus> {
        self.source.files().iter().find(|f| f.path == path)
    }

    pub fn get_root(&self) -> Option<&Node> {
        self.tree.as_ref()
    }
}
