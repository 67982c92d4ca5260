//! Tree node and the traversal algorithms the list view indexes through.
//!
//! Every traversal here walks the same visible pre-order sequence: a node is
//! emitted, then its children in name order, unless the node's path is in
//! the collapsed set. The root is always element 0 of that sequence.

use super::{CollapsedPaths, FileStatus};

/// A directory or file in the status tree.
///
/// Directories (including the root) carry no [`FileStatus`]; file nodes do.
/// Children are kept sorted by byte-wise name, files and directories
/// interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    path: String,
    depth: usize,
    file: Option<FileStatus>,
    children: Vec<Node>,
}

impl Node {
    /// An empty root: no name, no path, no file.
    pub fn root() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            depth: 0,
            file: None,
            children: Vec::new(),
        }
    }

    /// Path segment shown for this node. In flat trees this is the full path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full slash-separated path from the repository root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Distance from the root (root = 0, its children = 1).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn file(&self) -> Option<&FileStatus> {
        self.file.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// True for nodes that represent a file.
    pub fn is_leaf(&self) -> bool {
        self.file.is_some()
    }

    /// Visible nodes in display order, root first.
    pub fn flatten<'a>(&'a self, collapsed: &CollapsedPaths) -> Vec<&'a Node> {
        let mut out = Vec::new();
        self.flatten_into(&mut out, collapsed);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Node>, collapsed: &CollapsedPaths) {
        out.push(self);
        if collapsed.is_collapsed(&self.path) {
            return;
        }
        for child in &self.children {
            child.flatten_into(out, collapsed);
        }
    }

    /// Number of nodes [`Node::flatten`] would return, without building the list.
    pub fn size(&self, collapsed: &CollapsedPaths) -> usize {
        if collapsed.is_collapsed(&self.path) {
            return 1;
        }
        1 + self
            .children
            .iter()
            .map(|child| child.size(collapsed))
            .sum::<usize>()
    }

    /// The `index`-th visible node. `None` past the end, never a neighbour.
    pub fn node_at_index(&self, index: usize, collapsed: &CollapsedPaths) -> Option<&Node> {
        let mut remaining = index;
        self.nth_visible(&mut remaining, collapsed)
    }

    fn nth_visible(&self, remaining: &mut usize, collapsed: &CollapsedPaths) -> Option<&Node> {
        if *remaining == 0 {
            return Some(self);
        }
        *remaining -= 1;
        if collapsed.is_collapsed(&self.path) {
            return None;
        }
        self.children
            .iter()
            .find_map(|child| child.nth_visible(remaining, collapsed))
    }

    /// Position of `path` in the visible sequence.
    ///
    /// `None` when the path is not in the tree or sits below a collapsed
    /// directory.
    pub fn index_for_path(&self, path: &str, collapsed: &CollapsedPaths) -> Option<usize> {
        let mut index = 0;
        self.locate(path, &mut index, collapsed).then_some(index)
    }

    fn locate(&self, path: &str, index: &mut usize, collapsed: &CollapsedPaths) -> bool {
        if self.path == path {
            return true;
        }
        *index += 1;
        if collapsed.is_collapsed(&self.path) {
            return false;
        }
        self.children
            .iter()
            .any(|child| child.locate(path, index, collapsed))
    }

    /// Every file at or below this node, in tree order. Ignores collapse state.
    pub fn files(&self) -> Vec<&FileStatus> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileStatus>) {
        if let Some(file) = &self.file {
            out.push(file);
        }
        for child in &self.children {
            child.collect_files(out);
        }
    }

    /// Whether any file at or below this node satisfies `pred`.
    pub fn any_file<F>(&self, pred: F) -> bool
    where
        F: Fn(&FileStatus) -> bool + Copy,
    {
        self.file.as_ref().is_some_and(pred) || self.children.iter().any(|c| c.any_file(pred))
    }

    /// Find the child named `name`, creating it at its sorted position if missing.
    pub(super) fn child_entry(&mut self, name: &str, path: &str) -> &mut Node {
        match self
            .children
            .binary_search_by(|c| c.name.as_str().cmp(name))
        {
            Ok(i) => &mut self.children[i],
            Err(i) => {
                let child = Node {
                    name: name.to_string(),
                    path: path.to_string(),
                    depth: self.depth + 1,
                    file: None,
                    children: Vec::new(),
                };
                self.children.insert(i, child);
                &mut self.children[i]
            }
        }
    }

    pub(super) fn set_file(&mut self, file: FileStatus) {
        self.file = Some(file);
    }

    /// A file node hanging directly below the root, named by its full path.
    pub(super) fn flat_leaf(file: FileStatus) -> Self {
        Self {
            name: file.path.clone(),
            path: file.path.clone(),
            depth: 1,
            file: Some(file),
            children: Vec::new(),
        }
    }

    pub(super) fn push_children(&mut self, mut children: Vec<Node>) {
        children.sort_by(|a, b| a.name.cmp(&b.name));
        self.children = children;
    }
}
