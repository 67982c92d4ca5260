use super::{FileStatus, Node};

/// Build a directory hierarchy from a flat status list.
///
/// Intermediate directories become file-less nodes shared by every path
/// below them. Empty segments from leading, trailing or doubled slashes are
/// skipped, and the stored record's `path` is rewritten to the normalised
/// form so it always equals its node's path. A path with no segments at all
/// is dropped.
pub fn build_tree(files: &[FileStatus]) -> Node {
    let mut root = Node::root();
    for file in files {
        let mut current = &mut root;
        let mut path = String::with_capacity(file.path.len());
        for segment in file.path.split('/').filter(|s| !s.is_empty()) {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);
            current = current.child_entry(segment, &path);
        }
        if current.is_root() {
            tracing::trace!(path = %file.path, "skipping status entry with empty path");
            continue;
        }
        let mut file = file.clone();
        file.path = path;
        current.set_file(file);
    }
    root
}

/// Build a one-level tree: every file sits directly under the root, named by
/// its full path and sorted by it.
pub fn build_flat_tree(files: &[FileStatus]) -> Node {
    let mut root = Node::root();
    let leaves = files
        .iter()
        .filter(|f| !f.path.is_empty())
        .cloned()
        .map(Node::flat_leaf)
        .collect();
    root.push_children(leaves);
    root
}
