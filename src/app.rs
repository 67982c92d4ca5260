//! UI state on top of [`FileTree`]: selection, scrolling, and key handling.
//!
//! Nothing here touches the terminal or git; side effects are returned as
//! [`Action`]s for the event loop to carry out.

use crate::filetree::{FileStatus, FileTree, Node, StatusFilter};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::ffi::OsString;

/// Work requested by a key press that the caller has to perform.
///
/// Stage and unstage carry byte-exact pathspecs, see [`FileStatus::pathspec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    Stage(Vec<OsString>),
    Unstage(Vec<OsString>),
}

pub struct App {
    tree: FileTree<Vec<FileStatus>>,
    selected: usize,
    offset: usize,
    /// Repository name shown in the status bar.
    pub repo_label: String,
    /// Wall-clock time of the last successful refresh.
    pub last_refresh: Option<String>,
    /// One-shot message for the status bar (errors, hints).
    pub message: Option<String>,
}

impl App {
    /// Panics if `filter` is empty.
    pub fn new(repo_label: impl Into<String>, show_tree: bool, filter: StatusFilter) -> Self {
        let mut tree = FileTree::new(Vec::new(), show_tree);
        tree.set_filter(filter);
        Self {
            tree,
            selected: 0,
            offset: 0,
            repo_label: repo_label.into(),
            last_refresh: None,
            message: None,
        }
    }

    pub fn tree(&self) -> &FileTree<Vec<FileStatus>> {
        &self.tree
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.tree.get(self.selected)
    }

    fn selected_path(&self) -> Option<String> {
        self.selected_node().map(|n| n.path().to_string())
    }

    /// Replace the status snapshot, keeping the cursor on the same path if it is still shown.
    pub fn set_files(&mut self, files: Vec<FileStatus>) {
        let path = self.selected_path();
        *self.tree.source_mut() = files;
        self.tree.rebuild();
        self.reselect(path);
    }

    fn reselect(&mut self, path: Option<String>) {
        match path.and_then(|p| self.tree.get_index_for_path(&p)) {
            Some(index) => self.selected = index,
            None => self.clamp_selection(),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.tree.len().saturating_sub(1));
    }

    pub fn move_by(&mut self, delta: isize) {
        let target = self.selected.saturating_add_signed(delta);
        self.selected = target;
        self.clamp_selection();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tree.len().saturating_sub(1);
    }

    /// Fold or unfold the selected directory. Files are left alone.
    pub fn toggle_collapse_selected(&mut self) {
        let Some(node) = self.selected_node() else {
            return;
        };
        if node.is_leaf() {
            return;
        }
        let path = node.path().to_string();
        self.tree.toggle_collapsed(&path);
        tracing::debug!(%path, collapsed = self.tree.is_collapsed(&path), "toggled fold");
        self.clamp_selection();
    }

    pub fn toggle_tree_mode(&mut self) {
        let path = self.selected_path();
        self.tree.toggle_show_tree();
        self.reselect(path);
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        let path = self.selected_path();
        self.tree.set_filter(filter);
        self.reselect(path);
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.tree.get_filter().next());
    }

    /// Unfold everything above `path` and move the cursor onto it.
    /// Returns false if the path is not in the current tree.
    pub fn reveal(&mut self, path: &str) -> bool {
        self.tree.expand_to_path(path);
        match self.tree.get_index_for_path(path) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Move to the next file with merge conflicts, wrapping. The search
    /// starts after the selected file, or at the first file inside the
    /// selected directory.
    pub fn jump_to_next_conflict(&mut self) -> bool {
        let target = {
            let Some(root) = self.tree.get_root() else {
                return false;
            };
            let files = root.files();
            let position = |path: &str| files.iter().position(|f| f.path == path);
            let start = match self.selected_node() {
                Some(node) if node.is_leaf() => position(node.path()).map_or(0, |i| i + 1),
                Some(node) => node
                    .files()
                    .first()
                    .and_then(|first| position(&first.path))
                    .unwrap_or(0),
                None => 0,
            };
            files
                .iter()
                .cycle()
                .skip(start)
                .take(files.len())
                .find(|f| f.has_merge_conflicts)
                .map(|f| f.path.clone())
        };
        match target {
            Some(path) => self.reveal(&path),
            None => {
                self.message = Some("no merge conflicts".to_string());
                false
            }
        }
    }

    /// Stage the selected file or directory, or unstage it when everything
    /// under it is already fully staged. Unstaging a rename also unstages
    /// its source so the deletion side leaves the index too.
    pub fn stage_action(&self) -> Action {
        let Some(node) = self.selected_node() else {
            return Action::None;
        };
        let files = node.files();
        if files.is_empty() {
            return Action::None;
        }
        if files.iter().all(|f| f.is_fully_staged()) {
            let mut paths = Vec::new();
            for f in &files {
                paths.push(f.pathspec());
                if f.is_rename() {
                    paths.extend(f.previous_pathspec());
                }
            }
            Action::Unstage(paths)
        } else {
            Action::Stage(files.iter().map(|f| f.pathspec()).collect())
        }
    }

    /// Adjust the scroll offset so the cursor stays inside a window of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
        let max_offset = self.tree.len().saturating_sub(height);
        self.offset = self.offset.min(max_offset);
    }

    /// Translate a key press. `page` is the number of rows a page jump moves.
    pub fn handle_key(&mut self, key: KeyEvent, page: usize) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        let page = page.max(1) as isize;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit
            }
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('r') => return Action::Refresh,
            KeyCode::Char(' ') => return self.stage_action(),
            KeyCode::Char('j') | KeyCode::Down => self.move_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_by(-1),
            KeyCode::PageDown => self.move_by(page),
            KeyCode::PageUp => self.move_by(-page),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),
            KeyCode::Enter => self.toggle_collapse_selected(),
            KeyCode::Char('`') => self.toggle_tree_mode(),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('c') => {
                self.jump_to_next_conflict();
            }
            _ => {}
        }
        Action::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(paths: &[&str]) -> App {
        let mut app = App::new("repo", true, StatusFilter::ALL);
        app.set_files(paths.iter().map(|p| FileStatus::untracked(*p)).collect());
        app
    }

    #[test]
    fn movement_is_clamped() {
        let mut app = app(&["a.txt", "b.txt"]);
        app.handle_key(key(KeyCode::Up), 10);
        assert_eq!(app.selected(), 0);
        app.handle_key(key(KeyCode::PageDown), 10);
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn enter_folds_directories_only() {
        let mut app = app(&["a/b.txt", "c.txt"]);
        app.handle_key(key(KeyCode::Enter), 10);
        assert!(app.tree().is_collapsed("a"));
        assert_eq!(app.tree().len(), 2);
        app.handle_key(key(KeyCode::Down), 10);
        app.handle_key(key(KeyCode::Enter), 10);
        assert!(!app.tree().is_collapsed("c.txt"));
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = app(&[]);
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ev, 1), Action::Quit);
    }

    #[test]
    fn unstaging_a_copy_leaves_its_source_alone() {
        let mut app = App::new("repo", true, StatusFilter::ALL);
        app.set_files(vec![FileStatus {
            path: "copy.rs".into(),
            tracked: true,
            has_staged_changes: true,
            short_status: "C ".into(),
            previous_path: Some("orig.rs".into()),
            ..FileStatus::default()
        }]);
        assert_eq!(
            app.stage_action(),
            Action::Unstage(vec![OsString::from("copy.rs")])
        );
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut app = app(&["a", "b", "c", "d", "e"]);
        app.select_last();
        app.ensure_visible(2);
        assert_eq!(app.offset(), 3);
        app.select_first();
        app.ensure_visible(2);
        assert_eq!(app.offset(), 0);
    }
}
