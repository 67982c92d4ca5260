//! Status tree rendering using ratatui Line/Span styling.

use crate::app::App;
use crate::filetree::{FileStatus, Node, StatusFilter};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Configuration for the rendering pipeline.
pub struct RenderConfig {
    /// Whether to emit color styling.
    pub use_color: bool,
}

const DIR_STYLE: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD);
const STAGED_STYLE: Style = Style::new().fg(Color::Green);
const UNSTAGED_STYLE: Style = Style::new().fg(Color::Red);
const CONFLICT_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const MARKER_STYLE: Style = Style::new().fg(Color::DarkGray);
const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

const EXPANDED_MARKER: &str = "\u{25be} "; // ▾
const COLLAPSED_MARKER: &str = "\u{25b8} "; // ▸

/// Sanitize control characters to avoid terminal control-sequence injection.
pub fn sanitize_terminal_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn styled(text: String, style: Style, config: &RenderConfig) -> Span<'static> {
    if config.use_color {
        Span::styled(text, style)
    } else {
        Span::raw(text)
    }
}

fn status_spans(file: &FileStatus, config: &RenderConfig) -> Vec<Span<'static>> {
    let mut chars = file.short_status.chars();
    let x = chars.next().unwrap_or(' ');
    let y = chars.next().unwrap_or(' ');
    let (x_style, y_style) = if file.has_merge_conflicts {
        (CONFLICT_STYLE, CONFLICT_STYLE)
    } else if !file.tracked {
        (UNSTAGED_STYLE, UNSTAGED_STYLE)
    } else {
        (STAGED_STYLE, UNSTAGED_STYLE)
    };
    vec![
        styled(x.to_string(), x_style, config),
        styled(y.to_string(), y_style, config),
        Span::raw(" "),
    ]
}

fn file_name_style(file: &FileStatus) -> Style {
    if file.has_merge_conflicts {
        CONFLICT_STYLE
    } else if file.is_fully_staged() {
        STAGED_STYLE
    } else if file.has_unstaged_changes {
        UNSTAGED_STYLE
    } else {
        Style::new()
    }
}

fn dir_name_style(node: &Node) -> Style {
    if node.any_file(|f| f.has_merge_conflicts) {
        CONFLICT_STYLE
    } else {
        DIR_STYLE
    }
}

/// Convert one visible node into a styled `Line`.
///
/// In tree mode the line is indented by depth; directories get a fold
/// marker. In flat mode the node name is already the full path.
pub fn node_to_line(
    node: &Node,
    collapsed: bool,
    tree_mode: bool,
    config: &RenderConfig,
) -> Line<'static> {
    let mut spans = Vec::new();
    if tree_mode && node.depth() > 1 {
        spans.push(Span::raw("  ".repeat(node.depth() - 1)));
    }

    let safe_name = sanitize_terminal_text(node.name());
    match node.file() {
        Some(file) => {
            spans.extend(status_spans(file, config));
            let text = match &file.previous_path {
                Some(prev) => format!("{} \u{2192} {}", sanitize_terminal_text(prev), safe_name),
                None => safe_name,
            };
            spans.push(styled(text, file_name_style(file), config));
        }
        None => {
            let marker = if collapsed {
                COLLAPSED_MARKER
            } else {
                EXPANDED_MARKER
            };
            spans.push(styled(marker.to_string(), MARKER_STYLE, config));
            spans.push(styled(safe_name, dir_name_style(node), config));
        }
    }

    Line::from(spans)
}

/// Lines for rows `offset..offset + height` of the tree.
pub fn visible_lines(app: &App, height: usize, config: &RenderConfig) -> Vec<Line<'static>> {
    let tree = app.tree();
    if tree.is_empty() {
        return vec![empty_line(tree.get_all_files().is_empty(), tree.get_filter())];
    }
    tree.get_all_items()
        .into_iter()
        .enumerate()
        .skip(app.offset())
        .take(height)
        .map(|(i, node)| {
            let line = node_to_line(
                node,
                tree.is_collapsed(node.path()),
                tree.in_tree_mode(),
                config,
            );
            if i == app.selected() {
                line.patch_style(SELECTED_STYLE)
            } else {
                line
            }
        })
        .collect()
}

fn empty_line(clean: bool, filter: StatusFilter) -> Line<'static> {
    let text = if clean {
        " Working tree clean".to_string()
    } else {
        format!(" No files match filter: {}", filter.label())
    };
    Line::from(Span::styled(text, Style::new().fg(Color::DarkGray)))
}

/// Build a styled status bar `Line`.
pub fn status_bar_line(app: &App) -> Line<'static> {
    let tree = app.tree();
    let mode = if tree.in_tree_mode() { "tree" } else { "flat" };
    let shown = tree
        .get_root()
        .map_or(0, |root| root.files().len());
    let tail = match (&app.message, &app.last_refresh) {
        (Some(msg), _) => sanitize_terminal_text(msg),
        (None, Some(ts)) => format!("Refreshed: {}", sanitize_terminal_text(ts)),
        (None, None) => "Not refreshed yet".to_string(),
    };

    let text = format!(
        " {}  |  {}  |  filter: {}  |  {} of {} files  |  {}",
        sanitize_terminal_text(&app.repo_label),
        mode,
        tree.get_filter().label(),
        shown,
        tree.get_all_files().len(),
        tail
    );

    let style = Style::new()
        .fg(Color::White)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);

    Line::from(Span::styled(text, style))
}

/// Build a help bar `Line` showing available keyboard shortcuts.
pub fn help_bar_line() -> Line<'static> {
    let text = " q: Quit  |  j/k: Move  |  Enter: Fold  |  Space: Stage  |  `: Tree/Flat  |  f: Filter  |  c: Next conflict  |  r: Refresh";
    let style = Style::new().fg(Color::DarkGray);
    Line::from(Span::styled(text.to_string(), style))
}

/// Draw the full screen: file list, status bar, help bar.
pub fn draw(frame: &mut Frame, app: &mut App, config: &RenderConfig) {
    let [list_area, status_area, help_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let height = list_area.height as usize;
    app.ensure_visible(height);

    frame.render_widget(Paragraph::new(visible_lines(app, height, config)), list_area);
    frame.render_widget(Paragraph::new(status_bar_line(app)), status_area);
    frame.render_widget(Paragraph::new(help_bar_line()), help_area);
}

/// Extract plain text from a `Line` (useful for testing).
pub fn line_to_plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
