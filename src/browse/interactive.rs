//! Interactive TUI for browsing the album catalog

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

use crate::catalog::{Album, CatalogClient};
use crate::config::ClientConfig;
use crate::events;
use crate::nav::{delete_prompt, DeleteOutcome, LogLevel, Navigator};
use crate::render::{self, ContextAction, CoverSize, DisplayNode, GridView, NavAction, TreeView};
use crate::utils::TuiModeGuard;

type Nav = Navigator<CatalogClient>;

/// Pane receiving movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Tree,
    Grid,
}

/// Modal input state layered over the panes
#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Normal,
    Search,
    ScanInput { text: String, recursive: bool },
    ConfirmDelete(Album),
    ContextMenu {
        node: DisplayNode,
        actions: Vec<ContextAction>,
        selected: usize,
    },
    Help,
}

/// Browser state
struct BrowserState {
    focus: Focus,
    mode: Mode,
    tree: TreeView,
    grid: GridView,
    tree_list: ListState,
    grid_list: ListState,
    cover: CoverSize,
    recursive_default: bool,
    /// Navigator revision the views were last derived from
    rendered_revision: Option<u64>,
    status_message: String,
    /// When the status message was set (for auto-clear timeout)
    status_message_time: Option<Instant>,
}

impl BrowserState {
    fn new(config: &ClientConfig) -> Self {
        Self {
            focus: Focus::Grid,
            mode: Mode::Normal,
            tree: TreeView::new(),
            grid: GridView {
                cards: Vec::new(),
                empty_message: None,
                breadcrumb: None,
            },
            tree_list: ListState::default(),
            grid_list: ListState::default(),
            cover: config.cover_size(),
            recursive_default: config.recursive_scan,
            rendered_revision: None,
            status_message: String::new(),
            status_message_time: None,
        }
    }

    /// Re-derive both views after the navigator replaced its state
    fn sync_views(&mut self, nav: &Nav) {
        if self.rendered_revision == Some(nav.revision()) {
            return;
        }
        self.tree.sync(nav.state(), nav.revision());
        self.grid = render::grid::derive(nav.state(), nav.catalog(), self.cover);
        self.rendered_revision = Some(nav.revision());

        let active_row = self.tree.rows().iter().position(|r| r.node.active);
        self.tree_list.select(active_row.or(Some(0)));
        clamp_selection(&mut self.tree_list, self.tree.rows().len());
        self.grid_list.select(Some(0));
        clamp_selection(&mut self.grid_list, self.grid.cards.len());
    }

    fn selected_node(&self) -> Option<DisplayNode> {
        let rows = self.tree.rows();
        self.tree_list
            .selected()
            .and_then(|i| rows.get(i))
            .map(|row| row.node.clone())
    }

    fn selected_album(&self) -> Option<Album> {
        match self.focus {
            Focus::Tree => self.selected_node().map(|n| n.album),
            Focus::Grid => self
                .grid_list
                .selected()
                .and_then(|i| self.grid.cards.get(i))
                .map(|c| c.album.clone()),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Tree => {
                let len = self.tree.rows().len();
                step_selection(&mut self.tree_list, len, delta);
            }
            Focus::Grid => step_selection(&mut self.grid_list, self.grid.cards.len(), delta),
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tree => Focus::Grid,
            Focus::Grid => Focus::Tree,
        };
    }

    /// Set status message with auto-clear timeout
    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear status message if timeout expired (3 seconds)
    fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time
            && time.elapsed() > Duration::from_secs(3)
        {
            self.status_message.clear();
            self.status_message_time = None;
        }
    }
}

/// Move a list selection by `delta`, wrapping at both ends
fn step_selection(list: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        list.select(None);
        return;
    }
    let current = list.selected().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(len as isize) as usize;
    list.select(Some(next));
}

/// Keep a selection inside a list that may have shrunk
fn clamp_selection(list: &mut ListState, len: usize) {
    match (list.selected(), len) {
        (_, 0) => list.select(None),
        (Some(i), len) if i >= len => list.select(Some(len - 1)),
        (None, _) => list.select(Some(0)),
        _ => {}
    }
}

/// Paths typed into the scan box, separated by `;` or newlines
fn scan_paths(text: &str) -> Vec<String> {
    text.split([';', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the interactive browser
pub async fn run_browser(
    client: CatalogClient,
    config: &ClientConfig,
    start_path: Option<String>,
    keyword: String,
) -> Result<()> {
    // Suppress stderr logging while the TUI owns the terminal
    let _tui = TuiModeGuard::enable();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (log_tx, mut log_rx) = mpsc::unbounded_channel();
    let listener = events::spawn(client.clone(), log_tx);

    let mut navigator = Navigator::new(Arc::new(client));
    let mut state = BrowserState::new(config);
    if !keyword.trim().is_empty() {
        navigator.search(&keyword);
    }
    navigator.open_album(start_path.as_deref());

    // Main loop
    let result = run_browser_loop(&mut terminal, &mut state, &mut navigator, &mut log_rx).await;

    listener.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn run_browser_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    navigator: &mut Nav,
    log_rx: &mut mpsc::UnboundedReceiver<crate::nav::LogLine>,
) -> Result<()> {
    loop {
        // Live scan progress only feeds the log
        while let Ok(line) = log_rx.try_recv() {
            navigator.log_mut().push(line);
        }
        navigator.pump();
        state.sync_views(navigator);
        state.check_status_timeout();

        terminal.draw(|f| draw_ui(f, state, navigator))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(state, navigator, key).await? {
                return Ok(());
            }
        }
    }
}

/// Carry out an action produced by a view
fn dispatch(state: &mut BrowserState, navigator: &mut Nav, action: NavAction) {
    match action {
        NavAction::Open(path) => navigator.open_album(path.as_deref()),
        NavAction::Delete(album) => state.mode = Mode::ConfirmDelete(album),
    }
}

/// Returns `true` when the browser should exit
async fn handle_key(state: &mut BrowserState, navigator: &mut Nav, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match std::mem::replace(&mut state.mode, Mode::Normal) {
        Mode::Normal => return handle_normal_key(state, navigator, key).await,
        Mode::Help => {}
        Mode::Search => match key.code {
            KeyCode::Esc => navigator.search(""),
            KeyCode::Enter => {}
            KeyCode::Backspace => {
                let mut text = navigator.search_text().to_string();
                text.pop();
                navigator.search(&text);
                state.mode = Mode::Search;
            }
            KeyCode::Char(c) => {
                let text = format!("{}{}", navigator.search_text(), c);
                navigator.search(&text);
                state.mode = Mode::Search;
            }
            _ => state.mode = Mode::Search,
        },
        Mode::ScanInput { mut text, mut recursive } => match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                let paths = scan_paths(&text);
                if let Err(e) = navigator.scan(&paths, recursive).await {
                    state.set_status(e.to_string());
                    state.mode = Mode::ScanInput { text, recursive };
                } else {
                    state.set_status("Scan submitted");
                }
            }
            other => {
                match other {
                    KeyCode::Tab => recursive = !recursive,
                    KeyCode::Backspace => {
                        text.pop();
                    }
                    KeyCode::Char(c) => text.push(c),
                    _ => {}
                }
                state.mode = Mode::ScanInput { text, recursive };
            }
        },
        Mode::ConfirmDelete(album) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match navigator.delete_album(&album, &mut |_: &str| true).await {
                    Ok(_) => state.set_status(format!("Deleted {}", album.display_name())),
                    Err(e) => state.set_status(format!("Delete failed: {}", e)),
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                if let Ok(DeleteOutcome::Cancelled) = navigator.delete_album(&album, &mut |_: &str| false).await {
                    state.set_status("Delete cancelled");
                }
            }
            _ => state.mode = Mode::ConfirmDelete(album),
        },
        Mode::ContextMenu {
            node,
            actions,
            mut selected,
        } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {}
            KeyCode::Enter => match actions
                .get(selected)
                .and_then(|&a| render::tree::resolve(a, &node))
            {
                Some(action) => dispatch(state, navigator, action),
                None => state.set_status("Only folders can be opened"),
            },
            code => {
                match code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        selected = (selected + actions.len() - 1) % actions.len().max(1)
                    }
                    KeyCode::Down | KeyCode::Char('j') => selected = (selected + 1) % actions.len().max(1),
                    _ => {}
                }
                state.mode = Mode::ContextMenu {
                    node,
                    actions,
                    selected,
                };
            }
        },
    }
    Ok(false)
}

async fn handle_normal_key(state: &mut BrowserState, navigator: &mut Nav, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Esc => {
            if !navigator.search_text().is_empty() {
                navigator.search("");
            }
        }
        KeyCode::Tab => state.toggle_focus(),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            let action = match state.focus {
                Focus::Tree => state.selected_node().and_then(|n| render::tree::activate(&n)),
                Focus::Grid => state
                    .grid_list
                    .selected()
                    .and_then(|i| state.grid.cards.get(i))
                    .and_then(|c| c.activate()),
            };
            match action {
                Some(action) => dispatch(state, navigator, action),
                None => state.set_status("Only folders can be opened"),
            }
        }
        KeyCode::Char(' ') => {
            if state.focus == Focus::Tree
                && let Some(node) = state.selected_node()
            {
                state.tree.toggle(&node.key);
                let len = state.tree.rows().len();
                clamp_selection(&mut state.tree_list, len);
            }
        }
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => navigator.go_back(),
        KeyCode::Home | KeyCode::Char('g') => navigator.open_album(None),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            let crumb = state
                .grid
                .breadcrumb
                .as_ref()
                .and_then(|b| b.segments.get(index))
                .map(|s| s.activate());
            if let Some(action) = crumb {
                dispatch(state, navigator, action);
            }
        }
        KeyCode::Char('/') => state.mode = Mode::Search,
        KeyCode::Char('x') | KeyCode::Delete => match state.selected_album() {
            Some(album) => state.mode = Mode::ConfirmDelete(album),
            None => state.set_status("Nothing selected"),
        },
        KeyCode::Char('m') => match (state.focus, state.selected_node()) {
            (Focus::Tree, Some(node)) => {
                let actions = render::tree::context_actions(&node);
                state.mode = Mode::ContextMenu {
                    node,
                    actions,
                    selected: 0,
                };
            }
            _ => state.set_status("Context menu is available in the tree (Tab)"),
        },
        KeyCode::Char('s') => {
            state.mode = Mode::ScanInput {
                text: String::new(),
                recursive: state.recursive_default,
            }
        }
        KeyCode::Char('r') => {
            state.set_status("Refreshing...");
            if let Ok(summary) = navigator.refresh().await {
                state.set_status(format!("Removed {} missing albums", summary.removed));
            }
        }
        KeyCode::Char('R') => navigator.reload(),
        KeyCode::Char('?') => state.mode = Mode::Help,
        _ => {}
    }
    debug!("Key {:?} handled, mode {:?}", key.code, state.mode);
    Ok(false)
}

fn draw_ui(f: &mut Frame, state: &BrowserState, navigator: &Nav) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Tree + grid
            Constraint::Length(8), // Activity log
            Constraint::Length(2), // Footer/help
        ])
        .split(f.area());

    draw_header(f, chunks[0], state, navigator);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    draw_tree(f, body[0], state);
    draw_grid(f, body[1], state);
    draw_log(f, chunks[2], navigator);

    let help_text = match &state.mode {
        Mode::Normal => {
            "↑/↓: Move | Enter: Open | Space: Expand | Tab: Pane | h: Back | 1-9: Crumb | /: Search | s: Scan | r: Refresh | x: Delete | ?: Help | q: Quit"
        }
        Mode::Search => "Type to filter | Enter: Done | Esc: Clear",
        Mode::ScanInput { .. } => "Paths separated by ';' | Tab: Recursive | Enter: Submit | Esc: Cancel",
        Mode::ConfirmDelete(_) => "y: Delete | n/Esc: Cancel",
        Mode::ContextMenu { .. } => "↑/↓: Move | Enter: Choose | Esc: Close",
        Mode::Help => "Press any key to close",
    };
    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, chunks[3]);

    match &state.mode {
        Mode::Search => {
            let search = Paragraph::new(format!("Search: {}█", navigator.search_text()))
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("Search"));
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);
            f.render_widget(search, area);
        }
        Mode::ScanInput { text, recursive } => {
            let lines = vec![
                Line::from(format!("{}█", text)),
                Line::styled(
                    format!("[{}] Recursive", if *recursive { "x" } else { " " }),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            let popup = Paragraph::new(lines)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("Scan paths"));
            let area = centered_rect(70, 4, f.area());
            f.render_widget(Clear, area);
            f.render_widget(popup, area);
        }
        Mode::ConfirmDelete(album) => {
            let popup = Paragraph::new(delete_prompt(album))
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title("Confirm delete"));
            let area = centered_rect(60, 5, f.area());
            f.render_widget(Clear, area);
            f.render_widget(popup, area);
        }
        Mode::ContextMenu {
            node,
            actions,
            selected,
        } => {
            let items: Vec<ListItem> = actions.iter().map(|a| ListItem::new(a.label())).collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(node.label.as_str()))
                .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
                .highlight_symbol("> ");
            let mut list_state = ListState::default();
            list_state.select(Some(*selected));
            let area = centered_rect(40, actions.len() as u16 + 2, f.area());
            f.render_widget(Clear, area);
            f.render_stateful_widget(list, area, &mut list_state);
        }
        Mode::Help => draw_help(f),
        Mode::Normal => {}
    }

    // Status message overlay
    if !state.status_message.is_empty() && state.mode == Mode::Normal {
        let status = Paragraph::new(state.status_message.clone())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        let area = centered_rect(50, 3, f.area());
        f.render_widget(Clear, area);
        f.render_widget(status, area);
    }
}

fn draw_header(f: &mut Frame, area: Rect, state: &BrowserState, navigator: &Nav) {
    let mut title = match &state.grid.breadcrumb {
        Some(crumbs) => crumbs.render(),
        None => "All albums".to_string(),
    };
    if !navigator.state().keyword().is_empty() {
        title.push_str(&format!("  [search: {}]", navigator.state().keyword()));
    }
    if navigator.is_loading() {
        title.push_str("  Loading...");
    }

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).border_style(style).title(title)
}

fn draw_tree(f: &mut Frame, area: Rect, state: &BrowserState) {
    let items: Vec<ListItem> = state
        .tree
        .rows()
        .iter()
        .map(|row| {
            let node = row.node;
            let marker = match (node.has_children(), row.expanded) {
                (false, _) => "  ",
                (true, true) => "▾ ",
                (true, false) => "▸ ",
            };
            let style = if node.active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if node.navigable {
                Style::default()
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(format!("{}{}{}", "  ".repeat(node.depth), marker, node.label)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("Albums", state.focus == Focus::Tree))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state.tree_list.clone());
}

fn draw_grid(f: &mut Frame, area: Rect, state: &BrowserState) {
    let block = pane_block("Contents", state.focus == Focus::Grid);

    if let Some(message) = state.grid.empty_message {
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .grid
        .cards
        .iter()
        .map(|card| {
            let title_style = if card.navigable {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(card.title.clone(), title_style),
                Span::raw("  "),
                Span::styled(card.subtitle.clone(), Style::default().fg(Color::DarkGray)),
            ];
            if let Some(size) = &card.size {
                spans.push(Span::styled(format!("  {}", size), Style::default().fg(Color::DarkGray)));
            }
            if let Some(location) = &card.location {
                spans.push(Span::styled(format!("  in {}", location), Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state.grid_list.clone());
}

fn draw_log(f: &mut Frame, area: Rect, navigator: &Nav) {
    let visible = area.height.saturating_sub(2) as usize;
    let log = navigator.log();
    let lines: Vec<Line> = log
        .lines()
        .skip(log.len().saturating_sub(visible))
        .map(|line| {
            let color = match line.level {
                LogLevel::Info => Color::Reset,
                LogLevel::Ok => Color::Green,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Error => Color::Red,
            };
            Line::styled(line.render(), Style::default().fg(color))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Activity"));
    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame) {
    let help_lines = vec![
        Line::from("Keyboard Shortcuts"),
        Line::from(""),
        Line::styled("Navigation", Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  ↑/k, ↓/j    Move up/down"),
        Line::from("  Enter/l     Open folder"),
        Line::from("  Space       Expand/collapse tree node"),
        Line::from("  Backspace/h Go up one level"),
        Line::from("  g           Top level"),
        Line::from("  1-9         Jump to breadcrumb segment"),
        Line::from("  Tab         Switch tree/contents"),
        Line::from(""),
        Line::styled("Catalog", Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  /           Search"),
        Line::from("  s           Scan paths"),
        Line::from("  r           Refresh (drop missing albums)"),
        Line::from("  R           Reload view"),
        Line::from("  x           Delete from catalog"),
        Line::from("  m           Tree context menu"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::styled("Press any key to close", Style::default().fg(Color::DarkGray)),
    ];
    let help_popup = Paragraph::new(help_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .style(Style::default().bg(Color::Black)),
    );
    let area = centered_rect(50, 23, f.area());
    f.render_widget(Clear, area);
    f.render_widget(help_popup, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_selection_wraps() {
        let mut list = ListState::default();
        step_selection(&mut list, 3, -1);
        assert_eq!(list.selected(), Some(2));
        step_selection(&mut list, 3, 1);
        assert_eq!(list.selected(), Some(0));
        step_selection(&mut list, 0, 1);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_clamp_selection() {
        let mut list = ListState::default();
        list.select(Some(7));
        clamp_selection(&mut list, 3);
        assert_eq!(list.selected(), Some(2));
        clamp_selection(&mut list, 0);
        assert_eq!(list.selected(), None);
        clamp_selection(&mut list, 4);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_scan_paths_split() {
        assert_eq!(
            scan_paths(" /a ;\n/b;;  "),
            vec!["/a".to_string(), "/b".to_string()]
        );
        assert!(scan_paths(" ; ").is_empty());
    }

    #[test]
    fn test_focus_toggles() {
        let mut state = BrowserState::new(&ClientConfig::default());
        assert_eq!(state.focus, Focus::Grid);
        state.toggle_focus();
        assert_eq!(state.focus, Focus::Tree);
        assert!(state.selected_album().is_none());
    }
}
