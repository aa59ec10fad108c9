//! Main TUI application state and event loop

use std::cell::Cell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::{debug, warn};

use crate::board::{
    AssignmentBoard, BoardKind, DragEnd, DragPhase, LayoutMode, Mutation, RegionalWizard,
    ResizeSubscription, ViewportMonitor,
};
use crate::journal::IntentJournal;

use super::views::{
    column_views, draw_column, draw_regional_modal, draw_tab_strip, draw_team_panel,
    RegionalModal, TeamPanelView,
};
use super::widgets::{
    draw_drag_preview, draw_search_prompt, draw_status_bar, rect_contains, themed_block,
    StatusTone, COLOR_ACCENT, COLOR_BG,
};

const PAGE_JUMP: usize = 10;
const TEAM_PANEL_WIDTH: u16 = 34;

/// Configuration for launching the TUI
pub struct TuiConfig {
    /// Board session seeded from the snapshot
    pub board: AssignmentBoard,

    /// Where applied mutations are appended, if anywhere
    pub journal: Option<IntentJournal>,

    /// Terminal width under which columns collapse into tabs
    pub mobile_breakpoint: u16,

    /// Capture mouse events for drag and drop
    pub mouse: bool,

    /// Event poll interval
    pub tick: Duration,
}

/// Which side of the board keyboard navigation acts on
#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Focus {
    #[default]
    Team,
    Columns,
}

/// Screen regions from the last frame, for pointer hit testing
#[derive(Default)]
struct HitMap {
    team_rows: Vec<(String, Rect)>,
    columns: Vec<(String, Rect)>,
    cards: Vec<(String, String, Rect)>,
}

impl HitMap {
    fn team_row_at(&self, column: u16, row: u16) -> Option<&str> {
        self.team_rows
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(id, _)| id.as_str())
    }

    fn column_at(&self, column: u16, row: u16) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(id, _)| id.as_str())
    }

    fn card_at(&self, column: u16, row: u16) -> Option<(&str, &str)> {
        self.cards
            .iter()
            .find(|(_, _, rect)| rect_contains(*rect, column, row))
            .map(|(demand, member, _)| (demand.as_str(), member.as_str()))
    }
}

/// Main application state
pub struct App {
    board: AssignmentBoard,
    journal: Option<IntentJournal>,

    /// Viewport tracking; the subscription lives exactly as long as the app
    monitor: ViewportMonitor,
    _resize: ResizeSubscription,
    layout_flipped: Rc<Cell<bool>>,

    focus: Focus,
    team_selected: usize,
    team_offset: usize,
    /// Focused column; doubles as the active tab in the narrow layout
    column_index: usize,
    card_selected: usize,
    /// Scroll position per demand column, by index
    card_offsets: Vec<usize>,

    search_mode: bool,
    modal: Option<RegionalModal>,

    pointer: Option<(u16, u16)>,
    hits: HitMap,

    status_message: String,
    status_tone: StatusTone,
    should_quit: bool,
}

impl App {
    fn new(config: TuiConfig, width: u16) -> Self {
        let monitor = ViewportMonitor::new(config.mobile_breakpoint, width);
        let layout_flipped = Rc::new(Cell::new(false));
        let resize = {
            let flipped = layout_flipped.clone();
            monitor.subscribe(move |_| flipped.set(true))
        };

        Self {
            board: config.board,
            journal: config.journal,
            monitor,
            _resize: resize,
            layout_flipped,
            focus: Focus::Team,
            team_selected: 0,
            team_offset: 0,
            column_index: 0,
            card_selected: 0,
            card_offsets: Vec::new(),
            search_mode: false,
            modal: None,
            pointer: None,
            hits: HitMap::default(),
            status_message: "Drag a member onto a demand · '/' search · 'q' quit".to_string(),
            status_tone: StatusTone::Info,
            should_quit: false,
        }
    }

    fn set_status<S: Into<String>>(&mut self, message: S, tone: StatusTone) {
        self.status_message = message.into();
        self.status_tone = tone;
    }

    fn layout_mode(&self) -> LayoutMode {
        if self.monitor.is_mobile() {
            LayoutMode::Tabs {
                active: self.column_index,
            }
        } else {
            LayoutMode::Columns
        }
    }

    fn on_resize(&mut self, width: u16) {
        self.monitor.resize(width);
        if self.layout_flipped.replace(false) {
            let label = match self.layout_mode() {
                LayoutMode::Columns => "Wide layout: all demands side by side",
                LayoutMode::Tabs { .. } => "Narrow layout: Tab switches demand",
            };
            self.set_status(label, StatusTone::Info);
        }
    }

    // Selection helpers

    fn selected_member_id(&self) -> Option<String> {
        self.board
            .filtered_members()
            .get(self.team_selected)
            .map(|m| m.id.clone())
    }

    fn focused_demand_id(&self) -> Option<String> {
        self.board
            .demands()
            .get(self.column_index)
            .map(|d| d.id.clone())
    }

    fn selected_card(&self) -> Option<(String, String)> {
        let demand = self.board.demands().get(self.column_index)?;
        let entry = demand.assigned.get(self.card_selected)?;
        Some((demand.id.clone(), entry.member_id().to_string()))
    }

    fn clamp_selection(&mut self) {
        let members = self.board.filtered_members().len();
        self.team_selected = self.team_selected.min(members.saturating_sub(1));
        let columns = self.board.demands().len();
        self.column_index = self.column_index.min(columns.saturating_sub(1));
        let cards = self
            .board
            .demands()
            .get(self.column_index)
            .map(|d| d.assigned.len())
            .unwrap_or(0);
        self.card_selected = self.card_selected.min(cards.saturating_sub(1));
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Team => {
                let len = self.board.filtered_members().len();
                if len > 0 {
                    let next = (self.team_selected as isize + delta).clamp(0, len as isize - 1);
                    self.team_selected = next as usize;
                }
            }
            Focus::Columns => {
                let len = self
                    .board
                    .demands()
                    .get(self.column_index)
                    .map(|d| d.assigned.len())
                    .unwrap_or(0);
                if len > 0 {
                    let next = (self.card_selected as isize + delta).clamp(0, len as isize - 1);
                    self.card_selected = next as usize;
                }
            }
        }
    }

    fn move_column(&mut self, delta: isize) {
        let len = self.board.demands().len();
        if len == 0 {
            return;
        }
        let next = (self.column_index as isize + delta).rem_euclid(len as isize);
        self.column_index = next as usize;
        self.card_selected = 0;
        if self.board.drag().is_dragging() {
            let target = self.focused_demand_id();
            self.board.hover(target.as_deref());
        }
    }

    // Board actions

    /// Keyboard shortcut for a drag: selected member onto the focused demand
    fn assign_selected(&mut self) {
        let (Some(member_id), Some(demand_id)) = (self.selected_member_id(), self.focused_demand_id())
        else {
            self.set_status("Select a member and a demand first", StatusTone::Warning);
            return;
        };
        match self.board.assign(&member_id, &demand_id) {
            Mutation::Applied => {
                let name = self
                    .board
                    .registry()
                    .get(&member_id)
                    .map(|m| m.name.clone())
                    .unwrap_or(member_id);
                let demand = self
                    .board
                    .demand(&demand_id)
                    .map(|d| d.name.clone())
                    .unwrap_or(demand_id);
                self.set_status(format!("Assigned {} to {}", name, demand), StatusTone::Success);
            }
            Mutation::Unchanged(reason) => self.set_status(
                format!("Nothing changed: {}", reason.label()),
                StatusTone::Warning,
            ),
        }
        self.flush_intents();
    }

    fn pick_up_selected(&mut self) {
        let Some(member_id) = self.selected_member_id() else {
            self.set_status("No member selected", StatusTone::Warning);
            return;
        };
        self.board.begin_drag(&member_id);
        let target = self.focused_demand_id();
        self.board.hover(target.as_deref());
        let name = self
            .board
            .active_member()
            .map(|m| m.name.clone())
            .unwrap_or(member_id);
        self.set_status(
            format!("Dragging {} · h/l choose demand · Enter drop · Esc cancel", name),
            StatusTone::Info,
        );
    }

    fn finish_drop(&mut self, target: Option<String>) {
        let name = self.board.active_member().map(|m| m.name.clone());
        let demand_name = target
            .as_deref()
            .and_then(|id| self.board.demand(id))
            .map(|d| d.name.clone());
        let (end, outcome) = self.board.drop_on(target.as_deref());

        match (end, outcome) {
            (DragEnd::Dropped { .. }, Some(Mutation::Applied)) => {
                self.set_status(
                    format!(
                        "Assigned {} to {}",
                        name.unwrap_or_default(),
                        demand_name.unwrap_or_default()
                    ),
                    StatusTone::Success,
                );
            }
            (DragEnd::Dropped { .. }, Some(Mutation::Unchanged(reason))) => {
                self.set_status(
                    format!("Nothing changed: {}", reason.label()),
                    StatusTone::Warning,
                );
            }
            (DragEnd::Cancelled, _) => self.set_status("Drag cancelled", StatusTone::Info),
            _ => {}
        }
        self.flush_intents();
    }

    fn cancel_drag(&mut self) {
        if self.board.cancel_drag() == DragEnd::Cancelled {
            self.set_status("Drag cancelled", StatusTone::Info);
        }
    }

    fn unassign(&mut self, demand_id: &str, member_id: &str) {
        match self.board.unassign(member_id, demand_id) {
            Mutation::Applied => {
                let name = self
                    .board
                    .registry()
                    .get(member_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| member_id.to_string());
                self.set_status(format!("Removed {}", name), StatusTone::Success);
            }
            Mutation::Unchanged(reason) => {
                self.set_status(
                    format!("Nothing changed: {}", reason.label()),
                    StatusTone::Warning,
                );
            }
        }
        self.clamp_selection();
        self.flush_intents();
    }

    fn unassign_selected(&mut self) {
        if let Some((demand_id, member_id)) = self.selected_card() {
            self.unassign(&demand_id, &member_id);
        } else {
            self.set_status("Select an assigned card first", StatusTone::Warning);
        }
    }

    fn open_regional(&mut self) {
        if self.board.kind() != BoardKind::Assignment {
            self.set_status(
                "Regional tags are only kept on assignment boards",
                StatusTone::Warning,
            );
            return;
        }
        let Some((demand_id, member_id)) = self.selected_card() else {
            self.set_status("Select an assigned card first", StatusTone::Warning);
            return;
        };
        let current = self
            .board
            .regional(&member_id, &demand_id)
            .unwrap_or_default();
        let member_name = self
            .board
            .registry()
            .get(&member_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| member_id.clone());

        self.modal = Some(RegionalModal {
            wizard: RegionalWizard::open(current),
            member_id,
            member_name,
            demand_id,
            cursor: 0,
        });
    }

    fn save_regional(&mut self) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        let mut chosen = None;
        if !modal.wizard.confirm(|regional| chosen = Some(regional)) {
            self.set_status("Pick a secondary region first", StatusTone::Warning);
            return;
        }
        let (member_id, demand_id) = (modal.member_id.clone(), modal.demand_id.clone());
        self.modal = None;

        if let Some(regional) = chosen {
            match self.board.update_regional(&member_id, &demand_id, regional) {
                Mutation::Applied => {
                    self.set_status(format!("Regional set to {}", regional.label()), StatusTone::Success)
                }
                Mutation::Unchanged(reason) => self.set_status(
                    format!("Regional not saved: {}", reason.label()),
                    StatusTone::Warning,
                ),
            }
        }
        self.flush_intents();
    }

    /// Hand applied mutations to the journal, or drop them when none is set
    fn flush_intents(&mut self) {
        match self.journal.as_mut() {
            Some(journal) => {
                if let Err(e) = self.board.flush_intents(journal) {
                    warn!("Journal write to {} failed: {}", journal.path().display(), e);
                    self.set_status(format!("Journal write failed: {}", e), StatusTone::Error);
                }
            }
            None => {
                let dropped = self.board.drain_intents().len();
                if dropped > 0 {
                    debug!("No journal configured; {} intent(s) not recorded", dropped);
                }
            }
        }
    }

    // Input

    fn handle_modal_key(&mut self, key: KeyEvent) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                modal.wizard.close();
                self.set_status("Regional edit discarded", StatusTone::Info);
            }
            KeyCode::Down | KeyCode::Char('j') => modal.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => modal.move_cursor(-1),
            KeyCode::Enter | KeyCode::Char(' ') => modal.choose(),
            KeyCode::Right | KeyCode::Char('n') => {
                if !modal.advance() {
                    self.set_status("Pick a primary region first", StatusTone::Warning);
                }
            }
            KeyCode::Left | KeyCode::Char('b') => modal.back(),
            KeyCode::Char('s') => self.save_regional(),
            _ => {}
        }
        if self.modal.as_ref().is_some_and(|m| !m.wizard.is_open()) {
            self.modal = None;
        }
        true
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        if !self.search_mode {
            return false;
        }
        let mut query = self.board.query().to_string();
        match key.code {
            KeyCode::Esc => {
                self.search_mode = false;
                query.clear();
                self.set_status("Search cleared", StatusTone::Info);
            }
            KeyCode::Enter => {
                self.search_mode = false;
                let shown = self.board.filtered_members().len();
                self.set_status(format!("{} member(s) match", shown), StatusTone::Info);
            }
            KeyCode::Backspace | KeyCode::Delete => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => {}
        }
        self.board.set_query(query);
        self.clamp_selection();
        true
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_modal_key(key) || self.handle_search_key(key) {
            return;
        }

        let dragging = self.board.drag().is_dragging();
        match key.code {
            KeyCode::Char('q') if !dragging => self.should_quit = true,
            KeyCode::Esc if dragging => self.cancel_drag(),
            KeyCode::Char('/') if !dragging => {
                self.search_mode = true;
                self.focus = Focus::Team;
                self.set_status("Type to filter members · Enter keep · Esc clear", StatusTone::Info);
            }

            KeyCode::Char('a') if !dragging && self.focus == Focus::Team => {
                self.assign_selected()
            }
            KeyCode::Char(' ') if !dragging && self.focus == Focus::Team => {
                self.pick_up_selected()
            }
            KeyCode::Enter if dragging => {
                let target = self.board.drag().hover_target().map(str::to_string);
                self.finish_drop(target);
            }

            KeyCode::Tab => {
                if self.monitor.is_mobile() || dragging {
                    self.move_column(1);
                } else {
                    self.focus = match self.focus {
                        Focus::Team => Focus::Columns,
                        Focus::Columns => Focus::Team,
                    };
                }
            }
            KeyCode::BackTab => self.move_column(-1),
            KeyCode::Left | KeyCode::Char('h') => {
                if dragging || self.focus == Focus::Columns {
                    self.move_column(-1);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if dragging || self.focus == Focus::Columns {
                    self.move_column(1);
                } else {
                    self.focus = Focus::Columns;
                }
            }

            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(PAGE_JUMP as isize),
            KeyCode::PageUp => self.move_selection(-(PAGE_JUMP as isize)),

            KeyCode::Char('x') | KeyCode::Delete if self.focus == Focus::Columns => {
                self.unassign_selected()
            }
            KeyCode::Char('R') if self.focus == Focus::Columns && !dragging => {
                self.open_regional()
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.modal.is_some() {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(member_id) = self.hits.team_row_at(column, row).map(str::to_string) {
                    self.focus = Focus::Team;
                    if let Some(index) = self
                        .board
                        .filtered_members()
                        .iter()
                        .position(|m| m.id == member_id)
                    {
                        self.team_selected = index;
                    }
                    self.board.begin_drag(&member_id);
                    self.pointer = Some((column, row));
                } else if let Some((demand_id, member_id)) = self
                    .hits
                    .card_at(column, row)
                    .map(|(d, m)| (d.to_string(), m.to_string()))
                {
                    self.focus_card(&demand_id, &member_id);
                } else if let Some(demand_id) = self.hits.column_at(column, row).map(str::to_string) {
                    self.focus_column(&demand_id);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some((demand_id, member_id)) = self
                    .hits
                    .card_at(column, row)
                    .map(|(d, m)| (d.to_string(), m.to_string()))
                {
                    self.unassign(&demand_id, &member_id);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.board.drag().is_dragging() {
                    self.pointer = Some((column, row));
                    let target = self.hits.column_at(column, row).map(str::to_string);
                    self.board.hover(target.as_deref());
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pointer = None;
                if self.board.drag().is_dragging() {
                    let target = self.hits.column_at(column, row).map(str::to_string);
                    self.finish_drop(target);
                }
            }
            _ => {}
        }
    }

    fn focus_column(&mut self, demand_id: &str) {
        if let Some(index) = self.board.demands().iter().position(|d| d.id == demand_id) {
            self.focus = Focus::Columns;
            self.column_index = index;
            self.card_selected = 0;
        }
    }

    fn focus_card(&mut self, demand_id: &str, member_id: &str) {
        self.focus_column(demand_id);
        if let Some(index) = self
            .board
            .demand(demand_id)
            .and_then(|d| d.position(member_id))
        {
            self.card_selected = index;
        }
    }

    fn on_focus_lost(&mut self) {
        self.pointer = None;
        if self.board.pointer_lost() == DragEnd::Cancelled {
            self.set_status("Drag cancelled: pointer lost", StatusTone::Warning);
        }
    }

    fn state_line(&self) -> String {
        let project = self
            .board
            .project()
            .map(|p| p.name.clone().unwrap_or_else(|| p.id.clone()))
            .unwrap_or_else(|| "none".to_string());
        let layout = match self.layout_mode() {
            LayoutMode::Columns => "columns",
            LayoutMode::Tabs { .. } => "tabs",
        };
        let drag = match (self.board.drag().phase(), self.board.active_member()) {
            (DragPhase::Dragging, Some(member)) => format!("dragging {}", member.name),
            (DragPhase::Dragging, None) => "dragging".to_string(),
            (DragPhase::Dropped, _) => "dropping".to_string(),
            (DragPhase::Idle, _) => "idle".to_string(),
        };
        format!(
            "Project: {} · {} board · Members: {}/{} · Demands: {} · Layout: {} ({} cols) · Drag: {}",
            project,
            self.board.kind().label(),
            self.board.filtered_members().len(),
            self.board.registry().len(),
            self.board.demands().len(),
            layout,
            self.monitor.width(),
            drag
        )
    }

    fn help_line(&self) -> &'static str {
        if self.modal.is_some() {
            "Keys: j/k move · Enter pick · n next · b back · s save · Esc close"
        } else if self.board.drag().is_dragging() {
            "Keys: h/l or Tab choose demand · Enter drop · Esc cancel"
        } else {
            match self.focus {
                Focus::Team => "Keys: j/k nav · Space pick up · a assign to focused demand · / search · Tab columns · q quit",
                Focus::Columns => "Keys: h/l demand · j/k card · x unassign · R regional · Tab team · q quit",
            }
        }
    }
}

/// Run the TUI with the given configuration
pub fn run_tui(config: TuiConfig) -> Result<()> {
    let (width, _) = crossterm::terminal::size()?;
    let mouse = config.mouse;
    let tick = config.tick;
    let mut app = App::new(config, width);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableFocusChange)?;
    if mouse {
        stdout.execute(EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, tick);

    cleanup_terminal(terminal, mouse)?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, _) => app.on_resize(width),
                Event::FocusLost => app.on_focus_lost(),
                _ => {}
            }
        }
    }

    // Leaving mid-drag must not leave a session behind
    app.board.cancel_drag();
    Ok(())
}

fn draw_ui(frame: &mut Frame<'_>, app: &mut App) {
    // Background
    frame.render_widget(
        Block::default().style(Style::default().bg(COLOR_BG)),
        frame.size(),
    );

    // Layout: board + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(10), Constraint::Length(5)].as_ref())
        .split(frame.size());

    app.hits = HitMap::default();
    match app.layout_mode() {
        LayoutMode::Columns => draw_wide(frame, chunks[0], app),
        LayoutMode::Tabs { active } => draw_narrow(frame, chunks[0], app, active),
    }

    draw_status_bar(
        frame,
        chunks[1],
        &app.status_message,
        app.status_tone,
        &app.state_line(),
        app.help_line(),
    );

    if app.search_mode {
        draw_search_prompt(frame, frame.size(), app.board.query());
    }

    if let (Some(member), Some(anchor)) = (app.board.active_member(), app.pointer) {
        draw_drag_preview(frame, frame.size(), anchor, &member.name);
    }

    if let Some(modal) = &app.modal {
        draw_regional_modal(frame, frame.size(), modal);
    }
}

fn draw_team(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let view = TeamPanelView::build(&app.board);
    let selected = (!view.cards.is_empty()).then_some(app.team_selected);
    app.hits.team_rows = draw_team_panel(
        frame,
        area,
        &view,
        selected,
        &mut app.team_offset,
        app.focus == Focus::Team,
    );
}

fn draw_wide(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(TEAM_PANEL_WIDTH), Constraint::Min(10)].as_ref())
        .split(area);

    draw_team(frame, chunks[0], app);

    let views = column_views(&app.board);
    if views.is_empty() {
        draw_no_demands(frame, chunks[1]);
        return;
    }

    let count = views.len() as u32;
    let constraints: Vec<Constraint> = views.iter().map(|_| Constraint::Ratio(1, count)).collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(chunks[1]);

    let dragging = app.board.drag().is_dragging();
    app.card_offsets.resize(views.len(), 0);
    for (index, (view, rect)) in views.iter().zip(areas.iter()).enumerate() {
        let focused = app.focus == Focus::Columns && index == app.column_index;
        let selected = focused.then_some(app.card_selected);
        let cards = draw_column(
            frame,
            *rect,
            view,
            selected,
            &mut app.card_offsets[index],
            focused,
            dragging,
        );
        app.hits.columns.push((view.demand_id.clone(), *rect));
        app.hits.cards.extend(
            cards
                .into_iter()
                .map(|(member, r)| (view.demand_id.clone(), member, r)),
        );
    }
}

fn draw_narrow(frame: &mut Frame<'_>, area: Rect, app: &mut App, active: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(40),
                Constraint::Length(3),
                Constraint::Min(4),
            ]
            .as_ref(),
        )
        .split(area);

    draw_team(frame, chunks[0], app);

    let views = column_views(&app.board);
    let Some(view) = views.get(active) else {
        draw_no_demands(frame, chunks[2]);
        return;
    };
    draw_tab_strip(frame, chunks[1], &views, active);

    let focused = app.focus == Focus::Columns;
    let selected = focused.then_some(app.card_selected);
    let dragging = app.board.drag().is_dragging();
    app.card_offsets.resize(views.len(), 0);
    let cards = draw_column(
        frame,
        chunks[2],
        view,
        selected,
        &mut app.card_offsets[active],
        focused,
        dragging,
    );
    app.hits.columns.push((view.demand_id.clone(), chunks[2]));
    app.hits.cards.extend(
        cards
            .into_iter()
            .map(|(member, r)| (view.demand_id.clone(), member, r)),
    );
}

fn draw_no_demands(frame: &mut Frame<'_>, area: Rect) {
    let paragraph = Paragraph::new("No demands for this project")
        .style(Style::default().fg(Color::DarkGray))
        .block(themed_block("Demands", COLOR_ACCENT));
    frame.render_widget(paragraph, area);
}

fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>, mouse: bool) -> Result<()> {
    disable_raw_mode()?;
    if mouse {
        terminal.backend_mut().execute(DisableMouseCapture)?;
    }
    terminal.backend_mut().execute(DisableFocusChange)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Demand, Project};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use serde_json::json;

    fn app(width: u16) -> App {
        let members = vec![
            json!({"id": "1", "name": "Ana Silva", "project": "p1"}),
            json!({"id": "2", "name": "Bruno Costa", "project": "p1"}),
        ];
        let demands = vec![
            Demand {
                id: "d1".into(),
                name: "Suporte".into(),
                assigned: vec![],
            },
            Demand {
                id: "d2".into(),
                name: "Triagem".into(),
                assigned: vec![],
            },
        ];
        let project = Project {
            id: "p1".into(),
            name: Some("Atendimento".into()),
        };
        let board = AssignmentBoard::new(Some(project), BoardKind::Assignment, &members, demands);
        App::new(
            TuiConfig {
                board,
                journal: None,
                mobile_breakpoint: 100,
                mouse: true,
                tick: Duration::from_millis(100),
            },
            width,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
    }

    #[test]
    fn test_keyboard_drag_and_drop() {
        let mut app = app(160);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.board.drag().is_dragging());
        assert_eq!(app.board.drag().hover_target(), Some("d1"));

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.board.drag().hover_target(), Some("d2"));

        press(&mut app, KeyCode::Enter);
        assert!(!app.board.drag().is_dragging());
        assert_eq!(app.board.assignment_count("1"), 1);
        assert!(app.board.demand("d2").unwrap().contains("1"));
    }

    #[test]
    fn test_escape_cancels_without_mutation() {
        let mut app = app(160);
        let before = app.board.demands().to_vec();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Esc);
        assert!(!app.should_quit);
        assert!(app.board.drag().active_id().is_none());
        assert_eq!(app.board.demands(), before.as_slice());
    }

    #[test]
    fn test_search_filters_live() {
        let mut app = app(160);
        press(&mut app, KeyCode::Char('/'));
        for c in "bru".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.board.filtered_members().len(), 1);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.board.filtered_members().len(), 2);
        press(&mut app, KeyCode::Esc);
        assert!(!app.search_mode);
    }

    #[test]
    fn test_resize_switches_layout() {
        let mut app = app(160);
        assert_eq!(app.layout_mode(), LayoutMode::Columns);
        app.on_resize(60);
        assert_eq!(app.layout_mode(), LayoutMode::Tabs { active: 0 });
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.layout_mode(), LayoutMode::Tabs { active: 1 });
        app.on_resize(120);
        assert_eq!(app.layout_mode(), LayoutMode::Columns);
    }

    #[test]
    fn test_resize_listener_detached_with_app() {
        let app = app(160);
        let monitor = app.monitor.clone();
        assert_eq!(monitor.listener_count(), 1);
        drop(app);
        assert_eq!(monitor.listener_count(), 0);
    }

    #[test]
    fn test_mouse_drag_uses_hit_map() {
        let mut app = app(160);
        app.hits.team_rows = vec![(
            "2".into(),
            Rect {
                x: 1,
                y: 1,
                width: 30,
                height: 1,
            },
        )];
        app.hits.columns = vec![(
            "d1".into(),
            Rect {
                x: 40,
                y: 0,
                width: 20,
                height: 20,
            },
        )];

        let mouse = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 1));
        assert_eq!(app.board.drag().active_id(), Some("2"));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 45, 5));
        assert_eq!(app.board.drag().hover_target(), Some("d1"));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 45, 5));
        assert!(app.board.demand("d1").unwrap().contains("2"));

        // Released outside every column: no change
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 1));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 100, 30));
        assert_eq!(app.board.assignment_count("2"), 1);
        assert!(app.board.drag().active_id().is_none());
    }

    #[test]
    fn test_focus_lost_clears_drag() {
        let mut app = app(160);
        press(&mut app, KeyCode::Char(' '));
        app.on_focus_lost();
        assert!(app.board.drag().active_id().is_none());
    }

    #[test]
    fn test_quick_assign_to_focused_demand() {
        let mut app = app(160);
        app.column_index = 1;
        press(&mut app, KeyCode::Char('a'));
        assert!(app.board.demand("d2").unwrap().contains("1"));

        // A second press is a no-op, not a duplicate
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.board.demand("d2").unwrap().assigned.len(), 1);
    }

    #[test]
    fn test_regional_wizard_flow() {
        let mut app = app(160);
        app.board.assign("1", "d1");
        app.focus = Focus::Columns;

        press(&mut app, KeyCode::Char('R'));
        assert!(app.modal.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert!(app.modal.is_some());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));

        assert!(app.modal.is_none());
        let regional = app.board.regional("1", "d1").unwrap();
        assert_eq!(regional.label(), "RSI/RSC");
    }
}
