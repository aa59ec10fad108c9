//! Shared widgets and the board's color theme

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

pub const COLOR_BG: Color = Color::Rgb(17, 19, 26);
pub const COLOR_PANEL: Color = Color::Rgb(24, 27, 36);
pub const COLOR_ACCENT: Color = Color::Rgb(122, 132, 153);
pub const COLOR_FOCUS: Color = Color::Cyan;
/// Border of the column under the dragged card
pub const COLOR_DROP: Color = Color::Green;
pub const COLOR_DRAG: Color = Color::Yellow;

/// Status message tone for styling
#[derive(Clone, Copy, Default)]
pub enum StatusTone {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl StatusTone {
    pub fn color(self) -> Color {
        match self {
            StatusTone::Info => Color::Cyan,
            StatusTone::Success => Color::Green,
            StatusTone::Warning => Color::Yellow,
            StatusTone::Error => Color::Red,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            StatusTone::Info => "·",
            StatusTone::Success => "✓",
            StatusTone::Warning => "!",
            StatusTone::Error => "✗",
        }
    }
}

/// Rounded panel with a bold title in the border color
pub fn themed_block(title: impl Into<String>, border_color: Color) -> Block<'static> {
    let title = title.into();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(COLOR_PANEL).fg(Color::White));
    if title.is_empty() {
        return block;
    }
    block.title(Span::styled(
        format!(" {} ", title),
        Style::default()
            .fg(border_color)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Rect of `percent_x` by `percent_y` of `area`, centered in it
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y.min(100) as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// One-line search bar pinned above the bottom edge while search mode is on
pub fn draw_search_prompt(frame: &mut Frame<'_>, area: Rect, query: &str) {
    let height = 3;
    if area.height < height + 2 || area.width < 8 {
        return;
    }
    let bar = Rect {
        x: area.x + 2,
        y: area.y + area.height - height - 1,
        width: area.width - 4,
        height,
    };
    frame.render_widget(Clear, bar);
    let line = Line::from(vec![
        Span::styled("/", Style::default().fg(COLOR_FOCUS)),
        Span::raw(query.to_string()),
        Span::styled("▏", Style::default().fg(COLOR_FOCUS)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(themed_block("Search members", COLOR_FOCUS)),
        bar,
    );
}

/// Floating card with the dragged member's name, drawn beside the pointer
pub fn draw_drag_preview(frame: &mut Frame<'_>, area: Rect, anchor: (u16, u16), name: &str) {
    let width = (name.chars().count() as u16 + 4).min(area.width);
    let height = 3;
    if area.height < height || width == 0 {
        return;
    }
    let popup = Rect {
        x: anchor.0.saturating_add(2).min(area.x + area.width - width),
        y: anchor.1.min(area.y + area.height - height),
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(name.to_string())
        .style(Style::default().fg(COLOR_DRAG).add_modifier(Modifier::BOLD))
        .block(themed_block("", COLOR_DRAG));
    frame.render_widget(paragraph, popup);
}

/// Status panel: toned message, board state, key hints
pub fn draw_status_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    message: &str,
    tone: StatusTone,
    state_line: &str,
    help_line: &str,
) {
    let tone_style = Style::default().fg(tone.color());
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", tone.marker()), tone_style),
            Span::styled(message.to_string(), tone_style.add_modifier(Modifier::BOLD)),
        ]),
        Line::styled(state_line.to_string(), Style::default().fg(Color::White)),
        Line::styled(help_line.to_string(), Style::default().fg(COLOR_ACCENT)),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(themed_block("Status", COLOR_ACCENT)),
        area,
    );
}

/// First visible row of a list `height` rows tall, moved just enough to keep
/// `selected` on screen
pub fn scroll_offset(selected: Option<usize>, offset: usize, height: usize, len: usize) -> usize {
    let mut offset = offset;
    if let Some(selected) = selected {
        if selected < offset {
            offset = selected;
        } else if height > 0 && selected >= offset + height {
            offset = selected + 1 - height;
        }
    }
    offset.min(len.saturating_sub(1))
}

/// Whether a terminal cell lies inside `rect`
pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
