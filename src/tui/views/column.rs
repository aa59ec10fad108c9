//! Demand columns - drop targets listing assigned members

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use crate::board::{AssignmentBoard, Demand, MemberRegistry};
use crate::tui::ellipsize;
use crate::tui::widgets::{
    scroll_offset, themed_block, COLOR_ACCENT, COLOR_DROP, COLOR_FOCUS, COLOR_PANEL,
};

/// An assigned member as shown inside a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Resolved {
        member_id: String,
        name: String,
        regional: Option<String>,
    },
    /// The id is not in the roster; shown as a placeholder
    Unresolved { member_id: String },
}

impl CardView {
    pub fn member_id(&self) -> &str {
        match self {
            CardView::Resolved { member_id, .. } | CardView::Unresolved { member_id } => member_id,
        }
    }
}

/// Render model for one demand column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub demand_id: String,
    pub name: String,
    pub count: usize,
    pub highlighted: bool,
    pub cards: Vec<CardView>,
}

impl ColumnView {
    pub fn build(demand: &Demand, registry: &MemberRegistry, hover: Option<&str>) -> Self {
        let cards = demand
            .assigned
            .iter()
            .map(|entry| {
                let member_id = entry.member_id().to_string();
                match registry.get(&member_id) {
                    Some(member) => CardView::Resolved {
                        member_id,
                        name: member.name.clone(),
                        regional: entry
                            .regional()
                            .filter(|r| !r.is_empty())
                            .map(|r| r.label()),
                    },
                    None => CardView::Unresolved { member_id },
                }
            })
            .collect();

        Self {
            demand_id: demand.id.clone(),
            name: demand.name.clone(),
            count: demand.assigned.len(),
            highlighted: hover == Some(demand.id.as_str()),
            cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn column_views(board: &AssignmentBoard) -> Vec<ColumnView> {
    let hover = board.drag().hover_target();
    board
        .demands()
        .iter()
        .map(|demand| ColumnView::build(demand, board.registry(), hover))
        .collect()
}

/// Draw one column. The whole column area is the drop surface; the returned
/// rects locate each visible card row for pointer hit testing. `offset` is
/// the column's scroll position and follows the selected card.
pub fn draw_column(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &ColumnView,
    selected_card: Option<usize>,
    offset: &mut usize,
    focused: bool,
    dragging: bool,
) -> Vec<(String, Rect)> {
    let border = if view.highlighted {
        COLOR_DROP
    } else if focused {
        COLOR_FOCUS
    } else {
        COLOR_ACCENT
    };
    let title = if view.highlighted {
        format!("▼ {} ({})", view.name, view.count)
    } else {
        format!("{} ({})", view.name, view.count)
    };
    let block = themed_block(title, border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut hits = Vec::new();

    if view.is_empty() {
        let hint = if dragging { "drop here" } else { "no one assigned" };
        let dash = "┄".repeat(width.saturating_sub(2) / 2);
        let placeholder_style = if view.highlighted {
            Style::default().fg(COLOR_DROP)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::styled(dash.clone(), placeholder_style));
        lines.push(Line::styled(format!(" {}", hint), placeholder_style));
        lines.push(Line::styled(dash, placeholder_style));
    }

    let height = inner.height as usize;
    *offset = scroll_offset(selected_card, *offset, height, view.cards.len());

    for (row, (index, card)) in view
        .cards
        .iter()
        .enumerate()
        .skip(*offset)
        .take(height)
        .enumerate()
    {
        let mut style = Style::default().fg(Color::White);
        if focused && selected_card == Some(index) {
            style = style.bg(Color::Rgb(56, 80, 109)).add_modifier(Modifier::BOLD);
        }
        let line = match card {
            CardView::Resolved { name, regional, .. } => {
                let tag = regional.as_deref().unwrap_or("");
                let name_width = width.saturating_sub(tag.chars().count() + 4);
                Line::from(vec![
                    Span::styled(ellipsize(name, name_width), style),
                    Span::raw(" "),
                    Span::styled(tag.to_string(), style.fg(Color::Cyan)),
                    Span::styled(" ×", style.fg(Color::Red)),
                ])
            }
            CardView::Unresolved { member_id } => Line::from(vec![
                Span::styled(
                    ellipsize(&format!("? unknown ({})", member_id), width.saturating_sub(3)),
                    style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ),
                Span::styled(" ×", style.fg(Color::Red)),
            ]),
        };
        hits.push((
            card.member_id().to_string(),
            Rect {
                x: inner.x,
                y: inner.y + row as u16,
                width: inner.width,
                height: 1,
            },
        ));
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(COLOR_PANEL));
    frame.render_widget(paragraph, inner);
    hits
}

/// Tab strip used by the narrow layout
pub fn draw_tab_strip(frame: &mut Frame<'_>, area: Rect, views: &[ColumnView], active: usize) {
    let titles: Vec<Line> = views
        .iter()
        .map(|view| {
            let style = if view.highlighted {
                Style::default().fg(COLOR_DROP)
            } else {
                Style::default().fg(Color::White)
            };
            Line::styled(format!("{} ({})", view.name, view.count), style)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(active)
        .block(themed_block("Demands", COLOR_ACCENT))
        .highlight_style(Style::default().fg(COLOR_FOCUS).add_modifier(Modifier::BOLD))
        .divider("│");
    frame.render_widget(tabs, area);
}
