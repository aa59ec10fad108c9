//! Team panel - the drag source listing filtered members

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::board::AssignmentBoard;
use crate::tui::ellipsize;
use crate::tui::widgets::{
    scroll_offset, themed_block, COLOR_ACCENT, COLOR_DRAG, COLOR_FOCUS, COLOR_PANEL,
};

/// One draggable member card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCard {
    pub member_id: String,
    pub name: String,
    pub initials: String,
    pub has_avatar: bool,
    pub assigned_count: usize,
    pub dragging: bool,
}

/// Render model for the team panel
#[derive(Debug, Clone, Default)]
pub struct TeamPanelView {
    pub query: String,
    pub total: usize,
    pub cards: Vec<TeamCard>,
}

impl TeamPanelView {
    /// Build from the board's current filtered roster. Counts are taken from
    /// the demands as they are right now.
    pub fn build(board: &AssignmentBoard) -> Self {
        let active = board.drag().active_id();
        let cards = board
            .filtered_members()
            .into_iter()
            .map(|member| TeamCard {
                member_id: member.id.clone(),
                name: member.name.clone(),
                initials: initials(&member.name),
                has_avatar: member.avatar.is_some(),
                assigned_count: board.assignment_count(&member.id),
                dragging: active == Some(member.id.as_str()),
            })
            .collect();

        Self {
            query: board.query().to_string(),
            total: board.members().len(),
            cards,
        }
    }
}

/// One filled dot per demand the member is in, or an outline dot when none
pub fn assigned_dots(count: usize) -> String {
    if count == 0 {
        "○".to_string()
    } else {
        "●".repeat(count)
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Draw the panel and return the screen rect of each visible card, for hit
/// testing pointer events.
pub fn draw_team_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &TeamPanelView,
    selected: Option<usize>,
    offset: &mut usize,
    focused: bool,
) -> Vec<(String, Rect)> {
    let title = if view.query.is_empty() {
        format!("Team ({})", view.total)
    } else {
        format!("Team ({}/{}) · /{}", view.cards.len(), view.total, view.query)
    };
    let border = if focused { COLOR_FOCUS } else { COLOR_ACCENT };
    let block = themed_block(title, border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    if height == 0 {
        return Vec::new();
    }

    *offset = scroll_offset(selected, *offset, height, view.cards.len());

    let name_width = (inner.width as usize).saturating_sub(12);
    let mut lines = Vec::new();
    let mut hits = Vec::new();

    for (row, (index, card)) in view
        .cards
        .iter()
        .enumerate()
        .skip(*offset)
        .take(height)
        .enumerate()
    {
        let mut style = Style::default().fg(Color::White);
        if selected == Some(index) && focused {
            style = style.bg(Color::Rgb(56, 80, 109)).add_modifier(Modifier::BOLD);
        }
        if card.dragging {
            style = style.fg(COLOR_DRAG).add_modifier(Modifier::DIM);
        }

        let badge_color = if card.has_avatar { Color::Cyan } else { Color::DarkGray };
        let dot_color = if card.assigned_count == 0 {
            Color::DarkGray
        } else {
            Color::Green
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:>2} ", card.initials), style.fg(badge_color)),
            Span::styled(ellipsize(&card.name, name_width), style),
            Span::raw(" "),
            Span::styled(assigned_dots(card.assigned_count), style.fg(dot_color)),
        ]));
        hits.push((
            card.member_id.clone(),
            Rect {
                x: inner.x,
                y: inner.y + row as u16,
                width: inner.width,
                height: 1,
            },
        ));
    }

    if view.cards.is_empty() {
        let message = if view.total == 0 {
            "No members for this project"
        } else {
            "No members match the search"
        };
        lines.push(Line::styled(message, Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(COLOR_PANEL));
    frame.render_widget(paragraph, inner);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardKind, Demand, Project};
    use serde_json::json;

    fn board() -> AssignmentBoard {
        let members = vec![
            json!({"id": "1", "name": "Ana Silva", "project": "p1", "avatar": "https://a/1.png"}),
            json!({"id": "2", "name": "Bruno Costa", "project": "p1"}),
        ];
        let demands = ["d1", "d2", "d3"]
            .iter()
            .map(|id| Demand {
                id: id.to_string(),
                name: id.to_uppercase(),
                assigned: vec![],
            })
            .collect();
        let project = Project {
            id: "p1".into(),
            name: None,
        };
        AssignmentBoard::new(Some(project), BoardKind::Demand, &members, demands)
    }

    #[test]
    fn test_dots() {
        assert_eq!(assigned_dots(0), "○");
        assert_eq!(assigned_dots(3), "●●●");
    }

    #[test]
    fn test_counts_recomputed_after_each_change() {
        let mut board = board();
        board.assign("1", "d1");
        board.assign("1", "d3");
        let view = TeamPanelView::build(&board);
        let ana = view.cards.iter().find(|c| c.member_id == "1").unwrap();
        assert_eq!(ana.assigned_count, 2);
        assert!(ana.has_avatar);
        assert_eq!(ana.initials, "AS");

        board.unassign("1", "d1");
        let view = TeamPanelView::build(&board);
        let ana = view.cards.iter().find(|c| c.member_id == "1").unwrap();
        assert_eq!(ana.assigned_count, 1);
        let bruno = view.cards.iter().find(|c| c.member_id == "2").unwrap();
        assert_eq!(bruno.assigned_count, 0);
    }

    #[test]
    fn test_cards_follow_search_and_drag() {
        let mut board = board();
        board.set_query("bru");
        board.begin_drag("2");
        let view = TeamPanelView::build(&board);
        assert_eq!(view.total, 2);
        assert_eq!(view.cards.len(), 1);
        assert!(view.cards[0].dragging);
    }
}
