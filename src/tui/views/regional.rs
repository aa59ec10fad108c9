//! Regional wizard modal

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::board::{RegionalWizard, WizardStep};
use crate::tui::widgets::{centered_rect, themed_block, COLOR_FOCUS, COLOR_PANEL};

/// Wizard plus the assignment it edits and the list cursor
pub struct RegionalModal {
    pub wizard: RegionalWizard,
    pub member_id: String,
    pub member_name: String,
    pub demand_id: String,
    pub cursor: usize,
}

impl RegionalModal {
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.wizard.options().len();
        if len == 0 {
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = next as usize;
    }

    /// Pick the code under the cursor for the current step
    pub fn choose(&mut self) {
        let Some(code) = self.wizard.options().get(self.cursor).copied() else {
            return;
        };
        match self.wizard.step() {
            WizardStep::Primary => self.wizard.choose_primary(code),
            WizardStep::Secondary => {
                self.wizard.choose_secondary(code);
            }
        }
    }

    pub fn advance(&mut self) -> bool {
        if self.wizard.advance() {
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        if self.wizard.step() == WizardStep::Secondary {
            self.wizard.back();
            self.cursor = 0;
        }
    }
}

pub fn draw_regional_modal(frame: &mut Frame<'_>, area: Rect, modal: &RegionalModal) {
    let popup = centered_rect(50, 70, area);
    frame.render_widget(Clear, popup);

    let (step_label, chosen) = match modal.wizard.step() {
        WizardStep::Primary => ("Step 1/2 · primary region", modal.wizard.primary()),
        WizardStep::Secondary => ("Step 2/2 · secondary region", modal.wizard.secondary()),
    };

    let mut lines = vec![
        Line::from(vec![Span::styled(
            modal.member_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(step_label),
        Line::default(),
    ];

    for (index, code) in modal.wizard.options().iter().enumerate() {
        let marker = if Some(*code) == chosen { "●" } else { "○" };
        let mut style = Style::default().fg(Color::White);
        if index == modal.cursor {
            style = style.bg(Color::Rgb(56, 80, 109)).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::styled(format!(" {} {}", marker, code), style));
    }

    lines.push(Line::default());
    let hint = match modal.wizard.step() {
        WizardStep::Primary => {
            let next_style = if modal.wizard.can_advance() {
                Style::default().fg(COLOR_FOCUS)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::raw("Enter pick · "),
                Span::styled("n next", next_style),
                Span::raw(" · Esc close"),
            ])
        }
        WizardStep::Secondary => {
            let save_style = if modal.wizard.secondary().is_some() {
                Style::default().fg(COLOR_FOCUS)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::raw("Enter pick · b back · "),
                Span::styled("s save", save_style),
                Span::raw(" · Esc close"),
            ])
        }
    };
    lines.push(hint);

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(COLOR_PANEL).fg(Color::White))
        .block(themed_block("Regional", COLOR_FOCUS));
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{RegionCode, Regional};

    fn modal() -> RegionalModal {
        RegionalModal {
            wizard: RegionalWizard::open(Regional::default()),
            member_id: "1".into(),
            member_name: "Ana Silva".into(),
            demand_id: "d1".into(),
            cursor: 0,
        }
    }

    #[test]
    fn test_cursor_walks_both_steps() {
        let mut modal = modal();
        assert!(!modal.advance());

        modal.move_cursor(1);
        modal.choose();
        assert_eq!(modal.wizard.primary(), Some(RegionCode::Rsc));
        assert!(modal.advance());

        // RSC is gone from step two, so index 0 is RSI
        modal.choose();
        assert_eq!(modal.wizard.secondary(), Some(RegionCode::Rsi));

        modal.move_cursor(100);
        assert_eq!(modal.cursor, 8);

        modal.back();
        assert_eq!(modal.wizard.step(), WizardStep::Primary);
        assert_eq!(modal.wizard.primary(), Some(RegionCode::Rsc));
    }
}
