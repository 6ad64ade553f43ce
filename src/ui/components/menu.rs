use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::selector::PracticeMode;
use crate::ui::theme::Theme;

/// Practice-mode list on the selector screen.
pub struct ModeMenu<'a> {
    pub selected: usize,
    pub enabled: bool,
    pub theme: &'a Theme,
}

impl<'a> ModeMenu<'a> {
    pub fn new(selected: usize, enabled: bool, theme: &'a Theme) -> Self {
        Self {
            selected,
            enabled,
            theme,
        }
    }
}

impl Widget for ModeMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Practice ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                PracticeMode::ALL
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(inner);

        for (i, mode) in PracticeMode::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{}] {mode}", mode.key());
            let desc_text = format!("     {}", mode.description());

            let label_color = if !self.enabled {
                colors.text_muted()
            } else if is_selected {
                colors.accent()
            } else {
                colors.fg()
            };

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(label_color)
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.text_muted()))),
            ];

            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }
    }
}
