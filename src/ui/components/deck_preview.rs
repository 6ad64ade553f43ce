use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::selector::{DeckSelector, DeckStatus};
use crate::ui::theme::Theme;

/// Read-only walk through the loaded deck, or the empty/failed state.
pub struct DeckPreview<'a> {
    selector: &'a DeckSelector,
    theme: &'a Theme,
}

impl<'a> DeckPreview<'a> {
    pub fn new(selector: &'a DeckSelector, theme: &'a Theme) -> Self {
        Self { selector, theme }
    }

    fn retry_lines(&self, headline: String, detail: Option<&str>) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(detail) = detail {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                detail.to_string(),
                Style::default().fg(colors.text_muted()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[r] Retry",
            Style::default().fg(colors.accent()),
        )));
        lines
    }
}

impl Widget for DeckPreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let lesson = self
            .selector
            .current_lesson()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "no lessons".to_string());
        let title = match self.selector.deck() {
            Some(deck) => format!(" {} ", deck.title),
            None => format!(" {lesson} "),
        };

        let block = Block::bordered()
            .title(Span::styled(
                title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let (lines, footer) = match self.selector.status() {
            DeckStatus::Ready(deck) => {
                let index = self.selector.preview_index();
                let mut lines = vec![Line::from("")];
                if let Some(card) = self.selector.preview_card() {
                    lines.push(Line::from(Span::styled(
                        card.front.clone(),
                        Style::default()
                            .fg(colors.card_front())
                            .add_modifier(Modifier::BOLD),
                    )));
                    if let Some(aux) = &card.aux {
                        lines.push(Line::from(Span::styled(
                            aux.clone(),
                            Style::default()
                                .fg(colors.card_aux())
                                .add_modifier(Modifier::ITALIC),
                        )));
                    }
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        card.back.clone(),
                        Style::default().fg(colors.card_back()),
                    )));
                }
                let footer = format!(
                    "\u{2190} card {} of {} \u{2192}   lesson: {lesson}",
                    index + 1,
                    deck.len()
                );
                (lines, footer)
            }
            DeckStatus::Empty => (
                self.retry_lines("This lesson has no cards yet.".to_string(), None),
                format!("lesson: {lesson}"),
            ),
            DeckStatus::Failed(err) => (
                self.retry_lines("Couldn't load this lesson.".to_string(), Some(err)),
                format!("lesson: {lesson}"),
            ),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            footer,
            Style::default().fg(colors.text_muted()),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);
    }
}
