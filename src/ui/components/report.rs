use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::report::{Accent, CompletionReport};
use crate::ui::theme::{Theme, ThemeColors};

pub fn accent_color(colors: &ThemeColors, accent: Accent) -> Color {
    match accent {
        Accent::Success => colors.success(),
        Accent::Accent => colors.accent(),
        Accent::Highlight => colors.highlight(),
        Accent::Warning => colors.warning(),
        Accent::Error => colors.error(),
    }
}

pub struct ReportView<'a> {
    pub report: &'a CompletionReport,
    pub theme: &'a Theme,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a CompletionReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }
}

impl Widget for ReportView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = &self.report.result;
        let tier_color = accent_color(colors, self.report.tier.accent());

        let block = Block::bordered()
            .title(format!(" {} \u{00b7} Complete ", result.deck_title))
            .border_style(Style::default().fg(tier_color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            self.report.tier.label(),
            Style::default().fg(tier_color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            self.report.message(),
            Style::default().fg(colors.fg()),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        let acc_text = format!("{}%", result.accuracy);
        let acc_detail = format!("  ({}/{} known)", result.correct, result.total_cards);
        let acc_line = Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                acc_text,
                Style::default().fg(tier_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(acc_detail, Style::default().fg(colors.text_muted())),
        ]);
        Paragraph::new(acc_line).render(layout[2], buf);

        let counts_line = Line::from(vec![
            Span::styled("  Knew:     ", Style::default().fg(colors.fg())),
            Span::styled(result.correct.to_string(), Style::default().fg(colors.success())),
            Span::styled("   Missed: ", Style::default().fg(colors.fg())),
            Span::styled(
                result.wrong.to_string(),
                Style::default().fg(if result.wrong == 0 {
                    colors.success()
                } else {
                    colors.error()
                }),
            ),
        ]);
        Paragraph::new(counts_line).render(layout[3], buf);

        if let Some(finished_at) = result.finished_at {
            let finished = finished_at
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string();
            let time_line = Line::from(vec![
                Span::styled("  Finished: ", Style::default().fg(colors.fg())),
                Span::styled(finished, Style::default().fg(colors.text_muted())),
            ]);
            Paragraph::new(time_line).render(layout[4], buf);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r] Practice again  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Back to deck", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[6], buf);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::deck::{Card, Deck};
    use crate::session::result::SessionResult;
    use crate::session::state::SessionState;

    #[test]
    fn test_report_shows_tier_message_and_counts() {
        let theme = Theme::default();
        let state = SessionState {
            correct: 3,
            wrong: 2,
            ..SessionState::default()
        };
        let deck = Rc::new(Deck::new("Kana", vec![Card::new("a", "b")]));
        let report = CompletionReport::new(SessionResult::from_state(&state, 5, "Kana"), deck);
        let area = Rect::new(0, 0, 70, 18);
        let mut buf = Buffer::empty(area);
        ReportView::new(&report, &theme).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Fair"));
        assert!(text.contains("60%"));
        assert!(text.contains("(3/5 known)"));
    }
}
