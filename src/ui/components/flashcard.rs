use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::deck::Card;
use crate::session::gesture::{GestureOutcome, resolve_drag};
use crate::session::state::{Face, Verdict};
use crate::ui::layout::{offset_within, squeeze};
use crate::ui::motion::CardMotion;
use crate::ui::theme::Theme;

/// The card under review. Rendered into the stage area; `rest` is where the
/// card sits when nothing is moving.
pub struct Flashcard<'a> {
    card: &'a Card,
    face: Face,
    rest: Rect,
    motion: CardMotion,
    drag_offset: Option<i32>,
    position: (usize, usize),
    theme: &'a Theme,
}

impl<'a> Flashcard<'a> {
    pub fn new(card: &'a Card, face: Face, rest: Rect, theme: &'a Theme) -> Self {
        Self {
            card,
            face,
            rest,
            motion: CardMotion::REST,
            drag_offset: None,
            position: (0, 0),
            theme,
        }
    }

    pub fn motion(mut self, motion: CardMotion) -> Self {
        self.motion = motion;
        self
    }

    pub fn dragging(mut self, offset: Option<i32>) -> Self {
        self.drag_offset = offset;
        self
    }

    pub fn position(mut self, index: usize, total: usize) -> Self {
        self.position = (index, total);
        self
    }

    fn visible_face(&self) -> Face {
        if self.motion.show_previous_face {
            self.face.flipped()
        } else {
            self.face
        }
    }

    fn content(&self, face: Face) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();
        match face {
            Face::Front => {
                lines.push(Line::from(Span::styled(
                    self.card.front.as_str(),
                    Style::default()
                        .fg(colors.card_front())
                        .add_modifier(Modifier::BOLD),
                )));
                if let Some(aux) = &self.card.aux {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        aux.as_str(),
                        Style::default()
                            .fg(colors.card_aux())
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
            }
            Face::Back => {
                lines.push(Line::from(Span::styled(
                    self.card.back.as_str(),
                    Style::default()
                        .fg(colors.card_back())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    self.card.front.as_str(),
                    Style::default().fg(colors.text_muted()),
                )));
            }
        }
        lines
    }
}

impl Widget for Flashcard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let offset = self.drag_offset.unwrap_or(0) + self.motion.slide;
        let rect = squeeze(offset_within(self.rest, offset, area), self.motion.squeeze);
        if rect.width < 2 || rect.height < 2 {
            return;
        }

        let pending = self
            .drag_offset
            .map(|dx| resolve_drag(dx, self.rest.width))
            .and_then(|outcome| match outcome {
                GestureOutcome::Judge(verdict) => Some(verdict),
                _ => None,
            });

        let border_color = match (pending, self.motion.flash) {
            (Some(Verdict::Correct), _) | (None, Some(Verdict::Correct)) => colors.success(),
            (Some(Verdict::Wrong), _) | (None, Some(Verdict::Wrong)) => colors.error(),
            (None, None) if self.drag_offset.is_some() => colors.border_focused(),
            (None, None) => colors.border(),
        };

        let face = self.visible_face();
        let face_title = match (pending, face) {
            (Some(Verdict::Correct), _) => " Knew it \u{2192} ".to_string(),
            (Some(Verdict::Wrong), _) => " \u{2190} Missed it ".to_string(),
            (None, Face::Front) => " Front ".to_string(),
            (None, Face::Back) => " Back ".to_string(),
        };
        let (index, total) = self.position;

        let mut block = Block::bordered()
            .title(Span::styled(face_title, Style::default().fg(border_color)))
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(colors.card_bg()));
        if total > 0 {
            block = block.title_top(Line::from(format!(" {} / {total} ", index + 1)).right_aligned());
        }
        let inner = block.inner(rect);
        Clear.render(rect, buf);
        block.render(rect, buf);

        if inner.width < 3 || inner.height == 0 {
            return;
        }

        let mut lines = self.content(face);
        let wrapped_height: usize = lines
            .iter()
            .map(|l| l.width().max(1).div_ceil(inner.width as usize))
            .sum();
        let pad = (inner.height as usize).saturating_sub(wrapped_height) / 2;
        let mut padded: Vec<Line> = vec![Line::from(""); pad];
        padded.append(&mut lines);

        Paragraph::new(padded)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
