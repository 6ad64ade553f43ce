use ratatui::layout::{Constraint, Direction, Layout, Rect};

const MAX_CARD_WIDTH: u16 = 64;
const BUTTON_WIDTH: u16 = 16;

/// Footer hints on the review screen. The footer grows to fit all of them.
pub const REVIEW_HINTS: [&str; 5] = [
    "[Space] Flip",
    "[\u{2190}] Missed",
    "[\u{2192}] Knew",
    "drag card \u{2190}/\u{2192}",
    "[Esc] Leave",
];

/// Screen regions for the review screen. Computed from the terminal size so
/// the renderer and the mouse handler agree on where the card is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewLayout {
    pub header: Rect,
    pub progress: Rect,
    pub card: Rect,
    pub wrong_button: Rect,
    pub correct_button: Rect,
    pub footer: Rect,
}

impl ReviewLayout {
    pub fn new(area: Rect) -> Self {
        let footer_lines = pack_hint_lines(&REVIEW_HINTS, area.width as usize).len().max(1) as u16;
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(footer_lines),
            ])
            .split(area);

        let stage = vertical[2];
        let card_w = stage.width.saturating_sub(4).min(MAX_CARD_WIDTH);
        let card_h = stage.height.saturating_sub(2).min(14);
        let card = Rect::new(
            stage.x + (stage.width.saturating_sub(card_w)) / 2,
            stage.y + (stage.height.saturating_sub(card_h)) / 2,
            card_w,
            card_h,
        );

        let buttons = vertical[3];
        let button_w = BUTTON_WIDTH.min(buttons.width / 2);
        let gap = 2.min(buttons.width.saturating_sub(button_w * 2));
        let total = button_w * 2 + gap;
        let left = buttons.x + (buttons.width.saturating_sub(total)) / 2;
        let wrong_button = Rect::new(left, buttons.y, button_w, buttons.height);
        let correct_button = Rect::new(left + button_w + gap, buttons.y, button_w, buttons.height);

        Self {
            header: vertical[0],
            progress: vertical[1],
            card,
            wrong_button,
            correct_button,
            footer: vertical[4],
        }
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Shifts `rect` horizontally by `dx`, clipped to `bounds`.
pub fn offset_within(rect: Rect, dx: i32, bounds: Rect) -> Rect {
    let min_x = i32::from(bounds.x);
    let max_x = i32::from(bounds.x) + i32::from(bounds.width);
    let left = (i32::from(rect.x) + dx).max(min_x);
    let right = (i32::from(rect.x) + i32::from(rect.width) + dx).min(max_x);
    if right <= left {
        return Rect::new(rect.x, rect.y, 0, rect.height);
    }
    Rect::new(left as u16, rect.y, (right - left) as u16, rect.height)
}

/// Narrows `rect` around its centre to `factor` of its width.
pub fn squeeze(rect: Rect, factor: f64) -> Rect {
    let factor = factor.clamp(0.0, 1.0);
    let width = (f64::from(rect.width) * factor).round() as u16;
    let x = rect.x + (rect.width - width) / 2;
    Rect::new(x, rect.y, width, rect.height)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 56;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_layout_card_is_centered_and_capped() {
        let layout = ReviewLayout::new(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.card.width, MAX_CARD_WIDTH);
        assert_eq!(layout.card.x, (120 - MAX_CARD_WIDTH) / 2);
        assert!(layout.card.y > layout.progress.y);
        assert!(layout.wrong_button.x < layout.correct_button.x);
        assert_eq!(layout.wrong_button.y, layout.correct_button.y);
    }

    #[test]
    fn test_review_layout_narrow_terminal() {
        let layout = ReviewLayout::new(Rect::new(0, 0, 30, 20));
        assert_eq!(layout.card.width, 26);
        assert!(layout.correct_button.x + layout.correct_button.width <= 30);
    }

    #[test]
    fn test_review_footer_fits_every_hint() {
        let wide = ReviewLayout::new(Rect::new(0, 0, 120, 40));
        assert_eq!(wide.footer.height, 1);

        let area = Rect::new(0, 0, 30, 24);
        let narrow = ReviewLayout::new(area);
        let lines = pack_hint_lines(&REVIEW_HINTS, narrow.footer.width as usize);
        assert!(lines.len() > 1);
        assert_eq!(narrow.footer.height as usize, lines.len());
        assert_eq!(narrow.footer.y + narrow.footer.height, area.height);
        assert!(lines.iter().any(|l| l.contains("[Esc] Leave")));
    }

    #[test]
    fn test_contains() {
        let rect = Rect::new(5, 5, 10, 2);
        assert!(contains(rect, 5, 5));
        assert!(contains(rect, 14, 6));
        assert!(!contains(rect, 15, 6));
        assert!(!contains(rect, 5, 7));
    }

    #[test]
    fn test_offset_within_clips() {
        let bounds = Rect::new(0, 0, 40, 10);
        let rect = Rect::new(10, 2, 20, 5);
        assert_eq!(offset_within(rect, 5, bounds), Rect::new(15, 2, 20, 5));
        assert_eq!(offset_within(rect, 15, bounds), Rect::new(25, 2, 15, 5));
        assert_eq!(offset_within(rect, -15, bounds), Rect::new(0, 2, 15, 5));
    }

    #[test]
    fn test_squeeze_keeps_center() {
        let rect = Rect::new(10, 0, 20, 5);
        assert_eq!(squeeze(rect, 0.5), Rect::new(15, 0, 10, 5));
        assert_eq!(squeeze(rect, 0.0).width, 0);
        assert_eq!(squeeze(rect, 1.0), rect);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[a] one", "[b] two", "[c] three"], 20);
        assert_eq!(lines, vec!["  [a] one  [b] two", "  [c] three"]);
    }
}
