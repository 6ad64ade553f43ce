//! Presentation-only animation derived from the controller's last committed
//! transition. Nothing here feeds back into session state.

use std::time::{Duration, Instant};

use crate::session::controller::{Timings, TransitionKind, TransitionRecord};
use crate::session::state::Verdict;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardMotion {
    /// Card width as a fraction of its resting width.
    pub squeeze: f64,
    /// First half of a flip still shows the face being turned away.
    pub show_previous_face: bool,
    /// Horizontal entrance offset in columns.
    pub slide: i32,
    /// Border tint for a just-committed verdict.
    pub flash: Option<Verdict>,
}

impl CardMotion {
    pub const REST: CardMotion = CardMotion {
        squeeze: 1.0,
        show_previous_face: false,
        slide: 0,
        flash: None,
    };
}

fn fraction(record: &TransitionRecord, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(record.at);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

pub fn card_motion(
    record: Option<&TransitionRecord>,
    timings: Timings,
    now: Instant,
    card_width: u16,
) -> CardMotion {
    let Some(record) = record else {
        return CardMotion::REST;
    };
    match record.kind {
        TransitionKind::Revealed => CardMotion::REST,
        TransitionKind::Flipped(_) => {
            let t = fraction(record, timings.flip, now);
            if t >= 1.0 {
                return CardMotion::REST;
            }
            CardMotion {
                squeeze: (1.0 - 2.0 * t).abs(),
                show_previous_face: t < 0.5,
                ..CardMotion::REST
            }
        }
        TransitionKind::Judged(verdict) => {
            let t = fraction(record, timings.swipe, now);
            if t >= 1.0 {
                return CardMotion::REST;
            }
            // The next card comes in from the side opposite the swipe.
            let travel = f64::from(card_width) * 0.5 * (1.0 - ease_out(t));
            let slide = match verdict {
                Verdict::Correct => -(travel.round() as i32),
                Verdict::Wrong => travel.round() as i32,
            };
            CardMotion {
                slide,
                flash: Some(verdict),
                ..CardMotion::REST
            }
        }
    }
}

/// Progress bar fill, eased from the value before the last verdict.
pub fn progress_fill(
    record: Option<&TransitionRecord>,
    current: f64,
    timings: Timings,
    now: Instant,
) -> f64 {
    match record {
        Some(record) if matches!(record.kind, TransitionKind::Judged(_)) => {
            let t = ease_out(fraction(record, timings.swipe, now));
            record.progress_before + (record.progress_after - record.progress_before) * t
        }
        _ => current,
    }
}
