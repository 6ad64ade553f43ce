use crate::session::state::Verdict;

/// Fraction of the card width a drag has to travel to count as a verdict.
pub const SWIPE_THRESHOLD: f64 = 0.3;

/// Columns of travel that still read as a tap rather than a drag.
pub const TAP_SLOP: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Press and release without travel: flip the card.
    Tap,
    Judge(Verdict),
    /// Drag released short of the threshold. Visual only.
    SnapBack,
}

/// Tracks a single pointer drag across the card. Positions stay in here; the
/// session only ever sees the outcome produced at release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragTracker {
    origin: Option<u16>,
    current: u16,
    moved: bool,
}

impl DragTracker {
    pub fn start(&mut self, column: u16) {
        self.origin = Some(column);
        self.current = column;
        self.moved = false;
    }

    pub fn move_to(&mut self, column: u16) {
        if self.origin.is_none() {
            return;
        }
        self.current = column;
        if self.offset().unsigned_abs() > u32::from(TAP_SLOP) {
            self.moved = true;
        }
    }

    /// Ends the gesture. Returns `None` if no press was being tracked.
    pub fn release(&mut self, column: u16, container_width: u16) -> Option<GestureOutcome> {
        let origin = self.origin.take()?;
        let displacement = i32::from(column) - i32::from(origin);
        let was_drag = self.moved;
        self.current = column;
        self.moved = false;

        if !was_drag && displacement.unsigned_abs() <= u32::from(TAP_SLOP) {
            return Some(GestureOutcome::Tap);
        }
        Some(resolve_drag(displacement, container_width))
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Live horizontal offset, for rendering the card under the pointer.
    pub fn offset(&self) -> i32 {
        match self.origin {
            Some(origin) => i32::from(self.current) - i32::from(origin),
            None => 0,
        }
    }
}

/// Right is correct, left is wrong. The drag must travel strictly more than
/// [`SWIPE_THRESHOLD`] of the container width.
pub fn resolve_drag(displacement: i32, container_width: u16) -> GestureOutcome {
    let limit = f64::from(container_width) * SWIPE_THRESHOLD;
    if f64::from(displacement.unsigned_abs()) > limit {
        if displacement > 0 {
            GestureOutcome::Judge(Verdict::Correct)
        } else {
            GestureOutcome::Judge(Verdict::Wrong)
        }
    } else {
        GestureOutcome::SnapBack
    }
}
