use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::deck::{Card, Deck, DeckError};
use crate::session::gate::{InputGate, LoadingGate};
use crate::session::gesture::{DragTracker, GestureOutcome};
use crate::session::result::SessionResult;
use crate::session::state::{Face, Phase, SessionEvent, SessionState, Verdict, transition};

/// What the selector (or the completion screen, on restart) passes in.
#[derive(Clone, Debug)]
pub struct Handoff {
    pub deck: Rc<Deck>,
    pub title: String,
    pub restart: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub loading_delay: Duration,
    pub flip: Duration,
    pub swipe: Duration,
}

impl Timings {
    /// No pauses and no input lock. Used by tests and `--no-delay`.
    pub fn instant() -> Self {
        Self {
            loading_delay: Duration::ZERO,
            flip: Duration::ZERO,
            swipe: Duration::ZERO,
        }
    }

    // The face swaps at the midpoint of the flip animation; a verdict is
    // settled once the old card has left.
    fn lock_for(&self, event: SessionEvent) -> Duration {
        match event {
            SessionEvent::Flip => self.flip / 2,
            SessionEvent::Judge(_) => self.swipe,
            SessionEvent::Reveal | SessionEvent::Restart => Duration::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Revealed,
    Flipped(Face),
    Judged(Verdict),
}

/// The last committed transition. The presentation layer animates from this.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionRecord {
    pub kind: TransitionKind,
    pub at: Instant,
    pub progress_before: f64,
    pub progress_after: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// Dropped because an earlier transition is still in flight.
    Gated,
    /// Not meaningful in the current phase.
    Ignored,
}

pub struct ReviewController {
    deck: Rc<Deck>,
    title: String,
    phase: Phase,
    loading: LoadingGate,
    input: InputGate,
    drag: DragTracker,
    timings: Timings,
    last: Option<TransitionRecord>,
}

impl ReviewController {
    /// Refuses an empty deck; the selector shows its empty state instead.
    pub fn new(handoff: Handoff, timings: Timings, now: Instant) -> Result<Self, DeckError> {
        if handoff.deck.is_empty() {
            return Err(DeckError::Empty);
        }
        tracing::info!(
            title = %handoff.title,
            cards = handoff.deck.len(),
            restart = handoff.restart,
            "review session started"
        );
        Ok(Self {
            deck: handoff.deck,
            title: handoff.title,
            phase: Phase::Loading,
            loading: LoadingGate::new(now, timings.loading_delay),
            input: InputGate::default(),
            drag: DragTracker::default(),
            timings,
            last: None,
        })
    }

    /// Takes a new handoff. A restart keeps this controller and replays the
    /// session from the loading pause; it is only honoured once the session
    /// has completed. Anything else replaces the session.
    pub fn accept(&mut self, handoff: Handoff, now: Instant) -> Result<(), DeckError> {
        if !handoff.restart {
            *self = Self::new(handoff, self.timings, now)?;
            return Ok(());
        }
        if handoff.deck.is_empty() {
            return Err(DeckError::Empty);
        }
        if self.result().is_none() {
            tracing::debug!(title = %self.title, "restart ignored before completion");
            return Ok(());
        }
        self.deck = handoff.deck;
        self.title = handoff.title;
        self.apply(SessionEvent::Restart);
        self.loading = LoadingGate::new(now, self.timings.loading_delay);
        self.input.release();
        self.drag.cancel();
        self.last = None;
        tracing::info!(title = %self.title, "review session restarted");
        Ok(())
    }

    /// Advances timers. Returns true when the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if matches!(self.phase, Phase::Loading) && self.loading.is_open(now) {
            let before = self.progress();
            self.apply(SessionEvent::Reveal);
            self.record(TransitionKind::Revealed, now, before);
            return true;
        }
        false
    }

    pub fn skip_loading(&mut self, now: Instant) {
        if matches!(self.phase, Phase::Loading) {
            self.loading.skip();
            self.tick(now);
        }
    }

    pub fn flip(&mut self, now: Instant) -> Dispatch {
        self.dispatch(SessionEvent::Flip, now)
    }

    pub fn judge(&mut self, verdict: Verdict, now: Instant) -> Dispatch {
        self.dispatch(SessionEvent::Judge(verdict), now)
    }

    pub fn drag_start(&mut self, column: u16) {
        if self.state().is_some() {
            self.drag.start(column);
        }
    }

    pub fn drag_move(&mut self, column: u16) {
        self.drag.move_to(column);
    }

    /// Resolves the drag against `container_width` and feeds the outcome to
    /// the state machine. A snap-back changes nothing.
    pub fn drag_release(&mut self, column: u16, container_width: u16, now: Instant) -> Option<Dispatch> {
        let outcome = self.drag.release(column, container_width)?;
        tracing::debug!(?outcome, "gesture released");
        Some(match outcome {
            GestureOutcome::Tap => self.flip(now),
            GestureOutcome::Judge(verdict) => self.judge(verdict, now),
            GestureOutcome::SnapBack => Dispatch::Ignored,
        })
    }

    fn dispatch(&mut self, event: SessionEvent, now: Instant) -> Dispatch {
        if self.state().is_none() {
            return Dispatch::Ignored;
        }
        if self.input.is_locked(now) {
            tracing::debug!(?event, "input gated while transition settles");
            return Dispatch::Gated;
        }

        let before = self.progress();
        self.apply(event);

        let kind = match (event, &self.phase) {
            (SessionEvent::Flip, Phase::Reviewing(state)) => TransitionKind::Flipped(state.face),
            (SessionEvent::Judge(verdict), _) => TransitionKind::Judged(verdict),
            _ => return Dispatch::Ignored,
        };
        self.record(kind, now, before);
        self.input.lock_for(now, self.timings.lock_for(event));
        if let TransitionKind::Judged(_) = kind {
            // A held drag belonged to the card that was just judged.
            self.drag.cancel();
        }

        if let Phase::Completed(result) = &mut self.phase {
            result.finished_at = Some(Utc::now());
            tracing::info!(
                title = %result.deck_title,
                correct = result.correct,
                wrong = result.wrong,
                accuracy = result.accuracy,
                "review session completed"
            );
        }
        Dispatch::Applied
    }

    fn apply(&mut self, event: SessionEvent) {
        let phase = std::mem::replace(&mut self.phase, Phase::Loading);
        self.phase = transition(phase, event, &self.deck, &self.title);
        tracing::debug!(?event, phase = ?self.phase, "transition");
    }

    fn record(&mut self, kind: TransitionKind, at: Instant, progress_before: f64) {
        self.last = Some(TransitionRecord {
            kind,
            at,
            progress_before,
            progress_after: self.progress(),
        });
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.phase.state()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.phase.result()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn loading_progress(&self, now: Instant) -> f64 {
        self.loading.progress(now)
    }

    pub fn deck(&self) -> &Rc<Deck> {
        &self.deck
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.state().and_then(|s| self.deck.get(s.cursor))
    }

    /// Fraction of the deck judged so far.
    pub fn progress(&self) -> f64 {
        match &self.phase {
            Phase::Loading => 0.0,
            Phase::Reviewing(state) => state.progress(self.deck.len()),
            Phase::Completed(_) => 1.0,
        }
    }

    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.last.as_ref()
    }

    pub fn drag_offset(&self) -> i32 {
        self.drag.offset()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handoff(n: usize) -> Handoff {
        let cards = (0..n).map(|i| Card::new(&format!("q{i}"), &format!("a{i}"))).collect();
        Handoff {
            deck: Rc::new(Deck::new("Deck", cards)),
            title: "Deck".to_string(),
            restart: false,
        }
    }

    fn started(n: usize, timings: Timings, now: Instant) -> ReviewController {
        let mut ctl = ReviewController::new(handoff(n), timings, now).unwrap();
        ctl.skip_loading(now);
        ctl
    }

    #[test]
    fn test_empty_deck_refused() {
        let err = ReviewController::new(handoff(0), Timings::instant(), Instant::now()).err();
        assert!(matches!(err, Some(DeckError::Empty)));
    }

    #[test]
    fn test_loading_holds_until_delay() {
        let t0 = Instant::now();
        let timings = Timings {
            loading_delay: Duration::from_millis(500),
            ..Timings::instant()
        };
        let mut ctl = ReviewController::new(handoff(2), timings, t0).unwrap();
        assert!(ctl.is_loading());
        assert_eq!(ctl.flip(t0), Dispatch::Ignored);
        assert!(!ctl.tick(t0 + Duration::from_millis(100)));
        assert!(ctl.tick(t0 + Duration::from_millis(500)));
        assert_eq!(ctl.state(), Some(&SessionState::new()));
        assert_eq!(ctl.last_transition().unwrap().kind, TransitionKind::Revealed);
    }

    #[test]
    fn test_double_swipe_within_animation_counts_once() {
        let t0 = Instant::now();
        let timings = Timings {
            swipe: Duration::from_millis(280),
            ..Timings::instant()
        };
        let mut ctl = started(3, timings, t0);
        assert_eq!(ctl.judge(Verdict::Correct, t0), Dispatch::Applied);
        assert_eq!(
            ctl.judge(Verdict::Correct, t0 + Duration::from_millis(100)),
            Dispatch::Gated
        );
        assert_eq!(ctl.state().unwrap().correct, 1);
        assert_eq!(ctl.state().unwrap().cursor, 1);
        assert_eq!(
            ctl.judge(Verdict::Wrong, t0 + Duration::from_millis(280)),
            Dispatch::Applied
        );
        assert_eq!(ctl.state().unwrap().wrong, 1);
    }

    #[test]
    fn test_flip_locks_for_half_the_animation() {
        let t0 = Instant::now();
        let timings = Timings {
            flip: Duration::from_millis(240),
            ..Timings::instant()
        };
        let mut ctl = started(2, timings, t0);
        assert_eq!(ctl.flip(t0), Dispatch::Applied);
        assert_eq!(ctl.flip(t0 + Duration::from_millis(119)), Dispatch::Gated);
        assert_eq!(ctl.flip(t0 + Duration::from_millis(120)), Dispatch::Applied);
        assert_eq!(ctl.state().unwrap().face, Face::Front);
    }

    #[test]
    fn test_short_drag_leaves_state_untouched() {
        let t0 = Instant::now();
        let mut ctl = started(3, Timings::instant(), t0);
        ctl.flip(t0);
        let before = *ctl.state().unwrap();
        ctl.drag_start(20);
        ctl.drag_move(25);
        ctl.drag_move(28);
        assert_eq!(ctl.drag_offset(), 8);
        assert_eq!(ctl.drag_release(28, 40, t0), Some(Dispatch::Ignored));
        assert_eq!(*ctl.state().unwrap(), before);
        assert_eq!(ctl.drag_offset(), 0);
    }

    #[test]
    fn test_tap_flips_and_long_drag_judges() {
        let t0 = Instant::now();
        let mut ctl = started(3, Timings::instant(), t0);
        ctl.drag_start(20);
        assert_eq!(ctl.drag_release(20, 40, t0), Some(Dispatch::Applied));
        assert_eq!(ctl.state().unwrap().face, Face::Back);

        ctl.drag_start(20);
        ctl.drag_move(10);
        ctl.drag_move(2);
        assert_eq!(ctl.drag_release(2, 40, t0), Some(Dispatch::Applied));
        let state = ctl.state().unwrap();
        assert_eq!(state.wrong, 1);
        assert_eq!(state.cursor, 1);
        assert_eq!(state.face, Face::Front);
    }

    #[test]
    fn test_drag_not_tracked_while_loading() {
        let t0 = Instant::now();
        let timings = Timings {
            loading_delay: Duration::from_secs(1),
            ..Timings::instant()
        };
        let mut ctl = ReviewController::new(handoff(2), timings, t0).unwrap();
        ctl.drag_start(5);
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.drag_release(30, 40, t0), None);
    }

    #[test]
    fn test_completion_records_result() {
        let t0 = Instant::now();
        let mut ctl = started(2, Timings::instant(), t0);
        ctl.judge(Verdict::Correct, t0);
        ctl.judge(Verdict::Wrong, t0);
        let result = ctl.result().unwrap();
        assert_eq!(result.total_cards, 2);
        assert_eq!(result.accuracy, 50);
        assert_eq!(ctl.progress(), 1.0);
        assert_eq!(ctl.judge(Verdict::Correct, t0), Dispatch::Ignored);
    }

    #[test]
    fn test_restart_handoff_resets_over_same_deck() {
        let t0 = Instant::now();
        let mut ctl = started(2, Timings::instant(), t0);
        ctl.judge(Verdict::Correct, t0);
        ctl.judge(Verdict::Correct, t0);
        let deck = Rc::clone(ctl.deck());
        ctl.accept(
            Handoff {
                deck: Rc::clone(&deck),
                title: "Deck".to_string(),
                restart: true,
            },
            t0,
        )
        .unwrap();
        assert!(ctl.is_loading());
        assert!(ctl.last_transition().is_none());
        ctl.tick(t0);
        assert_eq!(ctl.state(), Some(&SessionState::new()));
        assert!(Rc::ptr_eq(ctl.deck(), &deck));
    }

    #[test]
    fn test_held_drag_dropped_when_card_judged_by_key() {
        let t0 = Instant::now();
        let timings = Timings {
            swipe: Duration::from_millis(280),
            ..Timings::instant()
        };
        let mut ctl = started(3, timings, t0);
        ctl.drag_start(20);
        assert_eq!(ctl.judge(Verdict::Wrong, t0), Dispatch::Applied);
        assert!(!ctl.is_dragging());

        ctl.drag_move(40);
        assert_eq!(ctl.drag_release(40, 40, t0 + Duration::from_millis(400)), None);
        let state = ctl.state().unwrap();
        assert_eq!((state.cursor, state.correct, state.wrong), (1, 0, 1));
    }

    #[test]
    fn test_completion_stamps_finish_time() {
        let t0 = Instant::now();
        let mut ctl = started(1, Timings::instant(), t0);
        ctl.judge(Verdict::Correct, t0);
        assert!(ctl.result().unwrap().finished_at.is_some());
    }

    #[test]
    fn test_restart_handoff_ignored_mid_session() {
        let t0 = Instant::now();
        let mut ctl = started(3, Timings::instant(), t0);
        ctl.judge(Verdict::Correct, t0);
        let deck = Rc::clone(ctl.deck());
        ctl.accept(
            Handoff {
                deck,
                title: "Deck".to_string(),
                restart: true,
            },
            t0,
        )
        .unwrap();
        assert!(!ctl.is_loading());
        let state = ctl.state().unwrap();
        assert_eq!((state.cursor, state.correct), (1, 1));
    }

    #[test]
    fn test_progress_record_tracks_before_and_after() {
        let t0 = Instant::now();
        let mut ctl = started(4, Timings::instant(), t0);
        ctl.judge(Verdict::Correct, t0);
        let record = ctl.last_transition().unwrap();
        assert_eq!(record.kind, TransitionKind::Judged(Verdict::Correct));
        assert_eq!(record.progress_before, 0.0);
        assert_eq!(record.progress_after, 0.25);
    }
}
