use crate::deck::Deck;
use crate::session::result::SessionResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn flipped(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

/// The learner's own call on the card in front of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// Progress through one run over a deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub cursor: usize,
    pub face: Face,
    pub correct: usize,
    pub wrong: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn judged(&self) -> usize {
        self.correct + self.wrong
    }

    pub fn accuracy(&self) -> u8 {
        accuracy(self.correct, self.wrong)
    }

    pub fn progress(&self, deck_len: usize) -> f64 {
        if deck_len == 0 {
            return 0.0;
        }
        self.judged() as f64 / deck_len as f64
    }
}

/// Percentage of correct verdicts, rounded half away from zero. Zero verdicts is 0.
pub fn accuracy(correct: usize, wrong: usize) -> u8 {
    let total = correct + wrong;
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Loading,
    Reviewing(SessionState),
    Completed(SessionResult),
}

impl Phase {
    pub fn state(&self) -> Option<&SessionState> {
        match self {
            Phase::Reviewing(state) => Some(state),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&SessionResult> {
        match self {
            Phase::Completed(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Loading finished; show the first card.
    Reveal,
    Flip,
    Judge(Verdict),
    /// Sent by the completion screen only.
    Restart,
}

/// The whole review state machine. Events that make no sense in the current
/// phase leave it untouched.
pub fn transition(phase: Phase, event: SessionEvent, deck: &Deck, title: &str) -> Phase {
    match (phase, event) {
        (Phase::Loading, SessionEvent::Reveal) if !deck.is_empty() => {
            Phase::Reviewing(SessionState::new())
        }
        (Phase::Reviewing(mut state), SessionEvent::Flip) => {
            state.face = state.face.flipped();
            Phase::Reviewing(state)
        }
        (Phase::Reviewing(mut state), SessionEvent::Judge(verdict)) => {
            match verdict {
                Verdict::Correct => state.correct += 1,
                Verdict::Wrong => state.wrong += 1,
            }
            if state.cursor + 1 < deck.len() {
                state.cursor += 1;
                state.face = Face::Front;
                Phase::Reviewing(state)
            } else {
                Phase::Completed(SessionResult::from_state(&state, deck.len(), title))
            }
        }
        (Phase::Completed(_), SessionEvent::Restart) => Phase::Loading,
        (phase, _) => phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Card;

    fn deck(n: usize) -> Deck {
        Deck::new(
            "test",
            (0..n).map(|i| Card::new(&format!("f{i}"), &format!("b{i}"))).collect(),
        )
    }

    fn reviewing(deck: &Deck) -> Phase {
        transition(Phase::Loading, SessionEvent::Reveal, deck, "test")
    }

    #[test]
    fn test_accuracy_zero_when_nothing_judged() {
        assert_eq!(accuracy(0, 0), 0);
    }

    #[test]
    fn test_accuracy_rounds() {
        assert_eq!(accuracy(3, 2), 60);
        assert_eq!(accuracy(2, 1), 67);
        assert_eq!(accuracy(1, 2), 33);
        assert_eq!(accuracy(1, 7), 13); // 12.5 rounds up
        assert_eq!(accuracy(5, 0), 100);
        assert_eq!(accuracy(0, 4), 0);
    }

    #[test]
    fn test_accuracy_stays_in_range() {
        for correct in 0..30 {
            for wrong in 0..30 {
                assert!(accuracy(correct, wrong) <= 100);
            }
        }
    }

    #[test]
    fn test_reveal_requires_cards() {
        let empty = Deck::new("empty", Vec::new());
        assert_eq!(
            transition(Phase::Loading, SessionEvent::Reveal, &empty, "empty"),
            Phase::Loading
        );
    }

    #[test]
    fn test_reveal_starts_fresh() {
        let deck = deck(3);
        assert_eq!(reviewing(&deck), Phase::Reviewing(SessionState::new()));
    }

    #[test]
    fn test_flip_twice_restores_face() {
        let deck = deck(3);
        let start = reviewing(&deck);
        let once = transition(start.clone(), SessionEvent::Flip, &deck, "test");
        assert_eq!(once.state().unwrap().face, Face::Back);
        let twice = transition(once, SessionEvent::Flip, &deck, "test");
        assert_eq!(twice, start);
    }

    #[test]
    fn test_judge_advances_and_resets_face() {
        let deck = deck(3);
        let phase = transition(reviewing(&deck), SessionEvent::Flip, &deck, "test");
        let phase = transition(phase, SessionEvent::Judge(Verdict::Wrong), &deck, "test");
        let state = phase.state().unwrap();
        assert_eq!(state.cursor, 1);
        assert_eq!(state.face, Face::Front);
        assert_eq!(state.wrong, 1);
        assert_eq!(state.correct, 0);
    }

    #[test]
    fn test_single_card_deck_completes_after_one_judge() {
        let deck = deck(1);
        let phase = transition(reviewing(&deck), SessionEvent::Judge(Verdict::Correct), &deck, "test");
        let result = phase.result().unwrap();
        assert_eq!(result.total_cards, 1);
        assert_eq!(result.correct, 1);
        assert_eq!(result.accuracy, 100);
    }

    #[test]
    fn test_n_judges_complete_n_card_deck() {
        for n in 1..8 {
            let deck = deck(n);
            let mut phase = reviewing(&deck);
            let mut judges = 0;
            while phase.state().is_some() {
                let verdict = if judges % 3 == 0 { Verdict::Wrong } else { Verdict::Correct };
                phase = transition(phase, SessionEvent::Judge(verdict), &deck, "test");
                judges += 1;
                if let Some(state) = phase.state() {
                    assert_eq!(state.judged(), judges);
                    assert!(state.cursor < deck.len());
                }
            }
            let result = phase.result().unwrap();
            assert_eq!(judges, n);
            assert_eq!(result.correct + result.wrong, n);
        }
    }

    #[test]
    fn test_events_ignored_outside_reviewing() {
        let deck = deck(2);
        for event in [SessionEvent::Flip, SessionEvent::Judge(Verdict::Correct)] {
            assert_eq!(transition(Phase::Loading, event, &deck, "test"), Phase::Loading);
        }
        let done = transition(
            transition(
                reviewing(&deck),
                SessionEvent::Judge(Verdict::Correct),
                &deck,
                "test",
            ),
            SessionEvent::Judge(Verdict::Correct),
            &deck,
            "test",
        );
        let again = transition(done.clone(), SessionEvent::Judge(Verdict::Wrong), &deck, "test");
        assert_eq!(again, done);
        let reveal = transition(done.clone(), SessionEvent::Reveal, &deck, "test");
        assert_eq!(reveal, done);
    }

    #[test]
    fn test_restart_goes_back_to_loading() {
        let deck = deck(1);
        let phase = transition(reviewing(&deck), SessionEvent::Judge(Verdict::Wrong), &deck, "test");
        assert!(phase.result().is_some());
        assert_eq!(transition(phase, SessionEvent::Restart, &deck, "test"), Phase::Loading);
    }

    #[test]
    fn test_restart_ignored_mid_session() {
        let deck = deck(3);
        let phase = transition(reviewing(&deck), SessionEvent::Judge(Verdict::Wrong), &deck, "test");
        let again = transition(phase.clone(), SessionEvent::Restart, &deck, "test");
        assert_eq!(again, phase);
        assert_eq!(
            transition(Phase::Loading, SessionEvent::Restart, &deck, "test"),
            Phase::Loading
        );
    }

    #[test]
    fn test_identical_runs_complete_identically() {
        let deck = deck(2);
        let run = || {
            let phase = transition(reviewing(&deck), SessionEvent::Judge(Verdict::Correct), &deck, "test");
            transition(phase, SessionEvent::Judge(Verdict::Wrong), &deck, "test")
        };
        let first = run();
        assert!(first.result().is_some());
        assert_eq!(first, run());
    }
}
