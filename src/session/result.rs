use chrono::{DateTime, Utc};

use crate::session::state::{SessionState, accuracy};

/// Summary handed to the completion screen. Never written to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionResult {
    pub total_cards: usize,
    pub correct: usize,
    pub wrong: usize,
    pub accuracy: u8,
    pub deck_title: String,
    /// Stamped by the controller when the session completes.
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionResult {
    pub fn from_state(state: &SessionState, total_cards: usize, deck_title: &str) -> Self {
        Self {
            total_cards,
            correct: state.correct,
            wrong: state.wrong,
            accuracy: accuracy(state.correct, state.wrong),
            deck_title: deck_title.to_string(),
            finished_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_state_copies_counts() {
        let state = SessionState {
            cursor: 4,
            correct: 3,
            wrong: 2,
            ..SessionState::default()
        };
        let result = SessionResult::from_state(&state, 5, "Kana");
        assert_eq!(result.total_cards, 5);
        assert_eq!(result.correct, 3);
        assert_eq!(result.wrong, 2);
        assert_eq!(result.accuracy, 60);
        assert_eq!(result.deck_title, "Kana");
        assert!(result.finished_at.is_none());
    }
}
