use std::fmt;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::deck::loader;
use crate::deck::{Card, Deck, DeckError, LessonRef};
use crate::session::controller::Handoff;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeMode {
    Flashcard,
    Quiz,
    Test,
}

impl PracticeMode {
    pub const ALL: [PracticeMode; 3] = [PracticeMode::Flashcard, PracticeMode::Quiz, PracticeMode::Test];

    pub fn key(self) -> char {
        match self {
            PracticeMode::Flashcard => '1',
            PracticeMode::Quiz => '2',
            PracticeMode::Test => '3',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PracticeMode::Flashcard => "Flip cards and judge your own recall",
            PracticeMode::Quiz => "Multiple-choice questions from the course",
            PracticeMode::Test => "Timed test over the whole lesson",
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PracticeMode::Flashcard => "Flashcards",
            PracticeMode::Quiz => "Quiz",
            PracticeMode::Test => "Test",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("{0} mode is not available yet")]
    Unavailable(PracticeMode),
    #[error("{0} mode is handled by the course app")]
    External(PracticeMode),
    #[error("load a deck with cards first")]
    NoDeck,
}

#[derive(Clone, Debug)]
pub enum DeckStatus {
    Ready(Rc<Deck>),
    Empty,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewDirection {
    Previous,
    Next,
}

/// Lesson picker, read-only deck preview and mode launcher.
pub struct DeckSelector {
    lessons: Vec<LessonRef>,
    lesson_index: usize,
    status: DeckStatus,
    preview: usize,
    pub mode_selected: usize,
    shuffle: bool,
    rng: SmallRng,
}

impl DeckSelector {
    pub fn new(lessons: Vec<LessonRef>, shuffle: bool) -> Self {
        Self {
            lessons,
            lesson_index: 0,
            status: DeckStatus::Empty,
            preview: 0,
            mode_selected: 0,
            shuffle,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Loads the current lesson from its source.
    pub fn load(&mut self) {
        self.load_with(loader::load_deck);
    }

    pub fn load_with<F>(&mut self, load: F)
    where
        F: FnOnce(&LessonRef) -> Result<Deck, DeckError>,
    {
        self.preview = 0;
        let Some(lesson) = self.lessons.get(self.lesson_index) else {
            self.status = DeckStatus::Empty;
            return;
        };
        self.status = match load(lesson) {
            Ok(deck) if deck.is_empty() => DeckStatus::Empty,
            Ok(deck) => {
                let deck = if self.shuffle {
                    deck.shuffled(&mut self.rng)
                } else {
                    deck
                };
                DeckStatus::Ready(Rc::new(deck))
            }
            Err(err) if err.is_empty_deck() => DeckStatus::Empty,
            Err(err) => {
                tracing::warn!(lesson = %lesson, error = %err, "deck failed to load");
                DeckStatus::Failed(err.to_string())
            }
        };
    }

    /// Same as [`load`](Self::load); offered from the empty and failed states.
    pub fn retry(&mut self) {
        self.load();
    }

    pub fn status(&self) -> &DeckStatus {
        &self.status
    }

    pub fn deck(&self) -> Option<&Rc<Deck>> {
        match &self.status {
            DeckStatus::Ready(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn lessons(&self) -> &[LessonRef] {
        &self.lessons
    }

    pub fn current_lesson(&self) -> Option<&LessonRef> {
        self.lessons.get(self.lesson_index)
    }

    /// Moves to another lesson (wrapping). The caller reloads.
    pub fn cycle_lesson(&mut self, forward: bool) -> bool {
        if self.lessons.len() < 2 {
            return false;
        }
        let len = self.lessons.len();
        self.lesson_index = if forward {
            (self.lesson_index + 1) % len
        } else {
            (self.lesson_index + len - 1) % len
        };
        true
    }

    pub fn preview(&mut self, direction: PreviewDirection) {
        let Some(deck) = self.deck() else {
            return;
        };
        let last = deck.len().saturating_sub(1);
        self.preview = match direction {
            PreviewDirection::Previous => self.preview.saturating_sub(1),
            PreviewDirection::Next => (self.preview + 1).min(last),
        };
    }

    pub fn preview_index(&self) -> usize {
        self.preview
    }

    pub fn preview_card(&self) -> Option<&Card> {
        self.deck().and_then(|d| d.get(self.preview))
    }

    pub fn can_launch(&self) -> bool {
        self.deck().is_some()
    }

    pub fn next_mode(&mut self) {
        self.mode_selected = (self.mode_selected + 1) % PracticeMode::ALL.len();
    }

    pub fn prev_mode(&mut self) {
        if self.mode_selected > 0 {
            self.mode_selected -= 1;
        } else {
            self.mode_selected = PracticeMode::ALL.len() - 1;
        }
    }

    pub fn selected_mode(&self) -> PracticeMode {
        PracticeMode::ALL[self.mode_selected.min(PracticeMode::ALL.len() - 1)]
    }

    pub fn select_mode(&self, mode: PracticeMode, title: Option<&str>) -> Result<Handoff, ModeError> {
        let deck = self.deck().ok_or(ModeError::NoDeck)?;
        match mode {
            PracticeMode::Flashcard => Ok(Handoff {
                deck: Rc::clone(deck),
                title: title.map(str::to_string).unwrap_or_else(|| deck.title.clone()),
                restart: false,
            }),
            PracticeMode::Quiz => Err(ModeError::External(mode)),
            PracticeMode::Test => Err(ModeError::Unavailable(mode)),
        }
    }
}
