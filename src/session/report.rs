use std::rc::Rc;

use crate::deck::Deck;
use crate::session::controller::Handoff;
use crate::session::result::SessionResult;

/// Accuracy bands on the completion screen, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Excellent,
    Great,
    Good,
    Fair,
    NeedsPractice,
}

/// Which theme colour a tier is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    Success,
    Accent,
    Highlight,
    Warning,
    Error,
}

// Product-chosen boundaries, inclusive on the lower end.
const TIERS: [(u8, Tier); 4] = [
    (90, Tier::Excellent),
    (80, Tier::Great),
    (70, Tier::Good),
    (50, Tier::Fair),
];

impl Tier {
    pub fn message(self) -> &'static str {
        match self {
            Tier::Excellent => "Outstanding! You have mastered this deck.",
            Tier::Great => "Great job! Just a few cards left to polish.",
            Tier::Good => "Good work! Keep practicing to lock it in.",
            Tier::Fair => "Not bad! Another round will help these stick.",
            Tier::NeedsPractice => "Keep going! Review the deck and try again.",
        }
    }

    pub fn accent(self) -> Accent {
        match self {
            Tier::Excellent => Accent::Success,
            Tier::Great => Accent::Accent,
            Tier::Good => Accent::Highlight,
            Tier::Fair => Accent::Warning,
            Tier::NeedsPractice => Accent::Error,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Great => "Great",
            Tier::Good => "Good",
            Tier::Fair => "Fair",
            Tier::NeedsPractice => "Needs practice",
        }
    }
}

pub fn classify(accuracy: u8) -> Tier {
    TIERS
        .iter()
        .find(|(floor, _)| accuracy >= *floor)
        .map(|&(_, tier)| tier)
        .unwrap_or(Tier::NeedsPractice)
}

/// Owns a finished session's summary until the learner restarts or leaves.
/// Leaving drops the summary; results are deliberately not saved anywhere.
pub struct CompletionReport {
    pub result: SessionResult,
    pub tier: Tier,
    deck: Rc<Deck>,
}

impl CompletionReport {
    pub fn new(result: SessionResult, deck: Rc<Deck>) -> Self {
        let tier = classify(result.accuracy);
        Self { result, tier, deck }
    }

    pub fn message(&self) -> &'static str {
        self.tier.message()
    }

    /// Handoff back to the controller over the same, already loaded deck.
    pub fn restart(&self) -> Handoff {
        Handoff {
            deck: Rc::clone(&self.deck),
            title: self.result.deck_title.clone(),
            restart: true,
        }
    }

    pub fn exit(self) {
        tracing::debug!(title = %self.result.deck_title, "left completion screen");
    }
}
