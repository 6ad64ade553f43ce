use icu_normalizer::ComposingNormalizerBorrowed;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One flashcard. Identity is its position in the owning [`Deck`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, deserialize_with = "lossy_text")]
    pub front: String,
    #[serde(default, deserialize_with = "lossy_aux", skip_serializing_if = "Option::is_none")]
    pub aux: Option<String>,
    #[serde(default, deserialize_with = "lossy_text")]
    pub back: String,
}

// Content comes from a best-effort source: null or non-string faces degrade to
// text instead of failing the whole deck.
fn lossy_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lossy_aux<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = lossy_text(deserializer)?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

impl Card {
    #[allow(dead_code)]
    pub fn new(front: &str, back: &str) -> Self {
        Self {
            front: front.to_string(),
            aux: None,
            back: back.to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn with_aux(mut self, aux: &str) -> Self {
        self.aux = Some(aux.to_string());
        self
    }

    /// NFC-normalize every face so composed and decomposed input render alike.
    pub fn normalized(self) -> Self {
        let nfc = ComposingNormalizerBorrowed::new_nfc();
        Self {
            front: nfc.normalize(&self.front).into_owned(),
            aux: self.aux.map(|a| nfc.normalize(&a).into_owned()),
            back: nfc.normalize(&self.back).into_owned(),
        }
    }
}

/// An ordered, read-only sequence of cards for one practice run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    pub title: String,
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(title: &str, cards: Vec<Card>) -> Self {
        Self {
            title: title.to_string(),
            cards,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    #[allow(dead_code)]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Consumes the deck and returns a permuted copy. Only used at load time.
    pub fn shuffled<R: Rng>(mut self, rng: &mut R) -> Self {
        self.cards.shuffle(rng);
        self
    }
}
