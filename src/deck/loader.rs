use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::deck::card::{Card, Deck};

#[derive(Embed)]
#[folder = "assets/decks/"]
struct DeckAssets;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck has no cards")]
    Empty,
    #[error("no bundled deck named `{0}`")]
    UnknownBundled(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid deck: {0}")]
    Parse(#[from] serde_json::Error),
    #[cfg(feature = "network")]
    #[error("failed to fetch deck: {0}")]
    Fetch(#[from] reqwest::Error),
    #[cfg(not(feature = "network"))]
    #[error("deckr was built without network support")]
    NetworkDisabled,
}

impl DeckError {
    /// The empty deck is an expected state, not a failure.
    pub fn is_empty_deck(&self) -> bool {
        matches!(self, DeckError::Empty)
    }
}

/// Where a lesson's cards come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LessonRef {
    Bundled(String),
    File(PathBuf),
    Url(String),
}

impl fmt::Display for LessonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonRef::Bundled(name) => write!(f, "{name}"),
            LessonRef::File(path) => write!(f, "{}", path.display()),
            LessonRef::Url(url) => write!(f, "{url}"),
        }
    }
}

impl LessonRef {
    /// Title used when the deck file does not carry one.
    pub fn fallback_title(&self) -> String {
        let raw = match self {
            LessonRef::Bundled(name) => name.clone(),
            LessonRef::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "Deck".to_string()),
            LessonRef::Url(url) => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or("Deck")
                .trim_end_matches(".json")
                .to_string(),
        };
        title_case(&raw)
    }
}

fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeckFile {
    Titled {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        cards: Vec<Card>,
    },
    Bare(Vec<Card>),
}

/// Parse deck JSON. Zero cards is reported as [`DeckError::Empty`].
pub fn parse_deck(json: &str, fallback_title: &str) -> Result<Deck, DeckError> {
    let (title, cards) = match serde_json::from_str::<DeckFile>(json)? {
        DeckFile::Titled { title, cards } => (title, cards),
        DeckFile::Bare(cards) => (None, cards),
    };
    if cards.is_empty() {
        return Err(DeckError::Empty);
    }
    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| fallback_title.to_string());
    let cards = cards.into_iter().map(Card::normalized).collect();
    Ok(Deck::new(&title, cards))
}

pub fn load_deck(lesson: &LessonRef) -> Result<Deck, DeckError> {
    let json = match lesson {
        LessonRef::Bundled(name) => {
            let file = DeckAssets::get(&format!("{name}.json"))
                .ok_or_else(|| DeckError::UnknownBundled(name.clone()))?;
            String::from_utf8_lossy(file.data.as_ref()).into_owned()
        }
        LessonRef::File(path) => fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.clone(),
            source,
        })?,
        LessonRef::Url(url) => fetch(url)?,
    };
    let deck = parse_deck(&json, &lesson.fallback_title())?;
    tracing::info!(lesson = %lesson, cards = deck.len(), "deck loaded");
    Ok(deck)
}

#[cfg(feature = "network")]
fn fetch(url: &str) -> Result<String, DeckError> {
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    Ok(body)
}

#[cfg(not(feature = "network"))]
fn fetch(_url: &str) -> Result<String, DeckError> {
    Err(DeckError::NetworkDisabled)
}

pub fn bundled_deck_names() -> Vec<String> {
    let mut names: Vec<String> = DeckAssets::iter()
        .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

/// Bundled decks first, then `*.json` files in `decks_dir` sorted by name.
/// A missing directory just contributes nothing.
pub fn available_lessons(decks_dir: &Path) -> Vec<LessonRef> {
    let mut lessons: Vec<LessonRef> = bundled_deck_names()
        .into_iter()
        .map(LessonRef::Bundled)
        .collect();

    if let Ok(entries) = fs::read_dir(decks_dir) {
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        lessons.extend(files.into_iter().map(LessonRef::File));
    }

    lessons
}
