pub mod card;
pub mod loader;

pub use card::{Card, Deck};
pub use loader::{DeckError, LessonRef};
