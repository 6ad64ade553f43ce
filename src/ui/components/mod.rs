pub mod deck_preview;
pub mod flashcard;
pub mod menu;
pub mod progress_bar;
pub mod report;
