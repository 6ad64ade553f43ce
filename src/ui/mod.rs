pub mod components;
pub mod layout;
pub mod motion;
pub mod theme;
