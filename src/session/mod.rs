pub mod controller;
pub mod gate;
pub mod gesture;
pub mod report;
pub mod result;
pub mod selector;
pub mod state;
