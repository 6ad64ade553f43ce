// Library target for benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the parts of the
// module tree that harnesses import via `deckr::deck::*` / `deckr::session::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod config;
pub mod deck;
pub mod session;
