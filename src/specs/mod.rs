// src/specs/mod.rs
//! # Page specs
//!
//! Where the ground truth lives in the remote HTML, and how to read it.
//!
//! - **Pure parsing** of fetched pages into small field structs.
//! - No fetching, no matching, no presentation: `scrape` decides which card
//!   wins, the page side decides how to show it.
//! - Pattern sets are brittle by nature; keep them in one place per page and
//!   cover them with offline fixtures.
//!
//! ```text
//! background → scrape::resolve_score → specs::search::parse_result_cards
//!                                   ↘ select_best_match
//! ```
pub mod search;
