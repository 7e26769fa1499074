// src/scrape/mod.rs
mod resolve;

pub use resolve::{parse_search_results, resolve_score, select_best_match};
