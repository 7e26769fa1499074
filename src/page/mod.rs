// src/page/mod.rs
// Page-context side: detect title pages, place the badge, keep it current.

pub mod badge;
pub mod debounce;
pub mod detect;
pub mod dom;
pub mod place;
pub mod watcher;

pub use badge::{BadgeMarkup, BadgeView};
pub use dom::{Document, MemoryDocument, NodeId};
pub use watcher::{RequestToken, ScoreChannel, Trigger, Watcher};
