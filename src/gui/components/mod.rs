// src/gui/components/mod.rs
pub mod badge_panel;
pub mod page_panel;
