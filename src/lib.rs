// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod log;
pub mod protocol;
pub mod specs;

pub mod background;
pub mod page;
pub mod scrape;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;
