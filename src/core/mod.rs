// src/core/mod.rs

pub mod html;
pub mod net;
pub mod normalize;

pub use net::{Fetch, FetchError, HttpFetch};
