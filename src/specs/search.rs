// src/specs/search.rs
//! Filmarks `/search/movies` results page.
//!
//! The page is a flat run of result "cassettes". Each one opens with
//! `class="p-content-cassette"`; we split on that and read each slice with a
//! few anchored patterns:
//!
//! ```text
//! @click="onClickDetailLink($event, '/movies/18935')"
//! <h3 class="p-content-cassette__title">Movie Title</h3>
//! <div class="c-rating__score">3.5</div>
//! <img alt="Movie Title" src="https://d2ueuvlup6lbue.cloudfront.net/...">
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::config::consts::{CARD_MARKER, SEARCH_URL_PREFIX};
use crate::core::html::decode_entities;

// `'` may arrive entity-encoded inside the Vue attribute.
static CLICK_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"onClickDetailLink\(\$event,\s*(?:'|&#39;)(/movies/\d+)(?:'|&#39;)\)").unwrap()
});
static HREF_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="(/movies/\d+)""#).unwrap());
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"p-content-cassette__title"[^>]*>([^<]+)</h3>"#).unwrap());
static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"c-rating__score"[^>]*>(\d\.\d)</div>"#).unwrap());
static THUMB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img\s[^>]*src="(https://d2ueuvlup6lbue\.cloudfront\.net/[^"]+)"[^>]*>"#).unwrap()
});

/// Whatever could be read from one card. Every field is independent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardFields {
    /// Site-relative, e.g. `/movies/18935`.
    pub path: Option<String>,
    /// Trimmed and entity-decoded.
    pub title: Option<String>,
    pub score: Option<String>,
    pub thumbnail: Option<String>,
}

impl CardFields {
    /// A card only counts as a result when it has both a title and a score.
    pub fn is_candidate(&self) -> bool {
        self.title.is_some() && self.score.is_some()
    }
}

pub fn build_search_url(title: &str) -> String {
    join!(SEARCH_URL_PREFIX, urlencoding::encode(title).as_ref())
}

/// Split the page on the card marker and read each card. The preamble
/// before the first marker is dropped.
pub fn parse_result_cards(html: &str) -> Vec<CardFields> {
    html.split(CARD_MARKER).skip(1).map(parse_card).collect()
}

pub fn parse_card(card: &str) -> CardFields {
    let path = CLICK_PATH
        .captures(card)
        .or_else(|| HREF_PATH.captures(card))
        .map(|c| s!(&c[1]));

    let title = TITLE
        .captures(card)
        .map(|c| decode_entities(c[1].trim()));

    let score = SCORE.captures(card).map(|c| s!(&c[1]));
    let thumbnail = THUMB.captures(card).map(|c| s!(&c[1]));

    CardFields { path, title, score, thumbnail }
}
