// src/scrape/resolve.rs
use log::{debug, info, warn};

use crate::config::consts::SITE_BASE;
use crate::core::net::{Fetch, FetchError};
use crate::core::normalize::normalize_title;
use crate::protocol::{Failure, FailureKind, MatchKind, ScoreMatch, ScoreResult};
use crate::specs::search::{build_search_url, parse_result_cards};

/// Look up a title and return the best-matching record, or a failure tag.
///
/// One GET, no retries. Any failure is data, never a panic.
pub fn resolve_score<F: Fetch>(fetcher: &F, title: &str) -> ScoreResult {
    let search_url = build_search_url(title);
    info!("Search: {title:?} → {search_url}");

    let html = match fetcher.get_text(&search_url) {
        Ok(body) => body,
        Err(FetchError::Status(code)) => {
            warn!("Search: HTTP {code} for {search_url}");
            return Failure::new(FailureKind::SearchFailed).with_status(code).into();
        }
        Err(FetchError::Transport(msg)) => {
            warn!("Search: transport error: {msg}");
            return Failure::new(FailureKind::Fetch(msg)).into();
        }
    };

    let t = std::time::Instant::now();
    let out = parse_search_results(&html, title, &search_url);
    debug!("Search: parsed {} bytes in {:?}", html.len(), t.elapsed());
    out
}

/// Pure half of [`resolve_score`]: cards → candidates → best match.
pub fn parse_search_results(html: &str, query: &str, search_url: &str) -> ScoreResult {
    let cards = parse_result_cards(html);
    let candidates: Vec<ScoreMatch> = cards
        .into_iter()
        .filter_map(|card| {
            let (title, score) = (card.title?, card.score?);
            Some(ScoreMatch {
                title,
                score,
                url: card.path.map(|p| join!(SITE_BASE, &p)),
                thumbnail: card.thumbnail,
                search_url: s!(search_url),
                // Settled by select_best_match.
                matched: MatchKind::Fallback,
            })
        })
        .collect();

    debug!("Search: {} candidate(s) for {query:?}", candidates.len());

    match select_best_match(query, candidates) {
        Some(best) => {
            info!("Search: {:?} → {:?} ★{} ({:?})", query, best.title, best.score, best.matched);
            best.into()
        }
        None => Failure::new(FailureKind::NoResults).with_search_url(search_url).into(),
    }
}

/// First candidate, in page order, whose normalized title equals, contains or
/// is contained by the normalized query. Otherwise the first candidate,
/// flagged as a fallback. `None` only when there are no candidates.
pub fn select_best_match(query: &str, candidates: Vec<ScoreMatch>) -> Option<ScoreMatch> {
    let q = normalize_title(query);

    let mut first = None;
    for mut c in candidates {
        let t = normalize_title(&c.title);
        let kind = if t == q {
            Some(MatchKind::Exact)
        } else if t.contains(&q) || q.contains(&t) {
            Some(MatchKind::Fuzzy)
        } else {
            None
        };

        if let Some(kind) = kind {
            c.matched = kind;
            return Some(c);
        }
        if first.is_none() {
            first = Some(c);
        }
    }

    first.map(|mut c| {
        c.matched = MatchKind::Fallback;
        c
    })
}
