// src/page/badge.rs
// Badge states and the markup each one renders to.

use crate::config::consts::*;
use crate::core::html::escape_html;
use crate::protocol::{MatchKind, ScoreResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BadgeView {
    Loading,
    NoScore,
    Scored(ScoreCard),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: String,
    /// Movie page, or the site root when the card had no link.
    pub movie_url: String,
    pub search_url: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub matched: MatchKind,
}

/// Rendered badge. `links` holds the target of every guarded anchor in
/// `html`, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeMarkup {
    pub class_name: &'static str,
    pub html: String,
    pub links: Vec<String>,
}

impl BadgeView {
    /// Pick the state for a reply. Failures, empty scores and (when
    /// `hide_fallback`) unmatched guesses all collapse to "no score".
    pub fn from_result(result: &ScoreResult, hide_fallback: bool) -> Self {
        let Some(m) = result.as_match() else {
            return BadgeView::NoScore;
        };
        if m.score.is_empty() || (hide_fallback && m.matched == MatchKind::Fallback) {
            return BadgeView::NoScore;
        }

        let movie_url = m.url.clone().unwrap_or_else(|| s!(SITE_BASE));
        let search_url = if m.search_url.is_empty() { movie_url.clone() } else { m.search_url.clone() };

        BadgeView::Scored(ScoreCard {
            score: m.score.clone(),
            movie_url,
            search_url,
            title: Some(m.title.clone()).filter(|t| !t.is_empty()),
            thumbnail: m.thumbnail.clone(),
            matched: m.matched,
        })
    }

    pub fn markup(&self) -> BadgeMarkup {
        match self {
            BadgeView::Loading => BadgeMarkup {
                class_name: "loading",
                html: format!(
                    r#"<span class="filmarks-logo">{BADGE_LABEL}</span><span class="filmarks-rating">{LOADING_TEXT}</span>"#
                ),
                links: Vec::new(),
            },
            BadgeView::NoScore => BadgeMarkup {
                class_name: "",
                html: format!(
                    r#"<span class="filmarks-logo">{BADGE_LABEL}</span><span class="filmarks-rating" style="color:#8b95a5;font-size:12px;">{NO_SCORE_TEXT}</span>"#
                ),
                links: Vec::new(),
            },
            BadgeView::Scored(card) => card.markup(),
        }
    }
}

impl ScoreCard {
    fn markup(&self) -> BadgeMarkup {
        let mut html = s!();

        if let Some(thumb) = &self.thumbnail {
            html.push_str(&format!(r#"<img class="filmarks-thumb" src="{}" alt="">"#, escape_html(thumb)));
        }

        html.push_str(r#"<div class="filmarks-info">"#);
        let mut links = Vec::new();
        let rating = format!(
            r#"<span class="filmarks-logo">{BADGE_LABEL}</span><span class="filmarks-star">{STAR}</span><span class="filmarks-rating">{}</span>"#,
            escape_html(&self.score),
        );
        html.push_str(&guarded_link(&mut links, "filmarks-main-link", &self.movie_url, &rating));
        if let Some(title) = &self.title {
            html.push_str(&format!(r#"<span class="filmarks-match-title">{}</span>"#, escape_html(title)));
        }
        html.push_str(&guarded_link(&mut links, "filmarks-search-link", &self.search_url, SEARCH_LINK_TEXT));
        html.push_str("</div>");

        BadgeMarkup {
            class_name: if self.matched == MatchKind::Fallback { "low-confidence" } else { "" },
            html,
            links,
        }
    }
}

/// New-tab anchor around `inner` (already markup). The target is recorded in
/// `links` so the host binding attaches its click guard to this anchor.
fn guarded_link(links: &mut Vec<String>, class: &str, url: &str, inner: &str) -> String {
    links.push(s!(url));
    format!(
        r#"<a class="{class}" href="{}" target="_blank" rel="noopener noreferrer">{inner}</a>"#,
        escape_html(url)
    )
}
