// src/page/detect.rs
// Is this a title page, and what is the title?

use std::sync::LazyLock;

use regex::Regex;

use crate::config::consts::*;
use crate::page::dom::Document;

static DETAIL_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(DETAIL_PATH_PATTERN).unwrap());
static DETAIL_MODAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(DETAIL_MODAL_PATTERN).unwrap());

// "シド・アンド・ナンシー(洋画 / 1986) - 動画配信 | U-NEXT"
static SITE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[|\-–—]\s*U-NEXT.*$").unwrap());
static CATEGORY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[-–—]\s*動画配信.*$").unwrap());
static PAREN_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[（(].*$").unwrap());

/// Dedicated `/title/SID…` route, or any page with the `td=SID…` modal open.
pub fn is_detail_page(url: &str) -> bool {
    DETAIL_PATH.is_match(url) || DETAIL_MODAL.is_match(url)
}

/// One way of reading the title off a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleStrategy {
    /// `document.title` minus site/category suffixes and parenthetical metadata.
    DocumentTitle,
    /// First plausible heading that is not a section header.
    Headings,
}

impl TitleStrategy {
    /// Tried in this order; the first hit wins.
    pub const PRECEDENCE: [TitleStrategy; 2] = [TitleStrategy::DocumentTitle, TitleStrategy::Headings];

    pub fn extract<D: Document>(self, doc: &D) -> Option<String> {
        match self {
            TitleStrategy::DocumentTitle => title_from_document_title(&doc.title()),
            TitleStrategy::Headings => title_from_headings(doc),
        }
    }
}

pub fn derive_title<D: Document>(doc: &D) -> Option<String> {
    TitleStrategy::PRECEDENCE.iter().find_map(|s| s.extract(doc))
}

pub fn title_from_document_title(doc_title: &str) -> Option<String> {
    let cleaned = SITE_SUFFIX.replace(doc_title, "");
    let cleaned = CATEGORY_SUFFIX.replace(&cleaned, "");
    let cleaned = PAREN_META.replace(&cleaned, "");
    let cleaned = cleaned.trim();
    (cleaned.chars().count() >= MIN_TITLE_CHARS).then(|| s!(cleaned))
}

pub fn title_from_headings<D: Document>(doc: &D) -> Option<String> {
    TITLE_HEADING_TAGS
        .iter()
        .flat_map(|tag| doc.elements_by_tag(tag))
        .map(|el| s!(doc.text_content(el).trim()))
        .find(|text| {
            let n = text.chars().count();
            (MIN_TITLE_CHARS..=MAX_HEADING_CHARS).contains(&n) && !is_section_header(text)
        })
}

fn is_section_header(text: &str) -> bool {
    let lc = text.to_lowercase();
    SECTION_HEADER_PREFIXES.iter().any(|p| lc.starts_with(p))
}
