// src/page/place.rs
// Where the badge goes: right after the element showing the title.

use log::debug;

use crate::config::consts::{MIN_TITLE_CHARS, TITLE_HEADING_TAGS};
use crate::core::normalize::squash_ws;
use crate::page::dom::Document;

/// Element whose whitespace-free text equals the title.
///
/// Headings first. Failing that, walk text nodes: any fragment that is part
/// of the title is followed up through its ancestors (stopping at the body)
/// until one matches the whole title.
pub fn find_title_element<D: Document>(doc: &D, title: &str) -> Option<D::Node> {
    let target = squash_ws(title);
    if target.is_empty() {
        return None;
    }

    for tag in TITLE_HEADING_TAGS {
        if let Some(el) = doc
            .elements_by_tag(tag)
            .into_iter()
            .find(|el| squash_ws(&doc.text_content(*el)) == target)
        {
            return Some(el);
        }
    }

    let body = doc.body();
    for text_node in doc.text_nodes() {
        let text = doc.text_content(text_node);
        let text = text.trim();
        if text.chars().count() < MIN_TITLE_CHARS || !target.contains(&squash_ws(text)) {
            continue;
        }
        let mut cur = doc.parent_element(text_node);
        while let Some(el) = cur {
            if el == body {
                break;
            }
            if squash_ws(&doc.text_content(el)) == target {
                return Some(el);
            }
            cur = doc.parent_element(el);
        }
    }
    None
}

/// Move `badge` next to the title element. `false` leaves it where it was.
pub fn position_badge<D: Document>(doc: &mut D, badge: D::Node, title: &str) -> bool {
    match find_title_element(doc, title) {
        Some(el) => {
            doc.insert_after(el, badge);
            true
        }
        None => {
            debug!("Place: no element shows {title:?}");
            false
        }
    }
}
