// src/core/normalize.rs
// Title canonicalization, used only to decide whether two titles are the same work.

const FULLWIDTH_START: u32 = 0xFF01;
const FULLWIDTH_END: u32 = 0xFF5E;
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

const BRACKETS: &[char] = &['（', '(', '）', ')', '【', '】', '[', ']', '「', '」', '『', '』'];
const HYPHENS: &[char] = &['-', '−', '‐', 'ー'];

/// Matching key for a title.
///
/// Lowercase, drop whitespace (U+3000 included), fold full-width ASCII to
/// half-width, then drop brackets and hyphen-like marks. The folding happens
/// before the drop, so `（` and `－` go too.
pub fn normalize_title(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(to_halfwidth)
        .filter(|c| !BRACKETS.contains(c) && !HYPHENS.contains(c))
        .collect()
}

fn to_halfwidth(c: char) -> char {
    let cp = c as u32;
    if (FULLWIDTH_START..=FULLWIDTH_END).contains(&cp) {
        char::from_u32(cp - FULLWIDTH_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Whitespace-free form used when comparing page text against a title.
pub fn squash_ws(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
