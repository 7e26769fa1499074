// src/config/consts.rs

// Ratings site
pub const SITE_BASE: &str = "https://filmarks.com";
pub const SEARCH_URL_PREFIX: &str = "https://filmarks.com/search/movies?q=";
pub const THUMB_HOST_PREFIX: &str = "https://d2ueuvlup6lbue.cloudfront.net/";
pub const USER_AGENT: &str = concat!("filmarks_badge/", env!("CARGO_PKG_VERSION"));

// Search results markup
pub const CARD_MARKER: &str = r#"class="p-content-cassette""#;

// Host site
pub const DETAIL_PATH_PATTERN: &str = r"video\.unext\.jp/title/SID";
pub const DETAIL_MODAL_PATTERN: &str = r"[?&]td=SID";

// Message passing
pub const FETCH_MESSAGE_TYPE: &str = "FETCH_FILMARKS";

// Badge
pub const BADGE_ID: &str = "filmarks-score-badge";
pub const BADGE_LABEL: &str = "Filmarks";
pub const LOADING_TEXT: &str = "読み込み中...";
pub const NO_SCORE_TEXT: &str = "スコアなし";
pub const SEARCH_LINK_TEXT: &str = "検索結果を見る";
pub const STAR: &str = "★";

// Title derivation
pub const MIN_TITLE_CHARS: usize = 2;
pub const MAX_HEADING_CHARS: usize = 100;
pub const TITLE_HEADING_TAGS: [&str; 4] = ["h1", "h2", "h3", "h4"];
pub const SECTION_HEADER_PREFIXES: &[&str] = &[
    "おすすめ", "関連", "新着", "ランキング", "キャスト",
    "recommended", "related", "new releases", "ranking", "cast",
];

// Timing
pub const DEBOUNCE_MS: u64 = 500;
pub const STARTUP_CHECKS_MS: [u64; 2] = [1000, 3000];

// Diagnostics
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
