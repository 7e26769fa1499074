// tests/background_channel.rs
//
// Watcher wired to the threaded worker, as the preview GUI runs it.
//
use std::time::Instant;

use filmarks_badge::background::BackgroundWorker;
use filmarks_badge::config::WatchOptions;
use filmarks_badge::core::{Fetch, FetchError};
use filmarks_badge::page::{BadgeView, Document, MemoryDocument, Watcher};

const SID: &str = include_str!("fixtures/search_sid_and_nancy.html");

struct Canned(&'static str);

impl Fetch for Canned {
    fn get_text(&self, _url: &str) -> Result<String, FetchError> {
        Ok(self.0.to_string())
    }
}

struct Down;

impl Fetch for Down {
    fn get_text(&self, _url: &str) -> Result<String, FetchError> {
        Err(FetchError::Status(500))
    }
}

fn title_page() -> MemoryDocument {
    let mut doc = MemoryDocument::new(
        "https://video.unext.jp/title/SID0012345",
        "シド・アンド・ナンシー(洋画 / 1986) - 動画配信 | U-NEXT",
    );
    let body = doc.body();
    let h = doc.element(body, "h2");
    doc.text(h, "シド・アンド・ナンシー");
    doc
}

#[test]
fn worker_reply_reaches_badge() {
    let worker = BackgroundWorker::new(Canned(SID));
    let mut w = Watcher::new(title_page(), worker, WatchOptions::default(), Instant::now());
    w.check_page();

    let (token, reply) = w.channel().recv().expect("reply");
    assert_eq!(token, w.state().token);
    w.on_reply(token, reply);

    match w.badge_view() {
        Some(BadgeView::Scored(card)) => {
            assert_eq!(card.score, "3.6");
            assert_eq!(card.movie_url, "https://filmarks.com/movies/18935");
        }
        other => panic!("expected a score, got {other:?}"),
    }
    let badge = w.state().badge.unwrap();
    assert!(w.doc().inner_html(badge).unwrap().contains("3.6"));
}

#[test]
fn failed_search_renders_no_score() {
    let mut w = Watcher::new(title_page(), BackgroundWorker::new(Down), WatchOptions::default(), Instant::now());
    w.check_page();

    let (token, reply) = w.channel().recv().expect("reply");
    w.on_reply(token, reply);
    assert_eq!(w.badge_view(), Some(&BadgeView::NoScore));
    assert!(w.channel().try_recv().is_none());
}
