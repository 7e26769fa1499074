// tests/watcher_flow.rs
//
// Drive the watcher through navigation with an in-memory page and a queue
// channel. No timers fire on their own; each test passes `now` explicitly.
//
use std::time::{Duration, Instant};

use filmarks_badge::background::ChannelError;
use filmarks_badge::config::WatchOptions;
use filmarks_badge::config::consts::{BADGE_ID, NO_SCORE_TEXT};
use filmarks_badge::page::{BadgeView, Document, MemoryDocument, NodeId, RequestToken, Trigger, Watcher};
use filmarks_badge::protocol::{Failure, FailureKind, MatchKind, Message, ScoreMatch, ScoreResult};

type Sent = Vec<(RequestToken, Message)>;

const SID_URL: &str = "https://video.unext.jp/title/SID0012345";
const SID_TITLE: &str = "シド・アンド・ナンシー(洋画 / 1986) - 動画配信 | U-NEXT";

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

struct Page {
    watcher: Watcher<MemoryDocument, Sent>,
    heading: NodeId,
    t0: Instant,
}

fn page(url: &str, title: &str, heading: &str) -> Page {
    let mut doc = MemoryDocument::new(url, title);
    let body = doc.body();
    let main = doc.element(body, "main");
    let h = doc.element(main, "h2");
    doc.text(h, heading);
    doc.element(main, "p");
    let t0 = Instant::now();
    Page { watcher: Watcher::new(doc, Vec::new(), WatchOptions::default(), t0), heading: h, t0 }
}

fn score(title: &str, score: &str, url: &str) -> ScoreResult {
    ScoreMatch {
        title: title.into(),
        score: score.into(),
        url: Some(url.into()),
        thumbnail: None,
        search_url: "https://filmarks.com/search/movies?q=x".into(),
        matched: MatchKind::Exact,
    }
    .into()
}

fn sent_titles(w: &Watcher<MemoryDocument, Sent>) -> Vec<String> {
    w.channel().iter().map(|(_, Message::FetchFilmarks { title })| title.clone()).collect()
}

#[test]
fn first_check_inserts_loading_badge_after_title() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;

    assert!(!w.poll(p.t0 + ms(999)));
    assert!(w.poll(p.t0 + ms(1000)));

    let doc = w.doc();
    let badge = doc.element_by_id(BADGE_ID).expect("badge");
    assert_eq!(doc.parent_element(badge), doc.parent_element(p.heading));
    let siblings = doc.children(doc.parent_element(badge).unwrap());
    assert_eq!(siblings[1], badge);
    assert_eq!(doc.class_name(badge), Some("loading"));
    assert_eq!(w.badge_view(), Some(&BadgeView::Loading));
    assert_eq!(sent_titles(w), vec!["シド・アンド・ナンシー".to_string()]);
    assert_eq!(w.state().last_title, "シド・アンド・ナンシー");
}

#[test]
fn reply_paints_score_and_link() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;
    w.check_page();
    let (token, _) = w.channel()[0].clone();

    w.on_reply(token, Ok(Some(score("X", "3.5", "https://filmarks.com/movies/1"))));

    let badge = w.state().badge.unwrap();
    let html = w.doc().inner_html(badge).unwrap().to_string();
    assert!(html.contains("3.5"));
    assert!(html.contains(r#"href="https://filmarks.com/movies/1""#));
    assert_eq!(w.doc().class_name(badge), Some(""));

    // Both anchors open in a new context and never reach the host page.
    let doc = w.doc_mut();
    assert_eq!(doc.link_count(badge), 2);
    assert_eq!(doc.click_link(badge, 0).as_deref(), Some("https://filmarks.com/movies/1"));
    assert_eq!(doc.click_link(badge, 1).as_deref(), Some("https://filmarks.com/search/movies?q=x"));
    assert_eq!(doc.host_clicks(), 0);
    assert_eq!(doc.opened_urls().len(), 2);
}

#[test]
fn failure_reply_is_muted_without_anchor() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;
    w.check_page();
    let (token, _) = w.channel()[0].clone();

    w.on_reply(token, Ok(Some(Failure::new(FailureKind::NoResults).into())));

    let badge = w.state().badge.unwrap();
    let html = w.doc().inner_html(badge).unwrap();
    assert!(html.contains(NO_SCORE_TEXT));
    assert!(!html.contains("<a "));
    assert_eq!(w.badge_view(), Some(&BadgeView::NoScore));
}

#[test]
fn channel_failures_become_no_score() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;

    w.check_page();
    let token = w.state().token;
    w.on_reply(token, Ok(None));
    assert_eq!(w.badge_view(), Some(&BadgeView::NoScore));

    // Force a fresh badge for a second request.
    w.doc_mut().set_title("Heat | U-NEXT");
    w.check_page();
    let token = w.state().token;
    w.on_reply(token, Err(ChannelError::NoListener));
    assert_eq!(w.badge_view(), Some(&BadgeView::NoScore));
}

#[test]
fn new_title_replaces_badge_and_drops_stale_reply() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;
    w.check_page();
    let old_badge = w.state().badge.unwrap();
    let (old_token, _) = w.channel()[0].clone();

    let heading = p.heading;
    let doc = w.doc_mut();
    doc.set_location("https://video.unext.jp/title/SID0099999");
    doc.set_title("ヒート(洋画 / 1995) - 動画配信 | U-NEXT");
    doc.set_text(heading, "ヒート");
    w.notify(Trigger::PushState, p.t0);
    assert!(w.poll(p.t0 + ms(500)));

    let new_badge = w.state().badge.unwrap();
    assert_ne!(old_badge, new_badge);
    assert!(!w.doc().is_connected(old_badge));
    assert_eq!(w.doc().element_by_id(BADGE_ID), Some(new_badge));
    assert_eq!(sent_titles(w), vec!["シド・アンド・ナンシー".to_string(), "ヒート".to_string()]);

    // Late reply for the first title must not touch the new badge.
    w.on_reply(old_token, Ok(Some(score("Sid", "3.6", "https://filmarks.com/movies/18935"))));
    assert_eq!(w.badge_view(), Some(&BadgeView::Loading));
    assert_eq!(w.doc().class_name(new_badge), Some("loading"));
}

#[test]
fn leaving_detail_page_removes_badge_and_resets_title() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;
    w.check_page();
    let badge = w.state().badge.unwrap();
    let (token, _) = w.channel()[0].clone();

    w.doc_mut().set_location("https://video.unext.jp/browse/genre/MNU0000001");
    w.notify(Trigger::PopState, p.t0);
    w.poll(p.t0 + ms(500));

    assert_eq!(w.doc().element_by_id(BADGE_ID), None);
    assert!(!w.doc().is_connected(badge));
    assert_eq!(w.state().last_title, "");
    assert_eq!(w.badge_view(), None);

    // The reply still arrives; nothing to paint.
    w.on_reply(token, Ok(Some(score("X", "3.5", "https://filmarks.com/movies/1"))));
    assert_eq!(w.badge_view(), None);
}

#[test]
fn modal_overlay_counts_as_detail_page() {
    let mut p = page(
        "https://video.unext.jp/browse/genre/MNU0000001?td=SID0012345",
        SID_TITLE,
        "シド・アンド・ナンシー",
    );
    p.watcher.check_page();
    assert!(p.watcher.state().badge.is_some());
}

#[test]
fn same_title_does_not_refetch() {
    let mut p = page(SID_URL, SID_TITLE, "シド・アンド・ナンシー");
    let w = &mut p.watcher;
    w.check_page();
    let badge = w.state().badge.unwrap();

    for i in 1..5 {
        w.notify(Trigger::Mutation, p.t0 + ms(i * 1000));
        w.poll(p.t0 + ms(i * 1000 + 500));
    }
    assert_eq!(w.channel().len(), 1);
    assert_eq!(w.state().badge, Some(badge));
}

#[test]
fn mutation_burst_runs_one_check() {
    let mut p = page("https://video.unext.jp/", "U-NEXT", "");
    let w = &mut p.watcher;
    let base = p.t0 + ms(5000); // past the startup checks
    assert!(w.poll(base)); // 1000ms check
    assert!(w.poll(base)); // 3000ms check
    assert!(!w.poll(base));

    for i in 0..20 {
        w.notify(Trigger::Mutation, base + ms(i * 10));
        assert!(!w.poll(base + ms(i * 10)));
    }
    assert_eq!(w.next_deadline(), Some(base + ms(190 + 500)));
    assert!(!w.poll(base + ms(689)));
    assert!(w.poll(base + ms(690)));
    assert!(!w.poll(base + ms(2000)));
}

#[test]
fn badge_parked_on_body_moves_next_to_title_later() {
    let mut p = page(SID_URL, SID_TITLE, "Loading…");
    let w = &mut p.watcher;
    w.check_page();
    let badge = w.state().badge.unwrap();
    let body = w.doc().body();
    assert_eq!(w.doc().parent_element(badge), Some(body));

    let heading = p.heading;
    w.doc_mut().set_text(heading, "シド・アンド・ナンシー");
    w.notify(Trigger::Mutation, p.t0);
    w.poll(p.t0 + ms(500));

    assert_eq!(w.state().badge, Some(badge));
    assert_eq!(w.doc().parent_element(badge), w.doc().parent_element(heading));
    assert_eq!(w.channel().len(), 1);
}

#[test]
fn heading_strategy_used_when_document_title_is_bare() {
    let mut p = page(SID_URL, "| U-NEXT", "七人の侍");
    p.watcher.check_page();
    assert_eq!(p.watcher.state().last_title, "七人の侍");
}

#[test]
fn hidden_fallback_shows_no_score() {
    let mut doc = MemoryDocument::new(SID_URL, SID_TITLE);
    let body = doc.body();
    let h = doc.element(body, "h1");
    doc.text(h, "シド・アンド・ナンシー");
    let options = WatchOptions { hide_fallback: true, ..WatchOptions::default() };
    let mut w: Watcher<MemoryDocument, Sent> = Watcher::new(doc, Vec::new(), options, Instant::now());
    w.check_page();
    let token = w.state().token;

    let mut guess = score("Nancy Drew", "2.9", "https://filmarks.com/movies/20001");
    if let ScoreResult::Match(m) = &mut guess {
        m.matched = MatchKind::Fallback;
    }
    w.on_reply(token, Ok(Some(guess)));
    assert_eq!(w.badge_view(), Some(&BadgeView::NoScore));
}

#[test]
fn late_first_poll_still_runs_each_startup_check() {
    let mut p = page(SID_URL, "| U-NEXT", "");
    let w = &mut p.watcher;
    let late = p.t0 + ms(5000);

    // Nothing resolvable yet on the first overdue check.
    assert!(w.poll(late));
    assert!(w.channel().is_empty());

    // Page finished rendering before the second one.
    w.doc_mut().set_title(SID_TITLE);
    assert!(w.poll(late));
    assert_eq!(sent_titles(w), vec!["シド・アンド・ナンシー".to_string()]);
    assert_eq!(w.next_deadline(), None);
}
