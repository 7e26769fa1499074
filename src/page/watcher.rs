// src/page/watcher.rs
//! The page-side loop, minus the event wiring.
//!
//! A host (browser binding, GUI, CLI) forwards navigation and mutation
//! events to [`Watcher::notify`], calls [`Watcher::poll`] whenever
//! [`Watcher::next_deadline`] passes, and hands replies from the channel to
//! [`Watcher::on_reply`]. All mutable page state sits in [`WatchState`].

use std::time::Instant;

use log::{debug, error, info};

use crate::background::Reply;
use crate::config::consts::BADGE_ID;
use crate::config::WatchOptions;
use crate::page::badge::BadgeView;
use crate::page::debounce::{Debouncer, StartupChecks};
use crate::page::detect::{derive_title, is_detail_page};
use crate::page::dom::Document;
use crate::page::place::position_badge;
use crate::protocol::{Failure, FailureKind, Message, ScoreResult};

/// Identifies one badge-creation event. Replies carrying an older token are
/// for a badge that no longer exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RequestToken(pub u64);

/// Outbound half of the page/background channel. Replies come back through
/// whatever the host polls and are fed to [`Watcher::on_reply`].
pub trait ScoreChannel {
    fn send(&mut self, token: RequestToken, message: &Message);
}

/// Queue of sent requests, drained by the caller.
impl ScoreChannel for Vec<(RequestToken, Message)> {
    fn send(&mut self, token: RequestToken, message: &Message) {
        self.push((token, message.clone()));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Mutation,
    PushState,
    ReplaceState,
    PopState,
}

#[derive(Clone, Debug)]
pub struct WatchState<N> {
    /// Title the current badge belongs to; empty off detail pages.
    pub last_title: String,
    pub badge: Option<N>,
    pub view: Option<BadgeView>,
    pub token: RequestToken,
}

impl<N> Default for WatchState<N> {
    fn default() -> Self {
        Self { last_title: s!(), badge: None, view: None, token: RequestToken::default() }
    }
}

pub struct Watcher<D: Document, C> {
    doc: D,
    channel: C,
    options: WatchOptions,
    state: WatchState<D::Node>,
    debounce: Debouncer,
    startup: StartupChecks,
}

impl<D: Document, C: ScoreChannel> Watcher<D, C> {
    /// Start watching. The startup checks are scheduled from `start`.
    pub fn new(doc: D, channel: C, options: WatchOptions, start: Instant) -> Self {
        let debounce = Debouncer::new(options.debounce);
        let startup = StartupChecks::new(start, &options.startup_checks);
        info!("Watch: started");
        Self { doc, channel, options, state: WatchState::default(), debounce, startup }
    }

    pub fn doc(&self) -> &D {
        &self.doc
    }

    /// Mutate the page. Follow up with [`Watcher::notify`] as a real
    /// mutation observer would.
    pub fn doc_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn state(&self) -> &WatchState<D::Node> {
        &self.state
    }

    pub fn badge_view(&self) -> Option<&BadgeView> {
        self.state.view.as_ref()
    }

    pub fn notify(&mut self, trigger: Trigger, now: Instant) {
        debug!("Watch: {trigger:?}");
        self.debounce.trigger(now);
    }

    /// Run a check if the debounce or a startup check is due.
    /// Returns whether a check ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        // Both timers must be consumed, so no short-circuit.
        let debounced = self.debounce.fire(now);
        let scheduled = self.startup.fire(now);
        if debounced | scheduled {
            self.check_page();
            true
        } else {
            false
        }
    }

    /// Earliest instant at which [`Watcher::poll`] has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debounce.deadline(), self.startup.next()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn check_page(&mut self) {
        if !is_detail_page(&self.doc.location()) {
            if self.state.badge.is_some() || !self.state.last_title.is_empty() {
                debug!("Watch: left detail page");
            }
            self.remove_badge();
            self.state.last_title.clear();
            return;
        }

        let Some(title) = derive_title(&self.doc) else {
            return;
        };

        if title == self.state.last_title {
            if let Some(existing) = self.doc.element_by_id(BADGE_ID) {
                // Parked on the body earlier; try again now the page has rendered more.
                if self.doc.parent_element(existing) == Some(self.doc.body()) {
                    position_badge(&mut self.doc, existing, &title);
                }
                return;
            }
        }

        self.remove_badge();
        self.state.last_title = title.clone();

        let badge = self.doc.create_element("div", BADGE_ID);
        let view = BadgeView::Loading;
        self.doc.render(badge, &view.markup());
        if !position_badge(&mut self.doc, badge, &title) {
            self.doc.append_to_body(badge);
        }
        self.state.badge = Some(badge);
        self.state.view = Some(view);

        self.state.token = RequestToken(self.state.token.0 + 1);
        info!("Watch: searching for {title:?} (request {})", self.state.token.0);
        self.channel.send(self.state.token, &Message::FetchFilmarks { title });
    }

    /// Paint a reply into the badge, unless it is for a badge that is gone.
    pub fn on_reply(&mut self, token: RequestToken, reply: Reply) {
        if token != self.state.token {
            debug!("Watch: dropping stale reply {} (current {})", token.0, self.state.token.0);
            return;
        }

        let result: ScoreResult = match reply {
            Ok(Some(r)) => r,
            Ok(None) => Failure::new(FailureKind::NoResponse).into(),
            Err(e) => {
                error!("Watch: channel error: {e}");
                Failure::new(FailureKind::RuntimeError).into()
            }
        };
        match &result {
            ScoreResult::Failure(f) => info!("Watch: no score ({})", f.error),
            ScoreResult::Match(m) => info!("Watch: ★{} for {:?} ({:?})", m.score, m.title, m.matched),
        }

        let Some(badge) = self.state.badge else {
            return;
        };
        if !self.doc.is_connected(badge) {
            debug!("Watch: badge detached, reply dropped");
            return;
        }

        let view = BadgeView::from_result(&result, self.options.hide_fallback);
        self.doc.render(badge, &view.markup());
        self.state.view = Some(view);
    }

    fn remove_badge(&mut self) {
        if let Some(existing) = self.doc.element_by_id(BADGE_ID) {
            self.doc.remove(existing);
        }
        if let Some(badge) = self.state.badge.take() {
            self.doc.remove(badge);
        }
        self.state.view = None;
    }
}
