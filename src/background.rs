// src/background.rs
//! Privileged side of the message channel.
//!
//! [`handle_message`] is the listener: JSON request in, JSON reply out.
//! [`BackgroundWorker`] is the channel the page side talks to. Each request
//! runs on its own thread, so a slow lookup never holds up a newer one, and
//! replies come back over an mpsc queue tagged with the caller's token.

use std::{
    sync::{mpsc, Arc},
    thread,
};

use log::{debug, error};
use thiserror::Error;

use crate::core::net::Fetch;
use crate::page::watcher::{RequestToken, ScoreChannel};
use crate::protocol::{Message, ScoreResult};
use crate::scrape::resolve_score;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("message could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("background worker unavailable: {0}")]
    Unavailable(String),
    #[error("malformed reply: {0}")]
    MalformedReply(String),
    /// The listener took the message but never answered.
    #[error("no listener answered the message")]
    NoListener,
}

/// What the page side eventually receives for a request.
/// `Ok(None)` means an answer arrived but it was empty (`null`).
pub type Reply = Result<Option<ScoreResult>, ChannelError>;

/// Listener for one raw message. Unknown or unparseable messages get no reply.
pub fn handle_message<F: Fetch>(fetcher: &F, raw: &str) -> Option<String> {
    let msg: Message = match serde_json::from_str(raw) {
        Ok(m) => m,
        Err(e) => {
            debug!("Background: ignoring message ({e})");
            return None;
        }
    };

    let result = match msg {
        Message::FetchFilmarks { title } => resolve_score(fetcher, &title),
    };

    match serde_json::to_string(&result) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Background: reply encode failed: {e}");
            None
        }
    }
}

pub struct BackgroundWorker<F> {
    fetcher: Arc<F>,
    tx: mpsc::Sender<(RequestToken, Reply)>,
    rx: mpsc::Receiver<(RequestToken, Reply)>,
}

impl<F: Fetch + Send + Sync + 'static> BackgroundWorker<F> {
    pub fn new(fetcher: F) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { fetcher: Arc::new(fetcher), tx, rx }
    }

    /// Next finished reply, if any. Never blocks.
    pub fn try_recv(&self) -> Option<(RequestToken, Reply)> {
        self.rx.try_recv().ok()
    }

    /// Block until the next reply arrives.
    pub fn recv(&self) -> Option<(RequestToken, Reply)> {
        self.rx.recv().ok()
    }

    fn dispatch(&self, token: RequestToken, raw: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("filmarks-fetch-{}", token.0))
            .spawn(move || {
                let reply = match handle_message(&*fetcher, &raw) {
                    Some(json) => serde_json::from_str::<Option<ScoreResult>>(&json)
                        .map_err(|e| ChannelError::MalformedReply(e.to_string())),
                    None => Err(ChannelError::NoListener),
                };
                // Receiver gone means the page side shut down; nothing to tell.
                let _ = tx.send((token, reply));
            });

        if let Err(e) = spawned {
            error!("Background: could not start worker: {e}");
            let _ = self.tx.send((token, Err(ChannelError::Unavailable(e.to_string()))));
        }
    }
}

impl<F: Fetch + Send + Sync + 'static> ScoreChannel for BackgroundWorker<F> {
    fn send(&mut self, token: RequestToken, message: &Message) {
        match serde_json::to_string(message) {
            Ok(raw) => self.dispatch(token, raw),
            Err(e) => {
                let _ = self.tx.send((token, Err(ChannelError::Encode(e))));
            }
        }
    }
}
