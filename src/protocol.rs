// src/protocol.rs
//! Shapes that cross the page/background boundary.
//!
//! Everything here serializes to the JSON the two contexts exchange:
//! a `{"type": "FETCH_FILMARKS", "title": …}` request and either a match
//! record or an `{"error": …}` failure in reply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request sent from the page side to the background side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "FETCH_FILMARKS")]
    FetchFilmarks { title: String },
}

/// How a match was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Normalized titles are equal.
    Exact,
    /// One normalized title contains the other.
    Fuzzy,
    /// Nothing related; first card returned anyway.
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMatch {
    pub title: String,
    /// As scraped, e.g. "3.5".
    pub score: String,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub search_url: String,
    pub matched: MatchKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    SearchFailed,
    NoResults,
    RuntimeError,
    NoResponse,
    /// Transport error message, passed through verbatim.
    Fetch(String),
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            FailureKind::SearchFailed => "search_failed",
            FailureKind::NoResults => "no_results",
            FailureKind::RuntimeError => "runtime_error",
            FailureKind::NoResponse => "no_response",
            FailureKind::Fetch(msg) => msg,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FailureKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "search_failed" => FailureKind::SearchFailed,
            "no_results" => FailureKind::NoResults,
            "runtime_error" => FailureKind::RuntimeError,
            "no_response" => FailureKind::NoResponse,
            _ => FailureKind::Fetch(s),
        }
    }
}

impl Serialize for FailureKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FailureKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(FailureKind::from)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub error: FailureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
}

impl Failure {
    pub fn new(error: FailureKind) -> Self {
        Self { error, status: None, search_url: None }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }
}

/// Reply to a [`Message::FetchFilmarks`].
///
/// Untagged on the wire: a failure is recognized by its `error` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreResult {
    Failure(Failure),
    Match(ScoreMatch),
}

impl ScoreResult {
    pub fn as_match(&self) -> Option<&ScoreMatch> {
        match self {
            ScoreResult::Match(m) => Some(m),
            ScoreResult::Failure(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScoreResult::Failure(_))
    }
}

impl From<Failure> for ScoreResult {
    fn from(f: Failure) -> Self {
        ScoreResult::Failure(f)
    }
}

impl From<ScoreMatch> for ScoreResult {
    fn from(m: ScoreMatch) -> Self {
        ScoreResult::Match(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shape() {
        let msg = Message::FetchFilmarks { title: s!("ゴジラ") };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "FETCH_FILMARKS", "title": "ゴジラ" })
        );
    }

    #[test]
    fn failure_omits_missing_fields() {
        let f: ScoreResult = Failure::new(FailureKind::SearchFailed).with_status(503).into();
        assert_eq!(
            serde_json::to_value(&f).unwrap(),
            json!({ "error": "search_failed", "status": 503 })
        );
    }

    #[test]
    fn transport_message_passes_through() {
        let raw = json!({ "error": "dns error: no such host" });
        let parsed: ScoreResult = serde_json::from_value(raw).unwrap();
        match parsed {
            ScoreResult::Failure(f) => assert_eq!(f.error, FailureKind::Fetch(s!("dns error: no such host"))),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn match_uses_camel_case_search_url() {
        let m = ScoreMatch {
            title: s!("X"),
            score: s!("3.5"),
            url: Some(s!("https://filmarks.com/movies/1")),
            thumbnail: None,
            search_url: s!("https://filmarks.com/search/movies?q=X"),
            matched: MatchKind::Exact,
        };
        let v = serde_json::to_value(ScoreResult::from(m.clone())).unwrap();
        assert_eq!(v["searchUrl"], "https://filmarks.com/search/movies?q=X");
        assert_eq!(v["matched"], "exact");
        assert_eq!(v["thumbnail"], serde_json::Value::Null);
        let back: ScoreResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, ScoreResult::Match(m));
    }
}
