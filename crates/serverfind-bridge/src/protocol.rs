//! Wire messages, discriminated by a `type` field.
//!
//! ```text
//! {"type":"SEARCH","query":"ga","color":"#9ef01a","autoScroll":true,"advancedSearch":false}
//! {"type":"CLEAR"}  {"type":"NEXT"}  {"type":"CHECK_READY"}
//! ```

use serde::{Deserialize, Serialize};
use serverfind_common::BridgeError;

/// Request types accepted by the content endpoint.
///
/// Anything else is rejected before dispatch.
pub const ALLOWED_KINDS: &[&str] = &["SEARCH", "CLEAR", "NEXT", "CHECK_READY"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    Search {
        query: String,
        color: String,
        auto_scroll: bool,
        advanced_search: bool,
    },
    Clear,
    Next,
    CheckReady,
}

impl Request {
    /// The wire `type` of this request.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Search { .. } => "SEARCH",
            Self::Clear => "CLEAR",
            Self::Next => "NEXT",
            Self::CheckReady => "CHECK_READY",
        }
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Decode(e.to_string()))
    }
}

/// Reply to a [`Request`]. The shape alone identifies which request it
/// answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Count { count: usize },
    Cleared { cleared: bool },
    Scrolled { scrolled: bool },
    Ready { ready: bool },
}

impl Response {
    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Decode(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Decode(e.to_string()))
    }

    /// The `count` of a SEARCH reply.
    pub fn into_count(self) -> Result<usize, BridgeError> {
        match self {
            Self::Count { count } => Ok(count),
            other => Err(unexpected("count", other)),
        }
    }

    /// The `scrolled` flag of a NEXT reply.
    pub fn into_scrolled(self) -> Result<bool, BridgeError> {
        match self {
            Self::Scrolled { scrolled } => Ok(scrolled),
            other => Err(unexpected("scrolled", other)),
        }
    }

    /// The `ready` flag of a CHECK_READY reply.
    pub fn into_ready(self) -> Result<bool, BridgeError> {
        match self {
            Self::Ready { ready } => Ok(ready),
            other => Err(unexpected("ready", other)),
        }
    }
}

fn unexpected(wanted: &str, got: Response) -> BridgeError {
    BridgeError::UnexpectedResponse(format!("expected {wanted}, got {got:?}"))
}

/// Parse a raw request body, rejecting unknown `type` values before the
/// payload is interpreted.
pub fn decode_request(body: &str) -> Result<Request, BridgeError> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(body_len = body.len(), "message rejected: failed to parse");
            return Err(BridgeError::Decode(e.to_string()));
        }
    };

    let Some(kind) = value.get("type").and_then(|t| t.as_str()) else {
        tracing::warn!(body_len = body.len(), "message rejected: missing type");
        return Err(BridgeError::Decode("missing \"type\" field".into()));
    };

    if !ALLOWED_KINDS.contains(&kind) {
        tracing::warn!(kind, "message rejected: unknown type");
        return Err(BridgeError::RejectedKind(kind.to_string()));
    }

    serde_json::from_value(value).map_err(|e| BridgeError::Decode(e.to_string()))
}
