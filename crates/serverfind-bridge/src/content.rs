//! The content-side receiver: decodes requests, runs them against the
//! document's [`Highlighter`], and encodes the reply.

use serverfind_common::BridgeError;
use serverfind_matcher::{DocumentAdapter, Highlighter, MatchMode, SearchParams};

use crate::protocol::{decode_request, Request, Response};

pub struct ContentEndpoint<D: DocumentAdapter> {
    highlighter: Highlighter<D>,
}

impl<D: DocumentAdapter> ContentEndpoint<D> {
    pub fn new(highlighter: Highlighter<D>) -> Self {
        Self { highlighter }
    }

    /// Run one request to completion.
    pub fn handle(&mut self, request: &Request) -> Response {
        tracing::debug!(kind = request.kind(), "content request dispatched");
        match request {
            Request::Search {
                query,
                color,
                auto_scroll,
                advanced_search,
            } => {
                let count = self.highlighter.search(&SearchParams {
                    query: query.clone(),
                    color: color.clone(),
                    auto_scroll: *auto_scroll,
                    mode: MatchMode::from_advanced(*advanced_search),
                });
                Response::Count { count }
            }
            Request::Clear => {
                self.highlighter.clear();
                Response::Cleared { cleared: true }
            }
            Request::Next => Response::Scrolled {
                scrolled: self.highlighter.advance(),
            },
            Request::CheckReady => Response::Ready {
                ready: self.highlighter.is_ready(),
            },
        }
    }

    /// Decode `body`, dispatch it, and encode the reply.
    pub fn handle_raw(&mut self, body: &str) -> Result<String, BridgeError> {
        let request = decode_request(body)?;
        self.handle(&request).to_json()
    }

    pub fn highlighter(&self) -> &Highlighter<D> {
        &self.highlighter
    }

    pub fn highlighter_mut(&mut self) -> &mut Highlighter<D> {
        &mut self.highlighter
    }
}
