use std::sync::Arc;

use auction_core::BidEvent;
use client_logging::{client_debug, client_info, client_warn};
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use crate::convert;
use crate::types::BidEventWire;

/// Name of the only event type the bid stream dispatches.
const BID_EVENT: &str = "bid";

/// One dispatched Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; `message` when the server sent none.
    pub event: String,
    pub data: String,
}

/// Incremental SSE line-protocol parser.
///
/// Feed it raw chunks as they arrive; it returns the frames completed by
/// each chunk. Handles `\n` and `\r\n` line endings, `:` comment lines,
/// multi-line `data:` accumulation and blank-line dispatch. `id` and
/// `retry` fields are parsed and dropped.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            self.handle_line(&line, &mut frames);
        }
        frames
    }

    fn handle_line(&mut self, line: &str, frames: &mut Vec<SseFrame>) {
        if line.is_empty() {
            // Blank line: dispatch what accumulated, if anything did.
            if !self.data.is_empty() {
                frames.push(SseFrame {
                    event: self
                        .event
                        .take()
                        .unwrap_or_else(|| "message".to_string()),
                    data: self.data.join("\n"),
                });
                self.data.clear();
            } else {
                self.event = None;
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
    }
}

/// Consumer of the live bid stream.
pub trait BidSink: Send + Sync {
    fn on_bid(&self, bid: BidEvent);
    /// The stream ended or failed. No retry happens here; the state
    /// machine's next tick re-opens the stream if it is still eligible.
    fn on_closed(&self, reason: Option<String>);
}

/// Handle to an open bid stream. Closing cancels the reader task; both
/// close and drop are idempotent.
#[derive(Debug)]
pub struct BidStream {
    cancel: CancellationToken,
}

impl BidStream {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for BidStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub(crate) async fn run_bid_stream(
    http: reqwest::Client,
    url: String,
    sink: Arc<dyn BidSink>,
    cancel: CancellationToken,
) {
    let request = http.get(&url).header(ACCEPT, "text/event-stream").send();
    let response = tokio::select! {
        _ = cancel.cancelled() => return,
        response = request => response,
    };
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            client_warn!("bid stream connect failed: {err}");
            sink.on_closed(Some(err.to_string()));
            return;
        }
    };
    let status = response.status();
    if !status.is_success() {
        client_warn!("bid stream rejected with status {status}");
        sink.on_closed(Some(format!("http status {status}")));
        return;
    }

    client_info!("bid stream open: {url}");
    let mut parser = SseParser::new();
    let mut chunks = response.bytes_stream();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                client_debug!("bid stream cancelled");
                return;
            }
            chunk = chunks.next() => match chunk {
                Some(Ok(bytes)) => {
                    for frame in parser.push(&bytes) {
                        if frame.event != BID_EVENT {
                            continue;
                        }
                        match serde_json::from_str::<BidEventWire>(&frame.data) {
                            Ok(wire) => sink.on_bid(convert::bid_event(wire)),
                            Err(err) => {
                                client_warn!("discarding malformed bid event: {err}")
                            }
                        }
                    }
                }
                Some(Err(err)) => {
                    client_warn!("bid stream failed: {err}");
                    sink.on_closed(Some(err.to_string()));
                    return;
                }
                None => {
                    client_info!("bid stream ended by server");
                    sink.on_closed(None);
                    return;
                }
            }
        }
    }
}
