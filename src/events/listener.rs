//! Live scan progress from the catalog's server-sent event stream

use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::{CatalogClient, ProgressEvent, ProgressStatus};
use crate::nav::{LogLevel, LogLine};

/// Reconnect delay until the server sends its own `retry:` value
pub const DEFAULT_RETRY: Duration = Duration::from_secs(3);

/// One dispatched event-stream message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    /// `message` when the server sent no `event:` field
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` decoder
///
/// Chunks may split lines (and UTF-8 sequences) anywhere; only complete
/// lines are interpreted.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    retry: Option<Duration>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconnect interval most recently announced by the server
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    /// Feed raw bytes, returning every message completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(msg) = self.line(line) {
                out.push(msg);
            }
        }
        out
    }

    fn line(&mut self, line: &str) -> Option<SseMessage> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseMessage {
            event: event
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

/// Activity line for one stream message, if it is one the log shows
///
/// Progress payloads carrying a path become status lines, the end-of-batch
/// summary becomes a count, and thumbnail chatter and undecodable data are
/// dropped.
pub fn describe(msg: &SseMessage) -> Option<LogLine> {
    let value: Value = serde_json::from_str(&msg.data).ok()?;

    if msg.event == "scan:done" {
        let count = value.get("count").and_then(Value::as_u64)?;
        return Some(LogLine::new(
            LogLevel::Ok,
            format!("Scan complete: {} albums added or updated", count),
        ));
    }
    if msg.event != "message" && msg.event != "scan:progress" {
        return None;
    }

    let progress: ProgressEvent = serde_json::from_value(value.clone()).ok()?;
    let path = progress.path.as_deref().filter(|p| !p.is_empty())?;
    let line = match progress.status {
        ProgressStatus::Start => LogLine::new(LogLevel::Info, format!("Scanning: {}", path)),
        ProgressStatus::Done => {
            let text = match progress.count {
                Some(count) => format!("Scan finished: {} ({} albums)", path, count),
                None => format!("Scan finished: {}", path),
            };
            LogLine::new(LogLevel::Ok, text)
        }
        ProgressStatus::Skip => LogLine::new(
            LogLevel::Warn,
            format!(
                "Skipped: {} ({})",
                path,
                progress.reason.as_deref().unwrap_or("unknown")
            ),
        ),
        ProgressStatus::Other => LogLine::new(LogLevel::Info, value.to_string()),
    };
    Some(line)
}

/// Follow the event stream until the receiver goes away
///
/// Connection failures are never surfaced; the task waits for the retry
/// interval and reconnects.
pub fn spawn(client: CatalogClient, tx: mpsc::UnboundedSender<LogLine>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut retry = DEFAULT_RETRY;
        loop {
            if let Err(Closed) = follow(&client, &tx, &mut retry).await {
                return;
            }
            if tx.is_closed() {
                return;
            }
            debug!("Event stream ended, reconnecting in {:?}", retry);
            tokio::time::sleep(retry).await;
        }
    })
}

/// The log receiver was dropped
struct Closed;

async fn follow(
    client: &CatalogClient,
    tx: &mpsc::UnboundedSender<LogLine>,
    retry: &mut Duration,
) -> Result<(), Closed> {
    let response = match client.open_event_stream().await {
        Ok(response) => response,
        Err(e) => {
            debug!("Event stream unavailable: {}", e);
            return Ok(());
        }
    };

    let mut parser = SseParser::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!("Event stream interrupted: {}", e);
                break;
            }
        };
        for msg in parser.feed(&chunk) {
            if let Some(line) = describe(&msg) {
                tx.send(line).map_err(|_| Closed)?;
            }
        }
        if let Some(interval) = parser.retry() {
            *retry = interval;
        }
    }
    Ok(())
}
