//! Live adapter for the `NotificationSource` port: a newline-delimited JSON
//! stream read over a long-lived HTTP response.

use std::error::Error;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::ports::notifications::parse_event_line;
use crate::ports::{NotificationSource, Subscription, TaskEvent};

const CHANNEL_CAPACITY: usize = 64;

/// Longest notification line accepted, in bytes.
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Subscribes to `{base}/notifications/stream`.
pub struct HttpNotificationSource {
    client: Client,
    url: String,
}

impl HttpNotificationSource {
    /// A source for the given API base. Only connecting is time-limited;
    /// the stream itself stays open indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        let url = format!("{}/notifications/stream", base_url.trim_end_matches('/'));
        Ok(Self { client, url })
    }
}

impl NotificationSource for HttpNotificationSource {
    fn subscribe(&self) -> Result<Subscription, Box<dyn Error + Send + Sync>> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let request = self.client.get(&self.url);
        let url = self.url.clone();
        let pump = tokio::spawn(async move {
            let mut response = match request.send().await {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    warn!(%url, status = response.status().as_u16(), "notification stream refused");
                    return;
                }
                Err(e) => {
                    warn!(%url, error = %e, "notification stream unavailable");
                    return;
                }
            };
            info!(%url, "notification stream connected");

            let mut buffer = LineBuffer::default();
            loop {
                match response.chunk().await {
                    Ok(Some(chunk)) => {
                        for event in buffer.push(&chunk) {
                            if tx.send(event).await.is_err() {
                                debug!("subscriber gone; closing notification stream");
                                return;
                            }
                        }
                    }
                    Ok(None) => {
                        info!("notification stream closed by server");
                        return;
                    }
                    Err(e) => {
                        warn!(error = %e, "notification stream interrupted");
                        return;
                    }
                }
            }
        });
        Ok(Subscription::new(rx, pump))
    }
}

/// Reassembles lines split across chunks.
///
/// A line longer than [`MAX_LINE_BYTES`] is dropped and everything up to
/// the next newline is skipped.
#[derive(Default)]
struct LineBuffer {
    pending: Vec<u8>,
    discarding: bool,
}

impl LineBuffer {
    fn push(&mut self, mut chunk: &[u8]) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        loop {
            let newline = chunk.iter().position(|&b| b == b'\n');
            let part = newline.map_or(chunk, |end| &chunk[..end]);
            if !self.discarding {
                if self.pending.len() + part.len() > MAX_LINE_BYTES {
                    warn!(limit = MAX_LINE_BYTES, "dropping oversized notification line");
                    self.pending.clear();
                    self.discarding = true;
                } else {
                    self.pending.extend_from_slice(part);
                }
            }
            let Some(end) = newline else {
                return events;
            };
            if !self.discarding {
                match std::str::from_utf8(&self.pending) {
                    Ok(text) => events.extend(parse_event_line(text)),
                    Err(e) => debug!(error = %e, "skipping non-UTF-8 notification line"),
                }
            }
            self.pending.clear();
            self.discarding = false;
            chunk = &chunk[end + 1..];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = concat!(
        r#"{"event":"taskUpdated","task":{"id":"9","title":"Ship it","#,
        r#""priority":"low","dueDate":"2025-05-01","status":"pending"}}"#,
    );

    #[test]
    fn buffers_partial_lines() {
        let mut buffer = LineBuffer::default();
        let (head, tail) = LINE.split_at(20);
        assert!(buffer.push(head.as_bytes()).is_empty());
        let events = buffer.push(format!("{tail}\n\n").as_bytes());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].task().title, "Ship it");
    }

    #[test]
    fn splits_multiple_lines_in_one_chunk() {
        let mut buffer = LineBuffer::default();
        let events = buffer.push(format!("{LINE}\nnot json\n{LINE}\n").as_bytes());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn oversized_line_is_dropped_until_next_newline() {
        let mut buffer = LineBuffer::default();
        let junk = vec![b'x'; MAX_LINE_BYTES + 1];
        assert!(buffer.push(&junk).is_empty());
        assert!(buffer.pending.is_empty());
        assert!(buffer.push(&junk).is_empty());
        assert!(buffer.pending.is_empty());

        let events = buffer.push(format!("{LINE}\n{LINE}\n").as_bytes());
        assert_eq!(events.len(), 1);
        assert!(buffer.pending.is_empty());
    }

    #[tokio::test]
    async fn unreachable_stream_closes_subscription() {
        let source =
            HttpNotificationSource::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let mut subscription = source.subscribe().unwrap();
        assert!(subscription.next().await.is_none());
    }
}
