//! Change-notification feed.
//!
//! `ChangeFeed` keeps one server-sent-events connection open and fans the
//! decoded `ChangeEvent`s out over a broadcast channel. Hooks register
//! interest in a set of tables through `watch_tables`; the returned guard
//! cancels the watcher task when dropped, which is the unmount teardown.

use std::future::Future;

use api_types::events::{ChangeEvent, WatchedTable};
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::{ApiClient, ResultClient};

const FEED_CHANNEL_CAPACITY: usize = 64;

fn parse_sse_line(line: &str) -> Option<ChangeEvent> {
    let data = line.strip_prefix("data:")?;
    match serde_json::from_str::<ChangeEvent>(data.trim()) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!("unparseable change event: {err}");
            None
        }
    }
}

pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    reader: JoinHandle<()>,
}

impl ChangeFeed {
    pub async fn connect(api: &ApiClient) -> ResultClient<Self> {
        let response = api.open_events().await?;
        let (sender, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);

        let tx = sender.clone();
        let reader = tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        tracing::warn!("event stream closed: {err}");
                        break;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim_end_matches('\r').to_string();
                    buffer.drain(..=pos);
                    if let Some(event) = parse_sse_line(&line) {
                        // Send errors only mean nobody is listening yet.
                        let _ = tx.send(event);
                    }
                }
            }
        });

        Ok(Self { sender, reader })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Run `refetch` whenever an event touches one of `tables`. A lagged
    /// receiver also refetches, since missed events would have asked for
    /// the same thing.
    pub fn watch_tables<F, Fut>(&self, tables: &[WatchedTable], refetch: F) -> SubscriptionGuard
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let tables = tables.to_vec();
        let mut receiver = self.sender.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if tables.contains(&event.table) => refetch().await,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => refetch().await,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        SubscriptionGuard { handle }
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Cancels its watcher task on drop.
pub struct SubscriptionGuard {
    handle: JoinHandle<()>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_lines_are_decoded() {
        let event = parse_sse_line(r#"data: {"table":"transactions"}"#);
        assert_eq!(
            event,
            Some(ChangeEvent {
                table: WatchedTable::Transactions
            })
        );
    }

    #[test]
    fn non_data_lines_are_ignored() {
        assert_eq!(parse_sse_line("event: change"), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line(""), None);
    }

    #[test]
    fn malformed_payloads_are_dropped() {
        assert_eq!(parse_sse_line("data: {\"table\":\"nope\"}"), None);
    }
}
