//! Change-notification stream.
//!
//! `GET /events` is a server-sent-events endpoint. Every committed write in
//! the engine produces one `change` event naming the touched table; clients
//! refetch whatever they display for that table.

use std::convert::Infallible;

use api_types::events::{ChangeEvent, WatchedTable};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{
    Stream, StreamExt,
    wrappers::{BroadcastStream, errors::BroadcastStreamRecvError},
};

use crate::server::ServerState;

fn map_table(table: engine::WatchedTable) -> WatchedTable {
    match table {
        engine::WatchedTable::Balances => WatchedTable::Balances,
        engine::WatchedTable::Incomes => WatchedTable::Incomes,
        engine::WatchedTable::Expenses => WatchedTable::Expenses,
        engine::WatchedTable::Transactions => WatchedTable::Transactions,
        engine::WatchedTable::Categories => WatchedTable::Categories,
        engine::WatchedTable::Profiles => WatchedTable::Profiles,
        engine::WatchedTable::Preferences => WatchedTable::Preferences,
        engine::WatchedTable::SecuritySettings => WatchedTable::SecuritySettings,
        engine::WatchedTable::PaymentMethods => WatchedTable::PaymentMethods,
    }
}

pub async fn stream(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = BroadcastStream::new(state.engine.subscribe()).filter_map(|received| {
        match received {
            Ok(event) => {
                let payload = ChangeEvent {
                    table: map_table(event.table),
                };
                match Event::default().event("change").json_data(payload) {
                    Ok(event) => Some(Ok(event)),
                    Err(err) => {
                        tracing::error!("failed to encode change event: {err}");
                        None
                    }
                }
            }
            // A lagged receiver missed events; dropping them is fine since
            // watchers refetch on the next one anyway.
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!("event stream lagged, skipped {skipped} events");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
