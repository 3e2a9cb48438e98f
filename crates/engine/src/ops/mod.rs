use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;

use crate::{ChangeEvent, EngineError, ResultEngine, WatchedTable};

mod auth;
mod balances;
mod categories;
mod entries;
mod settings;
mod transactions;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    events: broadcast::Sender<ChangeEvent>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Subscribe to change notifications for all tables.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Emit a change event after a committed write. Send errors only mean
    /// nobody is listening.
    pub(crate) fn emit(&self, table: WatchedTable) {
        let _ = self.events.send(ChangeEvent { table });
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn ensure_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_recurring_day(is_recurring: bool, recurring_day: Option<i32>) -> ResultEngine<()> {
    match (is_recurring, recurring_day) {
        (true, Some(day)) if !(1..=31).contains(&day) => Err(EngineError::InvalidAmount(
            "recurring_day must be in 1..=31".to_string(),
        )),
        (true, None) => Err(EngineError::InvalidAmount(
            "recurring_day required for recurring transactions".to_string(),
        )),
        (false, Some(_)) => Err(EngineError::InvalidAmount(
            "recurring_day only valid for recurring transactions".to_string(),
        )),
        _ => Ok(()),
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Engine {
            database: self.database,
            events,
        })
    }
}
