//! Transactions-list hook.
//!
//! Reads the full list plus the balance row and derives income/expense
//! totals. Every mutation performs the remote write and then reloads the
//! whole list; the write's own response is never merged into local state.

use std::sync::Arc;

use api_types::balance::BalanceView;
use api_types::events::WatchedTable;
use api_types::transaction::{
    TransactionCreate, TransactionCreated, TransactionKind, TransactionUpdate, TransactionView,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{ApiClient, ChangeFeed, ResultClient, SubscriptionGuard};

pub const DUPLICATE_TITLE_SUFFIX: &str = " (copy)";

#[derive(Clone, Debug, Default)]
pub struct TransactionsState {
    pub loading: bool,
    pub error: Option<String>,
    pub transactions: Vec<TransactionView>,
    pub balance: Option<BalanceView>,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
}

/// (income, expense) sums over the whole list.
pub fn totals_by_kind(transactions: &[TransactionView]) -> (i64, i64) {
    let mut income = 0;
    let mut expense = 0;
    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => income += tx.amount_minor,
            TransactionKind::Expense => expense += tx.amount_minor,
        }
    }
    (income, expense)
}

/// The create payload for a duplicate: every field copied except identity
/// and timestamps, title suffixed, date stamped with `now`.
pub fn duplicate_request(source: &TransactionView, now: DateTime<Utc>) -> TransactionCreate {
    TransactionCreate {
        title: format!("{}{DUPLICATE_TITLE_SUFFIX}", source.title),
        description: source.description.clone(),
        amount_minor: source.amount_minor,
        kind: source.kind,
        category: source.category.clone(),
        payment_method: source.payment_method.clone(),
        status: source.status,
        date: now,
        is_recurring: source.is_recurring,
        recurring_day: source.recurring_day,
    }
}

struct Inner {
    api: ApiClient,
    state: watch::Sender<TransactionsState>,
}

impl Inner {
    async fn refetch(&self) {
        let result = tokio::try_join!(self.api.transactions(), self.api.balance());

        let next = match result {
            Ok((list, balance)) => {
                let (total_income_minor, total_expense_minor) =
                    totals_by_kind(&list.transactions);
                TransactionsState {
                    loading: false,
                    error: None,
                    transactions: list.transactions,
                    balance: Some(balance),
                    total_income_minor,
                    total_expense_minor,
                }
            }
            Err(err) => TransactionsState {
                loading: false,
                error: Some(err.human_message()),
                ..Default::default()
            },
        };

        let _ = self.state.send(next);
    }
}

pub struct TransactionsHook {
    inner: Arc<Inner>,
    subscription: Option<SubscriptionGuard>,
}

impl TransactionsHook {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(TransactionsState {
            loading: true,
            ..Default::default()
        });

        Self {
            inner: Arc::new(Inner { api, state }),
            subscription: None,
        }
    }

    /// Initial fetch plus a watcher on the transactions and balances
    /// tables; a recompute that only moves the balance row still refreshes
    /// the displayed balance.
    pub async fn mount(&mut self, feed: &ChangeFeed) {
        self.inner.refetch().await;

        let inner = Arc::clone(&self.inner);
        self.subscription = Some(feed.watch_tables(
            &[WatchedTable::Transactions, WatchedTable::Balances],
            move || {
                let inner = Arc::clone(&inner);
                async move { inner.refetch().await }
            },
        ));
    }

    pub async fn refetch(&self) {
        self.inner.refetch().await;
    }

    pub fn state(&self) -> TransactionsState {
        self.inner.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<TransactionsState> {
        self.inner.state.subscribe()
    }

    pub async fn create(&self, payload: &TransactionCreate) -> ResultClient<TransactionCreated> {
        let created = self.inner.api.create_transaction(payload).await?;
        self.inner.refetch().await;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &TransactionUpdate,
    ) -> ResultClient<TransactionView> {
        let updated = self.inner.api.update_transaction(id, payload).await?;
        self.inner.refetch().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> ResultClient<()> {
        self.inner.api.delete_transaction(id).await?;
        self.inner.refetch().await;
        Ok(())
    }

    pub async fn duplicate(&self, source: &TransactionView) -> ResultClient<TransactionCreated> {
        let payload = duplicate_request(source, Utc::now());
        let created = self.inner.api.create_transaction(&payload).await?;
        self.inner.refetch().await;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::transaction::TransactionStatus;
    use chrono::TimeZone;

    fn sample(kind: TransactionKind, amount_minor: i64) -> TransactionView {
        let stamp = Utc.with_ymd_and_hms(2026, 8, 10, 9, 30, 0).unwrap();
        TransactionView {
            id: Uuid::new_v4(),
            title: "Market run".to_string(),
            description: Some("weekly".to_string()),
            amount_minor,
            kind,
            category: "Market".to_string(),
            payment_method: "card".to_string(),
            status: TransactionStatus::Completed,
            date: stamp,
            is_recurring: true,
            recurring_day: Some(10),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn totals_sum_by_kind() {
        let transactions = vec![
            sample(TransactionKind::Income, 1000),
            sample(TransactionKind::Income, 500),
            sample(TransactionKind::Expense, 300),
        ];

        assert_eq!(totals_by_kind(&transactions), (1500, 300));
    }

    #[test]
    fn duplicate_copies_everything_but_identity() {
        let source = sample(TransactionKind::Expense, 450);
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 14, 0, 0).unwrap();

        let copy = duplicate_request(&source, now);
        assert_eq!(copy.title, "Market run (copy)");
        assert_eq!(copy.date, now);
        assert_eq!(copy.description, source.description);
        assert_eq!(copy.amount_minor, source.amount_minor);
        assert_eq!(copy.kind, source.kind);
        assert_eq!(copy.category, source.category);
        assert_eq!(copy.payment_method, source.payment_method);
        assert_eq!(copy.status, source.status);
        assert_eq!(copy.is_recurring, source.is_recurring);
        assert_eq!(copy.recurring_day, source.recurring_day);
    }
}
