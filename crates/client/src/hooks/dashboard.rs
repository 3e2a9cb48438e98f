//! Dashboard aggregation hook.
//!
//! Four parallel reads (balance, incomes, expenses, recent transactions)
//! joined all-or-nothing: one failure resets the whole view to its empty
//! default. Monthly totals cover the current calendar month with an
//! inclusive lower bound at the first of the month, compared on the local
//! wall-clock date.

use std::collections::BTreeMap;
use std::sync::Arc;

use api_types::balance::BalanceView;
use api_types::entry::EntryView;
use api_types::events::WatchedTable;
use api_types::transaction::{TransactionKind, TransactionView};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use tokio::sync::watch;

use crate::{ApiClient, ChangeFeed, SubscriptionGuard};

const RECENT_TRANSACTIONS_LIMIT: u64 = 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonthlySummary {
    pub income_minor: i64,
    pub expense_minor: i64,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub kind: TransactionKind,
    pub total_minor: i64,
}

/// The empty shape consumers see while loading or after a failed read.
#[derive(Clone, Debug, Default)]
pub struct DashboardData {
    pub balance: Option<BalanceView>,
    pub incomes: Vec<EntryView>,
    pub expenses: Vec<EntryView>,
    pub recent_transactions: Vec<TransactionView>,
    pub monthly: MonthlySummary,
}

#[derive(Clone, Debug)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<String>,
    pub data: DashboardData,
}

fn local_date(date: DateTime<Utc>) -> NaiveDate {
    date.with_timezone(&Local).date_naive()
}

pub(crate) fn current_month_start() -> NaiveDate {
    let today = Local::now().date_naive();
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
}

/// Sum entries dated on or after `month_start`, grouped overall and by
/// category.
pub fn monthly_summary(
    incomes: &[EntryView],
    expenses: &[EntryView],
    month_start: NaiveDate,
) -> MonthlySummary {
    let mut income_minor = 0;
    let mut expense_minor = 0;
    let mut by_category: BTreeMap<(String, &'static str), (TransactionKind, i64)> = BTreeMap::new();

    for entry in incomes {
        if local_date(entry.date) >= month_start {
            income_minor += entry.amount_minor;
            let slot = by_category
                .entry((entry.category.clone(), TransactionKind::Income.as_str()))
                .or_insert((TransactionKind::Income, 0));
            slot.1 += entry.amount_minor;
        }
    }
    for entry in expenses {
        if local_date(entry.date) >= month_start {
            expense_minor += entry.amount_minor;
            let slot = by_category
                .entry((entry.category.clone(), TransactionKind::Expense.as_str()))
                .or_insert((TransactionKind::Expense, 0));
            slot.1 += entry.amount_minor;
        }
    }

    MonthlySummary {
        income_minor,
        expense_minor,
        by_category: by_category
            .into_iter()
            .map(|((category, _), (kind, total_minor))| CategoryTotal {
                category,
                kind,
                total_minor,
            })
            .collect(),
    }
}

struct Inner {
    api: ApiClient,
    state: watch::Sender<DashboardState>,
}

impl Inner {
    async fn refetch(&self) {
        let result = tokio::try_join!(
            self.api.balance(),
            self.api.incomes(),
            self.api.expenses(),
            self.api.recent_transactions(RECENT_TRANSACTIONS_LIMIT),
        );

        let next = match result {
            Ok((balance, incomes, expenses, recent)) => {
                let monthly =
                    monthly_summary(&incomes.entries, &expenses.entries, current_month_start());
                DashboardState {
                    loading: false,
                    error: None,
                    data: DashboardData {
                        balance: Some(balance),
                        incomes: incomes.entries,
                        expenses: expenses.entries,
                        recent_transactions: recent.transactions,
                        monthly,
                    },
                }
            }
            // No partial merge: one failed read empties the whole view.
            Err(err) => DashboardState {
                loading: false,
                error: Some(err.human_message()),
                data: DashboardData::default(),
            },
        };

        let _ = self.state.send(next);
    }
}

pub struct DashboardHook {
    inner: Arc<Inner>,
    subscription: Option<SubscriptionGuard>,
}

impl DashboardHook {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(DashboardState {
            loading: true,
            error: None,
            data: DashboardData::default(),
        });

        Self {
            inner: Arc::new(Inner { api, state }),
            subscription: None,
        }
    }

    /// Initial fetch plus a watcher on the balance and transactions tables.
    pub async fn mount(&mut self, feed: &ChangeFeed) {
        self.inner.refetch().await;

        let inner = Arc::clone(&self.inner);
        self.subscription = Some(feed.watch_tables(
            &[WatchedTable::Balances, WatchedTable::Transactions],
            move || {
                let inner = Arc::clone(&inner);
                async move { inner.refetch().await }
            },
        ));
    }

    pub async fn refetch(&self) {
        self.inner.refetch().await;
    }

    pub fn state(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn entry(amount_minor: i64, category: &str, date: DateTime<Utc>) -> EntryView {
        EntryView {
            id: Uuid::new_v4(),
            title: "entry".to_string(),
            amount_minor,
            category: category.to_string(),
            date,
        }
    }

    fn mid_month(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        // Noon UTC keeps the local date inside the month for any offset.
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn totals_only_cover_the_current_month() {
        let month_start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let incomes = vec![
            entry(1000, "Salary", mid_month(2026, 8, 15)),
            entry(500, "Salary", mid_month(2026, 8, 20)),
            entry(2000, "Salary", mid_month(2026, 7, 10)),
        ];
        let expenses = vec![
            entry(300, "Market", mid_month(2026, 8, 5)),
            entry(900, "Market", mid_month(2026, 6, 5)),
        ];

        let summary = monthly_summary(&incomes, &expenses, month_start);
        assert_eq!(summary.income_minor, 1500);
        assert_eq!(summary.expense_minor, 300);
    }

    #[test]
    fn first_of_month_is_inclusive() {
        let month_start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let incomes = vec![entry(700, "Salary", mid_month(2026, 8, 1))];

        let summary = monthly_summary(&incomes, &[], month_start);
        assert_eq!(summary.income_minor, 700);
    }

    #[test]
    fn breakdown_groups_by_category_and_kind() {
        let month_start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let incomes = vec![
            entry(1000, "Salary", mid_month(2026, 8, 2)),
            entry(250, "Freelance", mid_month(2026, 8, 3)),
        ];
        let expenses = vec![
            entry(100, "Market", mid_month(2026, 8, 4)),
            entry(150, "Market", mid_month(2026, 8, 6)),
        ];

        let summary = monthly_summary(&incomes, &expenses, month_start);
        let market = summary
            .by_category
            .iter()
            .find(|total| total.category == "Market")
            .unwrap();
        assert_eq!(market.total_minor, 250);
        assert_eq!(market.kind, TransactionKind::Expense);
        assert_eq!(summary.by_category.len(), 3);
    }
}
