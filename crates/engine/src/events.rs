//! Change notifications.
//!
//! Every committed write emits one `ChangeEvent` naming the touched table.
//! Events carry no row payload: watchers are expected to refetch whatever
//! they display.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedTable {
    Balances,
    Incomes,
    Expenses,
    Transactions,
    Categories,
    Profiles,
    Preferences,
    SecuritySettings,
    PaymentMethods,
}

impl WatchedTable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Balances => "balances",
            Self::Incomes => "incomes",
            Self::Expenses => "expenses",
            Self::Transactions => "transactions",
            Self::Categories => "categories",
            Self::Profiles => "profiles",
            Self::Preferences => "preferences",
            Self::SecuritySettings => "security_settings",
            Self::PaymentMethods => "payment_methods",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: WatchedTable,
}
