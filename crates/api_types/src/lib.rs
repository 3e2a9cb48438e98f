use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignUp {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignIn {
        pub email: String,
        pub password: String,
    }

    /// Issued on sign-in; the token authenticates every later request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionCreated {
        pub token: String,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionView {
        pub user_id: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordResetRequest {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordResetConfirm {
        pub email: String,
        pub code: String,
        pub new_password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordUpdate {
        pub new_password: String,
    }
}

pub mod balance {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub id: Uuid,
        pub total_balance_minor: i64,
        pub last_earned_minor: i64,
        pub total_bonus_minor: i64,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod entry {
    use super::*;

    /// A row in the `incomes` or `expenses` table. Both tables share this
    /// shape; the endpoint determines which one is addressed.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryListResponse {
        pub entries: Vec<EntryView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    impl TransactionKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Completed,
        Pending,
        Failed,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub kind: TransactionKind,
        pub category: String,
        pub payment_method: String,
        pub status: TransactionStatus,
        pub date: DateTime<Utc>,
        pub is_recurring: bool,
        pub recurring_day: Option<i32>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionCreate {
        pub title: String,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub kind: TransactionKind,
        pub category: String,
        pub payment_method: String,
        pub status: TransactionStatus,
        pub date: DateTime<Utc>,
        pub is_recurring: bool,
        pub recurring_day: Option<i32>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub title: Option<String>,
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub kind: Option<TransactionKind>,
        pub category: Option<String>,
        pub payment_method: Option<String>,
        pub status: Option<TransactionStatus>,
        pub date: Option<DateTime<Utc>>,
        pub is_recurring: Option<bool>,
        pub recurring_day: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod category {
    use super::*;
    pub use super::transaction::TransactionKind as CategoryKind;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_default: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        pub kind: CategoryKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub kind: Option<CategoryKind>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod settings {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ProfileView {
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub email: String,
        pub phone: Option<String>,
        pub avatar_url: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub phone: Option<String>,
        pub avatar_url: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PreferencesView {
        pub notifications_mobile: bool,
        pub notifications_email: bool,
        pub notifications_sound: bool,
        pub notifications_payment: bool,
        pub notifications_security: bool,
        pub notifications_promotions: bool,
        pub theme: String,
        pub font_size: String,
        pub language: String,
        pub date_format: String,
        pub currency: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PreferencesUpdate {
        pub notifications_mobile: Option<bool>,
        pub notifications_email: Option<bool>,
        pub notifications_sound: Option<bool>,
        pub notifications_payment: Option<bool>,
        pub notifications_security: Option<bool>,
        pub notifications_promotions: Option<bool>,
        pub theme: Option<String>,
        pub font_size: Option<String>,
        pub language: Option<String>,
        pub date_format: Option<String>,
        pub currency: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SecuritySettingsView {
        pub two_factor_enabled: bool,
        pub last_password_change: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SecuritySettingsUpdate {
        pub two_factor_enabled: Option<bool>,
        pub last_password_change: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PaymentMethodView {
        pub id: Uuid,
        pub kind: String,
        pub provider: String,
        pub last_four: Option<String>,
        pub expiry_date: Option<String>,
        pub is_default: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodCreate {
        pub kind: String,
        pub provider: String,
        pub last_four: Option<String>,
        pub expiry_date: Option<String>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentMethodUpdate {
        pub kind: Option<String>,
        pub provider: Option<String>,
        pub last_four: Option<String>,
        pub expiry_date: Option<String>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodListResponse {
        pub payment_methods: Vec<PaymentMethodView>,
    }
}

pub mod events {
    use super::*;

    /// Tables a client may watch for change notifications.
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

    /// Emitted once per committed write. Carries no row payload; watchers
    /// are expected to refetch.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChangeEvent {
        pub table: WatchedTable,
    }
}
