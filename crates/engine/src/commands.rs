//! Input structs for engine write operations.
//!
//! `New*` structs create rows; `*Patch` structs are partial updates where
//! `None` leaves the column untouched.

use chrono::{DateTime, Utc};

use crate::{TransactionKind, TransactionStatus};

#[derive(Clone, Debug)]
pub struct NewTransaction {
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

#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
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

/// A row for the `incomes` or `expenses` table.
#[derive(Clone, Debug)]
pub struct NewEntry {
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub kind: TransactionKind,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PreferencesPatch {
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

#[derive(Clone, Debug, Default)]
pub struct SecuritySettingsPatch {
    pub two_factor_enabled: Option<bool>,
    pub last_password_change: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct NewPaymentMethod {
    pub kind: String,
    pub provider: String,
    pub last_four: Option<String>,
    pub expiry_date: Option<String>,
    pub is_default: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PaymentMethodPatch {
    pub kind: Option<String>,
    pub provider: Option<String>,
    pub last_four: Option<String>,
    pub expiry_date: Option<String>,
    pub is_default: Option<bool>,
}
