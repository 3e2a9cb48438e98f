//! Data-access hooks.
//!
//! Each hook owns an authenticated `ApiClient`, exposes its current state
//! through a `tokio::sync::watch` channel, and refetches wholesale when a
//! change notification arrives. No incremental updates, no optimistic
//! writes. Consumers read a snapshot with `state()` or follow updates with
//! `watch()`.

pub mod categories;
pub mod dashboard;
pub mod settings;
pub mod transactions;

pub use categories::CategoriesHook;
pub use dashboard::DashboardHook;
pub use settings::SettingsHook;
pub use transactions::TransactionsHook;
