//! Client library for the Kasa server: a typed HTTP client, per-domain
//! data hooks that keep themselves fresh over the change-notification
//! stream, and the new-transaction wizard.

pub use api::ApiClient;
pub use error::ClientError;
pub use events::{ChangeFeed, SubscriptionGuard};
pub use wizard::{TransactionWizard, WizardError, WizardStep};

mod api;
mod error;
mod events;
pub mod hooks;
mod wizard;

type ResultClient<T> = Result<T, ClientError>;
