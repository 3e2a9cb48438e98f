pub use categories::Category;
pub use commands::{
    CategoryPatch, NewCategory, NewEntry, NewPaymentMethod, NewTransaction, PaymentMethodPatch,
    PreferencesPatch, ProfilePatch, SecuritySettingsPatch, TransactionPatch,
};
pub use error::EngineError;
pub use events::{ChangeEvent, WatchedTable};
pub use ops::{Engine, EngineBuilder};
pub use transactions::{Transaction, TransactionKind, TransactionStatus};

pub mod balances;
pub mod categories;
mod commands;
mod error;
mod events;
pub mod expenses;
pub mod incomes;
mod ops;
pub mod payment_methods;
pub mod preferences;
pub mod profiles;
pub mod security_settings;
pub mod sessions;
pub mod transactions;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
