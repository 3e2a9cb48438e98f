//! New-transaction wizard.
//!
//! Five linear steps, forward-only with a single back transition. Each
//! step gates `next` with its own validation; submission is reachable only
//! from the confirmation step. Dropping the wizard discards all entered
//! state; nothing is persisted along the way.

use api_types::transaction::{TransactionCreate, TransactionKind, TransactionStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    Kind,
    Details,
    Classification,
    Schedule,
    Confirm,
}

impl WizardStep {
    fn next(self) -> Self {
        match self {
            Self::Kind => Self::Details,
            Self::Details => Self::Classification,
            Self::Classification => Self::Schedule,
            Self::Schedule | Self::Confirm => Self::Confirm,
        }
    }

    fn back(self) -> Self {
        match self {
            Self::Kind | Self::Details => Self::Kind,
            Self::Classification => Self::Details,
            Self::Schedule => Self::Classification,
            Self::Confirm => Self::Schedule,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("select a transaction type")]
    MissingKind,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("amount exceeds the available balance")]
    InsufficientBalance,
    #[error("category is required")]
    MissingCategory,
    #[error("payment method is required")]
    MissingPaymentMethod,
    #[error("recurring day must be between 1 and 31")]
    InvalidRecurringDay,
    #[error("confirm the transaction before submitting")]
    NotConfirmed,
    #[error("submission is only available from the confirmation step")]
    NotAtConfirmation,
}

#[derive(Debug)]
pub struct TransactionWizard {
    step: WizardStep,
    balance_minor: i64,
    kind: Option<TransactionKind>,
    title: String,
    description: String,
    amount_minor: i64,
    category: String,
    payment_method: String,
    date: DateTime<Utc>,
    is_recurring: bool,
    recurring_day: Option<i32>,
    confirmed: bool,
}

impl TransactionWizard {
    /// `balance_minor` is the currently known balance; the expense check in
    /// step two is client-side only and goes stale if the balance moves.
    pub fn new(balance_minor: i64, now: DateTime<Utc>) -> Self {
        Self {
            step: WizardStep::Kind,
            balance_minor,
            kind: None,
            title: String::new(),
            description: String::new(),
            amount_minor: 0,
            category: String::new(),
            payment_method: String::new(),
            date: now,
            is_recurring: false,
            recurring_day: None,
            confirmed: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn set_kind(&mut self, kind: TransactionKind) {
        self.kind = Some(kind);
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn set_amount_minor(&mut self, amount_minor: i64) {
        self.amount_minor = amount_minor;
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
    }

    pub fn set_payment_method(&mut self, payment_method: &str) {
        self.payment_method = payment_method.to_string();
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
    }

    pub fn set_recurrence(&mut self, is_recurring: bool, recurring_day: Option<i32>) {
        self.is_recurring = is_recurring;
        self.recurring_day = if is_recurring { recurring_day } else { None };
    }

    pub fn set_confirmed(&mut self, confirmed: bool) {
        self.confirmed = confirmed;
    }

    fn validate_step(&self, step: WizardStep) -> Result<(), WizardError> {
        match step {
            WizardStep::Kind => {
                if self.kind.is_none() {
                    return Err(WizardError::MissingKind);
                }
            }
            WizardStep::Details => {
                if self.title.trim().is_empty() {
                    return Err(WizardError::EmptyTitle);
                }
                if self.amount_minor <= 0 {
                    return Err(WizardError::NonPositiveAmount);
                }
                // Spending the whole balance is allowed; going past it is not.
                if self.kind == Some(TransactionKind::Expense)
                    && self.amount_minor > self.balance_minor
                {
                    return Err(WizardError::InsufficientBalance);
                }
            }
            WizardStep::Classification => {
                if self.category.trim().is_empty() {
                    return Err(WizardError::MissingCategory);
                }
                if self.payment_method.trim().is_empty() {
                    return Err(WizardError::MissingPaymentMethod);
                }
            }
            WizardStep::Schedule => {
                if self.is_recurring && !matches!(self.recurring_day, Some(1..=31)) {
                    return Err(WizardError::InvalidRecurringDay);
                }
            }
            WizardStep::Confirm => {
                if !self.confirmed {
                    return Err(WizardError::NotConfirmed);
                }
            }
        }
        Ok(())
    }

    /// Advance one step if the current step validates.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.validate_step(self.step)?;
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.back();
        self.step
    }

    /// Produce the create payload. Only valid from the confirmation step
    /// with the checkbox ticked.
    pub fn submit(&self) -> Result<TransactionCreate, WizardError> {
        if self.step != WizardStep::Confirm {
            return Err(WizardError::NotAtConfirmation);
        }
        for step in [
            WizardStep::Kind,
            WizardStep::Details,
            WizardStep::Classification,
            WizardStep::Schedule,
            WizardStep::Confirm,
        ] {
            self.validate_step(step)?;
        }

        let kind = self.kind.ok_or(WizardError::MissingKind)?;
        let description = self.description.trim();

        Ok(TransactionCreate {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            amount_minor: self.amount_minor,
            kind,
            category: self.category.clone(),
            payment_method: self.payment_method.clone(),
            status: TransactionStatus::Completed,
            date: self.date,
            is_recurring: self.is_recurring,
            recurring_day: self.recurring_day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap()
    }

    fn filled_wizard(balance_minor: i64) -> TransactionWizard {
        let mut wizard = TransactionWizard::new(balance_minor, now());
        wizard.set_kind(TransactionKind::Expense);
        wizard.set_title("Market run");
        wizard.set_amount_minor(500);
        wizard.set_category("Market");
        wizard.set_payment_method("card");
        wizard
    }

    #[test]
    fn kind_selection_gates_the_first_step() {
        let mut wizard = TransactionWizard::new(1000, now());
        assert_eq!(wizard.next(), Err(WizardError::MissingKind));

        wizard.set_kind(TransactionKind::Income);
        assert_eq!(wizard.next(), Ok(WizardStep::Details));
    }

    #[test]
    fn details_step_rejects_bad_amounts() {
        let mut wizard = filled_wizard(1000);
        wizard.next().unwrap();

        wizard.set_amount_minor(0);
        assert_eq!(wizard.next(), Err(WizardError::NonPositiveAmount));

        wizard.set_amount_minor(1001);
        assert_eq!(wizard.next(), Err(WizardError::InsufficientBalance));
    }

    #[test]
    fn spending_the_exact_balance_is_allowed() {
        let mut wizard = filled_wizard(500);
        wizard.next().unwrap();
        assert_eq!(wizard.next(), Ok(WizardStep::Classification));
    }

    #[test]
    fn recurring_day_is_required_when_recurring() {
        let mut wizard = filled_wizard(1000);
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::Schedule);

        wizard.set_recurrence(true, None);
        assert_eq!(wizard.next(), Err(WizardError::InvalidRecurringDay));

        wizard.set_recurrence(true, Some(15));
        assert_eq!(wizard.next(), Ok(WizardStep::Confirm));
    }

    #[test]
    fn submit_requires_terminal_step_and_confirmation() {
        let mut wizard = filled_wizard(1000);
        assert_eq!(wizard.submit(), Err(WizardError::NotAtConfirmation));

        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirm);
        assert_eq!(wizard.submit(), Err(WizardError::NotConfirmed));

        wizard.set_confirmed(true);
        let payload = wizard.submit().unwrap();
        assert_eq!(payload.title, "Market run");
        assert_eq!(payload.amount_minor, 500);
        assert_eq!(payload.kind, TransactionKind::Expense);
        assert_eq!(payload.status, TransactionStatus::Completed);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn back_walks_one_step_and_stops_at_the_start() {
        let mut wizard = filled_wizard(1000);
        wizard.next().unwrap();
        assert_eq!(wizard.back(), WizardStep::Kind);
        assert_eq!(wizard.back(), WizardStep::Kind);
    }
}
