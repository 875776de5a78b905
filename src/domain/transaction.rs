use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::domain::recurrence::{self, Frequency};
use crate::errors::{BudgetError, Result};

/// Whether an event adds to or subtracts from a day's total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A literal financial event, one-off or recurring.
///
/// The serialized shape matches the persistence contract consumed by the
/// front-ends: `transaction_type` on the wire maps to [`Transaction::kind`],
/// and the `id` defaults on decode so foreign JSON without one still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "Transaction::default_category")]
    pub category: String,
}

impl Transaction {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        frequency: Frequency,
        start_date: NaiveDate,
        category: impl Into<String>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let transaction = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            kind,
            frequency,
            start_date,
            end_date,
            category: category.into(),
        };
        transaction.validate()?;
        Ok(transaction)
    }

    pub fn default_category() -> String {
        "other".into()
    }

    /// Checks the creation/edit invariants; invalid entities never enter a
    /// ledger.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BudgetError::InvalidInput(
                "transaction name must not be empty".into(),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(BudgetError::InvalidInput(
                "transaction amount must be positive".into(),
            ));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(BudgetError::InvalidInput(
                    "end date must not precede start date".into(),
                ));
            }
        }
        Ok(())
    }

    /// True when this transaction occurs on `date` under its recurrence rule.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        recurrence::occurs_on(self.frequency, self.start_date, self.end_date, date)
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense)
    }

    /// Signed contribution to a daily total.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Transaction {
    fn name(&self) -> &str {
        &self.name
    }
}
