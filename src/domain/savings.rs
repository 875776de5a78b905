//! Interest-bearing savings accounts tracked alongside the ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::errors::{BudgetError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsAccount {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub interest_rate: f64,
}

impl SavingsAccount {
    pub fn new(name: impl Into<String>, balance: f64, interest_rate: f64) -> Result<Self> {
        let account = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance,
            interest_rate,
        };
        account.validate()?;
        Ok(account)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BudgetError::InvalidInput(
                "account name must not be empty".into(),
            ));
        }
        if !self.balance.is_finite() {
            return Err(BudgetError::InvalidInput(
                "account balance must be a finite number".into(),
            ));
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(BudgetError::InvalidInput(
                "interest rate must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Interest accrued over a full year at the current balance.
    pub fn projected_annual_interest(&self) -> f64 {
        self.balance * self.interest_rate
    }
}

impl Identifiable for SavingsAccount {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for SavingsAccount {
    fn name(&self) -> &str {
        &self.name
    }
}
