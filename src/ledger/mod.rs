//! The ledger: owning collections of transactions and paychecks plus the
//! calendar aggregation and balance projection queries.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::paycheck::Paycheck;
use crate::domain::recurrence::{days_in_month, shift_month};
use crate::domain::savings::SavingsAccount;
use crate::domain::transaction::Transaction;
use crate::errors::{BudgetError, Result};
use crate::portfolio::{CryptoPortfolio, PriceSource};
use crate::tax::TaxConfig;
use crate::time::{Clock, SystemClock};

/// Matched events and their net total for a single calendar day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DaySummary {
    pub total: f64,
    pub transactions: Vec<Transaction>,
}

/// Income and expense totals over one month.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct MonthlySummary {
    pub income: f64,
    pub expenses: f64,
}

impl MonthlySummary {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// The authoritative in-memory collection for one budgeting session.
///
/// Both collections keep insertion order and allow duplicates; whether an
/// entry contributes to a date is decided entirely by the recurrence rules at
/// query time, never cached on the entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub paychecks: Vec<Paycheck>,
    #[serde(default)]
    pub savings_accounts: Vec<SavingsAccount>,
    #[serde(default)]
    pub crypto_portfolio: CryptoPortfolio,
    #[serde(skip, default = "crate::tax::tables::current")]
    tax_config: &'static TaxConfig,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            paychecks: Vec::new(),
            savings_accounts: Vec::new(),
            crypto_portfolio: CryptoPortfolio::default(),
            tax_config: crate::tax::tables::current(),
        }
    }

    /// The tax tables used for paycheck synthesis.
    pub fn tax_config(&self) -> &'static TaxConfig {
        self.tax_config
    }

    /// Swaps the tax tables, e.g. for another tax year.
    pub fn set_tax_config(&mut self, config: &'static TaxConfig) {
        self.tax_config = config;
    }

    /// Adds a validated transaction and returns its identifier.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        transaction.validate()?;
        let id = transaction.id;
        info!(name = %transaction.name, %id, "transaction added");
        self.transactions.push(transaction);
        Ok(id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Removes the transaction identified by `id`, returning the removed
    /// instance.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(BudgetError::TransactionNotFound(id))?;
        info!(%id, "transaction removed");
        Ok(self.transactions.remove(index))
    }

    /// Applies `mutate` to a copy and commits only when the result still
    /// satisfies the entity invariants, so a failed edit leaves state intact.
    pub fn update_transaction<F>(&mut self, id: Uuid, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Transaction),
    {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(BudgetError::TransactionNotFound(id))?;
        let mut updated = self.transactions[index].clone();
        mutate(&mut updated);
        updated.id = id;
        updated.validate()?;
        self.transactions[index] = updated;
        Ok(())
    }

    /// Adds a validated paycheck and returns its identifier.
    pub fn add_paycheck(&mut self, paycheck: Paycheck) -> Result<Uuid> {
        paycheck.validate()?;
        let id = paycheck.id;
        info!(job = %paycheck.job_name, %id, "paycheck added");
        self.paychecks.push(paycheck);
        Ok(id)
    }

    pub fn paycheck(&self, id: Uuid) -> Option<&Paycheck> {
        self.paychecks.iter().find(|paycheck| paycheck.id == id)
    }

    pub fn remove_paycheck(&mut self, id: Uuid) -> Result<Paycheck> {
        let index = self
            .paychecks
            .iter()
            .position(|paycheck| paycheck.id == id)
            .ok_or(BudgetError::PaycheckNotFound(id))?;
        info!(%id, "paycheck removed");
        Ok(self.paychecks.remove(index))
    }

    pub fn update_paycheck<F>(&mut self, id: Uuid, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Paycheck),
    {
        let index = self
            .paychecks
            .iter()
            .position(|paycheck| paycheck.id == id)
            .ok_or(BudgetError::PaycheckNotFound(id))?;
        let mut updated = self.paychecks[index].clone();
        mutate(&mut updated);
        updated.id = id;
        updated.validate()?;
        self.paychecks[index] = updated;
        Ok(())
    }

    pub fn add_savings_account(&mut self, account: SavingsAccount) -> Result<Uuid> {
        account.validate()?;
        let id = account.id;
        self.savings_accounts.push(account);
        Ok(id)
    }

    pub fn remove_savings_account(&mut self, id: Uuid) -> Option<SavingsAccount> {
        let index = self
            .savings_accounts
            .iter()
            .position(|account| account.id == id)?;
        Some(self.savings_accounts.remove(index))
    }

    /// Every event occurring on `date`: literal transactions in insertion
    /// order, then paycheck-synthesized income, also in insertion order.
    pub fn transactions_on_date(&self, date: NaiveDate) -> Vec<Transaction> {
        let mut matched: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|txn| txn.occurs_on(date))
            .cloned()
            .collect();
        matched.extend(
            self.paychecks
                .iter()
                .map(|paycheck| paycheck.to_transaction(self.tax_config))
                .filter(|txn| txn.occurs_on(date)),
        );
        matched
    }

    /// Net signed total for `date`: income minus expenses.
    pub fn daily_total(&self, date: NaiveDate) -> f64 {
        self.transactions_on_date(date)
            .iter()
            .map(Transaction::signed_amount)
            .sum()
    }

    /// Per-day summaries for every day of the month. Each day is recomputed
    /// independently; cost is O(days in month × events).
    pub fn calendar_data(&self, year: i32, month: u32) -> BTreeMap<u32, DaySummary> {
        let mut days = BTreeMap::new();
        if !(1..=12).contains(&month) {
            return days;
        }
        for day in 1..=days_in_month(year, month) {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            days.insert(
                day,
                DaySummary {
                    total: self.daily_total(date),
                    transactions: self.transactions_on_date(date),
                },
            );
        }
        days
    }

    /// Ordered `(date, transaction)` pairs for list-style month views.
    pub fn transactions_for_month(&self, year: i32, month: u32) -> Vec<(NaiveDate, Transaction)> {
        let mut rows = Vec::new();
        for (day, summary) in self.calendar_data(year, month) {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            for transaction in summary.transactions {
                rows.push((date, transaction));
            }
        }
        rows
    }

    /// Expense totals per category across the month.
    pub fn monthly_category_breakdown(&self, year: i32, month: u32) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for (_, transaction) in self.transactions_for_month(year, month) {
            if transaction.is_expense() {
                *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
            }
        }
        totals
    }

    /// Total income and expenses across the month.
    pub fn monthly_summary(&self, year: i32, month: u32) -> MonthlySummary {
        let mut summary = MonthlySummary::default();
        for (_, transaction) in self.transactions_for_month(year, month) {
            if transaction.is_income() {
                summary.income += transaction.amount;
            } else {
                summary.expenses += transaction.amount;
            }
        }
        summary
    }

    /// Day-by-day balance simulation from `clock.today()` through `target`.
    /// A target before today leaves the balance untouched. The daily walk is
    /// required because monthly clamping and yearly anchors have no
    /// closed-form periodic sum.
    pub fn running_balance_with(
        &self,
        clock: &dyn Clock,
        start_balance: f64,
        target: NaiveDate,
    ) -> f64 {
        let mut balance = start_balance;
        let mut day = clock.today();
        while day <= target {
            balance += self.daily_total(day);
            day += Duration::days(1);
        }
        balance
    }

    /// Balance simulation anchored at the system clock's today.
    pub fn running_balance(&self, start_balance: f64, target: NaiveDate) -> f64 {
        self.running_balance_with(&SystemClock, start_balance, target)
    }

    /// Projected balances at whole-month steps from today, starting with the
    /// current month.
    pub fn project_monthly_balances(
        &self,
        clock: &dyn Clock,
        start_balance: f64,
        months: u32,
    ) -> Vec<(NaiveDate, f64)> {
        let today = clock.today();
        (0..months)
            .map(|offset| {
                let date = shift_month(today, offset as i32);
                (date, self.running_balance_with(clock, start_balance, date))
            })
            .collect()
    }

    /// Refreshes crypto prices through the injected best-effort source.
    pub fn update_crypto_prices(&mut self, source: &dyn PriceSource, clock: &dyn Clock) {
        self.crypto_portfolio.update_prices(source, clock);
    }
}
