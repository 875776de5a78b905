use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::domain::recurrence::{shift_month, Frequency};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::errors::{BudgetError, Result};
use crate::tax::{self, TaxConfig};

/// Average weeks per month used for monthly gross pay.
const WEEKS_PER_MONTH: f64 = 4.33;

/// Pay cadence; a strict subset of [`Frequency`] — one-time and yearly pay
/// schedules are not supported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PayFrequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Daily => 260,
            PayFrequency::Weekly => 52,
            PayFrequency::BiWeekly => 26,
            PayFrequency::Monthly => 12,
        }
    }

    /// The pay date following `date`. Monthly schedules advance by one
    /// calendar month with normal rollover, unlike the recurrence matcher's
    /// clamp-to-last-day matching rule.
    pub fn next_pay_date(&self, date: NaiveDate) -> NaiveDate {
        match self {
            PayFrequency::Daily => date + Duration::days(1),
            PayFrequency::Weekly => date + Duration::days(7),
            PayFrequency::BiWeekly => date + Duration::days(14),
            PayFrequency::Monthly => shift_month(date, 1),
        }
    }

    pub fn as_frequency(&self) -> Frequency {
        match self {
            PayFrequency::Daily => Frequency::Daily,
            PayFrequency::Weekly => Frequency::Weekly,
            PayFrequency::BiWeekly => Frequency::BiWeekly,
            PayFrequency::Monthly => Frequency::Monthly,
        }
    }
}

/// Filing status used for federal withholding.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

/// Per-period deduction detail derived from a paycheck and the active tax
/// tables. Always recomputed, never stored.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TaxBreakdown {
    pub gross_pay: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub health_insurance: f64,
    pub other_deductions: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
}

/// A recurring pay template. It synthesizes net-pay income events on demand
/// and is never itself part of the matched-event set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paycheck {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub job_name: String,
    pub hourly_rate: f64,
    pub hours_per_week: f64,
    pub frequency: PayFrequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub filing_status: FilingStatus,
    #[serde(default = "Paycheck::default_allowances")]
    pub allowances: u32,
    #[serde(default)]
    pub health_insurance: f64,
    #[serde(default)]
    pub other_deductions: f64,
}

impl Paycheck {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job_name: impl Into<String>,
        hourly_rate: f64,
        hours_per_week: f64,
        frequency: PayFrequency,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        filing_status: FilingStatus,
        allowances: u32,
        health_insurance: f64,
        other_deductions: f64,
    ) -> Result<Self> {
        let paycheck = Self {
            id: Uuid::new_v4(),
            job_name: job_name.into(),
            hourly_rate,
            hours_per_week,
            frequency,
            start_date,
            end_date,
            filing_status,
            allowances,
            health_insurance,
            other_deductions,
        };
        paycheck.validate()?;
        Ok(paycheck)
    }

    pub fn default_allowances() -> u32 {
        1
    }

    /// Checks the creation/edit invariants.
    pub fn validate(&self) -> Result<()> {
        if self.job_name.trim().is_empty() {
            return Err(BudgetError::InvalidInput(
                "job name must not be empty".into(),
            ));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate <= 0.0 {
            return Err(BudgetError::InvalidInput(
                "hourly rate must be positive".into(),
            ));
        }
        if !self.hours_per_week.is_finite() || self.hours_per_week <= 0.0 {
            return Err(BudgetError::InvalidInput(
                "hours per week must be positive".into(),
            ));
        }
        if !self.health_insurance.is_finite() || self.health_insurance < 0.0 {
            return Err(BudgetError::InvalidInput(
                "health insurance deduction must not be negative".into(),
            ));
        }
        if !self.other_deductions.is_finite() || self.other_deductions < 0.0 {
            return Err(BudgetError::InvalidInput(
                "other deductions must not be negative".into(),
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

    /// Gross pay for one period.
    pub fn gross_per_period(&self) -> f64 {
        let weekly = self.hourly_rate * self.hours_per_week;
        match self.frequency {
            PayFrequency::Daily => weekly / 5.0,
            PayFrequency::Weekly => weekly,
            PayFrequency::BiWeekly => weekly * 2.0,
            PayFrequency::Monthly => weekly * WEEKS_PER_MONTH,
        }
    }

    pub fn annual_gross(&self) -> f64 {
        self.gross_per_period() * f64::from(self.frequency.periods_per_year())
    }

    /// Per-period deduction breakdown under the given tax tables.
    pub fn tax_breakdown(&self, config: &TaxConfig) -> TaxBreakdown {
        let gross_pay = self.gross_per_period();
        let annual_gross = self.annual_gross();
        let periods = f64::from(self.frequency.periods_per_year());

        let federal_tax =
            tax::federal_income_tax(config, annual_gross, self.filing_status, self.allowances)
                / periods;
        let state_tax = tax::state_income_tax(config, annual_gross) / periods;
        let fica = tax::fica_taxes(config, annual_gross);
        let social_security = fica.social_security / periods;
        let medicare = fica.medicare / periods;

        let total_deductions = federal_tax
            + state_tax
            + social_security
            + medicare
            + self.health_insurance
            + self.other_deductions;
        TaxBreakdown {
            gross_pay,
            federal_tax,
            state_tax,
            social_security,
            medicare,
            health_insurance: self.health_insurance,
            other_deductions: self.other_deductions,
            total_deductions,
            net_pay: gross_pay - total_deductions,
        }
    }

    /// Take-home amount for one period.
    pub fn net_pay(&self, config: &TaxConfig) -> f64 {
        self.tax_breakdown(config).net_pay
    }

    /// Ephemeral income transaction carrying this paycheck's net pay and
    /// inheriting its schedule window. Recomputed on every query; never owned
    /// or persisted by a ledger.
    pub fn to_transaction(&self, config: &TaxConfig) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            name: format!("{} Paycheck (Net)", self.job_name),
            amount: self.net_pay(config),
            kind: TransactionKind::Income,
            frequency: self.frequency.as_frequency(),
            start_date: self.start_date,
            end_date: self.end_date,
            category: "income".into(),
        }
    }

    /// Actual pay dates inside `[window_start, window_end]`, stepped from the
    /// schedule anchor. Empty when the schedule starts after the window or
    /// ends before it.
    pub fn upcoming_pay_dates(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Vec<NaiveDate> {
        let limit = match self.end_date {
            Some(end) => end.min(window_end),
            None => window_end,
        };
        let mut date = self.start_date;
        while date < window_start {
            date = self.frequency.next_pay_date(date);
        }
        let mut dates = Vec::new();
        while date <= limit {
            dates.push(date);
            date = self.frequency.next_pay_date(date);
        }
        dates
    }
}

impl Identifiable for Paycheck {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Paycheck {
    fn name(&self) -> &str {
        &self.job_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::tables::current;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn bi_weekly_job() -> Paycheck {
        Paycheck::new(
            "Acme",
            20.0,
            40.0,
            PayFrequency::BiWeekly,
            date(2024, 1, 5),
            None,
            FilingStatus::Single,
            1,
            0.0,
            0.0,
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn gross_pay_per_frequency() {
        let mut paycheck = bi_weekly_job();
        assert_close(paycheck.gross_per_period(), 1_600.0);
        paycheck.frequency = PayFrequency::Weekly;
        assert_close(paycheck.gross_per_period(), 800.0);
        paycheck.frequency = PayFrequency::Daily;
        assert_close(paycheck.gross_per_period(), 160.0);
        paycheck.frequency = PayFrequency::Monthly;
        assert_close(paycheck.gross_per_period(), 800.0 * 4.33);
    }

    #[test]
    fn annual_gross_scales_by_periods_per_year() {
        let paycheck = bi_weekly_job();
        assert_close(paycheck.annual_gross(), 41_600.0);
    }

    #[test]
    fn tax_breakdown_reproduces_annual_components() {
        let config = current();
        let paycheck = bi_weekly_job();
        let breakdown = paycheck.tax_breakdown(config);

        assert_close(breakdown.gross_pay, 1_600.0);
        assert_close(breakdown.federal_tax, 2_608.50 / 26.0);
        assert_close(breakdown.state_tax, 2_134.50 / 26.0);
        assert_close(breakdown.social_security, 41_600.0 * 0.062 / 26.0);
        assert_close(breakdown.medicare, 41_600.0 * 0.0145 / 26.0);
        assert_close(
            breakdown.total_deductions,
            breakdown.federal_tax
                + breakdown.state_tax
                + breakdown.social_security
                + breakdown.medicare,
        );
        assert_close(breakdown.net_pay, 1_600.0 - breakdown.total_deductions);
    }

    #[test]
    fn fixed_deductions_are_per_period() {
        let config = current();
        let mut paycheck = bi_weekly_job();
        paycheck.health_insurance = 75.0;
        paycheck.other_deductions = 25.0;
        let breakdown = paycheck.tax_breakdown(config);
        let bare = bi_weekly_job().tax_breakdown(config);
        assert_close(breakdown.total_deductions, bare.total_deductions + 100.0);
        assert_close(breakdown.net_pay, bare.net_pay - 100.0);
    }

    #[test]
    fn synthesized_transaction_inherits_schedule() {
        let config = current();
        let mut paycheck = bi_weekly_job();
        paycheck.end_date = Some(date(2024, 12, 31));
        let transaction = paycheck.to_transaction(config);
        assert_eq!(transaction.name, "Acme Paycheck (Net)");
        assert_eq!(transaction.kind, TransactionKind::Income);
        assert_eq!(transaction.frequency, Frequency::BiWeekly);
        assert_eq!(transaction.start_date, paycheck.start_date);
        assert_eq!(transaction.end_date, paycheck.end_date);
        assert_eq!(transaction.category, "income");
        assert_close(transaction.amount, paycheck.net_pay(config));
    }

    #[test]
    fn upcoming_pay_dates_step_from_the_anchor() {
        let paycheck = bi_weekly_job();
        let dates = paycheck.upcoming_pay_dates(date(2024, 2, 1), date(2024, 3, 1));
        assert_eq!(
            dates,
            vec![date(2024, 2, 2), date(2024, 2, 16), date(2024, 3, 1)]
        );
    }

    #[test]
    fn monthly_pay_dates_roll_over_month_ends() {
        let mut paycheck = bi_weekly_job();
        paycheck.frequency = PayFrequency::Monthly;
        paycheck.start_date = date(2024, 1, 31);
        let dates = paycheck.upcoming_pay_dates(date(2024, 1, 1), date(2024, 4, 30));
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 29),
                date(2024, 4, 29),
            ]
        );
    }

    #[test]
    fn pay_dates_respect_end_date_and_window() {
        let mut paycheck = bi_weekly_job();
        paycheck.end_date = Some(date(2024, 2, 2));
        let dates = paycheck.upcoming_pay_dates(date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 19), date(2024, 2, 2)]
        );

        let later = bi_weekly_job();
        assert!(later
            .upcoming_pay_dates(date(2023, 1, 1), date(2023, 12, 31))
            .is_empty());
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let start = date(2024, 1, 1);
        assert!(Paycheck::new(
            "",
            20.0,
            40.0,
            PayFrequency::Weekly,
            start,
            None,
            FilingStatus::Single,
            1,
            0.0,
            0.0,
        )
        .is_err());
        assert!(Paycheck::new(
            "Acme",
            0.0,
            40.0,
            PayFrequency::Weekly,
            start,
            None,
            FilingStatus::Single,
            1,
            0.0,
            0.0,
        )
        .is_err());
        assert!(Paycheck::new(
            "Acme",
            20.0,
            -1.0,
            PayFrequency::Weekly,
            start,
            None,
            FilingStatus::Single,
            1,
            0.0,
            0.0,
        )
        .is_err());
        assert!(Paycheck::new(
            "Acme",
            20.0,
            40.0,
            PayFrequency::Weekly,
            start,
            Some(date(2023, 12, 1)),
            FilingStatus::Single,
            1,
            0.0,
            0.0,
        )
        .is_err());
        assert!(Paycheck::new(
            "Acme",
            20.0,
            40.0,
            PayFrequency::Weekly,
            start,
            None,
            FilingStatus::Single,
            1,
            -10.0,
            0.0,
        )
        .is_err());
    }

    #[test]
    fn wire_format_matches_persistence_contract() {
        let mut paycheck = bi_weekly_job();
        paycheck.filing_status = FilingStatus::MarriedJoint;
        let value = serde_json::to_value(&paycheck).unwrap();
        assert_eq!(value["job_name"], json!("Acme"));
        assert_eq!(value["hourly_rate"], json!(20.0));
        assert_eq!(value["hours_per_week"], json!(40.0));
        assert_eq!(value["frequency"], json!("bi-weekly"));
        assert_eq!(value["start_date"], json!("2024-01-05"));
        assert_eq!(value["end_date"], serde_json::Value::Null);
        assert_eq!(value["filing_status"], json!("married_joint"));
        assert_eq!(value["allowances"], json!(1));
        assert_eq!(value["health_insurance"], json!(0.0));
        assert_eq!(value["other_deductions"], json!(0.0));
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let mut paycheck = bi_weekly_job();
        paycheck.end_date = Some(date(2025, 6, 30));
        paycheck.health_insurance = 50.0;
        let encoded = serde_json::to_string(&paycheck).unwrap();
        let decoded: Paycheck = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, paycheck);
    }
}
