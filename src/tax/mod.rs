//! Progressive tax math over data-driven policy tables.

pub mod tables;

pub use tables::{Bracket, FicaRates, TaxConfig};

use crate::domain::paycheck::FilingStatus;

/// Social Security and Medicare components of annual payroll tax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FicaTaxes {
    pub social_security: f64,
    pub medicare: f64,
}

impl FicaTaxes {
    pub fn total(&self) -> f64 {
        self.social_security + self.medicare
    }
}

/// Annual federal income tax after the standard deduction and allowances.
pub fn federal_income_tax(
    config: &TaxConfig,
    annual_income: f64,
    status: FilingStatus,
    allowances: u32,
) -> f64 {
    let deduction =
        config.standard_deduction_for(status) + f64::from(allowances) * config.allowance_value;
    let taxable = (annual_income - deduction).max(0.0);
    progressive_tax(config.federal_brackets_for(status), taxable)
}

/// Annual state income tax; the flat bracket table applies to gross income
/// with no deductions.
pub fn state_income_tax(config: &TaxConfig, annual_income: f64) -> f64 {
    progressive_tax(&config.state_brackets, annual_income)
}

/// Annual FICA payroll taxes. Social Security saturates at the wage base;
/// Medicare adds a surtax on income above the high-earner threshold.
pub fn fica_taxes(config: &TaxConfig, annual_gross: f64) -> FicaTaxes {
    let rates = &config.fica;
    let social_security =
        annual_gross.min(rates.social_security_wage_base) * rates.social_security_rate;
    let mut medicare = annual_gross * rates.medicare_rate;
    if annual_gross > rates.additional_medicare_threshold {
        medicare +=
            (annual_gross - rates.additional_medicare_threshold) * rates.additional_medicare_rate;
    }
    FicaTaxes {
        social_security,
        medicare,
    }
}

/// Standard marginal accumulation: each bracket taxes the slice of income
/// between the previous boundary and `min(taxable, upper)`, stopping once the
/// taxable income is exhausted.
fn progressive_tax(brackets: &[Bracket], taxable: f64) -> f64 {
    let mut tax = 0.0;
    let mut previous = 0.0;
    for bracket in brackets {
        if taxable <= previous {
            break;
        }
        let upper = bracket.upper.unwrap_or(f64::INFINITY);
        tax += (taxable.min(upper) - previous) * bracket.rate;
        if taxable <= upper {
            break;
        }
        previous = upper;
    }
    tax
}
