//! Versioned tax policy constants, keyed by tax year.
//!
//! All calculator functions take these tables as data so a new year or
//! jurisdiction is a new `TaxConfig` value, not a code change.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::paycheck::FilingStatus;

/// One marginal bracket: `rate` applies to income up to `upper`
/// (`None` = unbounded top bracket).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bracket {
    pub upper: Option<f64>,
    pub rate: f64,
}

impl Bracket {
    pub const fn up_to(upper: f64, rate: f64) -> Self {
        Self {
            upper: Some(upper),
            rate,
        }
    }

    pub const fn above(rate: f64) -> Self {
        Self { upper: None, rate }
    }
}

/// FICA payroll-tax constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FicaRates {
    pub social_security_wage_base: f64,
    pub social_security_rate: f64,
    pub medicare_rate: f64,
    pub additional_medicare_rate: f64,
    pub additional_medicare_threshold: f64,
}

/// Complete policy table for one tax year and jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaxConfig {
    pub year: u16,
    pub jurisdiction: String,
    pub standard_deductions: BTreeMap<FilingStatus, f64>,
    pub allowance_value: f64,
    pub default_filing_status: FilingStatus,
    pub federal_brackets: BTreeMap<FilingStatus, Vec<Bracket>>,
    pub state_brackets: Vec<Bracket>,
    pub fica: FicaRates,
}

impl TaxConfig {
    /// Bracket table for a filing status, falling back to the default status
    /// when this year's table does not cover it.
    pub fn federal_brackets_for(&self, status: FilingStatus) -> &[Bracket] {
        self.federal_brackets
            .get(&status)
            .or_else(|| self.federal_brackets.get(&self.default_filing_status))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn standard_deduction_for(&self, status: FilingStatus) -> f64 {
        self.standard_deductions
            .get(&status)
            .or_else(|| self.standard_deductions.get(&self.default_filing_status))
            .copied()
            .unwrap_or(0.0)
    }

    /// Built-in table for the given year, if one ships with the crate.
    pub fn for_year(year: u16) -> Option<&'static TaxConfig> {
        BUILTIN.get(&year).copied()
    }
}

/// Latest built-in table; the default for all payroll math.
pub fn current() -> &'static TaxConfig {
    &TAX_YEAR_2023
}

static TAX_YEAR_2023: Lazy<TaxConfig> = Lazy::new(tax_year_2023);

static BUILTIN: Lazy<BTreeMap<u16, &'static TaxConfig>> =
    Lazy::new(|| BTreeMap::from([(2023, &*TAX_YEAR_2023)]));

/// 2023 US federal tables plus Virginia state brackets.
fn tax_year_2023() -> TaxConfig {
    TaxConfig {
        year: 2023,
        jurisdiction: "US-VA".into(),
        standard_deductions: BTreeMap::from([
            (FilingStatus::Single, 13_850.0),
            (FilingStatus::MarriedJoint, 27_700.0),
            (FilingStatus::MarriedSeparate, 13_850.0),
            (FilingStatus::HeadOfHousehold, 20_800.0),
        ]),
        allowance_value: 4_300.0,
        default_filing_status: FilingStatus::Single,
        federal_brackets: BTreeMap::from([
            (
                FilingStatus::Single,
                vec![
                    Bracket::up_to(10_275.0, 0.10),
                    Bracket::up_to(41_775.0, 0.12),
                    Bracket::up_to(89_450.0, 0.22),
                    Bracket::up_to(190_750.0, 0.24),
                    Bracket::up_to(364_200.0, 0.32),
                    Bracket::up_to(462_550.0, 0.35),
                    Bracket::above(0.37),
                ],
            ),
            (
                FilingStatus::MarriedJoint,
                vec![
                    Bracket::up_to(20_550.0, 0.10),
                    Bracket::up_to(83_350.0, 0.12),
                    Bracket::up_to(178_850.0, 0.22),
                    Bracket::up_to(340_100.0, 0.24),
                    Bracket::up_to(431_900.0, 0.32),
                    Bracket::up_to(647_850.0, 0.35),
                    Bracket::above(0.37),
                ],
            ),
        ]),
        state_brackets: vec![
            Bracket::up_to(3_000.0, 0.02),
            Bracket::up_to(5_000.0, 0.03),
            Bracket::up_to(17_000.0, 0.05),
            Bracket::above(0.0575),
        ],
        fica: FicaRates {
            social_security_wage_base: 160_200.0,
            social_security_rate: 0.062,
            medicare_rate: 0.0145,
            additional_medicare_rate: 0.009,
            additional_medicare_threshold: 200_000.0,
        },
    }
}
