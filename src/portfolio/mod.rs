//! Crypto holdings valued through an injected, best-effort price source.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::time::Clock;

/// Capability for live price lookups.
///
/// Implementations are best effort: they bound their own timeouts and never
/// fail. Symbols that cannot be priced are simply absent from the returned
/// map, so downstream arithmetic degrades to "no price data".
pub trait PriceSource: Send + Sync {
    fn fetch_prices(&self, symbols: &[String]) -> HashMap<String, f64>;
}

/// Price source that resolves nothing; useful offline and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrices;

impl PriceSource for NoPrices {
    fn fetch_prices(&self, _symbols: &[String]) -> HashMap<String, f64> {
        HashMap::new()
    }
}

/// A single crypto position. `current_price` is refreshed at runtime and
/// defaults to zero until a source resolves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CryptoHolding {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_price: f64,
}

impl CryptoHolding {
    pub fn purchase_value(&self) -> f64 {
        self.amount * self.purchase_price
    }

    pub fn current_value(&self) -> f64 {
        self.amount * self.current_price
    }

    pub fn profit_loss(&self) -> f64 {
        self.current_value() - self.purchase_value()
    }

    pub fn profit_loss_percentage(&self) -> f64 {
        let cost = self.purchase_value();
        if cost == 0.0 {
            0.0
        } else {
            self.profit_loss() / cost * 100.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CryptoPortfolio {
    #[serde(default)]
    pub holdings: Vec<CryptoHolding>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CryptoPortfolio {
    pub fn add_holding(&mut self, holding: CryptoHolding) -> Uuid {
        let id = holding.id;
        self.holdings.push(holding);
        id
    }

    pub fn remove_holding(&mut self, id: Uuid) -> Option<CryptoHolding> {
        let index = self.holdings.iter().position(|holding| holding.id == id)?;
        Some(self.holdings.remove(index))
    }

    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(CryptoHolding::current_value).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.holdings
            .iter()
            .map(CryptoHolding::purchase_value)
            .sum()
    }

    pub fn total_profit_loss(&self) -> f64 {
        self.total_value() - self.total_cost()
    }

    pub fn total_profit_loss_percentage(&self) -> f64 {
        let cost = self.total_cost();
        if cost == 0.0 {
            0.0
        } else {
            self.total_profit_loss() / cost * 100.0
        }
    }

    /// Applies whatever prices the source could resolve; holdings whose
    /// symbol is missing from the result keep their previous price.
    pub fn update_prices(&mut self, source: &dyn PriceSource, clock: &dyn Clock) {
        if self.holdings.is_empty() {
            return;
        }
        let symbols: Vec<String> = self
            .holdings
            .iter()
            .map(|holding| holding.symbol.clone())
            .collect();
        let prices = source.fetch_prices(&symbols);
        debug!(
            requested = symbols.len(),
            resolved = prices.len(),
            "crypto price refresh"
        );
        for holding in &mut self.holdings {
            if let Some(price) = prices.get(&holding.symbol) {
                holding.current_price = *price;
            }
        }
        self.last_updated = Some(clock.now());
    }
}
