//! Domain entities and the recurrence rules that drive calendar matching.

pub mod common;
pub mod paycheck;
pub mod recurrence;
pub mod savings;
pub mod transaction;

pub use common::{Identifiable, NamedEntity};
pub use paycheck::{FilingStatus, PayFrequency, Paycheck, TaxBreakdown};
pub use recurrence::Frequency;
pub use savings::SavingsAccount;
pub use transaction::{Transaction, TransactionKind};
