#![doc(test(attr(deny(warnings))))]

//! Budgie Core provides the calendar aggregation, payroll tax, and balance
//! projection engine behind the Budgie budgeting front-ends.

pub mod domain;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod storage;
pub mod tax;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budgie Core tracing initialized.");
    });
}
