//! Summa Core is a ledger calculation engine for sums in the pre-decimal
//! pounds/shillings/pence currency, written with early modern Roman numerals.
//! It offers the numeral codec, l/s/d arithmetic, the ledger tree with
//! path-addressed mutation, and the Summa file persistence format; rendering
//! and event handling belong to the embedding application.

pub mod currency;
pub mod errors;
pub mod ledger;
pub mod numeral;
pub mod persist;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults and
/// emits a startup info log. Safe to call more than once.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("summa_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();

        tracing::info!("Summa Core tracing initialized.");
    });
}
