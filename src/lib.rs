#![doc(test(attr(deny(warnings))))]

//! Quota Core offers the distribution, payment-recording, and aggregation
//! primitives behind condominium quota administration workflows.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Quota Core tracing initialized.");
    });
}
