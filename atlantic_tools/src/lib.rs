//! Thin client for the Atlantic H2H payment gateway.
//!
//! Only the QRIS deposit flow is implemented. Payment confirmation arrives asynchronously via the gateway webhook,
//! which is handled by the storefront server rather than this crate.
mod api;
mod config;
mod error;

pub mod data_objects;

pub use api::AtlanticApi;
pub use config::AtlanticConfig;
pub use data_objects::DepositResponse;
pub use error::AtlanticApiError;
