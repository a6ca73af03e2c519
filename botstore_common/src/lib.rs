//! Value types shared by the storefront crates.
mod rupiah;

pub mod helpers;
pub mod op;
mod secret;

pub use rupiah::{Rupiah, RupiahConversionError, RUPIAH_CURRENCY_CODE};
pub use secret::Secret;
