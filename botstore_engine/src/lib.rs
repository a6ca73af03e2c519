//! Bot Store Engine
//!
//! The engine contains the provider-agnostic core of the bot-hosting storefront: a customer picks a hosting package,
//! pays for it with a QRIS deposit, and once the payment gateway confirms the payment a server is created for them on
//! a hosting panel.
//!
//! The library is divided into these sections:
//! 1. Data types ([`mod@db_types`]) and the fixed package catalog ([`mod@catalog`]).
//! 2. Storage ([`mod@storage`]). Orders and panel users live in a [`DocumentStore`], which persists to JSON documents
//!    or, if the data directory is not writable, only to memory.
//! 3. The seams to the outside world ([`mod@traits`]): a [`PaymentGateway`] that opens deposits and a
//!    [`ProvisioningPanel`] that creates accounts and servers. The engine never talks HTTP itself.
//! 4. The public API. [`OrderFlowApi`] drives the order state machine and is what a server should use. It is built
//!    from a [`PaymentApi`] and a [`ProvisioningApi`].
pub mod catalog;
pub mod db_types;
pub mod helpers;
pub mod storage;
pub mod traits;

mod api;
mod order_locks;

pub use api::{
    errors::{OrderFlowError, PaymentApiError, ProvisioningError},
    fallback::{self, FallbackPolicy, FallbackPolicyParseError},
    order_flow_api::{OrderFlowApi, EXPIRED_NOTE},
    order_objects,
    payment_api::{PaymentApi, DEFAULT_PAYMENT_WINDOW_MINUTES},
    provisioning_api::{ProvisioningApi, DEFAULT_CONTACT_DOMAIN},
};
pub use order_locks::OrderLocks;
pub use storage::{DocumentStore, OrderStore, StorageError, StorageMedium};
pub use traits::{PaymentGateway, ProvisioningPanel};
