//! # Bot store server
//! This module hosts the HTTP server for the bot-hosting storefront. It is responsible for:
//! * Accepting orders for hosting packages and handing back a QRIS payment code.
//! * Receiving payment notifications from the Atlantic payment gateway and driving the order state machine. A paid
//!   order gets a server provisioned on the Pterodactyl panel.
//! * Reporting order status, including the panel credentials once the server is ready.
//! * Failing pending orders whose payment window has closed (see [expiry_worker]).
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that also reports the storage medium in use.
//! * `/packages`: The hosting package catalog.
//! * `/orders`: `POST` a new order.
//! * `/orders/{id}`: Order status and, once provisioned, the server details.
//! * `/payments/webhook`: The webhook route for payment notifications. Requests must carry a valid `X-ATL-Signature`
//!   header.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod expiry_worker;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
