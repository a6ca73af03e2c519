//! Client for the subset of the Pterodactyl application API needed to hand a customer a bot server: creating and
//! looking up panel users, and creating servers for them.
mod api;
mod config;
mod error;

pub mod data_objects;

pub use api::PterodactylApi;
pub use config::PterodactylConfig;
pub use error::PterodactylApiError;
