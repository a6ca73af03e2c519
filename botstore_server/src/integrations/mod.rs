//! Adapters that bind the remote API clients to the engine's provider traits.
mod atlantic;
mod pterodactyl;

pub use atlantic::{gateway_error, AtlanticGateway};
pub use pterodactyl::{panel_error, PterodactylPanel};
