mod expiry;
mod mocks;
mod orders;
mod storefront;
mod webhook;
