pub mod errors;
pub mod fallback;
pub mod order_flow_api;
pub mod order_objects;
pub mod payment_api;
pub mod provisioning_api;
