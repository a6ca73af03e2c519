mod credentials;
mod owner_name;

pub use credentials::{generate_order_id, generate_password, PASSWORD_LENGTH};
pub use owner_name::{OwnerName, OwnerNameError};
