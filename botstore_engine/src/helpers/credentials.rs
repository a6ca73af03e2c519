use botstore_common::Secret;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::db_types::OrderId;

pub const PASSWORD_LENGTH: usize = 12;

/// Generates an order id of the form `WS<unix millis><0-999>`.
///
/// Ids are not guaranteed unique on their own. The store regenerates on collision.
pub fn generate_order_id() -> OrderId {
    let suffix = rand::thread_rng().gen_range(0..1000);
    OrderId(format!("WS{}{suffix}", Utc::now().timestamp_millis()))
}

pub fn generate_password() -> Secret<String> {
    let password = rand::thread_rng().sample_iter(&Alphanumeric).take(PASSWORD_LENGTH).map(char::from).collect();
    Secret::new(password)
}
