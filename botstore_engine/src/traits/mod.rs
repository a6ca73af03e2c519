//! The seams between the engine and the outside world. The server binds these to real HTTP clients; tests bind them
//! to fakes and mocks.
mod payment_gateway;
mod provisioning_panel;

pub use payment_gateway::{DepositRequest, GatewayDeposit, PaymentGateway, PaymentGatewayError};
pub use provisioning_panel::{NewAccount, PanelAccount, PanelError, PanelServer, ProvisioningPanel, ServerSpec};
