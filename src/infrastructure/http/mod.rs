//! HTTP transport used by the dashboard gateway to reach the forwarding
//! endpoint.

mod reqwest_transport;
mod transport;

pub use reqwest_transport::ReqwestTransport;
pub(crate) use reqwest_transport::API_KEY_HEADER;
pub use transport::{GatewayTransport, TransportResponse};

#[cfg(test)]
pub use transport::MockGatewayTransport;
