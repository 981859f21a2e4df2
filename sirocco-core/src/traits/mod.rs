//! Endpoint trait definitions.

mod endpoint;

pub use endpoint::{Credentials, EndpointResponse, SpotEndpoint};
