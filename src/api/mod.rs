//! API Layer
//!
//! Route table, authenticated request issuance and response decoding.

mod issuer;
mod payload;
pub mod routes;

pub use issuer::{ApiRequest, AuthRequirement, RequestIssuer};
pub use payload::{decode_json, ListPayload};
pub use routes::Scope;
