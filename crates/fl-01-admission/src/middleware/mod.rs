//! Tower integration for the Admission Controller.
//!
//! Layer order in the API stack: Request → Auth (external) → Admission → Handler.
//! The auth layer places a [`shared_types::CallerIdentity`] in the request
//! extensions; anonymous traffic has none and is keyed by client address.

pub mod client_ip;
pub mod headers;
pub mod layer;

pub use client_ip::extract_client_ip;
pub use headers::{apply_rate_limit_headers, rate_limited_response};
pub use layer::{AdmissionLayer, AdmissionService};
