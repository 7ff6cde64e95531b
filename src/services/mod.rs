// Request capture logic, kept free of routing and storage concerns

pub mod capture;

pub use capture::{build_new_webhook, InboundRequest, CAPTURE_PREFIX};
