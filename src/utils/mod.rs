// Utility functions

pub mod request_info;

pub use request_info::{client_ip, forwarded_ip_address};
