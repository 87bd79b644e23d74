//! Check-in and check-out state machine.

pub mod service;

pub use service::{CheckinRequest, CheckinService, CheckoutRequest};
