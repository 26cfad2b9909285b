//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod report;
pub mod source;
pub mod store;
