//! Outbound adapters (driven side).

pub mod postgres;
pub mod tsdb;
