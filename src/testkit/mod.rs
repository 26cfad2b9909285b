//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] — [`ScriptedSource`](source::ScriptedSource), a canned
//!   [`RecordSource`](crate::port::outbound::source::RecordSource).
//! - [`store`] — [`MemoryStore`](store::MemoryStore), an in-memory
//!   [`IngestStore`](crate::port::outbound::store::IngestStore).
//! - [`fixtures`] — TheSportsDB-shaped JSON records.
//! - [`config`] — Canonical test configuration.

pub mod config;
pub mod fixtures;
pub mod source;
pub mod store;
