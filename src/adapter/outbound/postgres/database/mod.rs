//! Postgres database modules.
//!
//! Provides connection management, schema definitions, and Diesel model
//! types for the core rugby schema.

pub mod connection;
pub mod model;
pub mod schema;
