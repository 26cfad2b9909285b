//! TheSportsDB adapter: HTTP client, response records and typed queries.

pub mod api;
pub mod client;
pub mod dto;
pub mod settings;

pub use api::TsdbApi;
pub use client::TsdbClient;
pub use settings::{RetryPolicy, TsdbSettings};
