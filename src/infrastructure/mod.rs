//! Infrastructure: configuration, logging, and the local data directory.

pub mod config;
pub mod data_dir;
