//! Application layer: one service per ingest or reporting command.

pub mod ingest;
