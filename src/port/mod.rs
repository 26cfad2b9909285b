//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the ingest services and the outside world:
//!
//! ```text
//!                 ┌───────────────────────┐
//!                 │  application::ingest  │
//!                 └──────────┬────────────┘
//!            ┌───────────────┼────────────────┐
//!            ▼               ▼                ▼
//!     ┌────────────┐  ┌─────────────┐  ┌─────────────┐
//!     │RecordSource│  │ IngestStore │  │ReportReader │
//!     │   (TSDB)   │  │ (Postgres)  │  │ (Postgres)  │
//!     └────────────┘  └─────────────┘  └─────────────┘
//! ```

pub mod outbound;
