//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! server, client and transport produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout via the fmt layer
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured filter
//! - Metrics calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
