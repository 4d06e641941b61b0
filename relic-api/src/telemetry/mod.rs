//! RELIC Telemetry - Logging Infrastructure
//!
//! Structured logging through `tracing`. Request spans come from
//! `tower_http::trace::TraceLayer` in the router.

pub mod tracer;

pub use tracer::{init_tracer, LogFormat, TelemetryConfig};
