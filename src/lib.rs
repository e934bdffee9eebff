//! Service hub backend library.
//!
//! HTTP API for a services-and-reviews listing site: session tokens in
//! cookies, service and review CRUD over a schemaless document store, and
//! aggregate platform statistics. The binary entry point in `main.rs` wires
//! [`app::router`] to a listener; everything else lives here so the
//! integration tests can drive the real router in-process.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod store;
