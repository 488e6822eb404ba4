//! # coachhub-adapter-http-axum
//!
//! HTTP adapter using [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the administrative REST API: automation settings read/write,
//!   dispatch-ledger reads, forced out-of-band ticks
//! - Serve the portal notification feed
//! - Stream automation events over SSE
//!
//! ## Dependency rule
//! Depends on `coachhub-app` (for services, runner, and port traits) and
//! `coachhub-domain` (for domain types). The `app` and `domain` crates
//! must never reference this adapter.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
