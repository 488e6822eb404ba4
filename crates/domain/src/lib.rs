//! # coachhub-domain
//!
//! Pure domain model for the coachhub automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automation kinds** (login reminders, homework alerts, …) and
//!   their per-kind **settings** (enabled flag, cooldown, opaque config)
//! - Define the **dispatch ledger** (append-only log of sent/failed attempts,
//!   the deduplication source of truth)
//! - Define **notification payloads** (tagged variants, one per kind, so the
//!   dispatcher can validate shape before rendering)
//! - Define **recipient snapshots** (the ephemeral eligibility view computed
//!   each tick) and **notification records** (the portal-facing feed)
//! - Define **events** emitted by the scheduler for observers
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod event;
pub mod notification;
pub mod payload;
pub mod recipient;
