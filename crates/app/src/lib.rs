//! # coachhub-app
//!
//! Application layer — use-cases, **port definitions** (traits), and the
//! automation core.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AutomationSettingsRepository` — per-kind settings rows
//!   - `AutomationLogRepository` — the append-only dispatch ledger
//!   - `RecipientSource` — per-kind eligibility snapshots
//!   - `NotificationDispatcher` — email delivery
//!   - `NotificationStore` — the portal-facing notification feed
//!   - `EventPublisher` — fire-and-forget observer events
//!   - `Clock` — injectable time source for deterministic tests
//! - Host the **`AutomationRunner`** (one tick: eligibility → dedup →
//!   dispatch → ledger → last-run) and the **`Scheduler`** (timer
//!   lifecycle around the runner)
//! - Provide use-case services for the administrative surface
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `coachhub-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and timers). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod runner;
pub mod scheduler;
pub mod services;
