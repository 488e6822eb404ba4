//! # coachhub-adapter-email-lettre
//!
//! SMTP implementation of the `NotificationDispatcher` port using
//! [lettre](https://docs.rs/lettre)'s async transport.
//!
//! ## Responsibilities
//! - Render [`NotificationPayload`](coachhub_domain::payload::NotificationPayload)
//!   variants into subject + HTML body (no free-form template strings)
//! - Deliver via `AsyncSmtpTransport<Tokio1Executor>` with STARTTLS
//! - Record a durable `NotificationRecord` for the portal feed after a
//!   successful send
//!
//! "Sent" means accepted by the SMTP transport; bounce handling and
//! delivery confirmation are out of scope.

mod config;
mod dispatcher;
mod template;

pub use config::SmtpConfig;
pub use dispatcher::SmtpNotificationDispatcher;
pub use template::RenderedEmail;
