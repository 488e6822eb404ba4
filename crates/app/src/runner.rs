//! Automation runner — one tick: eligibility → dedup → dispatch → ledger.
//!
//! The runner evaluates every enabled automation kind exactly once per
//! tick. Failures are contained at the smallest unit — recipient, then
//! kind, then tick — and converted into structured outcomes; nothing here
//! crashes the hosting process. A failed or skipped dispatch is retried on
//! a later tick purely because no `Sent` ledger entry exists — that is the
//! retry policy, and no separate retry queue should be introduced.

use coachhub_domain::automation::{
    AutomationKind, AutomationLogEntry, AutomationSetting, KindReport, TickReport,
};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::event::{AutomationEvent, AutomationEventType};
use coachhub_domain::payload::NotificationPayload;
use coachhub_domain::recipient::RecipientSnapshot;
use coachhub_domain::time::Timestamp;

use crate::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, EventPublisher,
    NotificationDispatcher, RecipientSource,
};

/// Executes automation ticks over injected ports.
///
/// Hold it in an `Arc` and share it between the scheduler loop and the
/// administrative force-tick endpoint; the internal guard keeps ticks
/// mutually exclusive either way.
pub struct AutomationRunner<SR, LR, RS, D, P, C> {
    pub(crate) settings_repo: SR,
    pub(crate) log_repo: LR,
    pub(crate) recipients: RS,
    pub(crate) dispatcher: D,
    publisher: P,
    clock: C,
    /// Default portal link embedded in payloads; a per-kind `portal_url`
    /// config value overrides it.
    portal_url: String,
    pub(crate) tick_guard: tokio::sync::Mutex<()>,
}

enum RecipientOutcome {
    Sent,
    Skipped,
    Failed,
}

impl<SR, LR, RS, D, P, C> AutomationRunner<SR, LR, RS, D, P, C>
where
    SR: AutomationSettingsRepository,
    LR: AutomationLogRepository,
    RS: RecipientSource,
    D: NotificationDispatcher,
    P: EventPublisher,
    C: Clock,
{
    /// Create a new runner over the given ports.
    pub fn new(
        settings_repo: SR,
        log_repo: LR,
        recipients: RS,
        dispatcher: D,
        publisher: P,
        clock: C,
        portal_url: impl Into<String>,
    ) -> Self {
        Self {
            settings_repo,
            log_repo,
            recipients,
            dispatcher,
            publisher,
            clock,
            portal_url: portal_url.into(),
            tick_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one tick, waiting for any in-flight tick to finish first.
    ///
    /// Used by the administrative force-tick endpoint: the caller always
    /// gets a report, and ticks never run concurrently.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the settings table cannot be read at
    /// all — the whole tick is abandoned then and retried at the next
    /// scheduled interval, never immediately.
    pub async fn tick(&self) -> Result<TickReport, CoachHubError> {
        let _guard = self.tick_guard.lock().await;
        self.run_tick().await
    }

    /// Run one tick unless a previous tick is still in flight.
    ///
    /// Used by the scheduler loop: a slow tick causes the next to be
    /// skipped rather than queued. Returns `None` when skipped.
    ///
    /// # Errors
    ///
    /// See [`AutomationRunner::tick`].
    pub async fn tick_if_idle(&self) -> Option<Result<TickReport, CoachHubError>> {
        match self.tick_guard.try_lock() {
            Ok(_guard) => Some(self.run_tick().await),
            Err(_) => {
                tracing::warn!("previous automation tick still running, skipping this one");
                None
            }
        }
    }

    async fn run_tick(&self) -> Result<TickReport, CoachHubError> {
        let started = self.clock.now();
        tracing::debug!("running automation tick");

        // Settings are read fresh every tick so administrator changes take
        // effect at the next tick without any cache invalidation.
        let settings = self.settings_repo.get_all().await?;

        let mut report = TickReport::new(started);
        for setting in settings.into_iter().filter(|s| s.enabled) {
            let kind_report = self.run_kind(&setting).await;
            report.kinds.insert(setting.kind, kind_report);
        }

        tracing::info!(
            sent = report.total_sent(),
            failed = report.total_failed(),
            kinds = report.kinds.len(),
            "automation tick complete"
        );
        let event = AutomationEvent::new(
            AutomationEventType::TickCompleted,
            serde_json::to_value(&report).unwrap_or_default(),
        );
        let _ = self.publisher.publish(event).await;

        Ok(report)
    }

    /// Process one enabled kind. Never returns an error: wholesale
    /// failures become the report's `error` field so other kinds proceed.
    async fn run_kind(&self, setting: &AutomationSetting) -> KindReport {
        let now = self.clock.now();

        let recipients = match self
            .recipients
            .eligible_recipients(setting.kind, setting, now)
            .await
        {
            Ok(recipients) => recipients,
            Err(err) => {
                tracing::error!(
                    kind = %setting.kind,
                    error = %err,
                    "failed to fetch eligible recipients, kind abandoned for this tick"
                );
                return KindReport::errored(err.to_string());
            }
        };

        tracing::debug!(
            kind = %setting.kind,
            eligible = recipients.len(),
            cooldown_days = setting.cooldown_days,
            "evaluating eligible recipients"
        );

        let mut out = KindReport::default();
        for recipient in &recipients {
            match self.process_recipient(setting, recipient, now).await {
                RecipientOutcome::Sent => out.sent += 1,
                RecipientOutcome::Skipped => out.skipped += 1,
                RecipientOutcome::Failed => out.failed += 1,
            }
        }

        // `last_run_at` records "the scheduler considered this kind", not
        // "every recipient succeeded" — updated regardless of outcomes.
        if let Err(err) = self
            .settings_repo
            .update_last_run(setting.kind, self.clock.now())
            .await
        {
            tracing::error!(kind = %setting.kind, error = %err, "failed to update last-run timestamp");
            out.error = Some(format!("last-run update failed: {err}"));
        }

        out
    }

    /// Process one recipient: cooldown check, dispatch, ledger write.
    /// Outcomes are independent — no recipient's result depends on
    /// another's.
    async fn process_recipient(
        &self,
        setting: &AutomationSetting,
        recipient: &RecipientSnapshot,
        now: Timestamp,
    ) -> RecipientOutcome {
        let kind = setting.kind;

        match self
            .log_repo
            .was_recently_notified(kind, &recipient.email, setting.cooldown_days, now)
            .await
        {
            Ok(true) => {
                tracing::debug!(kind = %kind, recipient = %recipient.email, "recently notified, skipping");
                return RecipientOutcome::Skipped;
            }
            Ok(false) => {}
            Err(err) => {
                // Without a trustworthy dedup answer we must not dispatch,
                // or an intermittent storage fault could double-send.
                tracing::error!(
                    kind = %kind,
                    recipient = %recipient.email,
                    error = %err,
                    "cooldown check failed, not dispatching"
                );
                self.append_failed(kind, &recipient.email, &err.to_string(), now)
                    .await;
                return RecipientOutcome::Failed;
            }
        }

        let payload = self.build_payload(setting, recipient, now);
        match self.dispatcher.send(&recipient.email, &payload).await {
            Ok(()) => {
                let details = serde_json::json!({
                    "client_name": recipient.display_name(),
                    "days_inactive": recipient.days_inactive(now),
                });
                match AutomationLogEntry::sent(kind, &recipient.email, details, now) {
                    Ok(entry) => {
                        if let Err(err) = self.log_repo.append(entry).await {
                            // The loudest failure class: with no Sent row the
                            // next tick cannot deduplicate this recipient.
                            tracing::error!(
                                kind = %kind,
                                recipient = %recipient.email,
                                error = %err,
                                "LEDGER WRITE FAILED after successful dispatch — duplicate send possible next tick"
                            );
                        }
                    }
                    Err(err) => {
                        tracing::error!(kind = %kind, error = %err, "could not construct ledger entry");
                    }
                }

                let event = AutomationEvent::new(
                    AutomationEventType::DispatchSent,
                    serde_json::json!({ "kind": kind, "recipient": recipient.email }),
                );
                let _ = self.publisher.publish(event).await;

                tracing::info!(kind = %kind, recipient = %recipient.email, "notification sent");
                RecipientOutcome::Sent
            }
            Err(err) => {
                tracing::warn!(
                    kind = %kind,
                    recipient = %recipient.email,
                    error = %err,
                    "dispatch failed, will retry next tick"
                );
                self.append_failed(kind, &recipient.email, &err.reason, now)
                    .await;

                let event = AutomationEvent::new(
                    AutomationEventType::DispatchFailed,
                    serde_json::json!({
                        "kind": kind,
                        "recipient": recipient.email,
                        "error": err.reason,
                    }),
                );
                let _ = self.publisher.publish(event).await;

                RecipientOutcome::Failed
            }
        }
    }

    /// Best-effort `Failed` ledger entry; a write failure here only loses
    /// audit detail, never correctness.
    async fn append_failed(&self, kind: AutomationKind, recipient: &str, error: &str, now: Timestamp) {
        match AutomationLogEntry::failed(kind, recipient, error, now) {
            Ok(entry) => {
                if let Err(err) = self.log_repo.append(entry).await {
                    tracing::error!(kind = %kind, recipient = %recipient, error = %err, "failed to record dispatch failure");
                }
            }
            Err(err) => {
                tracing::error!(kind = %kind, error = %err, "could not construct ledger entry");
            }
        }
    }

    fn build_payload(
        &self,
        setting: &AutomationSetting,
        recipient: &RecipientSnapshot,
        now: Timestamp,
    ) -> NotificationPayload {
        let client_name = recipient.display_name().to_string();
        let message = setting
            .config
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(String::from);
        let portal_url = setting
            .config
            .get("portal_url")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&self.portal_url)
            .to_string();
        // Never-logged-in clients have no inactivity figure; the cooldown
        // threshold is the floor of what we can truthfully claim.
        let days_inactive = recipient
            .days_inactive(now)
            .and_then(|days| u32::try_from(days).ok())
            .unwrap_or(setting.cooldown_days);

        match setting.kind {
            AutomationKind::LoginReminder => NotificationPayload::LoginReminder {
                client_name,
                days_inactive,
                message,
                portal_url,
            },
            AutomationKind::HomeworkAlert => NotificationPayload::HomeworkReady {
                client_name,
                message,
                portal_url,
            },
            AutomationKind::WeeklySummary => NotificationPayload::Custom {
                client_name,
                subject: "Your weekly progress".to_string(),
                message: message.unwrap_or_else(|| {
                    "Here is a look back at your week in the programme.".to_string()
                }),
                link: Some(portal_url),
                link_text: Some("Open your toolkit".to_string()),
            },
        }
    }
}
