//! Notification queue and background notifier

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use vc_shared::utils::phone::mask_phone_number;

use crate::domain::entities::verification_code::CodeId;

/// A code was issued and may be announced to interested parties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCodeEvent {
    pub code_id: CodeId,
    pub phone: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

/// Delivery channel for issued-code events
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one event; the error string is logged by the notifier
    async fn deliver(&self, event: &IssuedCodeEvent) -> Result<(), String>;
}

/// What happened to the side notification of an issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Accepted by the queue; delivery happens asynchronously
    Queued,
    /// Not accepted (queue full or notifier stopped)
    Dropped { reason: String },
    /// No notifier is attached to the engine
    Disabled,
}

/// Sending half handed to the verification engine
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<IssuedCodeEvent>,
}

impl NotificationQueue {
    /// Enqueue without waiting
    pub fn try_enqueue(&self, event: IssuedCodeEvent) -> NotificationStatus {
        match self.sender.try_send(event) {
            Ok(()) => NotificationStatus::Queued,
            Err(TrySendError::Full(event)) => {
                warn!(
                    phone = %mask_phone_number(&event.phone),
                    code_id = %event.code_id,
                    event = "notification_dropped",
                    "Notification queue full, dropping issued-code event"
                );
                NotificationStatus::Dropped {
                    reason: "queue full".to_string(),
                }
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    phone = %mask_phone_number(&event.phone),
                    code_id = %event.code_id,
                    event = "notification_dropped",
                    "Notifier stopped, dropping issued-code event"
                );
                NotificationStatus::Dropped {
                    reason: "notifier stopped".to_string(),
                }
            }
        }
    }
}

/// Delivery counters returned when the notifier finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifierReport {
    pub delivered: u64,
    pub failed: u64,
}

/// Background consumer of the notification queue
pub struct Notifier<N: NotificationSink + 'static> {
    sink: Arc<N>,
    receiver: mpsc::Receiver<IssuedCodeEvent>,
}

impl<N: NotificationSink + 'static> Notifier<N> {
    /// Create a notifier and its queue with room for `buffer` pending events
    pub fn new(sink: Arc<N>, buffer: usize) -> (Self, NotificationQueue) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sink, receiver }, NotificationQueue { sender })
    }

    /// Drain the queue until every `NotificationQueue` clone has been dropped
    pub async fn run(mut self) -> NotifierReport {
        let mut report = NotifierReport::default();

        while let Some(event) = self.receiver.recv().await {
            match self.sink.deliver(&event).await {
                Ok(()) => {
                    report.delivered += 1;
                    debug!(code_id = %event.code_id, "Delivered issued-code notification");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        phone = %mask_phone_number(&event.phone),
                        code_id = %event.code_id,
                        error = %e,
                        event = "notification_failed",
                        "Failed to deliver issued-code notification"
                    );
                }
            }
        }

        info!(
            delivered = report.delivered,
            failed = report.failed,
            "Notifier stopped"
        );
        report
    }

    /// Run the notifier as a tokio task
    pub fn spawn(self) -> JoinHandle<NotifierReport> {
        tokio::spawn(self.run())
    }
}
