//! One-shot reminder scheduler.
//!
//! Each armed reminder is a detached tokio task sleeping on the runtime timer, so
//! long delays cost a timer entry rather than a thread. A reminder fires exactly
//! once; there is no cancellation and no retry.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

use crate::{domain::ChatId, messaging::port::MessagingPort, texts};

/// Everything a reminder needs at fire time, captured when it is armed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderRequest {
    pub chat_id: ChatId,
    pub text: String,
    pub delay_seconds: u64,
}

/// Bookkeeping handle for an armed reminder.
///
/// Dropping the handle detaches the task; the reminder still fires.
#[derive(Debug)]
pub struct ReminderHandle {
    armed_at: DateTime<Utc>,
    delay: Duration,
    task: JoinHandle<()>,
}

impl ReminderHandle {
    pub fn armed_at(&self) -> DateTime<Utc> {
        self.armed_at
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True once the reminder has been delivered (or delivery has failed).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Clone)]
pub struct ReminderScheduler {
    messenger: Arc<dyn MessagingPort>,
}

impl ReminderScheduler {
    pub fn new(messenger: Arc<dyn MessagingPort>) -> Self {
        Self { messenger }
    }

    /// Arm a reminder. Must be called from within a tokio runtime.
    ///
    /// Returns immediately; even a zero delay is delivered from the spawned task,
    /// never inline.
    pub fn arm(&self, req: ReminderRequest) -> ReminderHandle {
        let delay = Duration::from_secs(req.delay_seconds);
        let armed_at = Utc::now();
        info!(
            chat_id = %req.chat_id,
            delay_seconds = req.delay_seconds,
            armed_at = %armed_at.to_rfc3339(),
            "reminder armed"
        );

        let messenger = self.messenger.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            let text = texts::reminder_fired(&req.text);
            match messenger.send_text(req.chat_id, &text).await {
                Ok(()) => info!(chat_id = %req.chat_id, "reminder delivered"),
                Err(e) => error!(chat_id = %req.chat_id, "reminder delivery failed: {e}"),
            }
        });

        ReminderHandle {
            armed_at,
            delay,
            task,
        }
    }
}
