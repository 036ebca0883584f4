//! Fan-out of formatted alarms to every recipient

use crate::alarm::AlarmEvent;
use crate::format::render_alarm;
use crate::notifier::Notifier;

/// What happened to one reading × recipient pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed(String),
    SkippedMissingChatId,
}

/// Record of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Position of the reading in `device_data`
    pub reading_index: usize,
    pub recipient_name: String,
    pub chat_id: Option<String>,
    pub status: DeliveryStatus,
}

/// Summary counts over a batch of outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl DeliverySummary {
    pub fn from_outcomes(outcomes: &[DeliveryOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.status {
                    DeliveryStatus::Delivered => summary.delivered += 1,
                    DeliveryStatus::Failed(_) => summary.failed += 1,
                    DeliveryStatus::SkippedMissingChatId => summary.skipped += 1,
                }
                summary
            })
    }
}

/// Deliver every non-negative reading to every recipient, in input order.
///
/// Failures are logged and recorded; they never stop the batch.
pub async fn dispatch(event: &AlarmEvent, notifier: &dyn Notifier) -> Vec<DeliveryOutcome> {
    let mut outcomes = Vec::new();

    for (reading_index, reading) in event.device_data.iter().enumerate() {
        if reading.is_negative() {
            tracing::debug!(
                "Skipping reading {} with negative value {:?}",
                reading_index,
                reading.value
            );
            continue;
        }

        let text = render_alarm(&event.site_name, reading);

        for recipient in &event.recipients {
            let recipient_name = recipient.display_name().to_string();

            let Some(chat_id) = recipient.chat_id() else {
                tracing::warn!("Missing chat ID for recipient: {}", recipient_name);
                outcomes.push(DeliveryOutcome {
                    reading_index,
                    recipient_name,
                    chat_id: None,
                    status: DeliveryStatus::SkippedMissingChatId,
                });
                continue;
            };

            let status = match notifier.send(&chat_id, &text).await {
                Ok(()) => DeliveryStatus::Delivered,
                Err(e) => {
                    tracing::error!(
                        "Failed to send {} message to {}: {}",
                        notifier.type_name(),
                        chat_id,
                        e
                    );
                    DeliveryStatus::Failed(e.to_string())
                }
            };

            outcomes.push(DeliveryOutcome {
                reading_index,
                recipient_name,
                chat_id: Some(chat_id),
                status,
            });
        }
    }

    outcomes
}
