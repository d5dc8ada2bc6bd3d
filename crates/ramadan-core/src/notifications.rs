//! Turning crossings into user-facing alerts.
//!
//! The engine only reports that a crossing happened. Whether that shows a
//! notification, plays a sound, both, or neither is decided here from the
//! user's settings. Delivery itself belongs to a platform adapter that
//! implements [`NotificationSink`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::countdown::{AnchorEvent, CountdownSnapshot};
use crate::schedule::Prayer;
use crate::storage::NotificationsConfig;

/// What triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name")]
pub enum AlertSource {
    Anchor(AnchorEvent),
    Prayer(Prayer),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub source: AlertSource,
    pub title: String,
    pub body: String,
    /// Show a visible notification.
    pub notify: bool,
    /// Sound to play, if any.
    pub sound: Option<String>,
}

/// Platform-specific notification adapters implement this trait.
pub trait NotificationSink {
    fn deliver(&self, alert: &Alert);
}

pub struct AlertDispatcher;

impl AlertDispatcher {
    /// Alerts owed for one snapshot under the given settings.
    ///
    /// Notification and sound toggles are independent; an alert is only
    /// produced when at least one of them is on.
    pub fn alerts_for(snapshot: &CountdownSnapshot, settings: &NotificationsConfig) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for countdown in snapshot.countdowns.iter().filter(|c| c.just_crossed) {
            let (title, body, notify, sound) = match countdown.anchor {
                AnchorEvent::Iftar => (
                    "Iftar Time",
                    "Time to break your fast",
                    settings.notify_iftar,
                    settings.sound_iftar,
                ),
                AnchorEvent::SuhoorEnd => (
                    "Suhoor Ends",
                    "Time to stop eating",
                    settings.notify_suhoor,
                    settings.sound_suhoor,
                ),
            };
            if notify || sound {
                alerts.push(Alert {
                    source: AlertSource::Anchor(countdown.anchor),
                    title: title.to_string(),
                    body: body.to_string(),
                    notify,
                    sound: sound.then(|| settings.sound.clone()),
                });
            }
        }

        if settings.notify_prayer {
            for prayer in snapshot
                .crossed_prayers
                .iter()
                .filter(|p| p.is_call_to_prayer())
            {
                alerts.push(Alert {
                    source: AlertSource::Prayer(*prayer),
                    title: prayer.to_string(),
                    body: format!("It is time for {prayer}"),
                    notify: true,
                    sound: None,
                });
            }
        }

        alerts
    }

    /// Deliver every alert owed for `snapshot`. Returns how many were sent.
    pub fn dispatch(
        snapshot: &CountdownSnapshot,
        settings: &NotificationsConfig,
        sink: &dyn NotificationSink,
    ) -> usize {
        let alerts = Self::alerts_for(snapshot, settings);
        for alert in &alerts {
            debug!(title = %alert.title, notify = alert.notify, sound = ?alert.sound, "delivering alert");
            sink.deliver(alert);
        }
        alerts.len()
    }
}
