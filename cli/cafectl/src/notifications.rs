//! Ephemeral notifications driven by bus traffic.
//!
//! The center listens for `api:success`, `api:error`, `app:info` and
//! `app:warning`, keeps the visible list in arrival order and removes each
//! entry 5 seconds after it was created unless it is dismissed first.
//!
//! The list is not capped; a burst of events faster than the expiry grows it
//! until the timers catch up.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use cafe_events::{event_names, handler, EventBus, Handler, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use uuid::Uuid;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

/// Called once for every notification as it is created.
pub type Presenter = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification center must be mounted inside a Tokio runtime")]
    NoRuntime,
}

/// One visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        }
    }
}

struct Entry {
    notification: Notification,
    expiry: JoinHandle<()>,
}

type Entries = Mutex<Vec<Entry>>;

fn lock(entries: &Entries) -> MutexGuard<'_, Vec<Entry>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn take(entries: &Entries, id: Uuid) -> Option<Entry> {
    let mut list = lock(entries);
    let pos = list.iter().position(|e| e.notification.id == id)?;
    Some(list.remove(pos))
}

/// Live notification list bound to an event bus.
///
/// Dropping the center unsubscribes from the bus and cancels pending expiries.
pub struct NotificationCenter {
    bus: Arc<EventBus<String>>,
    entries: Arc<Entries>,
    subscriptions: Vec<(&'static str, Handler<String>)>,
}

impl NotificationCenter {
    /// Subscribe to the notification events on `bus`.
    pub fn mount(
        bus: Arc<EventBus<String>>,
        presenter: Option<Presenter>,
    ) -> Result<Self, NotifyError> {
        let runtime = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;
        let entries: Arc<Entries> = Arc::new(Mutex::new(Vec::new()));

        let subscriptions = event_names::NOTIFICATION_EVENTS
            .into_iter()
            .map(|event| {
                let severity = Severity::for_event(event);
                let entries = Arc::downgrade(&entries);
                let runtime = runtime.clone();
                let presenter = presenter.clone();

                let h: Handler<String> = handler(move |message: &String| {
                    let Some(entries) = entries.upgrade() else {
                        return;
                    };
                    let notification = Notification::new(message.clone(), severity);
                    insert(&entries, &runtime, notification.clone());
                    if let Some(present) = &presenter {
                        present(&notification);
                    }
                });
                bus.subscribe(event, Arc::clone(&h));
                (event, h)
            })
            .collect();

        debug!("notification center mounted");
        Ok(Self {
            bus,
            entries,
            subscriptions,
        })
    }

    /// Current notifications, oldest first.
    pub fn visible(&self) -> Vec<Notification> {
        lock(&self.entries)
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    /// Remove a notification now. Returns false if it is already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        match take(&self.entries, id) {
            Some(entry) => {
                entry.expiry.abort();
                trace!(%id, "notification dismissed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append a notification and schedule its removal.
fn insert(entries: &Arc<Entries>, runtime: &Handle, notification: Notification) {
    let id = notification.id;
    let weak: Weak<Entries> = Arc::downgrade(entries);

    // Held across the spawn so the expiry cannot run before the push.
    let mut list = lock(entries);
    let expiry = runtime.spawn(async move {
        tokio::time::sleep(NOTIFICATION_TTL).await;
        if let Some(entries) = weak.upgrade() {
            if take(&entries, id).is_some() {
                trace!(%id, "notification expired");
            }
        }
    });
    list.push(Entry {
        notification,
        expiry,
    });
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        for (event, h) in &self.subscriptions {
            self.bus.unsubscribe(event, h);
        }
        for entry in lock(&self.entries).drain(..) {
            entry.expiry.abort();
        }
        debug!("notification center unmounted");
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("visible", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> (Arc<EventBus<String>>, NotificationCenter) {
        let bus = Arc::new(EventBus::new());
        let center = NotificationCenter::mount(Arc::clone(&bus), None).unwrap();
        (bus, center)
    }

    #[test]
    fn test_mount_requires_runtime() {
        let bus = Arc::new(EventBus::new());
        let result = NotificationCenter::mount(bus, None);
        assert!(matches!(result, Err(NotifyError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_immediately_and_expires() {
        let (bus, center) = mounted();

        bus.publish(event_names::API_SUCCESS, "Guardado exitosamente.".to_string());

        let visible = center.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].severity, Severity::Success);
        assert_eq!(visible[0].message, "Guardado exitosamente.");

        tokio::time::sleep(NOTIFICATION_TTL - Duration::from_millis(1)).await;
        assert_eq!(center.len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_is_immediate_and_idempotent() {
        let (bus, center) = mounted();
        bus.publish(event_names::API_ERROR, "boom".to_string());
        let id = center.visible()[0].id;

        assert!(center.dismiss(id));
        assert!(center.is_empty());

        tokio::time::sleep(NOTIFICATION_TTL * 2).await;
        assert!(center.is_empty());
        assert!(!center.dismiss(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insertion_order_and_independent_expiry() {
        let (bus, center) = mounted();

        bus.publish(event_names::APP_INFO, "first".to_string());
        tokio::time::sleep(Duration::from_millis(3000)).await;
        bus.publish(event_names::APP_WARNING, "second".to_string());

        let visible = center.visible();
        assert_eq!(
            visible.iter().map(|n| n.message.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
        assert_ne!(visible[0].id, visible[1].id);
        assert_eq!(visible[1].severity, Severity::Warning);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let visible = center.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "second");
    }

    #[tokio::test]
    async fn test_presenter_sees_each_notification() {
        let bus = Arc::new(EventBus::new());
        let shown = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&shown);
        let presenter: Presenter = Arc::new(move |n: &Notification| {
            sink.lock().unwrap().push((n.severity, n.message.clone()));
        });
        let _center = NotificationCenter::mount(Arc::clone(&bus), Some(presenter)).unwrap();

        bus.publish(event_names::API_ERROR, "No hay respuesta".to_string());
        bus.publish("unrelated:event", "ignored".to_string());

        assert_eq!(
            *shown.lock().unwrap(),
            vec![(Severity::Error, "No hay respuesta".to_string())]
        );
    }

    #[tokio::test]
    async fn test_teardown_unsubscribes() {
        let (bus, center) = mounted();
        for event in event_names::NOTIFICATION_EVENTS {
            assert_eq!(bus.subscriber_count(event), 1);
        }

        drop(center);

        for event in event_names::NOTIFICATION_EVENTS {
            assert_eq!(bus.subscriber_count(event), 0);
        }
        assert_eq!(bus.publish(event_names::API_SUCCESS, "late".to_string()), 0);
    }
}
