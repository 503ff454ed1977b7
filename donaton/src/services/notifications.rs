//! User notifications

use super::users::UserId;
use crate::error::Error;
use donaton_di::abstraction;
use serde::Deserialize;
use std::sync::RwLock;

/// Kind of notification sent by [`NotificationService::send_notification`]
pub const GENERAL: &str = "general";

/// A notification addressed to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification identifier
    pub id: u64,
    /// Recipient
    pub user_id: UserId,
    /// Text shown to the user
    pub message: String,
    /// Category, e.g. `general` or `solicitud`
    pub kind: String,
    /// Whether the user has seen the notification
    pub read: bool,
}

/// Data of a notification to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    /// Recipient
    pub user_id: UserId,
    /// Text shown to the user
    pub message: String,
    /// Category
    #[serde(default = "general_kind")]
    pub kind: String,
}

fn general_kind() -> String {
    GENERAL.into()
}

/// Delivers notifications to users
pub trait NotificationService: Send + Sync {
    /// Sends a general notification, returns `true` if it was recorded
    fn send_notification(&self, user_id: UserId, message: &str) -> bool;

    /// Records a notification
    ///
    /// # Errors
    /// [`Error::Validation`] if the message is blank
    fn create_notification(&self, notification: NewNotification) -> Result<Notification, Error>;

    /// Returns the notifications of the user, oldest first
    fn notifications_for(&self, user_id: UserId) -> Vec<Notification>;
}

/// [`NotificationService`] that keeps notifications in memory
#[derive(Debug, Default)]
pub struct InMemoryNotificationService {
    notifications: RwLock<Vec<Notification>>,
}

impl NotificationService for InMemoryNotificationService {
    fn send_notification(&self, user_id: UserId, message: &str) -> bool {
        self.create_notification(NewNotification {
            user_id,
            message: message.into(),
            kind: general_kind(),
        })
        .is_ok()
    }

    fn create_notification(&self, notification: NewNotification) -> Result<Notification, Error> {
        if notification.message.trim().is_empty() {
            return Err(Error::validation("notification message is empty"));
        }

        let mut notifications = self.notifications
            .write()
            .expect("notifications lock poisoned");
        let created = Notification {
            id: notifications.len() as u64 + 1,
            user_id: notification.user_id,
            message: notification.message,
            kind: notification.kind,
            read: false,
        };
        notifications.push(created.clone());

        tracing::trace!("notification {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    fn notifications_for(&self, user_id: UserId) -> Vec<Notification> {
        self.notifications
            .read()
            .expect("notifications lock poisoned")
            .iter()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect()
    }
}

abstraction!(dyn NotificationService => InMemoryNotificationService);
