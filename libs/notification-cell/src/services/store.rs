use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use shared_models::error::CoreError;

use crate::models::{NewNotification, Notification, NotificationAnalytics};
use crate::services::format::{format_timestamp, validate_notification};
use crate::services::sink::KeyValueStore;

#[derive(Default)]
struct StoreState {
    notifications: Vec<Notification>,
    loaded: bool,
}

/// Ordered notification list persisted as one JSON array under `key`.
///
/// Every mutation holds the lock across mutate and persist, and only commits
/// the new list once the sink accepted it.
pub struct NotificationStore {
    key: String,
    sink: Arc<dyn KeyValueStore>,
    state: Mutex<StoreState>,
}

impl NotificationStore {
    pub fn new(key: impl Into<String>, sink: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            sink,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self, state: &mut StoreState) -> Result<(), CoreError> {
        let stored = self.sink
            .get(&self.key)
            .await
            .map_err(|e| CoreError::operation(format!("Failed to load notifications: {}", e)))?;

        if let Some(json) = stored {
            state.notifications = serde_json::from_str(&json).map_err(|e| {
                CoreError::operation(format!("Stored notifications are corrupt: {}", e))
            })?;
        }
        state.loaded = true;
        Ok(())
    }

    async fn ensure_loaded(&self, state: &mut StoreState) -> Result<(), CoreError> {
        if !state.loaded {
            self.load(state).await?;
        }
        Ok(())
    }

    async fn persist(&self, notifications: &[Notification]) -> Result<(), CoreError> {
        let json = serde_json::to_string(notifications)
            .map_err(|e| CoreError::operation(format!("Failed to serialize notifications: {}", e)))?;

        self.sink
            .set(&self.key, &json)
            .await
            .map_err(|e| CoreError::operation(format!("Failed to persist notifications: {}", e)))
    }

    /// Applies `mutate` to a copy of the list; the copy replaces the list once persisted.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<Notification>) -> Option<T>,
    ) -> Result<Option<T>, CoreError> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;

        let mut next = state.notifications.clone();
        let outcome = mutate(&mut next);
        if outcome.is_some() {
            self.persist(&next).await?;
            state.notifications = next;
        }
        Ok(outcome)
    }

    /// Reloads the list from the sink, replacing what is held in memory when
    /// something was stored.
    pub async fn get_stored_notifications(&self) -> Result<Vec<Notification>, CoreError> {
        let mut state = self.state.lock().await;
        self.load(&mut state).await?;
        Ok(state.notifications.clone())
    }

    /// Current list in insertion order.
    pub async fn notifications(&self) -> Result<Vec<Notification>, CoreError> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.notifications.clone())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Notification>, CoreError> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.notifications.iter().find(|n| n.id == id).cloned())
    }

    #[instrument(skip(self, notification), fields(key = %self.key))]
    pub async fn add_notification(&self, notification: NewNotification) -> Result<Notification, CoreError> {
        validate_notification(&notification)?;

        let formatted = Notification {
            id: notification.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: notification.title.unwrap_or_default(),
            message: notification.message.unwrap_or_default(),
            timestamp: format_timestamp(notification.timestamp.unwrap_or_else(Utc::now)),
            is_read: notification.is_read.unwrap_or(false),
        };

        let added = formatted.clone();
        self.commit(move |list| {
            list.push(formatted);
            Some(())
        })
        .await?;

        debug!("Notification {} added", added.id);
        Ok(added)
    }

    /// Marks one notification read. An unknown id is a no-op and yields `None`.
    pub async fn mark_as_read(&self, id: &str) -> Result<Option<Notification>, CoreError> {
        self.commit(|list| {
            list.iter_mut().find(|n| n.id == id).map(|n| {
                n.is_read = true;
                n.clone()
            })
        })
        .await
    }

    pub async fn mark_all_as_read(&self) -> Result<(), CoreError> {
        self.commit(|list| {
            list.iter_mut().for_each(|n| n.is_read = true);
            Some(())
        })
        .await?;
        Ok(())
    }

    /// Removes one notification; returns whether anything was removed.
    pub async fn remove_notification(&self, id: &str) -> Result<bool, CoreError> {
        let removed = self
            .commit(|list| {
                let index = list.iter().position(|n| n.id == id)?;
                Some(list.remove(index))
            })
            .await?;
        Ok(removed.is_some())
    }

    pub async fn clear_all_notifications(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;

        if let Err(e) = self.sink.remove(&self.key).await {
            warn!("Failed to remove stored notifications for {}: {}", self.key, e);
            return Err(CoreError::operation(format!("Failed to clear notifications: {}", e)));
        }

        state.notifications.clear();
        state.loaded = true;
        Ok(())
    }

    pub async fn analytics(&self) -> Result<NotificationAnalytics, CoreError> {
        let notifications = self.notifications().await?;
        let read = notifications.iter().filter(|n| n.is_read).count();

        Ok(NotificationAnalytics {
            total: notifications.len(),
            read,
            unread: notifications.len() - read,
        })
    }
}
