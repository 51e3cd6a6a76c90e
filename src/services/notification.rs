//! Notification service implementation
//!
//! Per-user and broadcast notifications: listing a user's inbox and marking
//! entries as read on behalf of their recipient.

use tracing::{debug, info};

use crate::database::repositories::CrudRepository;
use crate::database::NotificationRepository;
use crate::models::Notification;
use crate::services::auth::AuthContext;
use crate::utils::errors::{ColectaError, Result};

/// Permission that grants access to other users' notifications
pub const MANAGE_NOTIFICATIONS: &str = "notificaciones.gestionar";

#[derive(Clone, Debug)]
pub struct NotificationService {
    notifications: NotificationRepository,
    crud: CrudRepository<Notification>,
}

impl NotificationService {
    pub fn new(notifications: NotificationRepository, crud: CrudRepository<Notification>) -> Self {
        Self { notifications, crud }
    }

    /// Every notification of every user; needs the manage permission
    pub async fn list(&self, caller: &AuthContext, active_only: bool) -> Result<Vec<Notification>> {
        caller.require(MANAGE_NOTIFICATIONS)?;
        if active_only {
            self.crud.list_active().await
        } else {
            self.crud.list().await
        }
    }

    /// A single notification as seen by `caller`
    pub async fn get(&self, caller: &AuthContext, id: i64) -> Result<Notification> {
        let notification = self
            .crud
            .find_by_id(id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "notificacion", id })?;

        if let Some(recipient) = notification.usuario_id {
            caller.require_self_or(recipient, MANAGE_NOTIFICATIONS)?;
        }
        Ok(notification)
    }

    /// Inbox of a user including broadcasts, newest first
    pub async fn inbox(&self, caller: &AuthContext, usuario_id: i64) -> Result<Vec<Notification>> {
        caller.require_self_or(usuario_id, MANAGE_NOTIFICATIONS)?;
        debug!(usuario_id = usuario_id, "Listing notifications");
        self.notifications.for_user(usuario_id).await
    }

    /// Mark a notification read; only its recipient may do so, any user for broadcasts
    pub async fn mark_read(&self, caller: &AuthContext, id: i64) -> Result<Notification> {
        let notification = self
            .crud
            .find_by_id(id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "notificacion", id })?;

        if let Some(recipient) = notification.usuario_id {
            if recipient != caller.user_id {
                return Err(ColectaError::PermissionDenied(
                    "notification belongs to another user".to_string(),
                ));
            }
        }

        let notification = self
            .notifications
            .mark_read(id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "notificacion", id })?;

        info!(notificacion_id = id, user_id = caller.user_id, "Notification marked as read");
        Ok(notification)
    }
}
