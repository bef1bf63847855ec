pub mod sms;

use sea_orm::{DatabaseConnection, DbErr};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::{notifications as notification_db, profiles, users as user_db};
use crate::events::{Audience, DomainEvent};
use crate::models::notifications::NewNotification;
use crate::models::users::Roles;
use sms::SmsClient;

/// Turns domain events into in-app notifications and SMS messages.
///
/// Runs on its own task; nothing here can fail the request that published
/// the event, so every error is logged and the loop moves on.
#[derive(Clone)]
pub struct NotificationDispatcher {
    db: DatabaseConnection,
    sms: SmsClient,
}

impl NotificationDispatcher {
    pub fn new(db: DatabaseConnection, sms: SmsClient) -> Self {
        Self { db, sms }
    }

    pub fn spawn(self, receiver: mpsc::UnboundedReceiver<DomainEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    pub async fn run(self, mut receiver: mpsc::UnboundedReceiver<DomainEvent>) {
        tracing::info!("Notification dispatcher started");
        while let Some(event) = receiver.recv().await {
            self.handle(&event).await;
        }
        tracing::info!("Notification dispatcher stopped");
    }

    /// Deliver one event. Returns how many in-app notifications were written.
    pub async fn handle(&self, event: &DomainEvent) -> usize {
        let recipients = match self.resolve(event.audience()).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Failed to resolve recipients for {event:?}: {e}");
                return 0;
            }
        };

        let mut written = 0;
        for recipient_id in recipients {
            match notification_db::insert_notification(&self.db, event.render(recipient_id)).await
            {
                Ok(_) => written += 1,
                Err(e) => tracing::error!(%recipient_id, "Failed to store notification: {e}"),
            }

            if let Some(text) = event.sms_text(recipient_id) {
                self.send_sms(recipient_id, &text).await;
            }
        }
        written
    }

    /// Store one notification per user directly, outside the event flow.
    pub async fn broadcast(&self, role: Roles, template: NewNotification) -> Result<usize, DbErr> {
        let users = user_db::active_users_with_role(&self.db, role).await?;
        let mut written = 0;
        for user in users {
            let notification = NewNotification {
                recipient_id: user.id,
                ..template.clone()
            };
            notification_db::insert_notification(&self.db, notification).await?;
            written += 1;
        }
        Ok(written)
    }

    async fn resolve(&self, audience: Audience) -> Result<Vec<Uuid>, DbErr> {
        match audience {
            Audience::Users(ids) => Ok(ids),
            Audience::AllCreators => Ok(user_db::active_users_with_role(&self.db, Roles::Creator)
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect()),
        }
    }

    async fn send_sms(&self, recipient_id: Uuid, text: &str) {
        if !self.sms.is_enabled() {
            return;
        }

        let opted_in = match profiles::get_creator_profile(&self.db, recipient_id).await {
            Ok(Some(profile)) => profile.receive_sms_notifications,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(%recipient_id, "Failed to load SMS preference: {e}");
                false
            }
        };
        if !opted_in {
            return;
        }

        let phone = match user_db::get_user_by_id(&self.db, recipient_id).await {
            Ok(Some(user)) => user.phone_number,
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%recipient_id, "Failed to load phone number: {e}");
                None
            }
        };
        let Some(phone) = phone else {
            return;
        };

        if let Err(e) = self.sms.send_sms(&phone, text).await {
            tracing::warn!(%recipient_id, "Failed to send SMS: {e}");
        }
    }
}
