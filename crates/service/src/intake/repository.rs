use async_trait::async_trait;
use models::contact_message::{MessageStatus, NewContactMessage};
use uuid::Uuid;

use super::domain::{ContactMessageView, SubscriptionView};
use crate::errors::ServiceError;

#[async_trait]
pub trait IntakeRepository: Send + Sync {
    /// Stored with status `new`.
    async fn create_message(&self, new: NewContactMessage) -> Result<ContactMessageView, ServiceError>;
    async fn set_message_status(&self, id: Uuid, status: MessageStatus) -> Result<Option<ContactMessageView>, ServiceError>;
    async fn find_subscription(&self, email: &str) -> Result<Option<SubscriptionView>, ServiceError>;
    /// A duplicate email fails with `ServiceError::Conflict`.
    async fn create_subscription(&self, email: &str, name: &str) -> Result<SubscriptionView, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MockIntakeRepository {
        messages: Mutex<Vec<ContactMessageView>>,
        subscriptions: Mutex<Vec<SubscriptionView>>,
    }

    impl MockIntakeRepository {
        pub async fn messages(&self) -> Vec<ContactMessageView> {
            self.messages.lock().await.clone()
        }

        pub async fn subscriptions(&self) -> Vec<SubscriptionView> {
            self.subscriptions.lock().await.clone()
        }
    }

    #[async_trait]
    impl IntakeRepository for MockIntakeRepository {
        async fn create_message(&self, new: NewContactMessage) -> Result<ContactMessageView, ServiceError> {
            let now = Utc::now();
            let view = ContactMessageView {
                id: Uuid::new_v4(),
                name: new.name,
                email: new.email,
                phone: new.phone,
                subject: new.subject,
                message: new.message,
                status: MessageStatus::New,
                created_at: now,
                updated_at: now,
            };
            self.messages.lock().await.push(view.clone());
            Ok(view)
        }

        async fn set_message_status(&self, id: Uuid, status: MessageStatus) -> Result<Option<ContactMessageView>, ServiceError> {
            let mut messages = self.messages.lock().await;
            Ok(messages.iter_mut().find(|m| m.id == id).map(|m| {
                m.status = status;
                m.updated_at = Utc::now();
                m.clone()
            }))
        }

        async fn find_subscription(&self, email: &str) -> Result<Option<SubscriptionView>, ServiceError> {
            Ok(self.subscriptions.lock().await.iter().find(|s| s.email == email).cloned())
        }

        async fn create_subscription(&self, email: &str, name: &str) -> Result<SubscriptionView, ServiceError> {
            let mut subs = self.subscriptions.lock().await;
            if subs.iter().any(|s| s.email == email) {
                return Err(ServiceError::Conflict(format!("subscription {email} exists")));
            }
            let view = SubscriptionView {
                id: Uuid::new_v4(),
                email: email.to_string(),
                name: name.to_string(),
                is_active: true,
                created_at: Utc::now(),
            };
            subs.push(view.clone());
            Ok(view)
        }
    }
}
