use models::contact_message::{MessageStatus, NewContactMessage};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::intake::domain::{ContactMessageView, SubscriptionView};
use crate::intake::repository::IntakeRepository;

pub struct SeaOrmIntakeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmIntakeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl IntakeRepository for SeaOrmIntakeRepository {
    async fn create_message(&self, new: NewContactMessage) -> Result<ContactMessageView, ServiceError> {
        Ok(models::contact_message::create(&self.db, new).await?.into())
    }

    async fn set_message_status(&self, id: Uuid, status: MessageStatus) -> Result<Option<ContactMessageView>, ServiceError> {
        Ok(models::contact_message::set_status(&self.db, id, status).await?.map(Into::into))
    }

    async fn find_subscription(&self, email: &str) -> Result<Option<SubscriptionView>, ServiceError> {
        Ok(models::newsletter_subscription::find_by_email(&self.db, email).await?.map(Into::into))
    }

    async fn create_subscription(&self, email: &str, name: &str) -> Result<SubscriptionView, ServiceError> {
        Ok(models::newsletter_subscription::create(&self.db, email, name).await?.into())
    }
}
