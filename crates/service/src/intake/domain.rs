use chrono::{DateTime, Utc};
use models::contact_message::MessageStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public contact form payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessageView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<models::contact_message::Model> for ContactMessageView {
    fn from(m: models::contact_message::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            subject: m.subject,
            message: m.message,
            status: m.status,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsletterSignup {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<models::newsletter_subscription::Model> for SubscriptionView {
    fn from(m: models::newsletter_subscription::Model) -> Self {
        Self { id: m.id, email: m.email, name: m.name, is_active: m.is_active, created_at: m.created_at.with_timezone(&Utc) }
    }
}

/// Both outcomes are successes; callers tell them apart (201 vs 200).
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionOutcome {
    Created(SubscriptionView),
    AlreadySubscribed,
}

impl SubscriptionOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SubscriptionOutcome::Created(_) => "Thank you for subscribing to our newsletter!",
            SubscriptionOutcome::AlreadySubscribed => "You're already subscribed to our newsletter!",
        }
    }
}

pub const CONTACT_RECEIVED: &str = "Your message has been sent successfully! We'll get back to you soon.";
