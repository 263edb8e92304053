use std::sync::Arc;

use models::contact_message::{MessageStatus, NewContactMessage};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::domain::{ContactMessageView, ContactSubmission, NewsletterSignup, SubscriptionOutcome};
use super::notifier::{Notification, Notifier};
use super::repository::IntakeRepository;
use crate::errors::{FieldErrors, ServiceError};

/// Where new-message notifications go.
#[derive(Debug, Clone)]
pub struct NotifyAddresses {
    pub admin_email: String,
    pub from_email: String,
}

impl From<&configs::NotificationConfig> for NotifyAddresses {
    fn from(c: &configs::NotificationConfig) -> Self {
        Self { admin_email: c.admin_email.clone(), from_email: c.from_email.clone() }
    }
}

/// Contact form and newsletter intake.
pub struct IntakeService {
    repo: Arc<dyn IntakeRepository>,
    notifier: Arc<dyn Notifier>,
    addresses: NotifyAddresses,
}

impl IntakeService {
    pub fn new(repo: Arc<dyn IntakeRepository>, notifier: Arc<dyn Notifier>, addresses: NotifyAddresses) -> Self {
        Self { repo, notifier, addresses }
    }

    /// Persist a message, then try once to notify the administrator. The
    /// notification outcome never changes the result.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn submit_contact_message(&self, input: ContactSubmission) -> Result<ContactMessageView, ServiceError> {
        let new = validate_submission(input)?;
        let saved = self.repo.create_message(new).await?;
        info!(message_id = %saved.id, "contact_message_received");

        let notification = Notification {
            subject: format!("New Contact Form Submission: {}", saved.subject),
            body: format!(
                "Name: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}",
                saved.name, saved.email, saved.phone, saved.message
            ),
            from: self.addresses.from_email.clone(),
            to: vec![self.addresses.admin_email.clone()],
        };
        match self.notifier.send(&notification).await {
            Ok(()) => info!(message_id = %saved.id, "notification_sent"),
            Err(e) => error!(message_id = %saved.id, error = %e, "notification_failed"),
        }
        Ok(saved)
    }

    /// Subscribing twice is a success that creates nothing.
    #[instrument(skip(self, input))]
    pub async fn subscribe_newsletter(&self, input: NewsletterSignup) -> Result<SubscriptionOutcome, ServiceError> {
        let email = input.email.trim().to_lowercase();
        if self.repo.find_subscription(&email).await?.is_some() {
            info!(email = %email, "newsletter_already_subscribed");
            return Ok(SubscriptionOutcome::AlreadySubscribed);
        }

        let mut errs = FieldErrors::new();
        if let Err(e) = models::user::validate_email(&email) {
            errs.add("email", e.detail());
        }
        let name = input.name.trim().to_string();
        if name.chars().count() > 100 {
            errs.add("name", "Ensure this field has no more than 100 characters.");
        }
        errs.into_result()?;

        match self.repo.create_subscription(&email, &name).await {
            Ok(sub) => {
                info!(email = %email, "newsletter_subscribed");
                Ok(SubscriptionOutcome::Created(sub))
            }
            // lost an insert race with an identical request
            Err(ServiceError::Conflict(_)) => {
                info!(email = %email, "newsletter_already_subscribed");
                Ok(SubscriptionOutcome::AlreadySubscribed)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_message_status(&self, id: Uuid, status: MessageStatus) -> Result<ContactMessageView, ServiceError> {
        let updated = self
            .repo
            .set_message_status(id, status)
            .await?
            .ok_or_else(|| ServiceError::not_found("contact message"))?;
        info!(message_id = %id, status = ?status, "contact_message_status_changed");
        Ok(updated)
    }
}

fn validate_submission(input: ContactSubmission) -> Result<NewContactMessage, FieldErrors> {
    let mut errs = FieldErrors::new();
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();
    let phone = input.phone.trim().to_string();
    let subject = input.subject.trim().to_string();

    required_max(&mut errs, "name", &name, 100);
    if let Err(e) = models::user::validate_email(&email) {
        errs.add("email", e.detail());
    }
    if phone.chars().count() > 20 {
        errs.add("phone", "Ensure this field has no more than 20 characters.");
    }
    required_max(&mut errs, "subject", &subject, 200);
    if input.message.trim().is_empty() {
        errs.add("message", "This field may not be blank.");
    }
    errs.into_result()?;
    Ok(NewContactMessage { name, email, phone, subject, message: input.message })
}

fn required_max(errs: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.is_empty() {
        errs.add(field, "This field may not be blank.");
    } else if value.chars().count() > max {
        errs.add(field, format!("Ensure this field has no more than {max} characters."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::notifier::NotifyError;
    use crate::intake::repository::mock::MockIntakeRepository;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().await.push(notification.clone());
            if self.fail { Err(NotifyError::Transport("smtp down".into())) } else { Ok(()) }
        }
    }

    fn addresses() -> NotifyAddresses {
        NotifyAddresses { admin_email: "admin@site.com".into(), from_email: "noreply@site.com".into() }
    }

    fn setup(fail: bool) -> (IntakeService, Arc<MockIntakeRepository>, Arc<RecordingNotifier>) {
        let repo = Arc::new(MockIntakeRepository::default());
        let notifier = Arc::new(RecordingNotifier { fail, ..Default::default() });
        (IntakeService::new(repo.clone(), notifier.clone(), addresses()), repo, notifier)
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: String::new(),
            subject: "Quote".into(),
            message: "Need a website".into(),
        }
    }

    #[tokio::test]
    async fn submission_persists_and_notifies_admin() {
        let (svc, repo, notifier) = setup(false);
        let saved = svc.submit_contact_message(submission()).await.unwrap();
        assert_eq!(saved.status, MessageStatus::New);
        assert_eq!(repo.messages().await.len(), 1);

        let sent = notifier.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Contact Form Submission: Quote");
        assert_eq!(sent[0].to, vec!["admin@site.com".to_string()]);
        assert!(sent[0].body.starts_with("Name: Jane\nEmail: jane@x.com"));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_submission() {
        let (svc, repo, notifier) = setup(true);
        let saved = svc.submit_contact_message(submission()).await.unwrap();
        let stored = repo.messages().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, saved.id);
        assert_eq!(stored[0].status, MessageStatus::New);
        assert_eq!(notifier.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn invalid_submission_reports_fields_and_stores_nothing() {
        let (svc, repo, notifier) = setup(false);
        let input = ContactSubmission { name: String::new(), email: "nope".into(), phone: "1".repeat(25), ..submission() };
        match svc.submit_contact_message(input).await {
            Err(ServiceError::Validation(errs)) => {
                assert!(errs.contains("name"));
                assert!(errs.contains("email"));
                assert!(errs.contains("phone"));
                assert!(!errs.contains("subject"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(repo.messages().await.is_empty());
        assert!(notifier.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn subscribing_twice_is_idempotent() {
        let (svc, repo, _) = setup(false);
        let first = svc.subscribe_newsletter(NewsletterSignup { email: "a@x.com".into(), name: "A".into() }).await.unwrap();
        assert!(matches!(first, SubscriptionOutcome::Created(_)));

        let second = svc.subscribe_newsletter(NewsletterSignup { email: " A@X.com ".into(), name: String::new() }).await.unwrap();
        assert_eq!(second, SubscriptionOutcome::AlreadySubscribed);
        assert_eq!(second.message(), "You're already subscribed to our newsletter!");
        assert_eq!(repo.subscriptions().await.len(), 1);
    }

    #[tokio::test]
    async fn subscription_requires_valid_email() {
        let (svc, repo, _) = setup(false);
        let res = svc.subscribe_newsletter(NewsletterSignup { email: "bad".into(), name: String::new() }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert!(repo.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn status_updates() {
        let (svc, _, _) = setup(false);
        let saved = svc.submit_contact_message(submission()).await.unwrap();
        let updated = svc.update_message_status(saved.id, MessageStatus::Responded).await.unwrap();
        assert_eq!(updated.status, MessageStatus::Responded);
        assert!(matches!(
            svc.update_message_status(Uuid::new_v4(), MessageStatus::Closed).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
