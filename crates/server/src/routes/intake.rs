use axum::{extract::State, http::StatusCode, Json};

use common::types::Message;
use service::intake::domain::{ContactSubmission, NewsletterSignup, SubscriptionOutcome, CONTACT_RECEIVED};

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

#[utoipa::path(post, path = "/api/contact/message", tag = "contact", request_body = crate::openapi::ContactRequest, responses((status = 201, description = "Stored"), (status = 400, description = "Invalid fields")))]
pub async fn submit_message(State(state): State<ServerState>, ApiJson(input): ApiJson<ContactSubmission>) -> Result<(StatusCode, Json<Message>), ApiError> {
    state.intake.submit_contact_message(input).await?;
    Ok((StatusCode::CREATED, Json(Message::new(CONTACT_RECEIVED))))
}

#[utoipa::path(post, path = "/api/contact/newsletter", tag = "contact", request_body = crate::openapi::NewsletterRequest, responses((status = 201, description = "Subscribed"), (status = 200, description = "Already subscribed"), (status = 400, description = "Invalid email")))]
pub async fn subscribe(State(state): State<ServerState>, ApiJson(input): ApiJson<NewsletterSignup>) -> Result<(StatusCode, Json<Message>), ApiError> {
    let outcome = state.intake.subscribe_newsletter(input).await?;
    let status = match outcome {
        SubscriptionOutcome::Created(_) => StatusCode::CREATED,
        SubscriptionOutcome::AlreadySubscribed => StatusCode::OK,
    };
    Ok((status, Json(Message::new(outcome.message()))))
}
