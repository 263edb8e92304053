//! sea-orm entities for the portfolio backend plus small model-level helpers
//! (field validation, slug generation, unique-aware inserts).

pub mod errors;
pub mod db;
pub mod slug;
pub mod user;
pub mod user_credentials;
pub mod auth_token;
pub mod service_category;
pub mod service;
pub mod contact_message;
pub mod newsletter_subscription;

#[cfg(test)]
mod tests;
