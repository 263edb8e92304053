//! Service layer providing the business operations on top of models.
//! - Separates business logic from data access (repository traits, sea-orm and mock impls).
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod cache;
pub mod catalog;
pub mod errors;
pub mod intake;
pub mod maintenance;
pub mod pagination;
#[cfg(test)]
pub mod test_support;
