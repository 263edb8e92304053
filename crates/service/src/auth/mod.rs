//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Accounts, password policy and the single opaque token each user holds.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::{AuthConfig, AuthService};
