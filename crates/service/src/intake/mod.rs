//! Contact messages and newsletter subscriptions.

pub mod domain;
pub mod notifier;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::{IntakeService, NotifyAddresses};
