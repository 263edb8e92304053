//! Services catalog: categories, services and the cache in front of them.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::CatalogService;
