use std::collections::BTreeMap;
use std::fmt;

use models::errors::ModelError;
use serde::Serialize;
use thiserror::Error;

/// Field-level validation detail, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errs = Self::new();
        errs.add(field, message);
        errs
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn get(&self, field: &str) -> Option<&[String]> { self.0.get(field).map(Vec::as_slice) }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msgs) in &self.0 {
            if !first { f.write_str("; ")?; }
            first = false;
            write!(f, "{}: {}", field, msgs.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("backup failed: {0}")]
    Backup(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    /// Errors the caller must not see details of.
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Db(_) | ServiceError::Backup(_) | ServiceError::Internal(_))
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::field("non_field_errors", msg),
            ModelError::Conflict(detail) => ServiceError::Conflict(detail),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errs: FieldErrors) -> Self { ServiceError::Validation(errs) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_group_by_field() {
        let mut errs = FieldErrors::new();
        errs.add("email", "Enter a valid email address.");
        errs.add("email", "This field may not be blank.");
        errs.add("name", "This field is required.");
        let v = serde_json::to_value(&errs).unwrap();
        assert_eq!(v["email"].as_array().unwrap().len(), 2);
        assert_eq!(v["name"][0], "This field is required.");
        assert!(errs.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn model_conflict_maps_to_conflict() {
        let e: ServiceError = ModelError::Conflict("slug".into()).into();
        assert!(matches!(e, ServiceError::Conflict(_)));
        assert!(!e.is_internal());
        let e: ServiceError = ModelError::Db("down".into()).into();
        assert!(e.is_internal());
    }
}
