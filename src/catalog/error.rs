//! # Catalog Errors
//!
//! Validation failures never reach the backing store. Backing-store failures
//! are wrapped with the operation they interrupted so the message shown to
//! the operator names it.

use crate::clients::BackendError;
use crate::model::FrameId;
use std::collections::BTreeMap;
use std::fmt;

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Sku,
    Name,
    Price,
    Image,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Sku => "sku",
            Field::Name => "name",
            Field::Price => "price",
            Field::Image => "image",
        };
        f.write_str(name)
    }
}

/// One message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("Please fill in all required fields ({})", field_names(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn field_names(errors: &BTreeMap<Field, String>) -> String {
    errors
        .keys()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Failed to load catalog: {0}")]
    Load(#[source] BackendError),
    #[error("Error saving: {0}")]
    Save(#[source] BackendError),
    #[error("Error cloning: {0}")]
    Clone(#[source] BackendError),
    #[error("Error deleting: {0}")]
    Delete(#[source] BackendError),
    #[error("Another change is still being submitted")]
    Busy,
    #[error("Product {0} not found")]
    NotFound(FrameId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.add(Field::Image, "Image is required");
        errors.add(Field::Sku, "SKU is required");
        assert_eq!(
            errors.to_string(),
            "Please fill in all required fields (sku, image)"
        );
        let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![Field::Sku, Field::Image]);
    }

    #[test]
    fn test_empty_errors_pass() {
        assert!(ValidationErrors::default().into_result().is_ok());
    }
}
