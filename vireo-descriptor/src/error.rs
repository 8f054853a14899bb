//! Error types for the descriptor mappers.

use thiserror::Error;

use crate::xml::XmlError;

/// A field value whose shape, type, or enum membership is invalid.
///
/// Raised by the validated setters and the value-type factories. Carries
/// the offending field name and the rejected value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{field}' field '{value}' is not valid")]
pub struct SchemaError {
    field: &'static str,
    value: String,
}

impl SchemaError {
    pub(crate) fn new(field: &'static str, value: impl ToString) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }

    /// Name of the rejected field.
    pub fn field(&self) -> &str {
        self.field
    }

    /// The rejected value, rendered as text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A document-level mapping failure.
///
/// Everything that goes wrong inside `parse`/`unparse` surfaces as this
/// type, including schema violations hit while assigning decoded fields.
/// The underlying cause's message is carried; raw decoder errors never
/// cross the crate boundary.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Unparse was attempted on an entity missing a mandatory field.
    #[error("missing mandatory fields value")]
    MissingMandatoryFields,

    /// A mandatory element was absent from the document.
    #[error("'{0}' element is missing")]
    MissingElement(&'static str),

    /// A field value failed schema validation while the document was
    /// being assigned.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// The XML text could not be decoded or encoded.
    #[error("{0}")]
    Xml(#[from] XmlError),
}

/// Result type alias for document codec operations.
pub type Result<T> = std::result::Result<T, MappingError>;
