//! Error types for record normalization and shape validation.

use thiserror::Error;

/// Errors produced while normalizing a raw part record.
///
/// Normalization failures are record-level: the batch continues with the
/// next record, and the failed record still receives a placeholder page on
/// the PDF side.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// The record is missing its part name or shape identifier.
    #[error("insufficient data: missing '{0}'")]
    InsufficientData(&'static str),
}

/// A required shape dimension is zero or negative.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid dimension for {shape}: {field} = {value}")]
pub struct DimensionError {
    /// Human-readable shape name.
    pub shape: &'static str,
    /// The offending dimension field.
    pub field: &'static str,
    /// The rejected value.
    pub value: f64,
}
