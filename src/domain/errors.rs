//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Catalog payload is missing required fields (data-quality error, not retried)
    MalformedRecord(String),
    /// Category string matches none of the known card variants
    UnknownVariant(String),
    /// Unrecognized image format/quality combination
    UnsupportedImageVariant(String),
    /// The external catalog has no card with this id
    CardNotFound(String),
    /// The collection has no entry for this card
    UnknownCard(String),
    /// Release would underflow the owned quantity (strict policy)
    InsufficientQuantity { requested: u32, available: u32 },
    /// Optimistic-concurrency failure on save
    Conflict,
    /// Caller-supplied input failed validation
    Validation(String),
    /// External collaborator error (transport, unexpected status, ...)
    External(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::MalformedRecord(msg) => write!(f, "Malformed catalog record: {}", msg),
            DomainError::UnknownVariant(category) => {
                write!(f, "Unknown card variant: {}", category)
            }
            DomainError::UnsupportedImageVariant(variant) => {
                write!(f, "Unsupported image variant: {}", variant)
            }
            DomainError::CardNotFound(id) => write!(f, "Card not found in catalog: {}", id),
            DomainError::UnknownCard(id) => write!(f, "Card not in collection: {}", id),
            DomainError::InsufficientQuantity {
                requested,
                available,
            } => write!(
                f,
                "Insufficient quantity: requested {} but only {} owned",
                requested, available
            ),
            DomainError::Conflict => write!(f, "Concurrent modification conflict"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::External(msg) => write!(f, "External service error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
