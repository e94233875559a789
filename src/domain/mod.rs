//! Domain layer: error taxonomy and collaborator contracts.

pub mod collaborators;
pub mod errors;

pub use collaborators::{CatalogSource, CollectionStore, PushDelivery};
pub use errors::DomainError;
