pub mod broadcast;
pub mod collection_service;

pub use broadcast::{DiffBroadcaster, EntryDiff, entry_diff};
pub use collection_service::{CollectionService, MutationOutcome, SetCompletion};
