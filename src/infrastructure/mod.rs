//! Shipped collaborator implementations.

pub mod channel_delivery;
pub mod memory_store;

pub use channel_delivery::ChannelDelivery;
pub use memory_store::MemoryCollectionStore;
