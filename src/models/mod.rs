pub mod card;
pub mod collection;
pub mod set;

pub use card::{Card, CardCommon, CardKind, EnergyKind, Stage, TrainerType};
pub use collection::{Collection, CollectionEntry};
pub use set::{CardSet, Series, SetBrief};
