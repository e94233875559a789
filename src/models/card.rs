//! Canonical card model
//!
//! Cards are a tagged sum type: the variant discriminator is fixed at
//! normalization time and cannot change afterwards (cards are immutable once
//! they enter the catalog cache).

use serde::{Deserialize, Serialize};

/// Variant discriminator, produced by `catalog::taxonomy::classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Pokemon,
    Trainer,
    Energy,
}

/// Attributes shared by every card variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCommon {
    /// Catalog-stable identifier, unique across the catalog
    pub id: String,
    pub set_id: String,
    /// Collector number within the set; may be non-numeric (e.g. "SV01")
    pub number: String,
    pub name: String,
    /// Locale-resolved image base; quality/format suffix added by
    /// `catalog::adapter::resolve_image_url`
    pub image_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Basic,
    Stage1,
    Stage2,
}

impl Stage {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Stage::Basic),
            "stage1" | "stage 1" => Some(Stage::Stage1),
            "stage2" | "stage 2" => Some(Stage::Stage2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerType {
    Item,
    Supporter,
    Stadium,
    Tool,
}

impl TrainerType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "item" => Some(TrainerType::Item),
            "supporter" => Some(TrainerType::Supporter),
            "stadium" => Some(TrainerType::Stadium),
            // The catalog spells this "Pokémon Tool"
            "tool" | "pokemon tool" | "pokémon tool" => Some(TrainerType::Tool),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyKind {
    Basic,
    Special,
}

impl EnergyKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            // Some catalog locales label basic energies "Normal"
            "basic" | "normal" => Some(EnergyKind::Basic),
            "special" => Some(EnergyKind::Special),
            _ => None,
        }
    }
}

/// The canonical, locale-resolved card representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Card {
    Pokemon {
        #[serde(flatten)]
        common: CardCommon,
        stage: Stage,
        hp: u32,
        types: Vec<String>,
    },
    Trainer {
        #[serde(flatten)]
        common: CardCommon,
        trainer_type: TrainerType,
        effect_text: String,
    },
    Energy {
        #[serde(flatten)]
        common: CardCommon,
        energy_kind: EnergyKind,
    },
}

impl Card {
    pub fn common(&self) -> &CardCommon {
        match self {
            Card::Pokemon { common, .. }
            | Card::Trainer { common, .. }
            | Card::Energy { common, .. } => common,
        }
    }

    pub fn id(&self) -> &str {
        &self.common().id
    }

    pub fn set_id(&self) -> &str {
        &self.common().set_id
    }

    pub fn kind(&self) -> CardKind {
        match self {
            Card::Pokemon { .. } => CardKind::Pokemon,
            Card::Trainer { .. } => CardKind::Trainer,
            Card::Energy { .. } => CardKind::Energy,
        }
    }
}
