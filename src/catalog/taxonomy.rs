//! Card taxonomy: pure classification and validation
//!
//! Decides which variant a raw catalog record belongs to and checks that the
//! record carries the fields that variant requires — and none that belong to
//! another variant. No state, no side effects.

use crate::catalog::adapter::RawCard;
use crate::domain::DomainError;
use crate::models::card::CardKind;

/// Map the catalog's category string onto a variant tag.
pub fn classify(raw_category: &str) -> Result<CardKind, DomainError> {
    match raw_category.trim().to_ascii_lowercase().as_str() {
        "pokemon" | "pokémon" => Ok(CardKind::Pokemon),
        "trainer" => Ok(CardKind::Trainer),
        "energy" => Ok(CardKind::Energy),
        _ => Err(DomainError::UnknownVariant(raw_category.to_string())),
    }
}

/// Check variant-specific required fields and reject foreign-field leakage
/// (a trainer record must not also carry `stage`, etc.).
pub fn validate(kind: CardKind, raw: &RawCard) -> Result<(), DomainError> {
    let id = raw.id.as_deref().unwrap_or("<no id>");

    match kind {
        CardKind::Pokemon => {
            require(raw.stage.is_some(), id, "stage")?;
            require(raw.hp.is_some(), id, "hp")?;
            require(raw.types.is_some(), id, "types")?;
            forbid(raw.trainer_type.is_none(), id, "trainerType")?;
            forbid(raw.energy_type.is_none(), id, "energyType")?;
        }
        CardKind::Trainer => {
            require(raw.trainer_type.is_some(), id, "trainerType")?;
            require(raw.effect.is_some(), id, "effect")?;
            forbid(raw.stage.is_none(), id, "stage")?;
            forbid(raw.hp.is_none(), id, "hp")?;
            forbid(raw.energy_type.is_none(), id, "energyType")?;
        }
        CardKind::Energy => {
            require(raw.energy_type.is_some(), id, "energyType")?;
            forbid(raw.stage.is_none(), id, "stage")?;
            forbid(raw.hp.is_none(), id, "hp")?;
            forbid(raw.trainer_type.is_none(), id, "trainerType")?;
        }
    }

    Ok(())
}

fn require(present: bool, id: &str, field: &str) -> Result<(), DomainError> {
    if present {
        Ok(())
    } else {
        Err(DomainError::MalformedRecord(format!(
            "card {} is missing required field '{}'",
            id, field
        )))
    }
}

fn forbid(absent: bool, id: &str, field: &str) -> Result<(), DomainError> {
    if absent {
        Ok(())
    } else {
        Err(DomainError::MalformedRecord(format!(
            "card {} carries foreign field '{}'",
            id, field
        )))
    }
}
