//! Catalog adapter
//!
//! Reduces heterogeneous external catalog records to the canonical card
//! model. Normalization never mutates its input and is idempotent:
//! normalizing the same raw record twice yields structurally equal cards,
//! which is what makes re-fetch/refresh safe.

use serde::{Deserialize, Serialize};

use crate::catalog::language::ResolvedLocale;
use crate::catalog::taxonomy;
use crate::domain::DomainError;
use crate::models::card::{Card, CardCommon, CardKind, EnergyKind, Stage, TrainerType};
use crate::models::set::{CardSet, Series, SetBrief};

/// Raw card record as the catalog serves it. Everything is optional; the
/// adapter decides what is required for which variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub id: Option<String>,
    pub local_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub set: Option<RawSetRef>,
    pub stage: Option<String>,
    pub hp: Option<u32>,
    pub types: Option<Vec<String>>,
    pub trainer_type: Option<String>,
    pub effect: Option<String>,
    pub energy_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSetRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSet {
    pub id: Option<String>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub card_count: Option<RawCardCount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCardCount {
    pub total: Option<u32>,
    pub official: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeries {
    pub id: Option<String>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub sets: Option<Vec<RawSetRef>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Webp,
}

impl ImageFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" => Some(ImageFormat::Jpg),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    Low,
    High,
}

impl ImageQuality {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(ImageQuality::Low),
            "high" => Some(ImageQuality::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Low => "low",
            ImageQuality::High => "high",
        }
    }
}

/// Append the quality/format suffix to a card's image base URL.
///
/// The shape `<base>/<quality>.<format>` must match the asset CDN exactly
/// for client compatibility.
pub fn resolve_image_url(
    image_base_url: &str,
    quality: &str,
    format: &str,
) -> Result<String, DomainError> {
    let quality = ImageQuality::parse(quality).ok_or_else(|| {
        DomainError::UnsupportedImageVariant(format!("quality '{}'", quality))
    })?;
    let format = ImageFormat::parse(format).ok_or_else(|| {
        DomainError::UnsupportedImageVariant(format!("format '{}'", format))
    })?;

    Ok(format!(
        "{}/{}.{}",
        image_base_url,
        quality.as_str(),
        format.as_str()
    ))
}

/// Maps raw catalog records into canonical cards, sets and series.
#[derive(Debug, Clone)]
pub struct CatalogAdapter {
    asset_base_url: String,
}

impl CatalogAdapter {
    pub fn new(asset_base_url: impl Into<String>) -> Self {
        let mut asset_base_url = asset_base_url.into();
        while asset_base_url.ends_with('/') {
            asset_base_url.pop();
        }
        Self { asset_base_url }
    }

    /// `https://<asset-host>/<locale>/<setId>/<number>`
    pub fn image_base_url(&self, locale: &ResolvedLocale, set_id: &str, number: &str) -> String {
        format!("{}/{}/{}/{}", self.asset_base_url, locale.code, set_id, number)
    }

    /// Normalize one raw catalog record into a canonical card.
    pub fn normalize(&self, raw: &RawCard, locale: &ResolvedLocale) -> Result<Card, DomainError> {
        // 1. Which variant is this?
        let category = raw.category.as_deref().ok_or_else(|| {
            DomainError::MalformedRecord("card record has no category".to_string())
        })?;
        let kind = taxonomy::classify(category)?;

        // 2. Common fields
        let id = required_common(&raw.id, "id")?;
        let set_id = required_common(&raw.set.as_ref().and_then(|s| s.id.clone()), "set.id")?;
        let number = required_common(&raw.local_id, "localId")?;
        let name = raw.name.clone().unwrap_or_else(|| "Unknown".to_string());

        let common = CardCommon {
            image_base_url: self.image_base_url(locale, &set_id, &number),
            id,
            set_id,
            number,
            name,
        };

        // 3. Variant fields (presence + leakage checked up front)
        taxonomy::validate(kind, raw)?;

        let card = match kind {
            CardKind::Pokemon => {
                let stage_raw = raw.stage.as_deref().unwrap_or_default();
                let stage = Stage::parse(stage_raw).ok_or_else(|| {
                    DomainError::MalformedRecord(format!(
                        "card {} has unrecognized stage '{}'",
                        common.id, stage_raw
                    ))
                })?;
                Card::Pokemon {
                    stage,
                    hp: raw.hp.unwrap_or_default(),
                    types: raw.types.clone().unwrap_or_default(),
                    common,
                }
            }
            CardKind::Trainer => {
                let trainer_raw = raw.trainer_type.as_deref().unwrap_or_default();
                let trainer_type = TrainerType::parse(trainer_raw).ok_or_else(|| {
                    DomainError::MalformedRecord(format!(
                        "card {} has unrecognized trainer type '{}'",
                        common.id, trainer_raw
                    ))
                })?;
                Card::Trainer {
                    trainer_type,
                    effect_text: raw.effect.clone().unwrap_or_default(),
                    common,
                }
            }
            CardKind::Energy => {
                let energy_raw = raw.energy_type.as_deref().unwrap_or_default();
                let energy_kind = EnergyKind::parse(energy_raw).ok_or_else(|| {
                    DomainError::MalformedRecord(format!(
                        "card {} has unrecognized energy type '{}'",
                        common.id, energy_raw
                    ))
                })?;
                Card::Energy { energy_kind, common }
            }
        };

        Ok(card)
    }

    pub fn normalize_set(&self, raw: &RawSet) -> Result<CardSet, DomainError> {
        let id = required_common(&raw.id, "set id")?;
        let name = raw.name.clone().unwrap_or_else(|| "Unknown".to_string());
        let total_cards = raw
            .card_count
            .as_ref()
            .and_then(|c| c.total.or(c.official))
            .unwrap_or(0);

        Ok(CardSet {
            id,
            name,
            logo_url: raw.logo.clone(),
            total_cards,
        })
    }

    pub fn normalize_series(&self, raw: &RawSeries) -> Result<Series, DomainError> {
        let id = required_common(&raw.id, "series id")?;
        let name = raw.name.clone().unwrap_or_else(|| "Unknown".to_string());

        let sets = raw
            .sets
            .as_ref()
            .map(|sets| {
                sets.iter()
                    .filter_map(|s| {
                        let id = s.id.clone()?;
                        let name = s.name.clone().unwrap_or_else(|| id.clone());
                        Some(SetBrief { id, name })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Series {
            id,
            name,
            logo_url: raw.logo.clone(),
            sets,
        })
    }
}

fn required_common(field: &Option<String>, name: &str) -> Result<String, DomainError> {
    field
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::MalformedRecord(format!("card record is missing '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::language;

    fn adapter() -> CatalogAdapter {
        CatalogAdapter::new("https://assets.example.net/")
    }

    fn pikachu_raw() -> RawCard {
        RawCard {
            id: Some("sv01-025".to_string()),
            local_id: Some("025".to_string()),
            name: Some("Pikachu".to_string()),
            category: Some("Pokemon".to_string()),
            set: Some(RawSetRef {
                id: Some("sv01".to_string()),
                name: Some("Scarlet & Violet".to_string()),
            }),
            stage: Some("Basic".to_string()),
            hp: Some(60),
            types: Some(vec!["Lightning".to_string()]),
            ..RawCard::default()
        }
    }

    #[test]
    fn normalizes_pokemon_card() {
        let card = adapter()
            .normalize(&pikachu_raw(), &language::resolve("en"))
            .unwrap();

        match &card {
            Card::Pokemon {
                common,
                stage,
                hp,
                types,
            } => {
                assert_eq!(common.id, "sv01-025");
                assert_eq!(common.set_id, "sv01");
                assert_eq!(common.number, "025");
                assert_eq!(
                    common.image_base_url,
                    "https://assets.example.net/en/sv01/025"
                );
                assert_eq!(*stage, Stage::Basic);
                assert_eq!(*hp, 60);
                assert_eq!(types, &["Lightning".to_string()]);
            }
            other => panic!("expected pokemon variant, got {:?}", other),
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = pikachu_raw();
        let locale = language::resolve("fr");
        let first = adapter().normalize(&raw, &locale).unwrap();
        let second = adapter().normalize(&raw, &locale).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn trainer_missing_effect_is_malformed() {
        let raw = RawCard {
            id: Some("sv01-166".to_string()),
            local_id: Some("166".to_string()),
            name: Some("Mesagoza".to_string()),
            category: Some("trainer".to_string()),
            set: Some(RawSetRef {
                id: Some("sv01".to_string()),
                name: None,
            }),
            trainer_type: Some("Stadium".to_string()),
            effect: None,
            ..RawCard::default()
        };

        assert!(matches!(
            adapter().normalize(&raw, &language::resolve("en")),
            Err(DomainError::MalformedRecord(_))
        ));
    }

    #[test]
    fn missing_set_id_is_malformed() {
        let mut raw = pikachu_raw();
        raw.set = None;
        assert!(matches!(
            adapter().normalize(&raw, &language::resolve("en")),
            Err(DomainError::MalformedRecord(_))
        ));
    }

    #[test]
    fn image_url_shapes() {
        let base = adapter().image_base_url(&language::resolve("en"), "sv01", "025");
        assert_eq!(
            resolve_image_url(&base, "high", "png").unwrap(),
            "https://assets.example.net/en/sv01/025/high.png"
        );
        assert_eq!(
            resolve_image_url(&base, "low", "webp").unwrap(),
            "https://assets.example.net/en/sv01/025/low.webp"
        );
    }

    #[test]
    fn unknown_image_variants_are_rejected() {
        assert!(matches!(
            resolve_image_url("base", "medium", "png"),
            Err(DomainError::UnsupportedImageVariant(_))
        ));
        assert!(matches!(
            resolve_image_url("base", "high", "gif"),
            Err(DomainError::UnsupportedImageVariant(_))
        ));
    }

    #[test]
    fn normalizes_set_with_card_count() {
        let raw = RawSet {
            id: Some("sv01".to_string()),
            name: Some("Scarlet & Violet".to_string()),
            logo: Some("https://assets.example.net/en/sv01/logo".to_string()),
            card_count: Some(RawCardCount {
                total: Some(258),
                official: Some(198),
            }),
        };

        let set = adapter().normalize_set(&raw).unwrap();
        assert_eq!(set.total_cards, 258);
        assert_eq!(set.name, "Scarlet & Violet");
    }
}
