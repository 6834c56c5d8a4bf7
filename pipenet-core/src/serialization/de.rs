//! Lenient field decoding for imported records.
//!
//! Editors in the wild write ids and coordinates either as JSON numbers or as
//! numeric strings. Both are normalized to the same Rust type here so that id
//! comparison on import is exact.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) => Some(*value),
            Scalar::Text(text) => text.trim().parse::<f64>().ok(),
            Scalar::Bool(_) => None,
        }
        .filter(|value| value.is_finite())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn as_id(&self) -> Option<u32> {
        if let Scalar::Text(text) = self
            && let Ok(id) = text.trim().parse::<u32>()
        {
            return Some(id);
        }
        self.as_f64()
            .filter(|value| value.fract() == 0.0 && *value >= 0.0 && *value <= f64::from(u32::MAX))
            .map(|value| value as u32)
    }

    fn describe(&self) -> String {
        match self {
            Scalar::Bool(flag) => flag.to_string(),
            Scalar::Number(value) => value.to_string(),
            Scalar::Text(text) => format!("{text:?}"),
        }
    }

    fn as_bool(&self) -> bool {
        match self {
            Scalar::Bool(flag) => *flag,
            Scalar::Number(value) => *value != 0.0,
            Scalar::Text(text) => matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        }
    }
}

/// Id field of an imported entry, keeping "absent" apart from "unusable"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) enum IdField {
    #[default]
    Missing,
    Valid(u32),
    Invalid(String),
}

impl IdField {
    /// Id the entry asks for; zero counts as no request
    pub(super) fn explicit(&self) -> Option<u32> {
        match self {
            IdField::Valid(id) if *id > 0 => Some(*id),
            _ => None,
        }
    }
}

pub(super) fn deserialize_id_field<'de, D>(deserializer: D) -> Result<IdField, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        None => IdField::Missing,
        Some(scalar) => match scalar.as_id() {
            Some(id) => IdField::Valid(id),
            None => IdField::Invalid(scalar.describe()),
        },
    })
}

pub(super) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Scalar::as_f64))
}

pub(super) fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Scalar::as_id))
}

pub(super) fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(Scalar::as_bool))
}
