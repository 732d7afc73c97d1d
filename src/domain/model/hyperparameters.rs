//! Hyperparameter sets attached to algorithm instances.
//!
//! A set is either [`Hyperparameters::Absent`] or a sorted mapping of
//! primitive values. The two are distinct identity classes: an empty mapping
//! is *not* the same as no mapping at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single primitive hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperparameterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for HyperparameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for HyperparameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for HyperparameterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for HyperparameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HyperparameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub type HyperparameterMap = BTreeMap<String, HyperparameterValue>;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HyperparameterError {
    #[error("Hyperparameters must be a JSON object or null, got: {0}")]
    NotAnObject(String),
    #[error("Hyperparameter '{key}' is not a primitive value: {value}")]
    NonPrimitive { key: String, value: String },
}

/// Job-specific algorithm configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<HyperparameterMap>", into = "Option<HyperparameterMap>")]
pub enum Hyperparameters {
    #[default]
    Absent,
    Present(HyperparameterMap),
}

impl Hyperparameters {
    pub fn present<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<HyperparameterValue>,
    {
        Self::Present(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_map(&self) -> Option<&HyperparameterMap> {
        match self {
            Self::Absent => None,
            Self::Present(map) => Some(map),
        }
    }

    /// Canonical serialization used for identity comparison.
    ///
    /// `None` for an absent set, otherwise compact JSON with sorted keys.
    pub fn canonical_key(&self) -> Option<String> {
        self.as_map()
            .map(|map| Value::Object(to_json_map(map)).to_string())
    }

    /// Builds a set from a loosely-typed JSON payload. `null` maps to
    /// [`Hyperparameters::Absent`].
    pub fn from_value(value: Value) -> Result<Self, HyperparameterError> {
        let object = match value {
            Value::Null => return Ok(Self::Absent),
            Value::Object(object) => object,
            other => return Err(HyperparameterError::NotAnObject(other.to_string())),
        };

        let mut map = HyperparameterMap::new();
        for (key, value) in object {
            let primitive = match &value {
                Value::Bool(b) => HyperparameterValue::Bool(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => HyperparameterValue::Integer(i),
                    None => HyperparameterValue::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                Value::String(s) => HyperparameterValue::Text(s.clone()),
                _ => {
                    return Err(HyperparameterError::NonPrimitive {
                        key,
                        value: value.to_string(),
                    })
                }
            };
            map.insert(key, primitive);
        }
        Ok(Self::Present(map))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Present(map) => Value::Object(to_json_map(map)),
        }
    }
}

fn to_json_map(map: &HyperparameterMap) -> serde_json::Map<String, Value> {
    map.iter()
        .map(|(k, v)| {
            let value = match v {
                HyperparameterValue::Bool(b) => Value::Bool(*b),
                HyperparameterValue::Integer(i) => Value::from(*i),
                HyperparameterValue::Float(f) => Value::from(*f),
                HyperparameterValue::Text(s) => Value::String(s.clone()),
            };
            (k.clone(), value)
        })
        .collect()
}

impl From<Option<HyperparameterMap>> for Hyperparameters {
    fn from(value: Option<HyperparameterMap>) -> Self {
        match value {
            Some(map) => Self::Present(map),
            None => Self::Absent,
        }
    }
}

impl From<Hyperparameters> for Option<HyperparameterMap> {
    fn from(value: Hyperparameters) -> Self {
        match value {
            Hyperparameters::Absent => None,
            Hyperparameters::Present(map) => Some(map),
        }
    }
}
