//! Character records: the raw shape the service returns, the normalized
//! display record, and the reduced copy kept in the favorites store.

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Name used when the service returns no usable name
pub const UNNAMED: &str = "Unnamed";

const SUFFIX_LEN: usize = 6;

/// Record as returned by the character service.
///
/// Every field is optional and decoded leniently: a value of an unexpected
/// type reads as absent instead of failing the record. The service has been
/// seen returning ids as numbers or strings, `thumbnail` instead of `image`,
/// and `occupation` as either a string or a list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCharacter {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub occupation: Option<Occupation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Occupation {
    One(String),
    Many(Vec<Value>),
    /// Numbers, booleans, objects
    Other(Value),
}

/// Strings as is, numbers and booleans in their JSON spelling. Null,
/// arrays and objects have no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Decode `T`, or `None` when the value has another shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Ids stored as either strings or numbers
fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?.to_string())
}

/// Normalized display record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub image: String,
    pub occupation: String,
}

/// Reduced copy of a [`Character`] persisted in the favorites store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub occupation: String,
}

impl From<&Character> for FavoriteEntry {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            image: c.image.clone(),
            occupation: c.occupation.clone(),
        }
    }
}

impl From<&FavoriteEntry> for Character {
    fn from(f: &FavoriteEntry) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            image: f.image.clone(),
            occupation: f.occupation.clone(),
        }
    }
}

/// Six random lowercase base-36 characters
pub fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect()
}

/// Translate a raw service record into a [`Character`]. Never fails:
/// missing or oddly shaped fields fall back to defaults.
pub fn normalize(raw: &RawCharacter) -> Character {
    let name = raw
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(UNNAMED)
        .to_string();

    let id = raw
        .id
        .as_ref()
        .map(|id| id.to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}-{}", name, random_suffix()));

    let image = raw
        .image
        .clone()
        .or_else(|| raw.thumbnail.clone())
        .unwrap_or_default();

    let occupation = match &raw.occupation {
        Some(Occupation::One(s)) => s.clone(),
        Some(Occupation::Many(list)) => list.first().and_then(scalar_text).unwrap_or_default(),
        Some(Occupation::Other(value)) => scalar_text(value).unwrap_or_default(),
        None => String::new(),
    };

    Character {
        id,
        name,
        image,
        occupation,
    }
}

/// Normalize a batch in order. Ids are made unique within the result: a
/// repeated id gets a random suffix appended.
pub fn normalize_batch(raws: &[RawCharacter]) -> Vec<Character> {
    let mut seen = HashSet::new();
    raws.iter()
        .map(|raw| {
            let mut character = normalize(raw);
            if !seen.insert(character.id.clone()) {
                let base = character.id.clone();
                while !seen.insert(character.id.clone()) {
                    character.id = format!("{}-{}", base, random_suffix());
                }
            }
            character
        })
        .collect()
}
