use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

const LIKE_FIELD: &str = "isLike";

/// One day's photo record, as returned by the photo API.
///
/// The payload is kept as an untyped JSON object so fields the app does not
/// read survive a round-trip through storage unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    payload: Map<String, Value>,
}

impl ImageRecord {
    /// Parse a record from JSON text. The text must hold a JSON object.
    pub fn parse(json: &str) -> AppResult<Self> {
        let payload = serde_json::from_str(json)?;
        Ok(Self { payload })
    }

    /// Serialize the current state, including any like mutation.
    pub fn to_json(&self) -> String {
        Value::Object(self.payload.clone()).to_string()
    }

    pub fn is_liked(&self) -> bool {
        self.payload
            .get(LIKE_FIELD)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// In-memory only; persist with `to_json`.
    pub fn set_liked(&mut self, flag: bool) {
        self.payload.insert(LIKE_FIELD.to_string(), Value::Bool(flag));
    }

    pub fn display_url(&self) -> AppResult<&str> {
        self.text_at(&["urls", "small"])
    }

    pub fn author_name(&self) -> AppResult<&str> {
        self.text_at(&["user", "name"])
    }

    pub fn author_bio(&self) -> AppResult<&str> {
        self.text_at(&["user", "bio"])
    }

    pub fn author_location(&self) -> AppResult<&str> {
        self.text_at(&["user", "location"])
    }

    /// Walk a nested path to a string. `null` reads as empty text; an absent
    /// path or any other type is a missing field.
    fn text_at(&self, path: &[&str]) -> AppResult<&str> {
        let missing = || AppError::MissingField(path.join("."));

        let (first, rest) = path.split_first().ok_or_else(missing)?;
        let mut value = self.payload.get(*first).ok_or_else(missing)?;
        for segment in rest {
            value = value.get(*segment).ok_or_else(missing)?;
        }

        match value {
            Value::String(s) => Ok(s.as_str()),
            Value::Null => Ok(""),
            _ => Err(missing()),
        }
    }
}

impl FromStr for ImageRecord {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
