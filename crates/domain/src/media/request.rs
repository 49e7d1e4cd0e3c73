//! Validated `search` service request.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;

use super::MediaType;

/// Number of results per media type when the caller does not say.
pub const DEFAULT_LIMIT: u32 = 5;

const FIELD_NAME: &str = "name";
const FIELD_ARTIST: &str = "artist";
const FIELD_ALBUM: &str = "album";
const FIELD_MEDIA_TYPE: &str = "media_type";
const FIELD_LIMIT: &str = "limit";
const FIELD_LIBRARY_ONLY: &str = "library_only";

const KNOWN_FIELDS: [&str; 6] = [
    FIELD_NAME,
    FIELD_ARTIST,
    FIELD_ALBUM,
    FIELD_MEDIA_TYPE,
    FIELD_LIMIT,
    FIELD_LIBRARY_ONLY,
];

/// A media search after schema validation and coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// `None` means every media type.
    pub media_types: Option<Vec<MediaType>>,
    pub limit: u32,
    pub library_only: bool,
}

impl SearchRequest {
    /// A request for `name` with every optional field at its default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: None,
            album: None,
            media_types: None,
            limit: DEFAULT_LIMIT,
            library_only: false,
        }
    }

    /// Validate raw service-call data.
    ///
    /// Strings and numbers are accepted wherever text is expected,
    /// `media_type` may be a single value or a list, `limit` accepts
    /// integer-like strings and `library_only` accepts the usual
    /// yes/no/on/off spellings.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn from_service_data(data: &Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = data else {
            return Err(ValidationError::InvalidType {
                field: "data",
                expected: "an object",
            });
        };

        if let Some(unknown) = fields
            .keys()
            .find(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        {
            return Err(ValidationError::UnexpectedField(unknown.clone()));
        }

        let name = optional(fields, FIELD_NAME, coerce_string)?
            .ok_or(ValidationError::MissingField(FIELD_NAME))?;
        let media_types = optional(fields, FIELD_MEDIA_TYPE, coerce_media_types)?
            .filter(|types| !types.is_empty());

        Ok(Self {
            name,
            artist: optional(fields, FIELD_ARTIST, coerce_string)?,
            album: optional(fields, FIELD_ALBUM, coerce_string)?,
            media_types,
            limit: optional(fields, FIELD_LIMIT, coerce_limit)?.unwrap_or(DEFAULT_LIMIT),
            library_only: optional(fields, FIELD_LIBRARY_ONLY, coerce_bool)?.unwrap_or(false),
        })
    }

    /// Compose the free-text query sent to the music server.
    ///
    /// Artist and album are prefixed to the name, separated by `" - "`.
    #[must_use]
    pub fn query(&self) -> String {
        match (self.artist.as_deref(), self.album.as_deref()) {
            (Some(artist), Some(album)) if !artist.is_empty() && !album.is_empty() => {
                format!("{artist} - {album} - {}", self.name)
            }
            (_, Some(album)) if !album.is_empty() => format!("{album} - {}", self.name),
            (Some(artist), _) if !artist.is_empty() => format!("{artist} - {}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Media types to search, expanding "all" into the explicit list.
    #[must_use]
    pub fn effective_media_types(&self) -> Vec<MediaType> {
        self.media_types
            .clone()
            .unwrap_or_else(|| MediaType::ALL.to_vec())
    }
}

fn optional<T>(
    fields: &Map<String, Value>,
    field: &'static str,
    coerce: fn(&'static str, &Value) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce(field, value).map(Some),
    }
}

fn coerce_string(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn coerce_media_types(
    field: &'static str,
    value: &Value,
) -> Result<Vec<MediaType>, ValidationError> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    items
        .iter()
        .map(|item| {
            let Value::String(text) = item else {
                return Err(ValidationError::InvalidType {
                    field,
                    expected: "a media type name",
                });
            };
            text.parse().map_err(|_| ValidationError::InvalidValue {
                field,
                value: text.clone(),
            })
        })
        .collect()
}

fn coerce_limit(field: &'static str, value: &Value) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        field,
        value: value.to_string(),
    };
    match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid),
        Value::String(text) => text.trim().parse::<u32>().map_err(|_| invalid()),
        _ => Err(ValidationError::InvalidType {
            field,
            expected: "an integer",
        }),
    }
}

fn coerce_bool(field: &'static str, value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => Ok(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "enable" => Ok(true),
            "0" | "false" | "no" | "off" | "disable" => Ok(false),
            _ => Err(ValidationError::InvalidValue {
                field,
                value: text.clone(),
            }),
        },
        _ => Err(ValidationError::InvalidType {
            field,
            expected: "a boolean",
        }),
    }
}
