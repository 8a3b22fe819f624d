#![forbid(unsafe_code)]

//! Write-once load-time configuration store.
//!
//! The host supplies one flat dictionary when the page is constructed: the
//! interstitial `type`, a handful of boolean switches, and the localized
//! strings the render layer needs. [`LoadTimeData`] holds it and hands out
//! typed reads.
//!
//! # Invariants
//!
//! 1. **Write-once**: [`set_data`](LoadTimeData::set_data) succeeds exactly
//!    once; a second call is [`ConfigError::AlreadySet`].
//! 2. **Typed reads**: `get_string`/`get_boolean`/`get_integer` fail with
//!    [`ConfigError::TypeMismatch`] rather than coercing.
//! 3. **No defaults**: a missing key is [`ConfigError::MissingKey`]; callers
//!    that treat a key as optional check [`value_exists`](LoadTimeData::value_exists)
//!    first.
//! 4. **Single owner**: the store is constructed explicitly and passed by
//!    reference; there is no global instance.
//!
//! # Failure Modes
//!
//! | Condition                         | Behavior                          |
//! |-----------------------------------|-----------------------------------|
//! | Read before `set_data`            | `ConfigError::Uninitialized`      |
//! | `value_exists` before `set_data`  | Returns `false`                   |
//! | JSON float / array / object / null| `ConfigError::UnsupportedValue`   |
//! | Malformed localized template      | `ConfigError::Template`           |

use std::collections::HashMap;
use std::fmt;

use warnpage_text::{Piece, TemplateError};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i64),
}

impl Value {
    /// Name of the runtime type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Flat key/value configuration dictionary.
pub type Dictionary = HashMap<String, Value>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration errors. All of them are programmer errors: they abort page
/// construction instead of falling back to a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `set_data` was called on a store that already holds data.
    AlreadySet,
    /// A read happened before `set_data`.
    Uninitialized,
    /// The key is not present.
    MissingKey { key: String },
    /// The stored value has a different type than the accessor expects.
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A JSON value that cannot be represented as string, boolean or integer.
    UnsupportedValue { key: String },
    /// The `type` key names no known interstitial kind.
    UnsupportedKind { value: String },
    /// The JSON input is not an object of scalar values.
    Json(String),
    /// The localized string stored under `key` is a malformed template.
    Template { key: String, source: TemplateError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySet => write!(f, "re-setting load-time data"),
            Self::Uninitialized => write!(f, "load-time data was never set"),
            Self::MissingKey { key } => write!(f, "could not find value for '{key}'"),
            Self::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "'{key}' should be a {expected}, found {found}"),
            Self::UnsupportedValue { key } => {
                write!(f, "'{key}' is not a string, boolean or integer")
            }
            Self::UnsupportedKind { value } => {
                write!(f, "unsupported interstitial type '{value}'")
            }
            Self::Json(msg) => write!(f, "invalid load-time data JSON: {msg}"),
            Self::Template { key, source } => write!(f, "localized string '{key}': {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Template { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Write-once configuration store.
#[derive(Debug, Clone, Default)]
pub struct LoadTimeData {
    data: Option<Dictionary>,
}

impl LoadTimeData {
    /// Create an empty, unset store.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: None }
    }

    /// Create a store that is already set to `data`.
    #[must_use]
    pub fn with_data(data: Dictionary) -> Self {
        Self { data: Some(data) }
    }

    /// Set the dictionary. Fails if the store already holds data.
    pub fn set_data(&mut self, data: Dictionary) -> Result<(), ConfigError> {
        if self.data.is_some() {
            crate::error!("re-setting load-time data");
            return Err(ConfigError::AlreadySet);
        }
        crate::debug!(keys = data.len(), "load-time data set");
        self.data = Some(data);
        Ok(())
    }

    /// Parse a JSON object of scalar values and [`set_data`](Self::set_data) it.
    pub fn set_data_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let data = parse_json(json)?;
        self.set_data(data)
    }

    /// Whether `set_data` has been called.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    /// Whether `key` is present. Always `false` before `set_data`.
    #[must_use]
    pub fn value_exists(&self, key: &str) -> bool {
        self.data.as_ref().is_some_and(|d| d.contains_key(key))
    }

    /// Raw value lookup.
    pub fn get_value(&self, key: &str) -> Result<&Value, ConfigError> {
        let Some(data) = self.data.as_ref() else {
            crate::error!(key, "load-time data read before it was set");
            return Err(ConfigError::Uninitialized);
        };
        data.get(key).ok_or_else(|| {
            crate::error!(key, "missing load-time value");
            ConfigError::MissingKey {
                key: key.to_string(),
            }
        })
    }

    /// Read a string value.
    pub fn get_string(&self, key: &str) -> Result<&str, ConfigError> {
        match self.get_value(key)? {
            Value::String(s) => Ok(s.as_str()),
            other => Err(mismatch(key, "string", other)),
        }
    }

    /// Read a boolean value.
    pub fn get_boolean(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get_value(key)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(mismatch(key, "boolean", other)),
        }
    }

    /// Read an integer value.
    pub fn get_integer(&self, key: &str) -> Result<i64, ConfigError> {
        match self.get_value(key)? {
            Value::Integer(n) => Ok(*n),
            other => Err(mismatch(key, "integer", other)),
        }
    }

    /// Read a string and substitute `args` into its placeholders.
    pub fn get_string_f<S: AsRef<str>>(&self, key: &str, args: &[S]) -> Result<String, ConfigError> {
        let template = self.get_string(key)?;
        warnpage_text::format(template, args).map_err(|source| template_error(key, source))
    }

    /// Read a string and split it into literal and substituted pieces.
    pub fn get_substituted_string_pieces<S: AsRef<str>>(
        &self,
        key: &str,
        args: &[S],
    ) -> Result<Vec<Piece>, ConfigError> {
        let template = self.get_string(key)?;
        warnpage_text::format_pieces(template, args).map_err(|source| template_error(key, source))
    }

    /// Merge `replacements` into an already-set store.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn override_values(&mut self, replacements: Dictionary) -> Result<(), ConfigError> {
        let data = self.data.as_mut().ok_or(ConfigError::Uninitialized)?;
        data.extend(replacements);
        Ok(())
    }

    /// Replace the whole store, or clear it with `None`.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn reset_for_testing(&mut self, data: Option<Dictionary>) {
        self.data = data;
    }
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> ConfigError {
    crate::error!(key, expected, found = found.type_name(), "load-time value has wrong type");
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn template_error(key: &str, source: TemplateError) -> ConfigError {
    crate::error!(key, error = %source, "malformed localized string");
    ConfigError::Template {
        key: key.to_string(),
        source,
    }
}

fn parse_json(json: &str) -> Result<Dictionary, ConfigError> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
    let serde_json::Value::Object(map) = parsed else {
        return Err(ConfigError::Json("top-level value is not an object".into()));
    };

    let mut data = Dictionary::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => return Err(ConfigError::UnsupportedValue { key }),
            },
            _ => return Err(ConfigError::UnsupportedValue { key }),
        };
        data.insert(key, value);
    }
    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
