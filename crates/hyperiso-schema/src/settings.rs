use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("invalid override '{0}', expected '<key>=<value>'")]
    InvalidOverride(String),
}

/// Loosely-typed build settings as supplied by a settings file, CLI overrides,
/// or an embedding template layer.
///
/// Keys are kept sorted so that anything derived from the map (unknown key
/// listings, decode errors) comes out in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSettings(BTreeMap<String, toml::Value>);

impl RawSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`RawSettings::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<toml::Value>,
    ) -> Option<toml::Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &toml::Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<toml::Table> for RawSettings {
    fn from(table: toml::Table) -> Self {
        Self(table.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, toml::Value)> for RawSettings {
    fn from_iter<I: IntoIterator<Item = (K, toml::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

pub fn parse_settings_str(input: &str) -> Result<RawSettings, SettingsError> {
    let table: toml::Table = toml::from_str(input)?;
    Ok(RawSettings::from(table))
}

pub fn parse_settings_file(path: impl AsRef<Path>) -> Result<RawSettings, SettingsError> {
    let content = fs::read_to_string(path)?;
    parse_settings_str(&content)
}

/// Parse a `key=value` override.
///
/// The value is read as a TOML value when it is one (`256`, `true`,
/// `["a", "b"]`, `"quoted"`), otherwise it is taken verbatim as a string so
/// that `iso_url=http://host/x.iso` works without shell-level quoting.
pub fn parse_override(input: &str) -> Result<(String, toml::Value), SettingsError> {
    let Some((key_raw, value_raw)) = input.split_once('=') else {
        return Err(SettingsError::InvalidOverride(input.to_owned()));
    };

    let key = key_raw.trim();
    if key.is_empty() {
        return Err(SettingsError::InvalidOverride(input.to_owned()));
    }

    let value_raw = value_raw.trim();
    let value = toml::from_str::<toml::Table>(&format!("v = {value_raw}"))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(value_raw.to_owned()));

    Ok((key.to_owned(), value))
}
