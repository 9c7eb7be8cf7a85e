//! Typed settings store.

use nebula_types::{CursorShape, SettingError, SettingKey, SettingValue};

/// Every [`SettingKey`] with its current value, in display order.
///
/// Values are replaced only through [`SettingsStore::update`], which coerces
/// the raw string to the key's kind, so the type of a slot never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsStore {
    values: [SettingValue; SettingKey::ALL.len()],
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            values: SettingKey::ALL.map(SettingKey::default_value),
        }
    }
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: SettingKey) -> &SettingValue {
        &self.values[key.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        SettingKey::ALL.into_iter().zip(self.values.iter())
    }

    /// Validate and store a new value. `key` may carry the leading `-` used on
    /// the command line.
    pub fn update(&mut self, key: &str, raw: &str) -> Result<&SettingValue, SettingError> {
        let key: SettingKey = key.strip_prefix('-').unwrap_or(key).parse()?;
        let value = key.coerce(raw)?;
        tracing::info!(setting = key.as_str(), %value, "Setting updated");
        let slot = &mut self.values[key.index()];
        *slot = value;
        Ok(slot)
    }

    /// Apply config-file overrides. Invalid entries are skipped and returned.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Vec<SettingError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rejected = Vec::new();
        for (key, raw) in overrides {
            if let Err(err) = self.update(key, raw) {
                tracing::warn!(error = %err, "Ignoring settings override");
                rejected.push(err);
            }
        }
        rejected
    }

    #[must_use]
    pub fn int(&self, key: SettingKey) -> Option<i64> {
        self.get(key).as_int()
    }

    #[must_use]
    pub fn float(&self, key: SettingKey) -> Option<f64> {
        self.get(key).as_float()
    }

    #[must_use]
    pub fn text(&self, key: SettingKey) -> Option<&str> {
        self.get(key).as_text()
    }

    #[must_use]
    pub fn flag(&self, key: SettingKey) -> Option<bool> {
        self.get(key).as_bool()
    }

    #[must_use]
    pub fn cursor_shape(&self) -> CursorShape {
        self.text(SettingKey::CursorShape)
            .and_then(CursorShape::parse)
            .unwrap_or_default()
    }

    /// One `key (kind) = value` line per setting.
    #[must_use]
    pub fn listing(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{key} ({}) = {value}", key.kind()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
