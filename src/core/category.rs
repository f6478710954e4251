//! Message categories
//!
//! A category is a free-form tag orthogonal to severity ("Success",
//! "Failure", ...). Each configured category may carry a display color, and
//! at most one may be flagged as the default applied to uncategorized
//! messages.

use super::color::Color;
use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display settings for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CategoryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub is_default: bool,
}

impl CategoryInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colored(color: Color) -> Self {
        Self {
            color: Some(color),
            is_default: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Category name to display settings.
///
/// Lookups are case-insensitive; names are stored as first written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    items: BTreeMap<String, CategoryInfo>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting blank names and more than one default
    pub fn from_items<I, K>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, CategoryInfo)>,
        K: Into<String>,
    {
        let table = Self {
            items: items.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        let mut default_name: Option<&str> = None;
        for (name, info) in &self.items {
            if name.trim().is_empty() {
                return Err(LoggerError::invalid_category(
                    name.as_str(),
                    "category name must not be blank",
                ));
            }
            if info.is_default {
                if let Some(previous) = default_name {
                    return Err(LoggerError::invalid_category(
                        name.as_str(),
                        format!("'{}' is already the default category", previous),
                    ));
                }
                default_name = Some(name);
            }
        }
        Ok(())
    }

    fn key_of(&self, name: &str) -> Option<&String> {
        let name = name.trim();
        self.items
            .keys()
            .find(|key| key.as_str() == name)
            .or_else(|| self.items.keys().find(|key| key.eq_ignore_ascii_case(name)))
    }

    pub fn get(&self, name: &str) -> Option<&CategoryInfo> {
        self.key_of(name).and_then(|key| self.items.get(key))
    }

    /// Insert or replace an item; a new default clears every other default
    pub fn set_item(&mut self, name: impl Into<String>, info: CategoryInfo) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LoggerError::invalid_category(
                name,
                "category name must not be blank",
            ));
        }
        if info.is_default {
            for existing in self.items.values_mut() {
                existing.is_default = false;
            }
        }
        if let Some(key) = self.key_of(&name).cloned() {
            self.items.remove(&key);
        }
        self.items.insert(name.trim().to_string(), info);
        Ok(())
    }

    /// Remove an item; absent names are ignored
    pub fn remove_item(&mut self, name: &str) {
        if let Some(key) = self.key_of(name).cloned() {
            self.items.remove(&key);
        }
    }

    /// Name of the category flagged as default, if any
    pub fn default_category(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|(_, info)| info.is_default)
            .map(|(name, _)| name.as_str())
    }

    pub fn color_of(&self, name: &str) -> Option<Color> {
        self.get(name).and_then(|info| info.color)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CategoryInfo)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
