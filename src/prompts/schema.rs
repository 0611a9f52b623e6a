//! Data model for a prompt request.

use crate::preprocessing::{AuxField, TaskKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to build one task prompt. Immutable once built; the
/// `with_*` methods consume and return the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    task: TaskKind,
    primary_text: String,
    #[serde(default)]
    auxiliary: BTreeMap<String, String>,
}

impl PromptRequest {
    pub fn new(task: TaskKind, primary_text: impl Into<String>) -> Self {
        Self {
            task,
            primary_text: primary_text.into(),
            auxiliary: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auxiliary.insert(key.into(), value.into());
        self
    }

    pub fn with_fields<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.auxiliary
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn primary_text(&self) -> &str {
        &self.primary_text
    }

    pub fn auxiliary(&self) -> &BTreeMap<String, String> {
        &self.auxiliary
    }

    /// A non-blank auxiliary value.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.auxiliary
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn field_or_default(&self, field: &AuxField) -> &str {
        self.field(field.key).unwrap_or(field.default)
    }
}
