//! Saved generations, newest first, kept as one JSON blob.
//!
//! Every mutation is a read-modify-write of the whole list with no locking
//! across processes; two writers racing on the same store lose one update.

use crate::memory::store::{KeyValueStore, StoreError};
use crate::preprocessing::Cleaner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

pub const HISTORY_SLOT: &str = "auralis_history";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub content: String,
    pub feature: String,
    pub input: String,
    pub timestamp: DateTime<Utc>,
}

/// A generation about to be saved; id and timestamp are assigned on save.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub content: String,
    pub feature: String,
    pub input: String,
}

impl NewHistoryEntry {
    pub fn new(
        content: impl Into<String>,
        feature: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            feature: feature.into(),
            input: input.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_generations: usize,
    pub features_used: usize,
    pub last_activity: Option<DateTime<Utc>>,
    pub most_used_feature: Option<String>,
}

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All entries, newest first. Unreadable history is treated as empty.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Error loading history");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "History blob is corrupt, starting empty");
            Vec::new()
        })
    }

    pub fn save(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        self.save_at(entry, Utc::now())
    }

    /// Prepends `entry` stamped with `now`.
    ///
    /// The id is `now` in epoch milliseconds, bumped by one while it collides
    /// with an existing id.
    pub fn save_at(
        &self,
        entry: NewHistoryEntry,
        now: DateTime<Utc>,
    ) -> Result<HistoryEntry, StoreError> {
        let mut entries = self.list();
        let taken: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();

        let mut id = now.timestamp_millis();
        while taken.contains(id.to_string().as_str()) {
            id += 1;
        }

        let saved = HistoryEntry {
            id: id.to_string(),
            content: entry.content,
            feature: entry.feature,
            input: Cleaner::preview(&entry.input),
            timestamp: now,
        };
        entries.insert(0, saved.clone());
        self.write(&entries)?;

        info!(id = %saved.id, feature = %saved.feature, "Saved to history");
        Ok(saved)
    }

    /// Returns whether an entry was removed.
    pub fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries)?;
        Ok(true)
    }

    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.store.remove(HISTORY_SLOT).map_err(|e| {
            warn!(error = %e, "Failed to clear history");
            e
        })
    }

    /// Relabels one entry. Returns whether the id was found.
    pub fn rename_feature(&self, id: &str, label: &str) -> Result<bool, StoreError> {
        let mut entries = self.list();
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(false);
        };
        entry.feature = label.to_string();
        self.write(&entries)?;
        Ok(true)
    }

    /// Entries whose content or feature contains `search` (ignoring case)
    /// and, when given, whose feature equals `feature` exactly.
    pub fn filter(&self, search: &str, feature: Option<&str>) -> Vec<HistoryEntry> {
        let needle = search.to_lowercase();
        self.list()
            .into_iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.content.to_lowercase().contains(&needle)
                    || entry.feature.to_lowercase().contains(&needle)
            })
            .filter(|entry| feature.map_or(true, |f| f.is_empty() || entry.feature == f))
            .collect()
    }

    /// Distinct feature labels in first-seen order.
    pub fn features(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.list()
            .into_iter()
            .filter_map(|entry| seen.insert(entry.feature.clone()).then_some(entry.feature))
            .collect()
    }

    pub fn stats(&self) -> HistoryStats {
        let entries = self.list();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &entries {
            *counts.entry(entry.feature.as_str()).or_default() += 1;
        }
        // Ties go to the feature seen first (the most recent).
        let mut most_used: Option<(&str, usize)> = None;
        for entry in &entries {
            let count = counts[entry.feature.as_str()];
            if most_used.map_or(true, |(_, best)| count > best) {
                most_used = Some((entry.feature.as_str(), count));
            }
        }

        HistoryStats {
            total_generations: entries.len(),
            features_used: counts.len(),
            last_activity: entries.iter().map(|entry| entry.timestamp).max(),
            most_used_feature: most_used.map(|(feature, _)| feature.to_string()),
        }
    }

    fn write(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(entries).map_err(|source| StoreError::Encode {
            slot: HISTORY_SLOT.to_string(),
            source,
        })?;
        self.store.set(HISTORY_SLOT, &blob).map_err(|e| {
            warn!(error = %e, "Failed to persist history");
            e
        })
    }
}
