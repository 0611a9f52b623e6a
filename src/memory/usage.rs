//! API call counters with a rolling week of per-day totals.

use crate::memory::store::{KeyValueStore, StoreError};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const USAGE_SLOT: &str = "auralis_usage_data";
pub const MAX_DAILY_ENTRIES: usize = 7;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub calls: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub total_calls: u64,
    pub today_calls: u64,
    pub this_week_calls: u64,
    pub this_month_calls: u64,
    pub daily_usage: Vec<DailyUsage>,
}

impl UsageCounters {
    /// Counts one call made on `today`.
    ///
    /// `daily_usage` stays sorted by date and holds at most
    /// [`MAX_DAILY_ENTRIES`] of the most recent days.
    pub fn record(&mut self, today: NaiveDate) {
        self.total_calls += 1;
        self.today_calls += 1;
        self.this_week_calls += 1;
        self.this_month_calls += 1;

        if let Some(day) = self.daily_usage.iter_mut().find(|d| d.date == today) {
            day.calls += 1;
            return;
        }

        self.daily_usage.push(DailyUsage {
            date: today,
            calls: 1,
        });
        self.daily_usage.sort_by_key(|d| d.date);
        let excess = self.daily_usage.len().saturating_sub(MAX_DAILY_ENTRIES);
        self.daily_usage.drain(..excess);
    }
}

pub struct UsageTracker {
    store: Arc<dyn KeyValueStore>,
}

impl UsageTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current counters; zeroed when the slot is absent or unreadable.
    pub fn snapshot(&self) -> UsageCounters {
        match self.store.get(USAGE_SLOT) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Usage data is corrupt, starting from zero");
                UsageCounters::default()
            }),
            Ok(None) => UsageCounters::default(),
            Err(e) => {
                warn!(error = %e, "Error loading usage data");
                UsageCounters::default()
            }
        }
    }

    pub fn increment(&self, today: NaiveDate) -> Result<UsageCounters, StoreError> {
        let mut counters = self.snapshot();
        counters.record(today);

        let blob = serde_json::to_string(&counters).map_err(|source| StoreError::Encode {
            slot: USAGE_SLOT.to_string(),
            source,
        })?;
        self.store.set(USAGE_SLOT, &blob)?;

        debug!(total = counters.total_calls, %today, "Usage incremented");
        Ok(counters)
    }

    /// [`Self::increment`] for the current UTC date.
    pub fn increment_now(&self) -> Result<UsageCounters, StoreError> {
        self.increment(Utc::now().date_naive())
    }
}
