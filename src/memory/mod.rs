//! Local persistence: saved generations and usage counters over a
//! slot-addressed key/value store.

pub mod history;
pub mod store;
pub mod usage;

pub use history::{HistoryEntry, HistoryStats, HistoryStore, NewHistoryEntry, HISTORY_SLOT};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use usage::{DailyUsage, UsageCounters, UsageTracker, MAX_DAILY_ENTRIES, USAGE_SLOT};
