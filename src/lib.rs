//! Auralis: prompt building, a retrying completion client, response
//! formatting, rubric extraction, local history and exports for teachers.

pub mod commands;
pub mod config;
pub mod export;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod postprocessing;
pub mod preprocessing;
pub mod progress;
pub mod prompts;
pub mod remote;
pub mod rubric;

pub use commands::{Generation, Notification, NotificationLevel, Workbench};
pub use config::Config;
pub use export::{export_response, ExportArtifact, ExportFormat};
pub use llm::{CompletionClient, CompletionError};
pub use memory::{HistoryEntry, HistoryStore, UsageCounters, UsageTracker};
pub use postprocessing::ResponseFormatter;
pub use preprocessing::TaskKind;
pub use prompts::{build_prompt, PromptRequest};
pub use rubric::{parse_rubric, RubricRow};
