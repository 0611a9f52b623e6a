//! User-facing operations. Every failure comes back as a [`Notification`]
//! the UI can show as-is.

use crate::config::{Config, UserProfile, PRODUCT_NAME};
use crate::export::{self, ExportFormat};
use crate::llm::{CompletionClient, CompletionError};
use crate::memory::{
    FileStore, HistoryEntry, HistoryStore, KeyValueStore, NewHistoryEntry, UsageTracker,
};
use crate::postprocessing::ResponseFormatter;
use crate::preprocessing::{Cleaner, TaskKind};
use crate::progress::ProgressTicker;
use crate::prompts::PromptRequest;
use crate::remote::{ArchiveRecord, HttpArchive, RemoteArchive};
use crate::rubric::{parse_rubric, RubricRow};
use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text or upload a file.";
pub const BUSY_MESSAGE: &str = "A response is already being generated. Please wait.";

const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);
const PROGRESS_STEP: u8 = 5;
const PROGRESS_CAP: u8 = 90;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// One completed request, ready for display, saving or export.
#[derive(Debug, Clone)]
pub struct Generation {
    pub task: TaskKind,
    pub input: String,
    pub raw: String,
    pub display: String,
    /// Structured rows, rubric task only.
    pub rubric: Option<Vec<RubricRow>>,
    pub generated_at: DateTime<Utc>,
    /// Non-fatal problems met along the way (e.g. archive failures).
    pub notices: Vec<Notification>,
}

/// Clears the in-flight flag however `generate` exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Facade over the completion client and local stores.
///
/// At most one generation runs at a time per workbench.
pub struct Workbench {
    client: CompletionClient,
    history: HistoryStore,
    usage: UsageTracker,
    archive: Option<Arc<dyn RemoteArchive>>,
    user: UserProfile,
    product_name: String,
    in_flight: AtomicBool,
    progress: watch::Sender<u8>,
}

impl Workbench {
    pub fn new(client: CompletionClient, store: Arc<dyn KeyValueStore>, user: UserProfile) -> Self {
        Self {
            client,
            history: HistoryStore::new(store.clone()),
            usage: UsageTracker::new(store),
            archive: None,
            user,
            product_name: PRODUCT_NAME.to_string(),
            in_flight: AtomicBool::new(false),
            progress: watch::channel(0).0,
        }
    }

    /// HTTP client, file-backed stores under `data_dir` and, when configured,
    /// the remote archive.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = CompletionClient::from_config(config).context("creating completion client")?;
        let store = FileStore::open(&config.data_dir)
            .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;

        let mut workbench = Self::new(client, Arc::new(store), config.user.clone())
            .with_product_name(&config.product_name);
        if let Some(archive) = HttpArchive::from_config(config).context("creating archive client")? {
            workbench = workbench.with_archive(Arc::new(archive));
        }
        Ok(workbench)
    }

    pub fn with_archive(mut self, archive: Arc<dyn RemoteArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Name stamped on exports.
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// Cosmetic progress of the current generation, 0 to 100.
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one task end to end: prompt, completion, formatting, usage count
    /// and best-effort archiving.
    pub async fn generate(&self, request: &PromptRequest) -> Result<Generation, Notification> {
        if request.primary_text().trim().is_empty() {
            return Err(Notification::error(EMPTY_INPUT_MESSAGE));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(task = %request.task(), "Generation refused, another is in flight");
            return Err(Notification::warning(BUSY_MESSAGE));
        }
        let _in_flight = InFlight(&self.in_flight);
        let ticker = ProgressTicker::attach(
            self.progress.clone(),
            PROGRESS_INTERVAL,
            PROGRESS_STEP,
            PROGRESS_CAP,
        );

        let result = self.client.generate(request).await.map_err(|e| {
            error!(task = %request.task(), error = %e, "Generation failed");
            Notification::error(describe_failure(&e))
        })?;
        ticker.finish();

        if let Err(e) = self.usage.increment_now() {
            warn!(error = %e, "Could not record usage");
        }

        let task = result.task;
        let display = ResponseFormatter::for_task(task).format(&result.text);
        let rubric = task.is_rubric().then(|| parse_rubric(&result.text));

        let mut generation = Generation {
            task,
            input: request.primary_text().to_string(),
            raw: result.text,
            display,
            rubric,
            generated_at: Utc::now(),
            notices: Vec::new(),
        };

        if let Some(notice) = self.archive(&generation).await {
            generation.notices.push(notice);
        }

        info!(task = %task, chars = generation.raw.len(), "Generation completed");
        Ok(generation)
    }

    async fn archive(&self, generation: &Generation) -> Option<Notification> {
        let archive = self.archive.as_ref()?;
        let record = ArchiveRecord {
            user_id: self.user.user_id.clone(),
            feature: generation.task.label().to_string(),
            input: generation.input.clone(),
            response: generation.raw.clone(),
            timestamp: generation.generated_at,
            user_email: self.user.email.clone(),
            user_name: self.user.display_name.clone(),
        };

        match archive.append(&record).await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Failed to archive generation");
                Some(Notification::warning(
                    "Response generated, but it could not be saved to your online archive.",
                ))
            }
        }
    }

    pub fn save(&self, generation: &Generation) -> Notification {
        let entry = NewHistoryEntry::new(
            generation.raw.clone(),
            generation.task.label(),
            generation.input.clone(),
        );
        match self.history.save(entry) {
            Ok(_) => Notification::success("Response saved to history!"),
            Err(e) => Notification::error(format!("Failed to save to history: {}", e)),
        }
    }

    pub fn export(
        &self,
        generation: &Generation,
        format: ExportFormat,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Notification> {
        self.export_to(&generation.raw, generation.task.label(), format, dir.as_ref())
    }

    /// Exports a saved history entry under its (possibly renamed) feature label.
    pub fn export_entry(
        &self,
        entry: &HistoryEntry,
        format: ExportFormat,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Notification> {
        self.export_to(&entry.content, &entry.feature, format, dir.as_ref())
    }

    /// Writes the rubric table page; rubric generations only.
    pub fn export_rubric(
        &self,
        generation: &Generation,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Notification> {
        let rows = generation
            .rubric
            .as_deref()
            .ok_or_else(|| Notification::error("Only rubric responses can be exported as a table."))?;
        let artifact = export::export_rubric_html(rows, &self.product_name, &Local::now());
        export::write_to_dir(&artifact, dir)
            .map_err(|e| Notification::error(format!("Export failed: {}", e)))
    }

    /// Reads an uploaded file into prompt text.
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, Notification> {
        Cleaner::extract(filename, bytes).map_err(|e| {
            warn!(filename, error = %e, "Upload rejected");
            Notification::error(e.to_string())
        })
    }

    pub fn rename(&self, id: &str, label: &str) -> Notification {
        let label = label.trim();
        if label.is_empty() {
            return Notification::error("Feature name cannot be empty.");
        }
        match self.history.rename_feature(id, label) {
            Ok(true) => Notification::success("Feature name updated!"),
            Ok(false) => Notification::warning("That history item no longer exists."),
            Err(e) => Notification::error(format!("Failed to rename: {}", e)),
        }
    }

    pub fn delete(&self, id: &str) -> Notification {
        match self.history.delete_by_id(id) {
            Ok(true) => Notification::success("Item deleted from history"),
            Ok(false) => Notification::warning("That history item no longer exists."),
            Err(e) => Notification::error(format!("Failed to delete: {}", e)),
        }
    }

    fn export_to(
        &self,
        content: &str,
        feature: &str,
        format: ExportFormat,
        dir: &Path,
    ) -> Result<PathBuf, Notification> {
        let artifact = export::export_response(
            content,
            feature,
            format,
            &self.product_name,
            &Local::now(),
        )
        .map_err(|e| Notification::error(format!("Export failed: {}", e)))?;
        export::write_to_dir(&artifact, dir)
            .map_err(|e| Notification::error(format!("Export failed: {}", e)))
    }

    pub fn clear_history(&self) -> Notification {
        match self.history.clear_all() {
            Ok(()) => Notification::success("History cleared"),
            Err(e) => Notification::error(format!("Failed to clear history: {}", e)),
        }
    }
}

fn describe_failure(error: &CompletionError) -> String {
    match error {
        CompletionError::Exhausted { .. } => {
            format!("Failed to generate response. {}", error)
        }
        other => format!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests;
