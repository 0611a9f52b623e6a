//! Tests for the workbench facade, over stub transports and in-memory stores.

use super::*;
use crate::llm::{ChatTransport, LLMRequest, RawResponse};
use crate::memory::MemoryStore;
use crate::remote::RemoteSaveError;
use async_trait::async_trait;
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio_test::{assert_err, assert_ok};

fn success_body(text: &str) -> String {
    serde_json::json!({ "choices": [{ "message": { "content": text } }] }).to_string()
}

struct FixedTransport {
    status: u16,
    body: String,
    gate: Option<Arc<Notify>>,
}

impl FixedTransport {
    fn ok(text: &str) -> Self {
        Self {
            status: 200,
            body: success_body(text),
            gate: None,
        }
    }
}

#[async_trait]
impl ChatTransport for FixedTransport {
    async fn post(&self, _request: &LLMRequest) -> Result<RawResponse, CompletionError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(RawResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

#[derive(Default)]
struct RecordingArchive {
    records: Mutex<Vec<ArchiveRecord>>,
    fail: bool,
}

#[async_trait]
impl RemoteArchive for RecordingArchive {
    async fn append(&self, record: &ArchiveRecord) -> Result<(), RemoteSaveError> {
        if self.fail {
            return Err(RemoteSaveError::Network("offline".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn workbench(transport: FixedTransport) -> Workbench {
    let config = Config::default().with_retry_policy(1, 0);
    let client = CompletionClient::new(Arc::new(transport), &config);
    let user = UserProfile {
        user_id: "u-1".to_string(),
        email: "teacher@example.com".to_string(),
        display_name: "Ms. Rivera".to_string(),
    };
    Workbench::new(client, Arc::new(MemoryStore::new()), user)
}

#[tokio::test]
async fn empty_input_is_refused() {
    let bench = workbench(FixedTransport::ok("unused"));
    let err = bench
        .generate(&PromptRequest::new(TaskKind::SummarizeArticle, "   "))
        .await
        .unwrap_err();
    assert_eq!(err, Notification::error(EMPTY_INPUT_MESSAGE));
    assert_eq!(bench.usage().snapshot().total_calls, 0);
}

#[tokio::test]
async fn generate_formats_counts_and_saves() {
    let bench = workbench(FixedTransport::ok("## Summary\n**Key** point"));
    let generation = bench
        .generate(&PromptRequest::new(TaskKind::SummarizeArticle, "A long article"))
        .await
        .unwrap();

    assert_eq!(generation.raw, "## Summary\n**Key** point");
    assert!(generation.display.starts_with("<p class=\"mb-4\"><h2"));
    assert!(generation.rubric.is_none());
    assert!(generation.notices.is_empty());
    assert_eq!(bench.usage().snapshot().total_calls, 1);
    assert!(!bench.is_busy());

    let notice = bench.save(&generation);
    assert_eq!(notice.level, NotificationLevel::Success);
    let saved = bench.history().list();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].feature, "Summarize Articles");
    assert_eq!(saved[0].input, "A long article");
}

#[tokio::test]
async fn rubric_task_gets_rows_and_badges() {
    let bench = workbench(FixedTransport::ok(
        "1. Clarity:\nExcellent (90-100%): precise\nGood: mostly clear",
    ));
    let generation = bench
        .generate(&PromptRequest::new(TaskKind::RubricGenerator, "Persuasive essay"))
        .await
        .unwrap();

    let rows = generation.rubric.as_ref().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].criteria, "Clarity");
    assert!(generation.display.contains("range-badge"));

    let dir = TempDir::new().unwrap();
    let path = bench.export_rubric(&generation, dir.path()).unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("professional_rubric_"));
}

#[tokio::test]
async fn failures_become_error_notifications() {
    let bench = workbench(FixedTransport {
        status: 500,
        body: "boom".to_string(),
        gate: None,
    });
    let err = bench
        .generate(&PromptRequest::new(TaskKind::PlagiarismCheck, "text"))
        .await
        .unwrap_err();
    assert_eq!(err.level, NotificationLevel::Error);
    assert!(err.message.contains("All 1 attempts failed"));
    assert!(!bench.is_busy());
    assert_eq!(bench.usage().snapshot().total_calls, 0);
}

#[tokio::test]
async fn second_request_is_refused_while_one_is_in_flight() {
    let gate = Arc::new(Notify::new());
    let bench = workbench(FixedTransport {
        gate: Some(gate.clone()),
        ..FixedTransport::ok("done")
    });
    let request = PromptRequest::new(TaskKind::AutomaticGrading, "essay");

    let first = bench.generate(&request);
    let second = async {
        while !bench.is_busy() {
            tokio::task::yield_now().await;
        }
        let refused = bench.generate(&request).await;
        gate.notify_one();
        refused
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().raw, "done");
    assert_eq!(second.unwrap_err(), Notification::warning(BUSY_MESSAGE));
    assert!(!bench.is_busy());
}

#[tokio::test]
async fn progress_snaps_to_complete_after_generation() {
    let bench = workbench(FixedTransport::ok("done"));
    let progress = bench.progress();
    assert_eq!(*progress.borrow(), 0);

    bench
        .generate(&PromptRequest::new(TaskKind::CurriculumAnalyzer, "Volcanoes unit"))
        .await
        .unwrap();
    assert_eq!(*progress.borrow(), crate::progress::COMPLETE);
}

#[tokio::test]
async fn archive_receives_record_or_warns() {
    let archive = Arc::new(RecordingArchive::default());
    let bench = workbench(FixedTransport::ok("graded")).with_archive(archive.clone());
    bench
        .generate(&PromptRequest::new(TaskKind::AutomaticGrading, "essay"))
        .await
        .unwrap();
    {
        let records = archive.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].feature, "Automatic Grading");
        assert_eq!(records[0].user_email, "teacher@example.com");
        assert_eq!(records[0].response, "graded");
    }

    let failing = Arc::new(RecordingArchive {
        fail: true,
        ..Default::default()
    });
    let bench = workbench(FixedTransport::ok("graded")).with_archive(failing);
    let generation = bench
        .generate(&PromptRequest::new(TaskKind::AutomaticGrading, "essay"))
        .await
        .unwrap();
    assert_eq!(generation.notices.len(), 1);
    assert_eq!(generation.notices[0].level, NotificationLevel::Warning);
}

#[tokio::test]
async fn export_writes_requested_format() {
    let bench = workbench(FixedTransport::ok("Lesson body"));
    let generation = bench
        .generate(&PromptRequest::new(TaskKind::LessonPlanGenerator, "Fractions"))
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let path = bench.export(&generation, ExportFormat::Json, dir.path()).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("lesson_plan_generator_"));
    assert!(name.ends_with(".json"));

    assert!(bench.export_rubric(&generation, dir.path()).is_err());
}

#[test]
fn history_management_notifications() {
    let bench = workbench(FixedTransport::ok("unused"));
    let entry = bench
        .history()
        .save(NewHistoryEntry::new("content", "Automatic Grading", "input"))
        .unwrap();

    assert_eq!(bench.rename(&entry.id, "  ").level, NotificationLevel::Error);
    assert_eq!(
        bench.rename(&entry.id, "Essay Feedback").level,
        NotificationLevel::Success
    );
    assert_eq!(bench.history().list()[0].feature, "Essay Feedback");

    let dir = TempDir::new().unwrap();
    let path = bench
        .export_entry(&bench.history().list()[0], ExportFormat::Txt, dir.path())
        .unwrap();
    assert!(path.to_string_lossy().contains("essay_feedback_"));

    assert_eq!(bench.delete(&entry.id).level, NotificationLevel::Success);
    assert_eq!(bench.delete(&entry.id).level, NotificationLevel::Warning);
    assert_eq!(bench.clear_history().level, NotificationLevel::Success);
}

#[test]
fn upload_errors_are_notifications() {
    let bench = workbench(FixedTransport::ok("unused"));
    let text = assert_ok!(bench.upload("notes.md", b"# Notes\nPhotosynthesis"));
    assert_eq!(text, "# Notes\nPhotosynthesis");
    let err = bench.upload("scan.pdf", b"\x00\x01ab").unwrap_err();
    assert_eq!(err.level, NotificationLevel::Error);
    assert_err!(bench.upload("empty.txt", b""));
}

#[test]
fn renamed_entry_cannot_export_outside_the_directory() {
    let bench = workbench(FixedTransport::ok("unused"));
    let entry = bench
        .history()
        .save(NewHistoryEntry::new("content", "Automatic Grading", "input"))
        .unwrap();
    bench.rename(&entry.id, "../escaped");

    let root = TempDir::new().unwrap();
    let exports = root.path().join("exports");
    let err = bench
        .export_entry(&bench.history().list()[0], ExportFormat::Txt, &exports)
        .unwrap_err();
    assert_eq!(err.level, NotificationLevel::Error);
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn rubric_export_carries_product_name() {
    let bench = workbench(FixedTransport::ok("unused")).with_product_name("Northside Tutors");
    let generation = Generation {
        task: TaskKind::RubricGenerator,
        input: "essay".to_string(),
        raw: String::new(),
        display: String::new(),
        rubric: Some(crate::rubric::fallback_rubric()),
        generated_at: Utc::now(),
        notices: Vec::new(),
    };

    let dir = TempDir::new().unwrap();
    let path = bench.export_rubric(&generation, dir.path()).unwrap();
    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("<div>Northside Tutors</div>"));
}
