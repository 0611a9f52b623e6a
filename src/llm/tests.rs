//! Unit tests for the retry loop, driven by scripted transports.

use super::*;
use crate::config::Config;
use crate::preprocessing::TaskKind;
use crate::prompts::PromptRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Step {
    Reply(u16, &'static str),
    Offline,
}

struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post(&self, request: &LLMRequest) -> Result<RawResponse, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Reply(status, body)) => Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
            Some(Step::Offline) | None => {
                Err(CompletionError::Network("Connection error - unable to reach the API".into()))
            }
        }
    }
}

#[derive(Default)]
struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

const OK_BODY: &str = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Graded: B+"}}]}"#;

fn client(transport: Arc<ScriptedTransport>, sleeper: Arc<RecordingSleeper>) -> CompletionClient {
    let config = Config::default().with_api_key("test-key");
    CompletionClient::new(transport, &config).with_sleeper(sleeper)
}

#[tokio::test]
async fn first_attempt_success_does_not_wait() {
    let transport = ScriptedTransport::new(vec![Step::Reply(200, OK_BODY)]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let text = client(transport.clone(), sleeper.clone())
        .complete("grade this")
        .await
        .unwrap();

    assert_eq!(text, "Graded: B+");
    assert_eq!(transport.calls(), 1);
    assert!(sleeper.waits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn request_carries_fixed_parameters() {
    let transport = ScriptedTransport::new(vec![Step::Reply(200, OK_BODY)]);
    let sleeper = Arc::new(RecordingSleeper::default());
    client(transport.clone(), sleeper).complete("hello").await.unwrap();

    let requests = transport.requests.lock().unwrap();
    let sent = &requests[0];
    assert_eq!(sent.model, "mistral-large-latest");
    assert_eq!(sent.max_tokens, 4000);
    assert!((sent.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(sent.messages, vec![Message::user("hello")]);
}

#[tokio::test]
async fn always_failing_endpoint_exhausts_three_attempts() {
    let transport = ScriptedTransport::new(vec![
        Step::Reply(503, "busy"),
        Step::Offline,
        Step::Reply(500, "boom"),
    ]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = client(transport.clone(), sleeper.clone())
        .complete("grade this")
        .await
        .unwrap_err();

    assert_eq!(transport.calls(), 3);
    assert!(matches!(err, CompletionError::Exhausted { attempts: 3, .. }));
    assert_eq!(err.status(), Some(500));
    let message = err.to_string();
    assert!(message.contains('3'), "{}", message);
    assert!(message.contains("500"), "{}", message);
    assert!(message.contains("boom"), "{}", message);
}

#[tokio::test]
async fn backoff_is_linear_one_then_two_seconds() {
    let transport = ScriptedTransport::new(vec![]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = client(transport, sleeper.clone()).complete("x").await.unwrap_err();
    assert!(matches!(err, CompletionError::Exhausted { last_status: None, .. }));

    let waits = sleeper.waits.lock().unwrap().clone();
    assert_eq!(
        waits,
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
    assert!(waits.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn recovers_after_transient_failure() {
    let transport = ScriptedTransport::new(vec![Step::Reply(429, "slow down"), Step::Reply(200, OK_BODY)]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let text = client(transport.clone(), sleeper.clone()).complete("x").await.unwrap();
    assert_eq!(text, "Graded: B+");
    assert_eq!(transport.calls(), 2);
    assert_eq!(*sleeper.waits.lock().unwrap(), vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn malformed_success_body_is_not_retried() {
    let transport = ScriptedTransport::new(vec![
        Step::Reply(200, r#"{"choices":[]}"#),
        Step::Reply(200, OK_BODY),
    ]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = client(transport.clone(), sleeper.clone()).complete("x").await.unwrap_err();
    assert!(matches!(err, CompletionError::Format(_)));
    assert!(!err.is_retryable());
    assert_eq!(transport.calls(), 1);
    assert!(sleeper.waits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generate_tags_result_with_task() {
    let transport = ScriptedTransport::new(vec![Step::Reply(200, OK_BODY)]);
    let sleeper = Arc::new(RecordingSleeper::default());

    let request = PromptRequest::new(TaskKind::AutomaticGrading, "essay");
    let result = client(transport.clone(), sleeper).generate(&request).await.unwrap();
    assert_eq!(result.task, TaskKind::AutomaticGrading);
    assert_eq!(result.text, "Graded: B+");

    let requests = transport.requests.lock().unwrap();
    assert!(requests[0].messages[0].content.contains("Grading Criteria: Standard grading criteria"));
}

#[test]
fn parse_completion_rejects_bad_bodies() {
    assert!(matches!(parse_completion("not json"), Err(CompletionError::Format(_))));
    assert!(matches!(parse_completion("{}"), Err(CompletionError::Format(_))));
    assert!(matches!(
        parse_completion(r#"{"choices":[{"message":{"role":"assistant"}}]}"#),
        Err(CompletionError::Format(_))
    ));
    assert_eq!(parse_completion(OK_BODY).unwrap(), "Graded: B+");
}

#[test]
fn configured_attempt_budget_is_respected() {
    let config = Config::default().with_api_key("k").with_retry_policy(5, 10);
    let client = CompletionClient::new(ScriptedTransport::new(vec![]), &config);
    assert_eq!(client.max_attempts(), 5);
}
