// Chat session behaviour against fake provider and narrator
//
// Covers the crisis short-circuit, the single model call per message,
// the reply decorations, the persisted state and the message mirror.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use otravoce::chat::{ChatSession, ChatState};
use otravoce::classify::{detect_language, Language};
use otravoce::config::ModelConfig;
use otravoce::crisis::{
    connection_error_message, crisis_response, empty_response_message,
    professional_support_note, RiskAssessor,
};
use otravoce::providers::{LlmProvider, ProviderRequest, ProviderResponse, Role};
use otravoce::speech::Narrator;
use otravoce::store::{
    LocalStorage, MessageMirror, MessageType, Sender, MESSAGES_KEY, NARRATION_KEY,
};

enum Reply {
    Text(&'static str),
    Fail,
    /// Answers only after five seconds
    Slow(&'static str),
}

struct FakeProvider {
    reply: Reply,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match self.reply {
            Reply::Slow(text) => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ProviderResponse {
                    id: "chatcmpl-slow".to_string(),
                    model: request.model.clone(),
                    content: text.to_string(),
                    finish_reason: Some("stop".to_string()),
                    provider: "fake".to_string(),
                })
            }
            Reply::Text(text) => Ok(ProviderResponse {
                id: "chatcmpl-test".to_string(),
                model: request.model.clone(),
                content: text.to_string(),
                finish_reason: Some("stop".to_string()),
                provider: "fake".to_string(),
            }),
            Reply::Fail => bail!("HTTP 503"),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }
}

#[derive(Default)]
struct RecordingNarrator {
    spoken: Mutex<Vec<String>>,
    stops: AtomicUsize,
}

impl Narrator for RecordingNarrator {
    fn speak(&self, text: &str, _language: Language) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct RecordingMirror {
    inserts: Mutex<Vec<String>>,
}

#[async_trait]
impl MessageMirror for RecordingMirror {
    async fn insert(&self, text: &str) -> Result<()> {
        self.inserts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[derive(Default)]
struct FailingMirror {
    attempts: AtomicUsize,
}

#[async_trait]
impl MessageMirror for FailingMirror {
    async fn insert(&self, _text: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        bail!("connection refused")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Let detached mirror tasks run until `done` holds
async fn wait_until(done: impl Fn() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
}

struct Harness {
    _temp: TempDir,
    storage: LocalStorage,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl Harness {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path());
        Self {
            _temp: temp,
            storage,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn session(&self, reply: Reply) -> ChatSession {
        let provider = FakeProvider {
            reply,
            calls: Arc::clone(&self.calls),
            requests: Arc::clone(&self.requests),
        };
        ChatSession::open(self.storage.clone(), ModelConfig::default(), RiskAssessor::default())
            .with_provider(Box::new(provider))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_crisis_message_never_calls_model() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("should not be used"));

    let reply = session.send_message("aku mau mati").await.unwrap().unwrap();

    assert_eq!(session.messages().len(), 2);
    assert_eq!(harness.calls(), 0);

    let user = &session.messages()[0];
    assert_eq!(user.sender, Sender::User);
    assert_eq!(user.kind, Some(MessageType::Crisis));
    assert_eq!(user.requires_immediate_help, Some(true));

    assert_eq!(reply.content, crisis_response(Language::Indonesian));
    assert_eq!(reply.kind, Some(MessageType::Crisis));
    assert_eq!(reply.requires_immediate_help, Some(true));

    let alerts = session.alerts();
    assert!(alerts.emergency_contacts);
    assert!(alerts.psychologist_alert);
    assert_eq!(session.state(), ChatState::Idle);
}

#[tokio::test]
async fn test_normal_message_calls_model_once() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("That sounds really hard."));

    let reply = session
        .send_message("I feel anxious about my exams")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(harness.calls(), 1);
    assert_eq!(session.messages().len(), 2);
    assert_eq!(reply.sender, Sender::Ai);
    assert_eq!(reply.content, "That sounds really hard.");
    assert_eq!(reply.kind, Some(MessageType::Normal));
    assert!(!session.alerts().any());
}

#[tokio::test]
async fn test_history_is_sent_with_next_message() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("Aku di sini untukmu."));

    session.send_message("aku sedih hari ini").await.unwrap();
    session.send_message("aku tidak tahu harus cerita ke siapa").await.unwrap();

    let requests = harness.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages.len(), 2);

    let second = &requests[1];
    assert_eq!(second.messages.len(), 4);
    assert_eq!(second.messages[0].role, Role::System);
    assert_eq!(second.messages[1].content, "aku sedih hari ini");
    assert_eq!(second.messages[2].role, Role::Assistant);
    assert!(second.messages[3].content.ends_with("aku tidak tahu harus cerita ke siapa"));
}

#[tokio::test]
async fn test_crisis_turns_are_left_out_of_history() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("Aku mendengarkan."));

    session.send_message("aku mau mati").await.unwrap();
    session.send_message("aku masih sedih").await.unwrap();

    let requests = harness.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 2);
}

#[tokio::test]
async fn test_high_risk_reply_gets_support_note() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("Aku mengerti perasaanmu."));
    let text = "aku merasa terpuruk";

    let reply = session.send_message(text).await.unwrap().unwrap();

    let language = detect_language(text);
    assert!(reply.content.starts_with("Aku mengerti perasaanmu."));
    assert!(reply.content.ends_with(professional_support_note(language)));

    let alerts = session.alerts();
    assert!(alerts.psychologist_alert);
    assert!(!alerts.emergency_contacts);
}

#[tokio::test]
async fn test_model_failure_gives_connection_message() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Fail);
    let text = "I feel lonely lately";

    let reply = session.send_message(text).await.unwrap().unwrap();

    assert_eq!(harness.calls(), 1);
    assert_eq!(reply.content, connection_error_message(detect_language(text)));
    assert_eq!(session.state(), ChatState::Idle);
}

#[tokio::test]
async fn test_empty_model_answer() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("   "));
    let text = "aku cemas";

    let reply = session.send_message(text).await.unwrap().unwrap();
    assert_eq!(reply.content, empty_response_message(detect_language(text)));
}

#[tokio::test]
async fn test_missing_provider_still_handles_crisis() {
    let harness = Harness::new();
    let mut session =
        ChatSession::open(harness.storage.clone(), ModelConfig::default(), RiskAssessor::default());
    assert!(!session.has_provider());

    let reply = session.send_message("halo, aku sedih").await.unwrap().unwrap();
    assert_eq!(reply.content, connection_error_message(Language::Indonesian));

    let reply = session.send_message("I want to die").await.unwrap().unwrap();
    assert_eq!(reply.content, crisis_response(Language::English));
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("unused"));

    assert!(session.send_message("   \n").await.unwrap().is_none());
    assert!(session.messages().is_empty());
    assert_eq!(harness.calls(), 0);
    assert!(!harness.storage.contains(MESSAGES_KEY));
}

#[tokio::test]
async fn test_clear_chat_resets_everything() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("unused"));

    session.send_message("aku mau mati").await.unwrap();
    assert!(harness.storage.contains(MESSAGES_KEY));

    session.clear_chat().unwrap();

    assert_eq!(session.messages().len(), 0);
    assert!(!harness.storage.contains(MESSAGES_KEY));
    assert!(!session.alerts().psychologist_alert);
    assert!(!session.alerts().emergency_contacts);
}

#[tokio::test]
async fn test_conversation_survives_reopen() {
    let harness = Harness::new();
    {
        let mut session = harness.session(Reply::Text("unused"));
        session.send_message("aku mau mati").await.unwrap();
        session.dismiss_psychologist_alert();
        session.shutdown().unwrap();
    }

    let session = harness.session(Reply::Text("unused"));
    assert_eq!(session.messages().len(), 2);
    assert!(session.messages()[1].is_crisis());
    // Alerts are re-derived from the restored messages
    assert!(session.alerts().emergency_contacts);
    assert!(session.alerts().psychologist_alert);
}

#[tokio::test]
async fn test_alert_flags_can_be_toggled() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Text("unused"));

    session.show_emergency_contacts();
    assert!(session.alerts().emergency_contacts);
    session.hide_emergency_contacts();
    assert!(!session.alerts().emergency_contacts);

    session.send_message("aku merasa terpuruk").await.unwrap();
    assert!(session.alerts().psychologist_alert);
    session.dismiss_psychologist_alert();
    assert!(!session.alerts().psychologist_alert);
}

#[tokio::test]
async fn test_narration_preference_and_playback() {
    let harness = Harness::new();
    let narrator = Arc::new(RecordingNarrator::default());

    let mut session = harness
        .session(Reply::Text("Tarik napas pelan-pelan."))
        .with_narrator(narrator.clone());
    assert!(!session.narration_enabled());

    session.send_message("aku cemas").await.unwrap();
    assert!(narrator.spoken.lock().unwrap().is_empty());

    assert!(session.toggle_narration().unwrap());
    assert_eq!(harness.storage.get::<bool>(NARRATION_KEY).unwrap(), Some(true));

    session.send_message("aku masih cemas").await.unwrap();
    assert_eq!(
        narrator.spoken.lock().unwrap().as_slice(),
        &["Tarik napas pelan-pelan.".to_string()]
    );

    let reopened = harness.session(Reply::Text("unused"));
    assert!(reopened.narration_enabled());

    let stops_before = narrator.stops.load(Ordering::SeqCst);
    session.set_narration(false).unwrap();
    assert!(narrator.stops.load(Ordering::SeqCst) > stops_before);
    assert_eq!(harness.storage.get::<bool>(NARRATION_KEY).unwrap(), Some(false));
}

#[tokio::test]
async fn test_dropped_send_leaves_session_usable() {
    let harness = Harness::new();
    let mut session = harness.session(Reply::Slow("too late"));

    let timed_out = tokio::time::timeout(
        Duration::from_millis(50),
        session.send_message("aku sedih"),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(harness.calls(), 1);
    assert_eq!(session.state(), ChatState::Idle);

    let reply = session.send_message("aku mau mati").await.unwrap().unwrap();
    assert_eq!(reply.content, crisis_response(Language::Indonesian));
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.state(), ChatState::Idle);
}

#[tokio::test]
async fn test_user_messages_are_mirrored() {
    let harness = Harness::new();
    let mirror = Arc::new(RecordingMirror::default());
    let mut session = harness
        .session(Reply::Text("That sounds really hard."))
        .with_mirror(mirror.clone());

    session.send_message("  I feel anxious about my exams \n").await.unwrap();
    session.send_message("aku mau mati").await.unwrap();
    wait_until(|| mirror.inserts.lock().unwrap().len() == 2).await;

    assert_eq!(
        mirror.inserts.lock().unwrap().as_slice(),
        &["I feel anxious about my exams".to_string(), "aku mau mati".to_string()]
    );
}

#[tokio::test]
async fn test_mirror_failure_does_not_block_reply() {
    let harness = Harness::new();
    let mirror = Arc::new(FailingMirror::default());
    let mut session = harness
        .session(Reply::Text("Aku di sini."))
        .with_mirror(mirror.clone());

    let reply = session.send_message("aku cemas").await.unwrap();
    wait_until(|| mirror.attempts.load(Ordering::SeqCst) == 1).await;

    assert_eq!(reply.map(|m| m.content).as_deref(), Some("Aku di sini."));
    assert_eq!(mirror.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(session.messages().len(), 2);
}

#[tokio::test]
async fn test_enabling_narration_is_announced() {
    let harness = Harness::new();
    let narrator = Arc::new(RecordingNarrator::default());
    let mut session = harness
        .session(Reply::Text("unused"))
        .with_narrator(narrator.clone());

    assert!(!session.announce_narration(Language::Indonesian));
    assert!(narrator.spoken.lock().unwrap().is_empty());

    session.set_narration(true).unwrap();
    assert!(session.announce_narration(Language::Indonesian));
    assert!(session.announce_narration(Language::English));
    assert_eq!(
        narrator.spoken.lock().unwrap().as_slice(),
        &["Suara diaktifkan".to_string(), "Voice enabled".to_string()]
    );
}
