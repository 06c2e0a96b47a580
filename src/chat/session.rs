// Chat session: the single owner of conversation state
//
// Flow for one user message:
//   classify -> append + persist -> mirror (detached)
//   -> critical? canned crisis reply : prompt -> one model call
//   -> append reply -> narrate (when enabled)

use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::alerts::{AlertState, ALERT_WINDOW};
use crate::classify::{classify_topic, detect_language, Language};
use crate::config::ModelConfig;
use crate::crisis::{
    connection_error_message, crisis_response, empty_response_message, professional_support_note,
    RiskAssessor, RiskLevel,
};
use crate::errors::ChatError;
use crate::prompt::build_request;
use crate::providers::{LlmProvider, ProviderRequest};
use crate::speech::{Narrator, SilentNarrator};
use crate::store::{
    mirror_detached, Conversation, LocalStorage, Message, MessageMirror, NoopMirror,
    MESSAGES_KEY, NARRATION_KEY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

/// Short SHA-256 digest of user text, used in logs instead of the text
pub fn text_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().take(6).map(|b| format!("{b:02x}")).collect()
}

/// Returns the session to idle when the model call ends, including when
/// the future awaiting it is dropped
struct PendingReply<'a> {
    state: &'a mut ChatState,
    finished: bool,
}

impl<'a> PendingReply<'a> {
    fn new(state: &'a mut ChatState) -> Self {
        *state = ChatState::AwaitingResponse;
        Self { state, finished: false }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Model request abandoned before a reply arrived");
        }
        *self.state = ChatState::Idle;
    }
}

/// One model call; every failure becomes a localized reply text
async fn request_reply(
    provider: Option<&dyn LlmProvider>,
    request: &ProviderRequest,
    language: Language,
    risk: RiskLevel,
) -> String {
    let Some(provider) = provider else {
        tracing::error!("No model provider configured");
        return connection_error_message(language).to_string();
    };

    match provider.send_message(request).await {
        Ok(response) => {
            tracing::debug!(
                provider = %response.provider,
                model = %response.model,
                finish_reason = ?response.finish_reason,
                "Model response received"
            );
            let mut content = response
                .text()
                .map(str::to_string)
                .unwrap_or_else(|| empty_response_message(language).to_string());
            if risk == RiskLevel::High {
                content.push_str(professional_support_note(language));
            }
            content
        }
        Err(e) => {
            tracing::error!("Error getting AI response from {}: {:#}", provider.name(), e);
            connection_error_message(language).to_string()
        }
    }
}

pub struct ChatSession {
    storage: LocalStorage,
    conversation: Conversation,
    state: ChatState,
    alerts: AlertState,
    narration: bool,
    assessor: RiskAssessor,
    model: ModelConfig,
    provider: Option<Arc<dyn LlmProvider>>,
    mirror: Arc<dyn MessageMirror>,
    narrator: Arc<dyn Narrator>,
}

impl ChatSession {
    /// Restore the session from local storage
    ///
    /// Without a provider every non-crisis message gets the connection
    /// error reply; crisis handling still works.
    pub fn open(storage: LocalStorage, model: ModelConfig, assessor: RiskAssessor) -> Self {
        let conversation = Conversation::load(&storage);

        let narration = match storage.get::<bool>(NARRATION_KEY) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                tracing::warn!("Ignoring stored narration preference: {}", e);
                false
            }
        };

        let mut alerts = AlertState::default();
        alerts.observe(conversation.recent(ALERT_WINDOW));

        tracing::info!(
            messages = conversation.len(),
            narration,
            "Chat session opened"
        );

        Self {
            storage,
            conversation,
            state: ChatState::Idle,
            alerts,
            narration,
            assessor,
            model,
            provider: None,
            mirror: Arc::new(NoopMirror),
            narrator: Arc::new(SilentNarrator),
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.provider = Some(Arc::from(provider));
        self
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn MessageMirror>) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn alerts(&self) -> AlertState {
        self.alerts
    }

    pub fn narration_enabled(&self) -> bool {
        self.narration
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn narrator(&self) -> &dyn Narrator {
        self.narrator.as_ref()
    }

    pub fn assessor(&self) -> &RiskAssessor {
        &self.assessor
    }

    /// Handle one user message and return the appended reply
    ///
    /// Blank input is ignored (`Ok(None)`). If the returned future is dropped
    /// while the model call is pending, the user message stays in the
    /// conversation without a reply and the session is idle again.
    pub async fn send_message(&mut self, text: &str) -> Result<Option<Message>, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let language = detect_language(text);
        let risk = self.assessor.assess(text);
        let topic = classify_topic(text);

        tracing::info!(
            digest = %text_digest(text),
            %language,
            %risk,
            %topic,
            "User message"
        );

        let history_len = self.conversation.len();
        self.state = ChatState::AwaitingResponse;
        self.append(Message::from_user(text, language, risk, topic));
        mirror_detached(Arc::clone(&self.mirror), text.to_string());

        let reply = if risk == RiskLevel::Critical {
            self.alerts.emergency_contacts = true;
            Message::crisis_reply(crisis_response(language), language)
        } else {
            let request = build_request(
                language,
                risk,
                &self.conversation.messages()[..history_len],
                text,
                &self.model,
            );
            let provider = self.provider.clone();

            let pending = PendingReply::new(&mut self.state);
            let content = request_reply(provider.as_deref(), &request, language, risk).await;
            pending.finish();

            Message::ai_reply(content, language)
        };

        let reply = self.append(reply);
        self.state = ChatState::Idle;

        if self.narration {
            self.narrate(&reply.content, language);
        }

        Ok(Some(reply))
    }

    /// Append, persist and re-run the alert monitor
    fn append(&mut self, message: Message) -> Message {
        let appended = self.conversation.push(message).clone();
        if let Err(e) = self.conversation.save(&self.storage) {
            tracing::warn!("Failed to persist conversation: {}", e);
        }
        self.alerts.observe(self.conversation.recent(ALERT_WINDOW));
        appended
    }

    fn narrate(&self, text: &str, language: Language) {
        if let Err(e) = self.narrator.speak(text, language) {
            tracing::warn!("Narration failed: {:#}", e);
        }
    }

    /// Forget the whole conversation and lower all alerts
    pub fn clear_chat(&mut self) -> Result<(), ChatError> {
        self.narrator.stop();
        self.conversation.clear();
        self.alerts.reset();
        self.storage.remove(MESSAGES_KEY)?;
        tracing::info!("Conversation cleared");
        Ok(())
    }

    pub fn dismiss_psychologist_alert(&mut self) {
        self.alerts.psychologist_alert = false;
    }

    pub fn show_emergency_contacts(&mut self) {
        self.alerts.emergency_contacts = true;
    }

    pub fn hide_emergency_contacts(&mut self) {
        self.alerts.emergency_contacts = false;
    }

    /// Flip the narration preference and return the new value
    pub fn toggle_narration(&mut self) -> Result<bool, ChatError> {
        let enabled = !self.narration;
        self.set_narration(enabled)?;
        Ok(enabled)
    }

    /// Persist the narration preference; turning it off stops playback
    pub fn set_narration(&mut self, enabled: bool) -> Result<(), ChatError> {
        self.narration = enabled;
        if !enabled {
            self.narrator.stop();
        }
        self.storage.set(NARRATION_KEY, &enabled)?;
        tracing::info!("Narration {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Short spoken confirmation after narration is switched on
    ///
    /// Returns false when nothing was spoken: narration is off or the
    /// narrator cannot produce audio.
    pub fn announce_narration(&self, language: Language) -> bool {
        if !self.narration || !self.narrator.is_available() {
            return false;
        }
        let text = match language {
            Language::Indonesian => "Suara diaktifkan",
            Language::English => "Voice enabled",
        };
        self.narrate(text, language);
        true
    }

    /// Read arbitrary text aloud in its detected language
    pub fn speak(&self, text: &str) {
        self.narrate(text, detect_language(text));
    }

    pub fn stop_speaking(&self) {
        self.narrator.stop();
    }

    /// Stop narration and write the final snapshot
    pub fn shutdown(&mut self) -> Result<(), ChatError> {
        self.narrator.stop();
        if !self.conversation.is_empty() {
            self.conversation.save(&self.storage)?;
        }
        tracing::debug!("Chat session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_digest_is_short_and_stable() {
        let a = text_digest("aku sedih");
        assert_eq!(a.len(), 12);
        assert_eq!(a, text_digest("aku sedih"));
        assert_ne!(a, text_digest("aku senang"));
    }
}
