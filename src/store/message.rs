// Conversation message record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{Language, TopicRelevance};
use crate::crisis::RiskLevel;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// Crisis messages are excluded from model context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Crisis,
    Normal,
}

/// One entry in the conversation
///
/// Metadata is computed once when the message is created and never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_relevance: Option<TopicRelevance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_immediate_help: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageType>,
}

impl Message {
    /// A user message with its classifier results
    ///
    /// Critical risk tags the message as a crisis that needs immediate help.
    pub fn from_user(
        content: impl Into<String>,
        language: Language,
        risk: RiskLevel,
        topic: TopicRelevance,
    ) -> Self {
        let critical = risk == RiskLevel::Critical;
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            language: Some(language),
            risk_level: Some(risk),
            topic_relevance: Some(topic),
            requires_immediate_help: Some(critical),
            kind: Some(if critical { MessageType::Crisis } else { MessageType::Normal }),
        }
    }

    /// A model answer, error apology or other normal reply
    pub fn ai_reply(content: impl Into<String>, language: Language) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender: Sender::Ai,
            timestamp: Utc::now(),
            language: Some(language),
            risk_level: None,
            topic_relevance: Some(TopicRelevance::Psychology),
            requires_immediate_help: None,
            kind: Some(MessageType::Normal),
        }
    }

    /// The canned crisis reply
    pub fn crisis_reply(content: impl Into<String>, language: Language) -> Self {
        Self {
            requires_immediate_help: Some(true),
            kind: Some(MessageType::Crisis),
            ..Self::ai_reply(content, language)
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_crisis(&self) -> bool {
        self.kind == Some(MessageType::Crisis)
    }

    pub fn needs_immediate_help(&self) -> bool {
        self.requires_immediate_help.unwrap_or(false)
    }
}
