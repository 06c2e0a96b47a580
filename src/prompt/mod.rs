// Prompt construction for the hosted model
//
// The model does not reliably stay in the user's language, so the language
// directive appears twice: in the system instruction and inline in front of
// the current user turn.

use crate::classify::Language;
use crate::config::ModelConfig;
use crate::crisis::RiskLevel;
use crate::providers::{ChatTurn, ProviderRequest};
use crate::store::{Message, MessageType, Sender};

/// Default number of previous messages sent as context
pub const HISTORY_LIMIT: usize = 12;

/// Risk-specific guidance embedded in the system instruction
pub fn risk_guideline(language: Language, risk: RiskLevel) -> &'static str {
    match (language, risk) {
        (Language::Indonesian, RiskLevel::Low) => {
            "Berikan dukungan positif dan dorong refleksi diri yang sehat."
        }
        (Language::Indonesian, RiskLevel::Medium) => {
            "Fokus pada validasi emosi dan berikan strategi koping yang lembut sambil tetap menjaga percakapan yang natural."
        }
        (Language::Indonesian, RiskLevel::High) => {
            "Tunjukkan empati mendalam dan sarankan untuk mencari bantuan profesional, namun tetap berikan dukungan emosional yang kuat."
        }
        (Language::Indonesian, RiskLevel::Critical) => "RESPONS KRISIS AKAN DIHANDLE SECARA TERPISAH.",
        (Language::English, RiskLevel::Low) => {
            "Provide positive support and encourage healthy self-reflection."
        }
        (Language::English, RiskLevel::Medium) => {
            "Focus on emotional validation and offer gentle coping strategies while maintaining natural conversation."
        }
        (Language::English, RiskLevel::High) => {
            "Show deep empathy and suggest seeking professional help, while still providing strong emotional support."
        }
        (Language::English, RiskLevel::Critical) => "CRISIS RESPONSE WILL BE HANDLED SEPARATELY.",
    }
}

/// Inline instruction prepended to every user turn
pub fn language_directive(language: Language) -> &'static str {
    match language {
        Language::Indonesian => {
            "Mohon jawab dalam Bahasa Indonesia saja. Jangan gunakan Bahasa Inggris sama sekali."
        }
        Language::English => "Please respond in English only. Do not use Indonesian at all.",
    }
}

/// Persona, behavioural rules and risk guidance
pub fn system_prompt(language: Language, risk: RiskLevel) -> String {
    let guideline = risk_guideline(language, risk);
    match language {
        Language::Indonesian => format!(
            "Kamu adalah OtravoceAI, seorang konselor psikologi digital yang empatik, penuh perhatian, dan fokus mendalam pada kesehatan mental.

PENTING - BAHASA: SELALU gunakan Bahasa Indonesia 100% dalam semua respons. Jangan pernah menggunakan Bahasa Inggris atau mencampur bahasa. User menulis dalam Bahasa Indonesia, maka kamu HARUS menjawab dalam Bahasa Indonesia saja.

TUGAS UTAMA:
- Mendengarkan cerita pengguna dengan empati
- Menjaga kesinambungan percakapan
- Memberikan tanggapan yang utuh, lengkap, tidak terpotong, dan relevan secara emosional
- SELALU menyelaraskan respons dengan maksud pengguna
- Jangan memulai respons dengan bantahan, klarifikasi tidak perlu, atau nada defensif

PRINSIP UTAMA:
1. Kesinambungan & Konteks: Ingat isi percakapan sebelumnya dan hindari pengulangan tidak perlu.
2. Empati Mendalam: Validasi dan pahami emosi pengguna secara tulus dan personal.
3. Fleksibilitas Topik: Jika topik tampak non-psikologis, hubungkan ke aspek emosional/mental secara halus. Hanya alihkan bila tidak mungkin dikaitkan.
4. Respons Alami: Hindari kalimat template atau repetitif. Gunakan nada bicara hangat, reflektif, dan tidak menghakimi.
5. Lengkap & Utuh: Jangan memotong tanggapan. Pastikan setiap respons memberikan makna, kehangatan, dan dukungan.
6. Fokus Psikologi:
   - Jangan menjawab pertanyaan yang tidak berkaitan dengan psikologi (mis. resep, coding, berita, produk).
   - Jika pengguna menyimpang, arahkan kembali dengan sopan: \"Saya mohon maaf, saya hanya fokus pada hal-hal yang berkaitan dengan kesehatan mental. Apakah ada perasaan atau pikiran yang ingin Anda ceritakan?\"

PEDOMAN RISIKO: {guideline}

Gunakan bahasa hangat dan personal, validasi perasaan sebelum memberi saran, dan ciptakan ruang aman untuk pengguna mengungkapkan perasaan mereka."
        ),
        Language::English => format!(
            "You are OtravoceAI, a digital psychology counselor who is empathetic, attentive, and deeply focused on mental health.

IMPORTANT - LANGUAGE: ALWAYS use English 100% in all responses. Never use Indonesian or mix languages. The user writes in English, so you MUST respond in English only.

PRIMARY ROLE:
- Listen to users' stories with empathy
- Maintain conversation continuity
- Provide complete, emotionally relevant responses that are never cut off
- ALWAYS align responses with the user's intent
- Don't begin responses with contradictions, unnecessary disclaimers, or defensive tones

CORE PRINCIPLES:
1. Continuity & Context: Remember previous conversation content and avoid unnecessary repetition.
2. Deep Empathy: Genuinely validate and understand the user's emotional experience.
3. Topic Flexibility: If topics seem non-psychological, gently connect to emotional/mental aspects. Only redirect if no connection is possible.
4. Natural Responses: Avoid template or repetitive phrasing. Use warm, reflective, non-judgmental tone.
5. Completeness: Never truncate responses. Ensure every reply provides meaning, warmth, and support.
6. Psychology Focus:
   - Don't answer questions clearly unrelated to psychology (e.g., recipes, programming, news, products).
   - If user drifts off-topic, redirect politely: \"I'm here to support your psychological and emotional health. Is there anything on your mind you'd like to talk about?\"

RISK GUIDELINES: {guideline}

Use warm, human-like language, validate emotions before giving advice, and create a safe space for users to explore their feelings."
        ),
    }
}

/// Map the trailing non-crisis history to role-tagged turns
pub fn history_turns(history: &[Message], limit: usize) -> Vec<ChatTurn> {
    let eligible: Vec<&Message> = history
        .iter()
        .filter(|m| m.kind != Some(MessageType::Crisis))
        .collect();
    let start = eligible.len().saturating_sub(limit);

    eligible[start..]
        .iter()
        .map(|m| match m.sender {
            Sender::User => ChatTurn::user(m.content.clone()),
            Sender::Ai => ChatTurn::assistant(m.content.clone()),
        })
        .collect()
}

/// Build the complete request for one user message
///
/// `history` holds the messages that precede the current one.
pub fn build_request(
    language: Language,
    risk: RiskLevel,
    history: &[Message],
    user_text: &str,
    model: &ModelConfig,
) -> ProviderRequest {
    let mut turns = Vec::with_capacity(model.history_limit + 2);
    turns.push(ChatTurn::system(system_prompt(language, risk)));
    turns.extend(history_turns(history, model.history_limit));
    turns.push(ChatTurn::user(format!(
        "{}\n\n{}",
        language_directive(language),
        user_text.trim()
    )));

    ProviderRequest::new(turns)
        .with_model(model.model.clone())
        .with_max_tokens(model.max_tokens)
        .with_temperature(model.temperature)
        .with_top_p(model.top_p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TopicRelevance;
    use crate::providers::Role;
    use chrono::Utc;

    fn message(sender: Sender, content: &str, kind: MessageType) -> Message {
        Message {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            sender,
            timestamp: Utc::now(),
            language: Some(Language::Indonesian),
            risk_level: None,
            topic_relevance: Some(TopicRelevance::Psychology),
            requires_immediate_help: None,
            kind: Some(kind),
        }
    }

    #[test]
    fn test_system_prompt_embeds_guideline() {
        let prompt = system_prompt(Language::English, RiskLevel::High);
        assert!(prompt.contains("OtravoceAI"));
        assert!(prompt.contains("suggest seeking professional help"));

        let prompt = system_prompt(Language::Indonesian, RiskLevel::Low);
        assert!(prompt.contains("Bahasa Indonesia"));
        assert!(prompt.contains("Berikan dukungan positif"));
    }

    #[test]
    fn test_history_skips_crisis_and_keeps_last_twelve() {
        let mut history = Vec::new();
        for i in 0..10 {
            history.push(message(Sender::User, &format!("u{i}"), MessageType::Normal));
            history.push(message(Sender::Ai, &format!("a{i}"), MessageType::Normal));
        }
        history.push(message(Sender::User, "crisis", MessageType::Crisis));
        history.push(message(Sender::Ai, "template", MessageType::Crisis));

        let turns = history_turns(&history, HISTORY_LIMIT);
        assert_eq!(turns.len(), 12);
        assert_eq!(turns[0].content, "u4");
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[11].content, "a9");
        assert_eq!(turns[11].role, Role::Assistant);
        assert!(turns.iter().all(|t| t.content != "crisis" && t.content != "template"));
    }

    #[test]
    fn test_build_request_shape() {
        let history = vec![
            message(Sender::User, "halo", MessageType::Normal),
            message(Sender::Ai, "halo juga", MessageType::Normal),
        ];
        let config = ModelConfig::default();
        let request = build_request(
            Language::Indonesian,
            RiskLevel::Medium,
            &history,
            "  aku sedih banget  ",
            &config,
        );

        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].content, "halo");
        let last = request.messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(
            last.content,
            format!("{}\n\naku sedih banget", language_directive(Language::Indonesian))
        );
        assert_eq!(request.model, "llama3-8b-8192");
        assert_eq!(request.max_tokens, 600);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_p, Some(0.8));
        assert!(!request.stream);
    }
}
