// Slash command handling

use crate::crisis::{RiskAssessor, RiskLevel};

/// REPL commands; anything not starting with '/' is a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Clear,
    History,
    /// `None` toggles
    Tts(Option<bool>),
    Stop,
    Replay,
    Resources,
    Privacy,
    Emergency,
    HideEmergency,
    Dismiss,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if !trimmed.starts_with('/') {
            return None;
        }

        match trimmed {
            "/help" | "/?" => return Some(Command::Help),
            "/quit" | "/exit" => return Some(Command::Quit),
            "/clear" | "/reset" => return Some(Command::Clear),
            "/history" => return Some(Command::History),
            "/tts" => return Some(Command::Tts(None)),
            "/stop" => return Some(Command::Stop),
            "/replay" => return Some(Command::Replay),
            "/resources" => return Some(Command::Resources),
            "/privacy" => return Some(Command::Privacy),
            "/emergency" => return Some(Command::Emergency),
            "/dismiss" => return Some(Command::Dismiss),
            _ => {}
        }

        // /tts on|off
        if let Some(rest) = trimmed.strip_prefix("/tts ") {
            match rest.trim() {
                "on" => return Some(Command::Tts(Some(true))),
                "off" => return Some(Command::Tts(Some(false))),
                _ => {}
            }
        }

        if let Some(rest) = trimmed.strip_prefix("/emergency ") {
            if rest.trim() == "hide" {
                return Some(Command::HideEmergency);
            }
        }

        Some(Command::Unknown(trimmed.to_string()))
    }
}

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Message(String),
}

/// Split a line into a command or a chat message
///
/// An unrecognized slash command that carries risk words goes to the chat
/// without its leading '/', so "/aku mau mati" is never shrugged off as a typo.
pub fn classify_input(line: &str, assessor: &RiskAssessor) -> Option<Input> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Command::parse(trimmed) {
        None => Some(Input::Message(trimmed.to_string())),
        Some(Command::Unknown(name)) => {
            let text = name.trim_start_matches('/').trim();
            if !text.is_empty() && assessor.assess(text) > RiskLevel::Low {
                tracing::debug!("Treating unknown command as a chat message");
                Some(Input::Message(text.to_string()))
            } else {
                Some(Input::Command(Command::Unknown(name)))
            }
        }
        Some(command) => Some(Input::Command(command)),
    }
}

pub fn format_help() -> String {
    r#"Available commands:
  /help             - Show this help message
  /exit             - Exit (conversation is kept)
  /clear            - Delete the conversation and reset alerts
  /history          - Show the whole conversation
  /tts [on|off]     - Toggle reading replies aloud
  /stop             - Stop the current narration
  /replay           - Read the last reply aloud again
  /resources        - Crisis and mental-health resources
  /privacy          - How your data is handled
  /emergency [hide] - Show (or hide) emergency contacts
  /dismiss          - Dismiss the professional-support alert

Type anything else to talk. In an emergency call 112 (ID) or 911 (US)."#
        .to_string()
}
