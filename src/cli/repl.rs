// Interactive chat loop
//
// The loop awaits every reply before reading the next line, so the session
// never sees a second message while one is pending.

use anyhow::Result;
use std::io::{self, BufRead, IsTerminal, Write};

use super::commands::{classify_input, format_help, Command, Input};
use super::input::InputHandler;
use super::pages::{privacy_page, resources_page, welcome_banner};
use super::render::{print_alerts, print_error, print_history, print_message, print_status};
use crate::chat::{AlertState, ChatSession};
use crate::classify::Language;
use crate::store::Sender;

pub struct Repl {
    session: ChatSession,
    input_handler: Option<InputHandler>,
    ui_language: Language,
    shown_alerts: AlertState,
}

impl Repl {
    pub fn new(session: ChatSession, input_handler: Option<InputHandler>, ui_language: Language) -> Self {
        Self {
            session,
            input_handler,
            ui_language,
            shown_alerts: AlertState::default(),
        }
    }

    /// Build with a readline editor when stdin is a terminal
    pub fn interactive(session: ChatSession, data_dir: &std::path::Path, ui_language: Language) -> Self {
        let input_handler = if io::stdin().is_terminal() {
            match InputHandler::new(data_dir) {
                Ok(handler) => Some(handler),
                Err(e) => {
                    print_error(&format!("Failed to initialize input handler: {}", e));
                    None
                }
            }
        } else {
            None
        };
        Self::new(session, input_handler, ui_language)
    }

    /// Language of the most recent user message, for alert banners
    fn conversation_language(&self) -> Language {
        self.session
            .messages()
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
            .and_then(|m| m.language)
            .unwrap_or(self.ui_language)
    }

    fn show_alerts_if_changed(&mut self) {
        let alerts = self.session.alerts();
        if alerts != self.shown_alerts {
            print_alerts(alerts, self.conversation_language());
            self.shown_alerts = alerts;
        }
    }

    pub async fn run(mut self) -> Result<()> {
        if self.session.messages().is_empty() {
            println!("{}", welcome_banner(self.session.narration_enabled()));
        } else {
            print_status(&format!(
                "Restored {} messages. Type /history to see them, /clear to start over.",
                self.session.messages().len()
            ));
            if let Some(last) = self.session.messages().last() {
                print_message(last);
            }
        }
        if !self.session.has_provider() {
            print_status("No model configured: only crisis detection and resources are available.");
        }
        self.show_alerts_if_changed();

        loop {
            let line = match self.read_line()? {
                Some(line) => line,
                None => break,
            };

            let text = match classify_input(&line, self.session.assessor()) {
                None => continue,
                Some(Input::Command(command)) => {
                    if self.handle_command(command)? {
                        break;
                    }
                    continue;
                }
                Some(Input::Message(text)) => text,
            };

            print_status("...");
            match self.session.send_message(&text).await {
                Ok(Some(reply)) => print_message(&reply),
                Ok(None) => {}
                Err(e) => print_error(&e.to_string()),
            }
            self.show_alerts_if_changed();
        }

        self.finish()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        println!();
        match &mut self.input_handler {
            Some(handler) => handler.read_line("> "),
            None => {
                print!("> ");
                io::stdout().flush()?;
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                Ok(Some(line.trim().to_string()))
            }
        }
    }

    /// Returns true when the user asked to quit
    fn handle_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Quit => return Ok(true),
            Command::Help => println!("{}", format_help()),
            Command::Clear => {
                self.session.clear_chat()?;
                if let Some(handler) = &mut self.input_handler {
                    if let Err(e) = handler.clear_history() {
                        tracing::warn!("Failed to clear input history: {}", e);
                    }
                }
                self.shown_alerts = AlertState::default();
                print_status("Conversation cleared.");
                println!("{}", welcome_banner(self.session.narration_enabled()));
            }
            Command::History => print_history(self.session.messages()),
            Command::Tts(setting) => {
                let enabled = match setting {
                    Some(enabled) => {
                        self.session.set_narration(enabled)?;
                        enabled
                    }
                    None => self.session.toggle_narration()?,
                };
                if enabled && !self.session.narrator().is_available() {
                    print_status("Narration on, but no speech program is available (install espeak-ng).");
                } else {
                    print_status(if enabled { "TTS Aktif" } else { "TTS Nonaktif" });
                    if enabled {
                        self.session.announce_narration(self.conversation_language());
                    }
                }
            }
            Command::Stop => self.session.stop_speaking(),
            Command::Replay => {
                let last_reply = self
                    .session
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| m.sender == Sender::Ai)
                    .map(|m| m.content.clone());
                match last_reply {
                    Some(text) => self.session.speak(&text),
                    None => print_status("Nothing to read yet."),
                }
            }
            Command::Resources => println!("{}", resources_page(self.conversation_language())),
            Command::Privacy => println!("{}", privacy_page()),
            Command::Emergency => {
                self.session.show_emergency_contacts();
                self.show_alerts_if_changed();
            }
            Command::HideEmergency => {
                self.session.hide_emergency_contacts();
                self.shown_alerts = self.session.alerts();
            }
            Command::Dismiss => {
                self.session.dismiss_psychologist_alert();
                self.shown_alerts = self.session.alerts();
            }
            Command::Unknown(name) => {
                print_error(&format!("Unknown command: {}", name));
                print_status("Type /help for available commands");
            }
        }
        Ok(false)
    }

    fn finish(mut self) -> Result<()> {
        if let Some(handler) = &mut self.input_handler {
            if let Err(e) = handler.save_history() {
                tracing::warn!("Failed to save input history: {}", e);
            }
        }
        self.session.shutdown()?;
        print_status("Jaga dirimu baik-baik. Sampai jumpa!");
        Ok(())
    }
}
