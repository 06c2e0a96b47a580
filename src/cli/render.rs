// Terminal rendering for messages and alert banners

use chrono::Local;
use crossterm::style::Stylize;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::chat::AlertState;
use crate::classify::Language;
use crate::crisis::resources::emergency_numbers;
use crate::store::{Message, Sender};

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Failed to compile bold regex"));
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+(.+)$").expect("Failed to compile heading regex"));

/// Render the bits of markdown the model commonly uses
pub fn render_markdown(text: &str) -> String {
    let text = HEADING.replace_all(text, |caps: &Captures| caps[1].bold().to_string());
    BOLD.replace_all(&text, |caps: &Captures| caps[1].bold().to_string())
        .into_owned()
}

pub fn format_message(message: &Message) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    match message.sender {
        Sender::User => format!("{} {}\n{}", "You".cyan().bold(), time.to_string().dark_grey(), message.content),
        Sender::Ai => {
            let name = if message.is_crisis() {
                "Otravoce AI".red().bold()
            } else {
                "Otravoce AI".green().bold()
            };
            format!(
                "{} {}\n{}",
                name,
                time.to_string().dark_grey(),
                render_markdown(&message.content)
            )
        }
    }
}

pub fn print_message(message: &Message) {
    println!("\n{}", format_message(message));
}

pub fn print_history(messages: &[Message]) {
    if messages.is_empty() {
        print_status("No messages yet.");
        return;
    }
    for message in messages {
        print_message(message);
    }
}

/// Banner lines for raised alerts (empty when none are raised)
pub fn format_alerts(alerts: AlertState, language: Language) -> Vec<String> {
    let mut lines = Vec::new();

    if alerts.emergency_contacts {
        let title = match language {
            Language::Indonesian => "KONTAK DARURAT",
            Language::English => "EMERGENCY CONTACTS",
        };
        lines.push(format!("🚨 {}", title.red().bold()));
        for (name, number) in emergency_numbers() {
            lines.push(format!("   {name}: {}", number.bold()));
        }
        lines.push(
            match language {
                Language::Indonesian => "   /emergency hide untuk menyembunyikan, /resources untuk info lengkap",
                Language::English => "   /emergency hide to hide, /resources for details",
            }
            .dark_grey()
            .to_string(),
        );
    }

    if alerts.psychologist_alert {
        let text = match language {
            Language::Indonesian => {
                "💙 Sepertinya kamu sedang melalui masa yang berat. Berbicara dengan psikolog atau konselor profesional bisa sangat membantu."
            }
            Language::English => {
                "💙 It sounds like you're going through a hard time. Talking with a psychologist or professional counselor could really help."
            }
        };
        lines.push(text.yellow().to_string());
        lines.push(
            match language {
                Language::Indonesian => "   /dismiss untuk menutup pesan ini",
                Language::English => "   /dismiss to close this notice",
            }
            .dark_grey()
            .to_string(),
        );
    }

    lines
}

pub fn print_alerts(alerts: AlertState, language: Language) {
    let lines = format_alerts(alerts, language);
    if lines.is_empty() {
        return;
    }
    println!();
    for line in lines {
        println!("{line}");
    }
}

pub fn print_status(message: &str) {
    println!("{}", message.dark_grey());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
