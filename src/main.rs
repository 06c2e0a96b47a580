// Otravoce - mental-health support chat client
// Main entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use otravoce::chat::ChatSession;
use otravoce::classify::{detect_language, Language};
use otravoce::cli::render::{print_alerts, print_error, print_history, print_message, print_status};
use otravoce::cli::pages::{privacy_page, resources_page};
use otravoce::cli::Repl;
use otravoce::config::{load_config, load_config_from, Config};
use otravoce::crisis::RiskAssessor;
use otravoce::errors::{data_dir_error, wrap_error_with_suggestion, UserFriendlyError};
use otravoce::providers::create_provider;
use otravoce::speech::{CommandNarrator, Narrator, SilentNarrator, SpeechNormalizer};
use otravoce::store::{create_mirror, LocalStorage};

#[derive(Parser, Debug)]
#[command(name = "otravoce")]
#[command(about = "Mental-health support chat for students", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging (same as OTRAVOCE_DEBUG=1)
    #[arg(long, global = true)]
    debug: bool,

    /// Directory holding the conversation and preferences
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: ~/.otravoce/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Send {
        /// Message text
        text: String,
    },
    /// Print the saved conversation
    History,
    /// Delete the saved conversation
    Clear,
    /// Show or change the narration preference
    Tts {
        /// "on" or "off"; omit to show the current setting
        #[arg(value_parser = ["on", "off"])]
        setting: Option<String>,
    },
    /// Crisis and mental-health resources
    Resources {
        /// Page language: id or en
        #[arg(long)]
        lang: Option<String>,
    },
    /// How your data is handled
    Privacy,
    /// Print the speech form of a text, optionally reading it aloud
    Narrate {
        text: String,
        /// Read it aloud with the configured speech program
        #[arg(long)]
        speak: bool,
        /// Force the language instead of detecting it
        #[arg(long)]
        lang: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.debug);

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(dir) = args.data_dir.clone() {
        config.data_dir = dir;
    }

    let ui_language = std::env::var("LANG")
        .ok()
        .and_then(|lang| Language::from_code(&lang))
        .unwrap_or_default();

    match &args.command {
        Some(Command::Resources { lang }) => {
            let language = parse_language(lang.as_deref())?.unwrap_or(ui_language);
            println!("{}", resources_page(language));
            return Ok(());
        }
        Some(Command::Privacy) => {
            println!("{}", privacy_page());
            return Ok(());
        }
        Some(Command::Narrate { text, speak, lang }) => {
            return run_narrate(&config, text, *speak, lang.as_deref());
        }
        _ => {}
    }

    let needs_model = matches!(args.command, None | Some(Command::Chat) | Some(Command::Send { .. }));
    let mut session = open_session(&config, needs_model)?;

    match args.command {
        Some(Command::Send { text }) => run_send(&mut session, &text).await,
        Some(Command::History) => {
            print_history(session.messages());
            Ok(())
        }
        Some(Command::Clear) => {
            session.clear_chat()?;
            print_status("Conversation cleared.");
            Ok(())
        }
        Some(Command::Tts { setting }) => {
            if let Some(setting) = setting {
                session.set_narration(setting == "on")?;
            }
            let state = if session.narration_enabled() { "on" } else { "off" };
            println!("Narration: {}", state);
            Ok(())
        }
        Some(Command::Chat) | None => {
            if !io::stdin().is_terminal() {
                // Piped input is one message
                let mut input = String::new();
                io::stdin()
                    .read_to_string(&mut input)
                    .context("Failed to read piped input")?;
                return run_send(&mut session, &input).await;
            }
            Repl::interactive(session, &config.data_dir, ui_language)
                .run()
                .await
        }
        Some(Command::Resources { .. }) | Some(Command::Privacy) | Some(Command::Narrate { .. }) => {
            Ok(())
        }
    }
}

/// Initialize tracing on stderr
///
/// Default level is `warn` so the chat stays readable; RUST_LOG overrides,
/// `--debug` or OTRAVOCE_DEBUG=1 raise it to `debug`.
fn init_tracing(debug_flag: bool) {
    let show_debug = debug_flag
        || std::env::var("OTRAVOCE_DEBUG")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

    let env_filter = if show_debug {
        tracing_subscriber::EnvFilter::new("otravoce=debug,warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    // Bridge log crate → tracing (reqwest and friends)
    tracing_log::LogTracer::init().ok();
}

fn parse_language(code: Option<&str>) -> Result<Option<Language>> {
    match code {
        None => Ok(None),
        Some(code) => Language::from_code(code)
            .map(Some)
            .with_context(|| format!("Unsupported language '{}' (use id or en)", code)),
    }
}

/// Build the chat session; the model client is only created when it will be used
fn open_session(config: &Config, needs_model: bool) -> Result<ChatSession> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| data_dir_error(&config.data_dir.display().to_string()))?;

    let storage = LocalStorage::new(config.data_dir.clone());

    let assessor = RiskAssessor::from_optional_file(config.risk_keywords_path.as_deref())
        .user_context_with_suggestion(
            "Failed to load risk keyword lists",
            "Fix the JSON file or remove risk_keywords_path from config.toml",
        )?;

    let mirror = create_mirror(config.mirror.as_ref())?;

    let mut session = ChatSession::open(storage, config.model.clone(), assessor)
        .with_mirror(mirror)
        .with_narrator(create_narrator(config));

    if !needs_model {
        return Ok(session);
    }

    match create_provider(&config.model) {
        Ok(provider) => {
            tracing::info!(
                "Using {} ({})",
                provider.name(),
                config.model.model
            );
            session = session.with_provider(provider);
        }
        Err(e) => {
            eprintln!("⚠️  {}", e);
            eprintln!("   Continuing without a model: crisis support and /resources still work.\n");
        }
    }

    Ok(session)
}

fn create_narrator(config: &Config) -> Arc<dyn Narrator> {
    if config.narration.enabled {
        Arc::new(CommandNarrator::new(config.narration.command.clone()))
    } else {
        Arc::new(SilentNarrator)
    }
}

async fn run_send(session: &mut ChatSession, text: &str) -> Result<()> {
    match session.send_message(text).await? {
        Some(reply) => {
            print_message(&reply);
            print_alerts(session.alerts(), reply.language.unwrap_or_default());
        }
        None => print_error("Nothing to send: the message is empty."),
    }
    session.shutdown()?;
    Ok(())
}

fn run_narrate(config: &Config, text: &str, speak: bool, lang: Option<&str>) -> Result<()> {
    let language = parse_language(lang)?.unwrap_or_else(|| detect_language(text));
    println!("{}", SpeechNormalizer::new(language).normalize(text));

    if speak {
        let narrator = CommandNarrator::new(config.narration.command.clone());
        if !narrator.is_available() {
            anyhow::bail!(wrap_error_with_suggestion(
                format!("Speech program '{}' not found", narrator.command()),
                "Install espeak-ng or set [narration] command in config.toml",
            ));
        }
        narrator.speak(text, language)?;
        narrator.wait();
    }
    Ok(())
}
