// Otravoce - mental-health support chat client
// Library exports

pub mod chat; // Session orchestration and alert flags
pub mod classify; // Language detection and topic relevance
pub mod cli;
pub mod config;
pub mod crisis; // Risk assessment, canned replies, hotlines
pub mod errors;
pub mod prompt;
pub mod providers; // Hosted chat-completions client
pub mod speech; // Narration and speech text normalization
pub mod store; // Local persistence and remote mirror
