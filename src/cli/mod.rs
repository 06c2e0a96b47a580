// CLI module
// Public interface for the terminal front end

pub mod commands;
mod input;
pub mod pages;
pub mod render;
mod repl;

pub use commands::{classify_input, format_help, Command, Input};
pub use input::InputHandler;
pub use repl::Repl;
