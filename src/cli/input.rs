// Readline input handler with history and editing support

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};

pub struct InputHandler {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl InputHandler {
    /// Create an input handler whose history lives in `data_dir/history.txt`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let mut editor = DefaultEditor::new().context("Failed to initialize readline editor")?;

        let history_path = data_dir.join("history.txt");
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Read a line of input with editing support
    ///
    /// Returns:
    /// - `Ok(Some(line))` - user entered text
    /// - `Ok(None)` - user pressed Ctrl+C or Ctrl+D
    /// - `Err(e)` - I/O or other error
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.editor
                        .add_history_entry(&line)
                        .context("Failed to add history entry")?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err).context("Failed to read input"),
        }
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(parent) = self.history_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        self.editor
            .save_history(&self.history_path)
            .with_context(|| format!("Failed to save history to {}", self.history_path.display()))?;

        Ok(())
    }

    /// Forget typed lines (used when the conversation is cleared)
    pub fn clear_history(&mut self) -> Result<()> {
        self.editor.clear_history().context("Failed to clear input history")?;
        if self.history_path.exists() {
            std::fs::remove_file(&self.history_path).with_context(|| {
                format!("Failed to remove {}", self.history_path.display())
            })?;
        }
        Ok(())
    }
}
