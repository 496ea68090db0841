use rustyline::{config::BellStyle, error::ReadlineError, history::MemHistory, CompletionType, EditMode, Editor};

use crate::{config::Config, style::Styles, error::AppError};

const INSTRUCTIONS: &str = "Ask about waste disposal in Paderborn. To exit use Ctrl+C";

/// Terminal output and dialogue input.
pub struct Term {
    styles: Styles,
    editor: Option<Editor<(), MemHistory>>,
}

impl Term {
    /// New instance.
    pub fn new(config: &Config) -> Self {
        let dumb = std::env::var("TERM").is_ok_and(|t| t == "dumb");

        Term {
            styles: Styles::new(config.settings.color && !dumb),
            editor: None,
        }
    }

    /// Print progress message.
    pub fn status(&self, s: &str) {
        eprintln!("{}{}{:#}", self.styles.status, s, self.styles.status);
    }

    /// Print classification result.
    pub fn print_label(&self, label: &str) {
        println!("Classification: {}{}{:#}", self.styles.label, label, self.styles.label);
    }

    /// Print disposal instructions or an answer.
    pub fn print_answer(&self, s: &str) {
        println!("{}{}{:#}", self.styles.answer, s, self.styles.answer);
    }

    /// Print retrieved sources.
    pub fn print_sources(&self, sources: &[String]) {
        for (i, source) in sources.iter().enumerate() {
            println!("{}[{}] {}{:#}", self.styles.source, i + 1, source.replace('\n', " "), self.styles.source);
        }
    }

    /// Print error message.
    pub fn print_error(&self, s: &str) {
        eprintln!("{}{}{:#}", self.styles.error, s, self.styles.error);
    }

    /// Print dialogue instructions.
    pub fn print_intro(&self) {
        println!("{}{}{:#}", self.styles.status, INSTRUCTIONS, self.styles.status);
    }

    /// Read a question; `None` on Ctrl+C or Ctrl+D.
    pub fn user_input(&mut self) -> Result<Option<String>, AppError> {
        if self.editor.is_none() {
            let rline_config = rustyline::Config::builder()
                .history_ignore_space(true)
                .auto_add_history(true)
                .bell_style(BellStyle::None)
                .completion_type(CompletionType::List)
                .edit_mode(EditMode::Emacs)
                .build();
            self.editor = Some(Editor::with_config(rline_config)?);
        }

        let prompt = format!("{} ? {:#} ", self.styles.prompt, self.styles.prompt);
        let editor = self.editor.as_mut().ok_or(AppError::Error("line editor is not initialized".to_owned()))?;

        match editor.readline(&prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
