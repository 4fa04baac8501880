//! Domain error types.

/// A parse error with position information for predicate parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for tickbot.
#[derive(Debug, thiserror::Error)]
pub enum TickbotError {
    #[error("invalid strategy '{id}': {reason}")]
    InvalidStrategy { id: String, reason: String },

    #[error(transparent)]
    PredicateParse(#[from] ParseError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("feed error: {reason}")]
    Feed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickbotError> for std::process::ExitCode {
    fn from(err: &TickbotError) -> Self {
        let code: u8 = match err {
            TickbotError::Io(_) => 1,
            TickbotError::ConfigParse { .. }
            | TickbotError::ConfigMissing { .. }
            | TickbotError::ConfigInvalid { .. } => 2,
            TickbotError::Feed { .. } => 3,
            TickbotError::PredicateParse(_) | TickbotError::InvalidStrategy { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
