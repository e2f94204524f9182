//! CLI-specific error types

use std::fmt;
use std::io;

use crate::errors::DocError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, state file)
    IoError,
    /// State file already exists
    AlreadyInitialized,
    /// State file missing
    NotInitialized,
    /// Document operation failed; carries the document error code
    Document(&'static str),
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DOC_CLI_CONFIG_ERROR",
            Self::IoError => "DOC_CLI_IO_ERROR",
            Self::AlreadyInitialized => "DOC_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "DOC_CLI_NOT_INITIALIZED",
            Self::Document(code) => *code,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized(path: &std::path::Path) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!(
                "State file {} already exists. Use --force to replace it.",
                path.display()
            ),
        )
    }

    pub fn not_initialized(path: &std::path::Path) -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            format!(
                "State file {} not found. Run 'dochistory init' first.",
                path.display()
            ),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DocError> for CliError {
    fn from(e: DocError) -> Self {
        match e {
            DocError::Config(msg) => Self::config_error(msg),
            other => Self::new(CliErrorCode::Document(other.code()), other.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
