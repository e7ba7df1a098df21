//! Error types for the triage agent.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Credential artifact unusable: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mailbox collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mailbox request failed: {0}")]
    Request(String),

    #[error("Mailbox returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed message {id}: {reason}")]
    Malformed { id: String, reason: String },

    #[error("Send failed to {to}: {reason}")]
    SendFailed { to: String, reason: String },
}

/// Calendar collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar request failed: {0}")]
    Request(String),

    #[error("Calendar returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Event created without a join link")]
    MissingJoinLink,
}

/// Language-model collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced by the triage pipeline.
///
/// Classifier failures never reach here (they degrade to a fallback
/// `Decision`); these are gateway failures that abort the remaining
/// actions for one message.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scheduling failed: {0}")]
    Scheduling(#[from] CalendarError),

    #[error("Reply failed: {0}")]
    Reply(#[from] MailError),
}

/// Result type alias for the agent.
pub type Result<T> = std::result::Result<T, Error>;
