//! Common error types for Pulse
//!
//! One flat enum covers both the ambient failures (database, I/O, config)
//! and the domain outcomes of the submission pipeline and survey authoring.
//! All domain variants are terminal for a single request; nothing is
//! retried internally.

use thiserror::Error;

/// Common result type for Pulse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the Pulse workspace
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Skip logic condition references a code that is not in the survey version
    #[error("Question '{question}' references unknown question code '{code}'")]
    UnknownReference { question: String, code: String },

    /// Skip logic condition references a question at the same or a later order index
    #[error("Question '{question}' references question code '{code}' at the same or a later position")]
    ForwardReference { question: String, code: String },

    /// Two questions in the same survey version share a code
    #[error("Duplicate question code '{0}' in survey version")]
    DuplicateQuestionCode(String),

    /// Submission references a question outside the campaign's survey version
    #[error("Question with ID {0} does not belong to this campaign's survey version")]
    UnknownQuestion(String),

    /// A required, currently-visible question has no answer
    #[error("Missing response for required question: {question}")]
    MissingRequiredAnswer { question: String },

    /// An answer was supplied for a question hidden by skip logic
    #[error("Response contains an answer for question '{question}' hidden by skip logic")]
    AnsweredHiddenQuestion { question: String },

    /// Campaign not published, or current time outside its window
    #[error("Campaign is not active: {0}")]
    CampaignNotActive(String),

    /// Respondent already has a response for this campaign
    #[error("A response has already been submitted for this campaign")]
    DuplicateSubmission,

    /// Missing or invalid authentication
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
