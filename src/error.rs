//! Error taxonomy for the registration workflow.

use thiserror::Error;

use crate::context::UserType;

/// Shown when the remote system gives no usable message of its own.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Why a parent lookup produced no usable answer. Distinct from a confirmed
/// absence, which is `LookupResult::NotFound`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("CNIC must be between 1 and {max} characters")]
    InvalidIdentifier { max: usize },

    #[error("parent service unreachable: {0}")]
    Transport(String),

    #[error("malformed parent record: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Required fields left empty; nothing was sent.
    #[error("Please fill in the required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    /// The request never got an answer. Safe to resubmit.
    #[error("Could not reach the registration service: {0}")]
    Transport(String),

    /// The service answered with a failure. A partially applied compound
    /// write cannot be told apart from a clean failure and also lands here.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("a parent lookup is already in progress")]
    LookupInProgress,

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("the registration has already been submitted")]
    AlreadySubmitted,

    #[error("parent lookup is not available in this form")]
    LookupUnavailable,

    #[error("enter a CNIC before searching")]
    MissingIdentifier,

    #[error("Please select the registration type to continue.")]
    NoRegistrationType,

    #[error("no registration form is available for {0} accounts")]
    FormUnavailable(UserType),
}
