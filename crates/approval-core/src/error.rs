//! Error types for the approval platform

use approval_types::{ApprovalStatus, ProfileId, ReviewAction, Role, TypeError, UserId};
use thiserror::Error;

/// Failures raised by a profile store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found in {table}: {key}")]
    NotFound { table: &'static str, key: String },

    #[error("Record already exists in {table}: {key}")]
    Conflict { table: &'static str, key: String },

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Main error type for workflow operations
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{role} profile {id} not found")]
    NotFound { role: Role, id: ProfileId },

    #[error("No {role} submission found for user {user_id}")]
    NoSubmission { role: Role, user_id: UserId },

    #[error("Cannot {action} profile {id}: status is {from}")]
    InvalidTransition {
        id: ProfileId,
        from: ApprovalStatus,
        action: ReviewAction,
    },

    #[error("Action {action} is not supported for {role} profiles")]
    UnsupportedForRole { action: ReviewAction, role: Role },

    #[error("A numeric rating is required")]
    MissingRating,

    #[error("Invalid rating: {0}")]
    InvalidRating(#[from] TypeError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("An action on profile {id} is already in progress")]
    ActionInFlight { id: ProfileId },

    /// Live row written but the approval row could not be removed
    #[error("Profile {id} was published but its approval row could not be removed: {source}")]
    PartialPromotion {
        id: ProfileId,
        #[source]
        source: StoreError,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;
