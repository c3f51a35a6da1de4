//! Approval Core Library
//!
//! Moderation workflow for the startup-discovery platform: profile
//! stores, review actions, promotion into the live tables and the
//! owner-side submission flow.

pub mod config;
pub mod error;
pub mod media;
pub mod paths;
pub mod services;
pub mod store;
pub mod workflow;

// Re-export main types for easy access
pub use config::PlatformConfig;
pub use error::{Result, StoreError, WorkflowError};
pub use media::MediaResolver;

pub use store::{FileProfileStore, InMemoryProfileStore, ProfileStore, PromotionIntent, UpsertOutcome};

pub use services::{FeedEntry, FeedFilter, ReviewFeed, StatusCountMap, SubmissionOverview, SubmissionService};

pub use workflow::{
    ActionOutcome,
    ApprovalWorkflow,
    Notice,
    NoticeLevel,
    RecoveryAction,
    RecoveryReport,
    RecoverySweep,
    ReviewDesk,
};

pub use approval_types;
