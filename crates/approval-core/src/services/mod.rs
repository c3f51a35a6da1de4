//! Services built on top of the profile store

pub mod feed;
pub mod submission;

pub use feed::{FeedEntry, FeedFilter, ReviewFeed, StatusCountMap};
pub use submission::{SubmissionOverview, SubmissionService};
