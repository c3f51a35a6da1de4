//! Shared types for the approval platform
//! No string-based roles or states - everything is strongly typed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod profile;

pub use profile::{
    ApprovalRecord, IncubationFields, InvestorFields, LiveRecord, MentorFields, ProfileFields,
    StartupFields, TeamMember,
};

/// Errors raised while parsing or validating shared types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("Invalid profile id: {0}")]
    InvalidId(String),

    #[error("Rating {0} is outside the 0-100 scale")]
    RatingOutOfRange(u8),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Strongly typed ProfileId (UUID v4, immutable once generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(s)
            .map(|_| Self(s.to_string()))
            .map_err(|e| TypeError::InvalidId(format!("{}: {}", s, e)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owning account identifier, issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profile role. Each role owns an approval table and a live table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Startup,
    Incubation,
    Investor,
    Mentor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Startup, Role::Incubation, Role::Investor, Role::Mentor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Incubation => "incubation",
            Self::Investor => "investor",
            Self::Mentor => "mentor",
        }
    }

    /// Name of the pending-review table
    pub fn approval_table(&self) -> &'static str {
        match self {
            Self::Startup => "startup_approval",
            Self::Incubation => "incubation_approval",
            Self::Investor => "investor_approval",
            Self::Mentor => "mentor_approval",
        }
    }

    /// Name of the published table
    pub fn live_table(&self) -> &'static str {
        match self {
            Self::Startup => "startups",
            Self::Incubation => "incubations",
            Self::Investor => "investors",
            Self::Mentor => "mentors",
        }
    }

    /// Only startup and incubation profiles carry a rating
    pub fn supports_rating(&self) -> bool {
        matches!(self, Self::Startup | Self::Incubation)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "incubation" | "incubator" => Ok(Self::Incubation),
            "investor" => Ok(Self::Investor),
            "mentor" => Ok(Self::Mentor),
            other => Err(TypeError::UnknownRole(other.to_string())),
        }
    }
}

/// Approval-store lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    NeedsUpdate,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 4] = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
        ApprovalStatus::NeedsUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsUpdate => "needs_update",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "needs_update" => Ok(Self::NeedsUpdate),
            other => Err(TypeError::UnknownStatus(other.to_string())),
        }
    }
}

/// Administrator review action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    NeedsUpdate,
    Rate,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::NeedsUpdate => "needs_update",
            Self::Rate => "rate",
        }
    }

    /// Status the approval row ends up in, if the action changes it
    pub fn target_status(&self) -> Option<ApprovalStatus> {
        match self {
            Self::Approve => Some(ApprovalStatus::Approved),
            Self::Reject => Some(ApprovalStatus::Rejected),
            Self::NeedsUpdate => Some(ApprovalStatus::NeedsUpdate),
            Self::Rate => None,
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewAction {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "needs_update" => Ok(Self::NeedsUpdate),
            "rate" => Ok(Self::Rate),
            other => Err(TypeError::UnknownAction(other.to_string())),
        }
    }
}

/// Rating on the canonical 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, TypeError> {
        if value > Self::MAX {
            return Err(TypeError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 0-5 star value for display
    pub fn stars(&self) -> f32 {
        f32::from(self.0) / 20.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Ordering of list views by `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Queue view
    OldestFirst,
    /// Admin browse view
    #[default]
    NewestFirst,
}

/// Role of the account performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Member,
}

/// Explicit caller identity, passed into every workflow call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: ActorRole,
}

impl Actor {
    pub fn admin(id: impl Into<String>) -> Self {
        Self { id: UserId::new(id), role: ActorRole::Admin }
    }

    pub fn member(id: impl Into<String>) -> Self {
        Self { id: UserId::new(id), role: ActorRole::Member }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ActorRole::Admin
    }
}

/// Optional inputs accompanying a review action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl ActionPayload {
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self { reason: Some(reason.into()), rating: None }
    }

    pub fn with_rating(rating: u8) -> Self {
        Self { reason: None, rating: Some(rating) }
    }

    /// Reason with blank input normalised to `None`
    pub fn normalized_reason(&self) -> Option<String> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }
}
