//! Profile payloads and the rows that hold them
//!
//! Each role has its own attribute schema. `ProfileFields` tags the
//! schema with the role so promotion can match on it exhaustively.

use crate::{ApprovalStatus, ProfileId, Rating, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub designation: String,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupFields {
    pub startup_name: String,
    pub domain: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub founded_year: Option<u16>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncubationFields {
    pub incubator_accelerator_name: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub program_duration: Option<String>,
    #[serde(default)]
    pub funding_offered: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorFields {
    pub investor_name: String,
    #[serde(default)]
    pub firm_name: Option<String>,
    #[serde(default)]
    pub investment_stages: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub ticket_size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorFields {
    pub full_name: String,
    #[serde(default)]
    pub expertise_areas: Vec<String>,
    #[serde(default)]
    pub years_of_experience: u16,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_path: Option<String>,
}

/// Role-tagged profile attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", content = "fields", rename_all = "snake_case")]
pub enum ProfileFields {
    Startup(StartupFields),
    Incubation(IncubationFields),
    Investor(InvestorFields),
    Mentor(MentorFields),
}

impl ProfileFields {
    pub fn role(&self) -> Role {
        match self {
            Self::Startup(_) => Role::Startup,
            Self::Incubation(_) => Role::Incubation,
            Self::Investor(_) => Role::Investor,
            Self::Mentor(_) => Role::Mentor,
        }
    }

    /// Name shown in review feeds
    pub fn display_name(&self) -> &str {
        match self {
            Self::Startup(f) => &f.startup_name,
            Self::Incubation(f) => &f.incubator_accelerator_name,
            Self::Investor(f) => &f.investor_name,
            Self::Mentor(f) => &f.full_name,
        }
    }

    /// Object-store path of the logo or photo, if one was uploaded
    pub fn media_path(&self) -> Option<&str> {
        match self {
            Self::Startup(f) => f.logo_path.as_deref(),
            Self::Incubation(f) => f.logo_path.as_deref(),
            Self::Investor(f) => f.photo_path.as_deref(),
            Self::Mentor(f) => f.photo_path.as_deref(),
        }
    }

    /// First required attribute that is blank, if any
    pub fn missing_required(&self) -> Option<&'static str> {
        match self {
            Self::Startup(f) if f.startup_name.trim().is_empty() => Some("startup_name"),
            Self::Startup(f) if f.domain.trim().is_empty() => Some("domain"),
            Self::Incubation(f) if f.incubator_accelerator_name.trim().is_empty() => {
                Some("incubator_accelerator_name")
            }
            Self::Investor(f) if f.investor_name.trim().is_empty() => Some("investor_name"),
            Self::Mentor(f) if f.full_name.trim().is_empty() => Some("full_name"),
            _ => None,
        }
    }
}

/// Row in a role's approval (pending-review) table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub id: ProfileId,
    pub user_id: UserId,
    pub profile: ProfileFields,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovalRecord {
    /// New pending submission
    pub fn new(user_id: UserId, profile: ProfileFields) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            user_id,
            profile,
            status: ApprovalStatus::Pending,
            reason: None,
            rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Owner re-saves the row: content replaced, back to pending
    pub fn resubmit(&mut self, profile: ProfileFields) {
        self.profile = profile;
        self.status = ApprovalStatus::Pending;
        self.reason = None;
        self.updated_at = Utc::now();
    }
}

/// Row in a role's live (published) table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveRecord {
    pub id: ProfileId,
    pub user_id: UserId,
    pub profile: ProfileFields,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: DateTime<Utc>,
}

impl LiveRecord {
    pub fn role(&self) -> Role {
        self.profile.role()
    }
}
