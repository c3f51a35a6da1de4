//! Profile store contract consumed by the workflow

use crate::error::StoreError;
use approval_types::{
    ApprovalRecord, ApprovalStatus, LiveRecord, ProfileId, Rating, Role, SortOrder, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result of writing a live row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    /// A live row for the same `(role, user_id)` was overwritten
    Replaced,
}

/// Record written before a promotion touches the live table and
/// cleared once the approval row is gone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionIntent {
    pub intent_id: String,
    pub role: Role,
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub recorded_at: DateTime<Utc>,
}

impl PromotionIntent {
    pub fn new(role: Role, profile_id: ProfileId, user_id: UserId) -> Self {
        Self {
            intent_id: uuid::Uuid::new_v4().to_string(),
            role,
            profile_id,
            user_id,
            recorded_at: Utc::now(),
        }
    }
}

/// Two tables per role (approval and live) plus the promotion intent log.
///
/// Every method is one round-trip to the backend. Implementations must
/// keep at most one live row per `(role, user_id)`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    // ── Approval table ───────────────────────────────────────────────────

    /// Approval rows for a role with the given status, ordered by `created_at`
    async fn list_approvals(
        &self,
        role: Role,
        status: ApprovalStatus,
        order: SortOrder,
    ) -> StoreResult<Vec<ApprovalRecord>>;

    async fn get_approval(&self, role: Role, id: &ProfileId) -> StoreResult<Option<ApprovalRecord>>;

    /// The owner's current approval row for a role, if any
    async fn find_approval_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<ApprovalRecord>>;

    /// Insert a new row. Fails with `Conflict` if the id is taken.
    async fn insert_approval(&self, record: &ApprovalRecord) -> StoreResult<()>;

    /// Overwrite an existing row by id. Fails with `NotFound` if absent.
    async fn save_approval(&self, record: &ApprovalRecord) -> StoreResult<()>;

    async fn delete_approval(&self, role: Role, id: &ProfileId) -> StoreResult<()>;

    async fn update_approval_status(
        &self,
        role: Role,
        id: &ProfileId,
        status: ApprovalStatus,
        reason: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    async fn update_approval_rating(
        &self,
        role: Role,
        id: &ProfileId,
        rating: Rating,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    // ── Live table ───────────────────────────────────────────────────────

    /// Live rows for a role, newest first
    async fn list_live(&self, role: Role) -> StoreResult<Vec<LiveRecord>>;

    async fn get_live_for_user(&self, role: Role, user_id: &UserId)
        -> StoreResult<Option<LiveRecord>>;

    /// Insert or overwrite the live row keyed by `(role, user_id)`
    async fn upsert_live(&self, record: &LiveRecord) -> StoreResult<UpsertOutcome>;

    // ── Promotion intents ────────────────────────────────────────────────

    async fn record_intent(&self, intent: &PromotionIntent) -> StoreResult<()>;

    /// Clearing an unknown intent is not an error
    async fn clear_intent(&self, intent_id: &str) -> StoreResult<()>;

    async fn list_intents(&self) -> StoreResult<Vec<PromotionIntent>>;
}

/// Sort approval rows by `created_at` in the requested order
pub(crate) fn sort_approvals(records: &mut [ApprovalRecord], order: SortOrder) {
    match order {
        SortOrder::OldestFirst => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::NewestFirst => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Sort live rows newest first
pub(crate) fn sort_live(records: &mut [LiveRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
