//! Shared fixtures for the integration tests

#![allow(dead_code)]

use approval_core::store::{ProfileStore, PromotionIntent, StoreResult, UpsertOutcome};
use approval_core::{InMemoryProfileStore, StoreError};
use approval_types::{
    ApprovalRecord, ApprovalStatus, IncubationFields, InvestorFields, LiveRecord, MentorFields,
    ProfileFields, ProfileId, Rating, Role, SortOrder, StartupFields, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn startup_fields(name: &str) -> ProfileFields {
    ProfileFields::Startup(StartupFields {
        startup_name: name.to_string(),
        domain: "fintech".to_string(),
        stage: Some("seed".to_string()),
        description: "Payments for rural co-operatives".to_string(),
        website: None,
        country: Some("IN".to_string()),
        founded_year: Some(2022),
        team_members: Vec::new(),
        logo_path: Some(format!("logos/{}.png", name.to_lowercase())),
    })
}

pub fn incubation_fields(name: &str) -> ProfileFields {
    ProfileFields::Incubation(IncubationFields {
        incubator_accelerator_name: name.to_string(),
        focus_areas: vec!["agritech".to_string(), "climate".to_string()],
        location: "Bengaluru".to_string(),
        program_duration: Some("12 weeks".to_string()),
        funding_offered: Some("up to 25L".to_string()),
        website: None,
        description: String::new(),
        logo_path: None,
    })
}

pub fn investor_fields(name: &str) -> ProfileFields {
    ProfileFields::Investor(InvestorFields {
        investor_name: name.to_string(),
        firm_name: Some("Northstar Ventures".to_string()),
        investment_stages: vec!["seed".to_string()],
        sectors: vec!["saas".to_string()],
        ticket_size: Some("50L-2Cr".to_string()),
        location: None,
        linkedin_url: None,
        bio: String::new(),
        photo_path: None,
    })
}

pub fn mentor_fields(name: &str) -> ProfileFields {
    ProfileFields::Mentor(MentorFields {
        full_name: name.to_string(),
        expertise_areas: vec!["fundraising".to_string()],
        years_of_experience: 15,
        current_role: Some("Partner".to_string()),
        organization: None,
        linkedin_url: None,
        bio: String::new(),
        photo_path: None,
    })
}

pub fn fields_for(role: Role, name: &str) -> ProfileFields {
    match role {
        Role::Startup => startup_fields(name),
        Role::Incubation => incubation_fields(name),
        Role::Investor => investor_fields(name),
        Role::Mentor => mentor_fields(name),
    }
}

/// Insert a pending approval row straight into the store
pub async fn submit<S: ProfileStore>(store: &S, user: &str, fields: ProfileFields) -> ApprovalRecord {
    let record = ApprovalRecord::new(UserId::new(user), fields);
    store.insert_approval(&record).await.unwrap();
    record
}

/// In-memory store with switchable faults, a write counter, an optional
/// yield before every call and an optional gate in front of `upsert_live`
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: InMemoryProfileStore,
    pub fail_upsert: AtomicBool,
    pub fail_delete: AtomicBool,
    pub yield_between_calls: AtomicBool,
    pub upsert_gate: Option<Arc<Notify>>,
    writes: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upsert_gate(gate: Arc<Notify>) -> Self {
        Self {
            upsert_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn interleaved() -> Self {
        let store = Self::default();
        store.yield_between_calls.store(true, Ordering::SeqCst);
        store
    }

    /// Writes to the approval and live tables (intent bookkeeping excluded)
    pub fn table_writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if self.yield_between_calls.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }

    fn count_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for ScriptedStore {
    async fn list_approvals(
        &self,
        role: Role,
        status: ApprovalStatus,
        order: SortOrder,
    ) -> StoreResult<Vec<ApprovalRecord>> {
        self.pause().await;
        self.inner.list_approvals(role, status, order).await
    }

    async fn get_approval(&self, role: Role, id: &ProfileId) -> StoreResult<Option<ApprovalRecord>> {
        self.pause().await;
        self.inner.get_approval(role, id).await
    }

    async fn find_approval_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<ApprovalRecord>> {
        self.pause().await;
        self.inner.find_approval_for_user(role, user_id).await
    }

    async fn insert_approval(&self, record: &ApprovalRecord) -> StoreResult<()> {
        self.pause().await;
        self.count_write();
        self.inner.insert_approval(record).await
    }

    async fn save_approval(&self, record: &ApprovalRecord) -> StoreResult<()> {
        self.pause().await;
        self.count_write();
        self.inner.save_approval(record).await
    }

    async fn delete_approval(&self, role: Role, id: &ProfileId) -> StoreResult<()> {
        self.pause().await;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("permission denied for table".to_string()));
        }
        self.count_write();
        self.inner.delete_approval(role, id).await
    }

    async fn update_approval_status(
        &self,
        role: Role,
        id: &ProfileId,
        status: ApprovalStatus,
        reason: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.pause().await;
        self.count_write();
        self.inner.update_approval_status(role, id, status, reason, updated_at).await
    }

    async fn update_approval_rating(
        &self,
        role: Role,
        id: &ProfileId,
        rating: Rating,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.pause().await;
        self.count_write();
        self.inner.update_approval_rating(role, id, rating, updated_at).await
    }

    async fn list_live(&self, role: Role) -> StoreResult<Vec<LiveRecord>> {
        self.pause().await;
        self.inner.list_live(role).await
    }

    async fn get_live_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<LiveRecord>> {
        self.pause().await;
        self.inner.get_live_for_user(role, user_id).await
    }

    async fn upsert_live(&self, record: &LiveRecord) -> StoreResult<UpsertOutcome> {
        self.pause().await;
        if let Some(gate) = &self.upsert_gate {
            gate.notified().await;
        }
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("duplicate key value violates unique constraint".to_string()));
        }
        self.count_write();
        self.inner.upsert_live(record).await
    }

    async fn record_intent(&self, intent: &PromotionIntent) -> StoreResult<()> {
        self.pause().await;
        self.inner.record_intent(intent).await
    }

    async fn clear_intent(&self, intent_id: &str) -> StoreResult<()> {
        self.pause().await;
        self.inner.clear_intent(intent_id).await
    }

    async fn list_intents(&self) -> StoreResult<Vec<PromotionIntent>> {
        self.pause().await;
        self.inner.list_intents().await
    }
}
