//! In-memory profile store
//! All tables live behind one lock, so each call is atomic on its own

use super::traits::{sort_approvals, sort_live, ProfileStore, PromotionIntent, StoreResult, UpsertOutcome};
use crate::error::StoreError;
use approval_types::{
    ApprovalRecord, ApprovalStatus, LiveRecord, ProfileId, Rating, Role, SortOrder, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    approvals: HashMap<Role, HashMap<ProfileId, ApprovalRecord>>,
    live: HashMap<Role, HashMap<UserId, LiveRecord>>,
    intents: HashMap<String, PromotionIntent>,
}

impl Tables {
    fn approval_mut(&mut self, role: Role, id: &ProfileId) -> StoreResult<&mut ApprovalRecord> {
        self.approvals
            .get_mut(&role)
            .and_then(|table| table.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                table: role.approval_table(),
                key: id.to_string(),
            })
    }
}

/// Profile store held entirely in process memory
#[derive(Default)]
pub struct InMemoryProfileStore {
    tables: RwLock<Tables>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rows for a role
    pub async fn live_count(&self, role: Role) -> usize {
        self.tables.read().await.live.get(&role).map_or(0, HashMap::len)
    }

    /// Number of approval rows for a role, any status
    pub async fn approval_count(&self, role: Role) -> usize {
        self.tables.read().await.approvals.get(&role).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn list_approvals(
        &self,
        role: Role,
        status: ApprovalStatus,
        order: SortOrder,
    ) -> StoreResult<Vec<ApprovalRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<ApprovalRecord> = tables
            .approvals
            .get(&role)
            .map(|table| table.values().filter(|r| r.status == status).cloned().collect())
            .unwrap_or_default();

        sort_approvals(&mut records, order);
        Ok(records)
    }

    async fn get_approval(&self, role: Role, id: &ProfileId) -> StoreResult<Option<ApprovalRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.approvals.get(&role).and_then(|table| table.get(id)).cloned())
    }

    async fn find_approval_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<ApprovalRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .approvals
            .get(&role)
            .and_then(|table| table.values().find(|r| &r.user_id == user_id))
            .cloned())
    }

    async fn insert_approval(&self, record: &ApprovalRecord) -> StoreResult<()> {
        let role = record.role();
        let mut tables = self.tables.write().await;
        let table = tables.approvals.entry(role).or_default();

        if table.contains_key(&record.id) {
            return Err(StoreError::Conflict {
                table: role.approval_table(),
                key: record.id.to_string(),
            });
        }

        table.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn save_approval(&self, record: &ApprovalRecord) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let existing = tables.approval_mut(record.role(), &record.id)?;
        *existing = record.clone();
        Ok(())
    }

    async fn delete_approval(&self, role: Role, id: &ProfileId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .approvals
            .get_mut(&role)
            .and_then(|table| table.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                table: role.approval_table(),
                key: id.to_string(),
            })
    }

    async fn update_approval_status(
        &self,
        role: Role,
        id: &ProfileId,
        status: ApprovalStatus,
        reason: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let record = tables.approval_mut(role, id)?;
        record.status = status;
        record.reason = reason;
        record.updated_at = updated_at;
        Ok(())
    }

    async fn update_approval_rating(
        &self,
        role: Role,
        id: &ProfileId,
        rating: Rating,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let record = tables.approval_mut(role, id)?;
        record.rating = Some(rating);
        record.updated_at = updated_at;
        Ok(())
    }

    async fn list_live(&self, role: Role) -> StoreResult<Vec<LiveRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<LiveRecord> = tables
            .live
            .get(&role)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();

        sort_live(&mut records);
        Ok(records)
    }

    async fn get_live_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<LiveRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.live.get(&role).and_then(|table| table.get(user_id)).cloned())
    }

    async fn upsert_live(&self, record: &LiveRecord) -> StoreResult<UpsertOutcome> {
        let mut tables = self.tables.write().await;
        let previous = tables
            .live
            .entry(record.role())
            .or_default()
            .insert(record.user_id.clone(), record.clone());

        Ok(match previous {
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Inserted,
        })
    }

    async fn record_intent(&self, intent: &PromotionIntent) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.intents.insert(intent.intent_id.clone(), intent.clone());
        Ok(())
    }

    async fn clear_intent(&self, intent_id: &str) -> StoreResult<()> {
        self.tables.write().await.intents.remove(intent_id);
        Ok(())
    }

    async fn list_intents(&self) -> StoreResult<Vec<PromotionIntent>> {
        let tables = self.tables.read().await;
        let mut intents: Vec<PromotionIntent> = tables.intents.values().cloned().collect();
        intents.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Ok(intents)
    }
}
