//! Recovery sweep for promotions that stopped half way
//!
//! A promotion records an intent, writes the live row, deletes the
//! approval row and clears the intent. Any intent still present was
//! interrupted somewhere in that sequence. Run the sweep while no
//! promotions are in progress: a sweep racing a promotion can clear an
//! intent that promotion still relies on.

use crate::error::Result;
use crate::store::{ProfileStore, PromotionIntent};
use std::sync::Arc;

/// What the sweep did with one dangling intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Live row was written; the leftover approval row was removed
    CompletedPromotion,
    /// Approval row already gone, nothing left to reconcile
    ClearedStale,
    /// Live row never written; the approval row stays in review
    RolledBack,
}

#[derive(Debug, Clone, Default)]
pub struct RecoveryReport {
    pub entries: Vec<(PromotionIntent, RecoveryAction)>,
}

impl RecoveryReport {
    pub fn count(&self, action: RecoveryAction) -> usize {
        self.entries.iter().filter(|(_, a)| *a == action).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RecoverySweep<S: ProfileStore> {
    store: Arc<S>,
}

impl<S: ProfileStore> RecoverySweep<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reconcile every dangling promotion intent
    pub async fn run(&self) -> Result<RecoveryReport> {
        let intents = self.store.list_intents().await?;
        let mut report = RecoveryReport::default();

        if intents.is_empty() {
            log::debug!("No dangling promotion intents");
            return Ok(report);
        }

        log::info!("Reconciling {} dangling promotion intents", intents.len());

        for intent in intents {
            let action = self.reconcile(&intent).await?;
            self.store.clear_intent(&intent.intent_id).await?;

            log::info!(
                "Intent {} for {} profile {}: {:?}",
                intent.intent_id,
                intent.role,
                intent.profile_id,
                action
            );
            report.entries.push((intent, action));
        }

        Ok(report)
    }

    async fn reconcile(&self, intent: &PromotionIntent) -> Result<RecoveryAction> {
        let approval = self.store.get_approval(intent.role, &intent.profile_id).await?;
        if approval.is_none() {
            return Ok(RecoveryAction::ClearedStale);
        }

        let live = self.store.get_live_for_user(intent.role, &intent.user_id).await?;
        match live {
            Some(live) if live.id == intent.profile_id => {
                log::warn!(
                    "{} profile {} found in both stores; removing approval row",
                    intent.role,
                    intent.profile_id
                );
                self.store.delete_approval(intent.role, &intent.profile_id).await?;
                Ok(RecoveryAction::CompletedPromotion)
            }
            _ => Ok(RecoveryAction::RolledBack),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryProfileStore;
    use crate::workflow::promotion::build_live_record;
    use approval_types::{ApprovalRecord, ApprovalStatus, MentorFields, ProfileFields, Role, UserId};
    use chrono::Utc;

    fn mentor_row(user: &str) -> ApprovalRecord {
        ApprovalRecord::new(
            UserId::new(user),
            ProfileFields::Mentor(MentorFields {
                full_name: "Kiran".to_string(),
                expertise_areas: Vec::new(),
                years_of_experience: 8,
                current_role: None,
                organization: None,
                linkedin_url: None,
                bio: String::new(),
                photo_path: None,
            }),
        )
    }

    #[tokio::test]
    async fn test_completes_promotion_left_in_both_stores() {
        let store = Arc::new(InMemoryProfileStore::new());
        let record = mentor_row("u1");
        store.insert_approval(&record).await.unwrap();
        store.upsert_live(&build_live_record(&record, None, Utc::now())).await.unwrap();
        store
            .record_intent(&PromotionIntent::new(Role::Mentor, record.id.clone(), record.user_id.clone()))
            .await
            .unwrap();

        let report = RecoverySweep::new(store.clone()).run().await.unwrap();

        assert_eq!(report.count(RecoveryAction::CompletedPromotion), 1);
        assert!(store.get_approval(Role::Mentor, &record.id).await.unwrap().is_none());
        assert!(store.list_intents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rolls_back_when_live_row_missing() {
        let store = Arc::new(InMemoryProfileStore::new());
        let record = mentor_row("u1");
        store.insert_approval(&record).await.unwrap();
        store
            .record_intent(&PromotionIntent::new(Role::Mentor, record.id.clone(), record.user_id.clone()))
            .await
            .unwrap();

        let report = RecoverySweep::new(store.clone()).run().await.unwrap();

        assert_eq!(report.count(RecoveryAction::RolledBack), 1);
        let still_pending = store.get_approval(Role::Mentor, &record.id).await.unwrap().unwrap();
        assert_eq!(still_pending.status, ApprovalStatus::Pending);
        assert_eq!(store.live_count(Role::Mentor).await, 0);
    }

    #[tokio::test]
    async fn test_older_live_row_is_not_mistaken_for_this_promotion() {
        let store = Arc::new(InMemoryProfileStore::new());
        let published = mentor_row("u1");
        store.upsert_live(&build_live_record(&published, None, Utc::now())).await.unwrap();

        // Owner edit awaiting review, promotion interrupted before the upsert
        let edit = mentor_row("u1");
        store.insert_approval(&edit).await.unwrap();
        store
            .record_intent(&PromotionIntent::new(Role::Mentor, edit.id.clone(), edit.user_id.clone()))
            .await
            .unwrap();

        let report = RecoverySweep::new(store.clone()).run().await.unwrap();

        assert_eq!(report.count(RecoveryAction::RolledBack), 1);
        assert!(store.get_approval(Role::Mentor, &edit.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clears_intent_for_finished_promotion() {
        let store = Arc::new(InMemoryProfileStore::new());
        store
            .record_intent(&PromotionIntent::new(Role::Startup, approval_types::ProfileId::new(), UserId::new("u9")))
            .await
            .unwrap();

        let report = RecoverySweep::new(store.clone()).run().await.unwrap();

        assert_eq!(report.count(RecoveryAction::ClearedStale), 1);
        assert!(store.list_intents().await.unwrap().is_empty());
    }
}
