//! Approval workflow engine
//!
//! Applies administrator review actions to approval rows and promotes
//! approved rows into the live table.

use super::promotion::build_live_record;
use crate::error::{Result, StoreError, WorkflowError};
use crate::store::{ProfileStore, PromotionIntent, UpsertOutcome};
use approval_types::{
    ActionPayload, Actor, ApprovalRecord, ApprovalStatus, ProfileId, Rating, ReviewAction, Role,
};
use chrono::Utc;
use std::sync::Arc;

/// Successful result of a review action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub role: Role,
    pub profile_id: ProfileId,
    pub action: ReviewAction,
    /// User-visible confirmation
    pub message: String,
}

/// Validates review transitions and moves rows between stores
pub struct ApprovalWorkflow<S: ProfileStore> {
    store: Arc<S>,
}

impl<S: ProfileStore> Clone for ApprovalWorkflow<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: ProfileStore> ApprovalWorkflow<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Apply one review action on behalf of `actor`
    pub async fn apply_action(
        &self,
        actor: &Actor,
        role: Role,
        profile_id: &ProfileId,
        action: ReviewAction,
        payload: &ActionPayload,
    ) -> Result<ActionOutcome> {
        if !actor.is_admin() {
            log::warn!("User {} attempted {} on {} {} without admin role", actor.id, action, role, profile_id);
            return Err(WorkflowError::Forbidden(format!(
                "user {} may not review profiles",
                actor.id
            )));
        }

        log::info!("Admin {} applying {} to {} profile {}", actor.id, action, role, profile_id);

        let message = match action {
            ReviewAction::Approve => self.approve(role, profile_id, payload).await?,
            ReviewAction::Reject | ReviewAction::NeedsUpdate => {
                self.set_review_status(role, profile_id, action, payload).await?
            }
            ReviewAction::Rate => self.rate(role, profile_id, payload).await?,
        };

        Ok(ActionOutcome {
            role,
            profile_id: profile_id.clone(),
            action,
            message,
        })
    }

    /// Promote a pending row into the live table
    async fn approve(&self, role: Role, id: &ProfileId, payload: &ActionPayload) -> Result<String> {
        let record = self.load_approval(role, id).await?;
        Self::require_pending(&record, ReviewAction::Approve)?;

        let rating = match payload.rating {
            Some(value) if role.supports_rating() => Some(Rating::new(value)?),
            Some(value) => {
                log::warn!("Ignoring rating {} supplied while approving {} profile {}", value, role, id);
                None
            }
            None => None,
        };

        let now = Utc::now();
        let live = build_live_record(&record, rating, now);
        let intent = PromotionIntent::new(role, record.id.clone(), record.user_id.clone());

        // Nothing has been written yet if this fails
        self.store.record_intent(&intent).await?;

        let upserted = match self.store.upsert_live(&live).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Failed to publish {} profile {}: {}", role, id, e);
                if let Err(clear_err) = self.store.clear_intent(&intent.intent_id).await {
                    log::error!("Failed to clear promotion intent {}: {}", intent.intent_id, clear_err);
                }
                return Err(e.into());
            }
        };

        match self.store.delete_approval(role, id).await {
            Ok(()) => {}
            Err(StoreError::NotFound { .. }) => {
                // A concurrent promotion of the same row already removed it
                log::warn!("Approval row for {} profile {} was already removed", role, id);
            }
            Err(e) => {
                log::error!(
                    "{} profile {} is now in both stores; intent {} left for recovery: {}",
                    role,
                    id,
                    intent.intent_id,
                    e
                );
                return Err(WorkflowError::PartialPromotion { id: id.clone(), source: e });
            }
        }

        if let Err(e) = self.store.clear_intent(&intent.intent_id).await {
            log::warn!("Promotion of {} succeeded but intent {} was not cleared: {}", id, intent.intent_id, e);
        }

        let name = record.profile.display_name();
        log::info!("Promoted {} profile {} ({}) for user {} - {:?}", role, id, name, record.user_id, upserted);

        Ok(match upserted {
            UpsertOutcome::Inserted => format!("{} profile '{}' approved and published", capitalize(role), name),
            UpsertOutcome::Replaced => format!("{} profile '{}' approved; live profile updated", capitalize(role), name),
        })
    }

    /// Reject or request changes, replacing any previous reason
    async fn set_review_status(
        &self,
        role: Role,
        id: &ProfileId,
        action: ReviewAction,
        payload: &ActionPayload,
    ) -> Result<String> {
        let record = self.load_approval(role, id).await?;
        Self::require_pending(&record, action)?;

        let status = match action {
            ReviewAction::Reject => ApprovalStatus::Rejected,
            _ => ApprovalStatus::NeedsUpdate,
        };
        let reason = payload.normalized_reason();

        self.store
            .update_approval_status(role, id, status, reason.clone(), Utc::now())
            .await?;

        log::info!("{} profile {} marked {} (reason: {:?})", role, id, status, reason);

        let name = record.profile.display_name();
        Ok(match status {
            ApprovalStatus::Rejected => format!("{} profile '{}' rejected", capitalize(role), name),
            _ => format!("{} profile '{}' sent back for updates", capitalize(role), name),
        })
    }

    /// Set the rating without touching status
    async fn rate(&self, role: Role, id: &ProfileId, payload: &ActionPayload) -> Result<String> {
        if !role.supports_rating() {
            return Err(WorkflowError::UnsupportedForRole {
                action: ReviewAction::Rate,
                role,
            });
        }

        let rating = Rating::new(payload.rating.ok_or(WorkflowError::MissingRating)?)?;
        let record = self.load_approval(role, id).await?;

        self.store
            .update_approval_rating(role, id, rating, Utc::now())
            .await?;

        log::info!("{} profile {} rated {}", role, id, rating.value());
        Ok(format!(
            "{} profile '{}' rated {}/100",
            capitalize(role),
            record.profile.display_name(),
            rating.value()
        ))
    }

    async fn load_approval(&self, role: Role, id: &ProfileId) -> Result<ApprovalRecord> {
        self.store
            .get_approval(role, id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound { role, id: id.clone() })
    }

    fn require_pending(record: &ApprovalRecord, action: ReviewAction) -> Result<()> {
        if record.status != ApprovalStatus::Pending {
            log::warn!("Refusing {} on profile {}: status is {}", action, record.id, record.status);
            return Err(WorkflowError::InvalidTransition {
                id: record.id.clone(),
                from: record.status,
                action,
            });
        }
        Ok(())
    }
}

fn capitalize(role: Role) -> String {
    let name = role.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
