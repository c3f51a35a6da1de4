//! Owner-side submissions: drafts, re-submission and withdrawal

use crate::error::{Result, WorkflowError};
use crate::store::ProfileStore;
use approval_types::{Actor, ApprovalRecord, LiveRecord, ProfileFields, ProfileId, Role};
use std::sync::Arc;

/// What an owner sees for one role
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOverview {
    /// Row waiting in (or returned from) review
    pub in_review: Option<ApprovalRecord>,
    /// Published profile
    pub live: Option<LiveRecord>,
}

pub struct SubmissionService<S: ProfileStore> {
    store: Arc<S>,
}

impl<S: ProfileStore> SubmissionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Save the owner's profile for review.
    ///
    /// The first save inserts a pending row. Later saves overwrite the same
    /// row and put it back to pending, which is how rejected and
    /// needs-update rows are re-submitted. Editing a published profile
    /// goes through here too and replaces the live row on approval.
    pub async fn save_draft(&self, owner: &Actor, fields: ProfileFields) -> Result<ApprovalRecord> {
        if let Some(field) = fields.missing_required() {
            return Err(WorkflowError::Validation(format!("{} is required", field)));
        }

        let role = fields.role();
        match self.store.find_approval_for_user(role, &owner.id).await? {
            Some(mut record) => {
                let previous = record.status;
                record.resubmit(fields);
                self.store.save_approval(&record).await?;

                log::info!("User {} re-submitted {} profile {} (was {})", owner.id, role, record.id, previous);
                Ok(record)
            }
            None => {
                let record = ApprovalRecord::new(owner.id.clone(), fields);
                self.store.insert_approval(&record).await?;

                log::info!("User {} submitted {} profile {}", owner.id, role, record.id);
                Ok(record)
            }
        }
    }

    /// Abandon the owner's submission for a role
    pub async fn withdraw(&self, owner: &Actor, role: Role) -> Result<ProfileId> {
        let record = self
            .store
            .find_approval_for_user(role, &owner.id)
            .await?
            .ok_or_else(|| WorkflowError::NoSubmission { role, user_id: owner.id.clone() })?;

        self.store.delete_approval(role, &record.id).await?;

        log::info!("User {} withdrew {} profile {}", owner.id, role, record.id);
        Ok(record.id)
    }

    pub async fn overview(&self, owner: &Actor, role: Role) -> Result<SubmissionOverview> {
        Ok(SubmissionOverview {
            in_review: self.store.find_approval_for_user(role, &owner.id).await?,
            live: self.store.get_live_for_user(role, &owner.id).await?,
        })
    }
}
