//! Review desk: one administrator's working session
//!
//! Holds the current feed filter and the last fetched rows, blocks a
//! second action on a row while one is outstanding, and re-fetches the
//! list after every successful action. Failed actions leave the list as
//! it was.

use super::engine::{ActionOutcome, ApprovalWorkflow};
use crate::error::{Result, WorkflowError};
use crate::services::feed::{FeedEntry, FeedFilter, ReviewFeed};
use crate::store::ProfileStore;
use approval_types::{ActionPayload, Actor, ProfileId, ReviewAction, Role, SortOrder};
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast-style message for the administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

type RowKey = (Role, ProfileId);

/// Releases the row when dropped
struct InFlightGuard<'a> {
    rows: &'a Mutex<HashSet<RowKey>>,
    key: RowKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.remove(&self.key);
        }
    }
}

struct View {
    filter: FeedFilter,
    order: SortOrder,
    entries: Vec<FeedEntry>,
}

pub struct ReviewDesk<S: ProfileStore> {
    actor: Actor,
    workflow: ApprovalWorkflow<S>,
    feed: ReviewFeed<S>,
    view: RwLock<View>,
    in_flight: Mutex<HashSet<RowKey>>,
    notices: Mutex<Vec<Notice>>,
}

impl<S: ProfileStore> ReviewDesk<S> {
    pub fn new(actor: Actor, workflow: ApprovalWorkflow<S>, feed: ReviewFeed<S>, order: SortOrder) -> Self {
        Self {
            actor,
            workflow,
            feed,
            view: RwLock::new(View {
                filter: FeedFilter::default(),
                order,
                entries: Vec::new(),
            }),
            in_flight: Mutex::new(HashSet::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Switch to another role/status slice and fetch it
    pub async fn set_filter(&self, filter: FeedFilter) -> Result<Vec<FeedEntry>> {
        self.view.write().await.filter = filter;
        self.refresh().await
    }

    /// Re-fetch the current slice in full
    pub async fn refresh(&self) -> Result<Vec<FeedEntry>> {
        let (filter, order) = {
            let view = self.view.read().await;
            (view.filter, view.order)
        };

        let entries = self.feed.load(filter, order).await?;

        let mut view = self.view.write().await;
        // The filter may have changed while loading
        if view.filter == filter {
            view.entries = entries.clone();
        }
        Ok(entries)
    }

    /// Rows from the last fetch
    pub async fn entries(&self) -> Vec<FeedEntry> {
        self.view.read().await.entries.clone()
    }

    pub async fn filter(&self) -> FeedFilter {
        self.view.read().await.filter
    }

    /// Apply an action to one row, unless an action on that row is outstanding
    pub async fn act(
        &self,
        role: Role,
        profile_id: &ProfileId,
        action: ReviewAction,
        payload: &ActionPayload,
    ) -> Result<ActionOutcome> {
        let guard = self.claim(role, profile_id)?;
        let result = self
            .workflow
            .apply_action(&self.actor, role, profile_id, action, payload)
            .await;
        drop(guard);

        match result {
            Ok(outcome) => {
                self.notify(NoticeLevel::Success, outcome.message.clone());
                if let Err(e) = self.refresh().await {
                    log::warn!("Action succeeded but the list could not be refreshed: {}", e);
                    self.notify(NoticeLevel::Error, format!("Could not refresh list: {}", e));
                }
                Ok(outcome)
            }
            Err(e) => {
                log::warn!("{} on {} profile {} failed: {}", action, role, profile_id, e);
                self.notify(NoticeLevel::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Whether an action on this row is outstanding
    pub fn is_busy(&self, role: Role, profile_id: &ProfileId) -> bool {
        self.in_flight
            .lock()
            .map(|rows| rows.contains(&(role, profile_id.clone())))
            .unwrap_or(false)
    }

    /// Drain queued notices, oldest first
    pub fn take_notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut notices| std::mem::take(&mut *notices))
            .unwrap_or_default()
    }

    fn claim(&self, role: Role, profile_id: &ProfileId) -> Result<InFlightGuard<'_>> {
        let key = (role, profile_id.clone());
        let mut rows = self
            .in_flight
            .lock()
            .map_err(|_| WorkflowError::Validation("review desk state poisoned".to_string()))?;

        if !rows.insert(key.clone()) {
            return Err(WorkflowError::ActionInFlight { id: profile_id.clone() });
        }

        Ok(InFlightGuard {
            rows: &self.in_flight,
            key,
        })
    }

    fn notify(&self, level: NoticeLevel, message: String) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice { level, message });
        }
    }
}
