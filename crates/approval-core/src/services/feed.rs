//! Merged review feed across all four roles

use crate::error::Result;
use crate::media::MediaResolver;
use crate::store::ProfileStore;
use approval_types::{
    ApprovalRecord, ApprovalStatus, LiveRecord, ProfileId, Rating, Role, SortOrder, UserId,
};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Which slice of the feed an administrator is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedFilter {
    /// `None` merges every role
    pub role: Option<Role>,
    pub status: ApprovalStatus,
}

impl Default for FeedFilter {
    fn default() -> Self {
        Self {
            role: None,
            status: ApprovalStatus::Pending,
        }
    }
}

/// One row of the review feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub role: Role,
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub display_name: String,
    pub status: ApprovalStatus,
    pub reason: Option<String>,
    pub rating: Option<Rating>,
    pub stars: Option<f32>,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub media_url: Option<String>,
}

impl FeedEntry {
    fn from_approval(record: ApprovalRecord, media: &MediaResolver) -> Self {
        Self {
            role: record.role(),
            display_name: record.profile.display_name().to_string(),
            media_url: record.profile.media_path().map(|p| media.public_url(p)),
            stars: record.rating.map(|r| r.stars()),
            profile_id: record.id,
            user_id: record.user_id,
            status: record.status,
            reason: record.reason,
            rating: record.rating,
            submitted_at: record.created_at,
            approved_at: None,
        }
    }

    fn from_live(record: LiveRecord, media: &MediaResolver) -> Self {
        Self {
            role: record.role(),
            display_name: record.profile.display_name().to_string(),
            media_url: record.profile.media_path().map(|p| media.public_url(p)),
            stars: record.rating.map(|r| r.stars()),
            profile_id: record.id,
            user_id: record.user_id,
            status: ApprovalStatus::Approved,
            reason: None,
            rating: record.rating,
            submitted_at: record.created_at,
            approved_at: Some(record.approved_at),
        }
    }
}

/// Row counts per role and status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCountMap {
    counts: HashMap<Role, HashMap<ApprovalStatus, usize>>,
}

impl StatusCountMap {
    pub fn set(&mut self, role: Role, status: ApprovalStatus, count: usize) {
        self.counts.entry(role).or_default().insert(status, count);
    }

    pub fn get(&self, role: Role, status: ApprovalStatus) -> usize {
        self.counts
            .get(&role)
            .and_then(|by_status| by_status.get(&status))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, status: ApprovalStatus) -> usize {
        Role::ALL.iter().map(|role| self.get(*role, status)).sum()
    }
}

/// Read side of the admin review screen
pub struct ReviewFeed<S: ProfileStore> {
    store: Arc<S>,
    media: MediaResolver,
}

impl<S: ProfileStore> ReviewFeed<S> {
    pub fn new(store: Arc<S>, media: MediaResolver) -> Self {
        Self { store, media }
    }

    /// Full fetch of the rows matching `filter`, ordered by submission time.
    /// The `approved` filter shows live rows; the others show approval rows.
    pub async fn load(&self, filter: FeedFilter, order: SortOrder) -> Result<Vec<FeedEntry>> {
        let roles: Vec<Role> = match filter.role {
            Some(role) => vec![role],
            None => Role::ALL.to_vec(),
        };

        let per_role = try_join_all(roles.into_iter().map(|role| self.load_role(role, filter.status, order))).await?;

        let mut entries: Vec<FeedEntry> = per_role.into_iter().flatten().collect();
        match order {
            SortOrder::OldestFirst => entries.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at)),
            SortOrder::NewestFirst => entries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at)),
        }

        log::debug!("Loaded {} feed entries for {:?}", entries.len(), filter);
        Ok(entries)
    }

    async fn load_role(&self, role: Role, status: ApprovalStatus, order: SortOrder) -> Result<Vec<FeedEntry>> {
        let entries = match status {
            ApprovalStatus::Approved => self
                .store
                .list_live(role)
                .await?
                .into_iter()
                .map(|r| FeedEntry::from_live(r, &self.media))
                .collect(),
            _ => self
                .store
                .list_approvals(role, status, order)
                .await?
                .into_iter()
                .map(|r| FeedEntry::from_approval(r, &self.media))
                .collect(),
        };
        Ok(entries)
    }

    /// Counts for every role and status filter
    pub async fn counts(&self) -> Result<StatusCountMap> {
        let mut counts = StatusCountMap::default();

        for role in Role::ALL {
            for status in ApprovalStatus::ALL {
                let count = match status {
                    ApprovalStatus::Approved => self.store.list_live(role).await?.len(),
                    _ => self.store.list_approvals(role, status, SortOrder::OldestFirst).await?.len(),
                };
                counts.set(role, status, count);
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryProfileStore;
    use approval_types::{InvestorFields, ProfileFields, StartupFields};

    fn startup(user: &str, minutes_ago: i64) -> ApprovalRecord {
        let mut record = ApprovalRecord::new(
            UserId::new(user),
            ProfileFields::Startup(StartupFields {
                startup_name: format!("Startup {}", user),
                domain: "health".to_string(),
                stage: None,
                description: String::new(),
                website: None,
                country: None,
                founded_year: None,
                team_members: Vec::new(),
                logo_path: Some("logos/s.png".to_string()),
            }),
        );
        record.created_at = record.created_at - chrono::Duration::minutes(minutes_ago);
        record
    }

    fn investor(user: &str, minutes_ago: i64) -> ApprovalRecord {
        let mut record = ApprovalRecord::new(
            UserId::new(user),
            ProfileFields::Investor(InvestorFields {
                investor_name: format!("Investor {}", user),
                firm_name: None,
                investment_stages: Vec::new(),
                sectors: Vec::new(),
                ticket_size: None,
                location: None,
                linkedin_url: None,
                bio: String::new(),
                photo_path: None,
            }),
        );
        record.created_at = record.created_at - chrono::Duration::minutes(minutes_ago);
        record
    }

    fn feed(store: Arc<InMemoryProfileStore>) -> ReviewFeed<InMemoryProfileStore> {
        ReviewFeed::new(store, MediaResolver::new("https://media.example.org", "profile-media"))
    }

    #[tokio::test]
    async fn test_merged_feed_orders_across_roles() {
        let store = Arc::new(InMemoryProfileStore::new());
        store.insert_approval(&startup("s1", 30)).await.unwrap();
        store.insert_approval(&investor("i1", 20)).await.unwrap();
        store.insert_approval(&startup("s2", 10)).await.unwrap();

        let feed = feed(store);
        let oldest_first = feed.load(FeedFilter::default(), SortOrder::OldestFirst).await.unwrap();
        let names: Vec<&str> = oldest_first.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Startup s1", "Investor i1", "Startup s2"]);

        let newest_first = feed.load(FeedFilter::default(), SortOrder::NewestFirst).await.unwrap();
        assert_eq!(newest_first[0].display_name, "Startup s2");
    }

    #[tokio::test]
    async fn test_role_filter_and_media_url() {
        let store = Arc::new(InMemoryProfileStore::new());
        store.insert_approval(&startup("s1", 5)).await.unwrap();
        store.insert_approval(&investor("i1", 5)).await.unwrap();

        let entries = feed(store)
            .load(
                FeedFilter { role: Some(Role::Startup), status: ApprovalStatus::Pending },
                SortOrder::NewestFirst,
            )
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].media_url.as_deref(),
            Some("https://media.example.org/storage/v1/object/public/profile-media/logos/s.png")
        );
    }

    #[tokio::test]
    async fn test_counts_by_status() {
        let store = Arc::new(InMemoryProfileStore::new());
        store.insert_approval(&startup("s1", 5)).await.unwrap();
        let mut rejected = investor("i1", 5);
        rejected.status = ApprovalStatus::Rejected;
        store.insert_approval(&rejected).await.unwrap();

        let counts = feed(store).counts().await.unwrap();

        assert_eq!(counts.get(Role::Startup, ApprovalStatus::Pending), 1);
        assert_eq!(counts.get(Role::Investor, ApprovalStatus::Rejected), 1);
        assert_eq!(counts.total(ApprovalStatus::Pending), 1);
        assert_eq!(counts.total(ApprovalStatus::Approved), 0);
    }
}
