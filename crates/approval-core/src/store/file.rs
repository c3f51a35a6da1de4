//! File-based profile store
//! One JSON file per row, one directory per table

use super::traits::{sort_approvals, sort_live, ProfileStore, PromotionIntent, StoreResult, UpsertOutcome};
use crate::error::StoreError;
use crate::paths;
use approval_types::{
    ApprovalRecord, ApprovalStatus, LiveRecord, ProfileId, Rating, Role, SortOrder, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Profile store persisted as JSON files under a root directory
pub struct FileProfileStore {
    root_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileProfileStore {
    /// Create store with specified root path, creating every table directory
    pub fn new<P: AsRef<Path>>(root_path: P) -> StoreResult<Self> {
        let root_path = root_path.as_ref().to_path_buf();

        for role in Role::ALL {
            fs::create_dir_all(paths::approval_dir(&root_path, role))?;
            fs::create_dir_all(paths::live_dir(&root_path, role))?;
        }
        fs::create_dir_all(paths::intents_dir(&root_path))?;

        Ok(Self {
            root_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Run a read-modify-write sequence while holding the store's write lock
    fn locked<T>(&self, f: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("File store write lock poisoned".to_string()))?;
        f()
    }

    /// Write row to a temporary file and rename it into place
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<T> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn read_optional<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<Option<T>> {
        if !path.exists() {
            log::debug!("No row at {:?}", path);
            return Ok(None);
        }
        self.read_json(path).map(Some)
    }

    /// Read every row file in a table directory, skipping unreadable ones
    fn read_table<T: DeserializeOwned>(&self, dir: &Path) -> StoreResult<Vec<T>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !paths::is_json_file(&path) {
                continue;
            }

            match self.read_json(&path) {
                Ok(row) => rows.push(row),
                Err(e) => log::warn!("Skipping unreadable row {:?}: {}", path, e),
            }
        }

        Ok(rows)
    }

    fn not_found(role: Role, id: &ProfileId) -> StoreError {
        StoreError::NotFound {
            table: role.approval_table(),
            key: id.to_string(),
        }
    }

    /// Load an existing approval row, apply `change`, write it back
    fn modify_approval(
        &self,
        role: Role,
        id: &ProfileId,
        change: impl FnOnce(&mut ApprovalRecord),
    ) -> StoreResult<()> {
        let path = paths::approval_file(&self.root_path, role, id);
        self.locked(|| {
            let mut record: ApprovalRecord = self
                .read_optional(&path)?
                .ok_or_else(|| Self::not_found(role, id))?;
            change(&mut record);
            self.write_json(&path, &record)
        })
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn list_approvals(
        &self,
        role: Role,
        status: ApprovalStatus,
        order: SortOrder,
    ) -> StoreResult<Vec<ApprovalRecord>> {
        let mut records: Vec<ApprovalRecord> = self
            .read_table::<ApprovalRecord>(&paths::approval_dir(&self.root_path, role))?
            .into_iter()
            .filter(|r| r.status == status)
            .collect();

        sort_approvals(&mut records, order);
        Ok(records)
    }

    async fn get_approval(&self, role: Role, id: &ProfileId) -> StoreResult<Option<ApprovalRecord>> {
        self.read_optional(&paths::approval_file(&self.root_path, role, id))
    }

    async fn find_approval_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<ApprovalRecord>> {
        let records: Vec<ApprovalRecord> =
            self.read_table(&paths::approval_dir(&self.root_path, role))?;
        Ok(records.into_iter().find(|r| &r.user_id == user_id))
    }

    async fn insert_approval(&self, record: &ApprovalRecord) -> StoreResult<()> {
        let role = record.role();
        let path = paths::approval_file(&self.root_path, role, &record.id);
        self.locked(|| {
            if path.exists() {
                return Err(StoreError::Conflict {
                    table: role.approval_table(),
                    key: record.id.to_string(),
                });
            }
            self.write_json(&path, record)
        })?;

        log::debug!("Inserted {} row {}", role.approval_table(), record.id);
        Ok(())
    }

    async fn save_approval(&self, record: &ApprovalRecord) -> StoreResult<()> {
        self.modify_approval(record.role(), &record.id, |existing| *existing = record.clone())
    }

    async fn delete_approval(&self, role: Role, id: &ProfileId) -> StoreResult<()> {
        let path = paths::approval_file(&self.root_path, role, id);
        self.locked(|| {
            if !path.exists() {
                return Err(Self::not_found(role, id));
            }
            fs::remove_file(&path)?;
            Ok(())
        })?;

        log::debug!("Deleted {} row {}", role.approval_table(), id);
        Ok(())
    }

    async fn update_approval_status(
        &self,
        role: Role,
        id: &ProfileId,
        status: ApprovalStatus,
        reason: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.modify_approval(role, id, |record| {
            record.status = status;
            record.reason = reason;
            record.updated_at = updated_at;
        })
    }

    async fn update_approval_rating(
        &self,
        role: Role,
        id: &ProfileId,
        rating: Rating,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.modify_approval(role, id, |record| {
            record.rating = Some(rating);
            record.updated_at = updated_at;
        })
    }

    async fn list_live(&self, role: Role) -> StoreResult<Vec<LiveRecord>> {
        let mut records: Vec<LiveRecord> = self.read_table(&paths::live_dir(&self.root_path, role))?;
        sort_live(&mut records);
        Ok(records)
    }

    async fn get_live_for_user(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> StoreResult<Option<LiveRecord>> {
        self.read_optional(&paths::live_file(&self.root_path, role, user_id))
    }

    async fn upsert_live(&self, record: &LiveRecord) -> StoreResult<UpsertOutcome> {
        let role = record.role();
        let path = paths::live_file(&self.root_path, role, &record.user_id);
        let outcome = self.locked(|| {
            let outcome = if path.exists() {
                UpsertOutcome::Replaced
            } else {
                UpsertOutcome::Inserted
            };
            self.write_json(&path, record)?;
            Ok(outcome)
        })?;

        log::debug!("Upserted {} row for user {} ({:?})", role.live_table(), record.user_id, outcome);
        Ok(outcome)
    }

    async fn record_intent(&self, intent: &PromotionIntent) -> StoreResult<()> {
        let path = paths::intent_file(&self.root_path, &intent.intent_id);
        self.locked(|| self.write_json(&path, intent))
    }

    async fn clear_intent(&self, intent_id: &str) -> StoreResult<()> {
        let path = paths::intent_file(&self.root_path, intent_id);
        self.locked(|| {
            if path.exists() {
                fs::remove_file(&path)?;
            }
            Ok(())
        })
    }

    async fn list_intents(&self) -> StoreResult<Vec<PromotionIntent>> {
        let mut intents: Vec<PromotionIntent> = self.read_table(&paths::intents_dir(&self.root_path))?;
        intents.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Ok(intents)
    }
}
