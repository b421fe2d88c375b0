//! [`ScheduleStore`] — persistence boundary for schedule records.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use byob_core::{Address, ScheduleError};

use crate::record::ScheduleRecord;

/// Key-value persistence for schedule records.
///
/// `update` applies its closure under the store's write linearization,
/// giving at-most-one-writer-per-record semantics: concurrent `cancel`
/// and `record_execution` calls on the same id never lose updates.
/// Reads observe whole records (no torn reads) without blocking writers
/// between calls — an executor may see a schedule as due a moment
/// before a cancellation lands elsewhere, which is tolerated staleness.
pub trait ScheduleStore: Send + Sync {
    fn get(&self, id: Uuid) -> Result<Option<ScheduleRecord>, ScheduleError>;

    fn put(&self, record: ScheduleRecord) -> Result<(), ScheduleError>;

    /// Atomically read-modify-write one record. The closure either fully
    /// applies or the stored record is left untouched.
    fn update<F>(&self, id: Uuid, f: F) -> Result<ScheduleRecord, ScheduleError>
    where
        F: FnOnce(&mut ScheduleRecord) -> Result<(), ScheduleError>;

    fn list_by_owner(&self, owner: &Address) -> Result<Vec<ScheduleRecord>, ScheduleError>;

    fn list_all(&self) -> Result<Vec<ScheduleRecord>, ScheduleError>;
}

/// In-memory store backed by a `RwLock<HashMap>`. Used by tests and the
/// single-process server; a durable backend implements the same trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, ScheduleRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryStore {
    fn get(&self, id: Uuid) -> Result<Option<ScheduleRecord>, ScheduleError> {
        let guard = self.records.read().expect("schedule store lock poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn put(&self, record: ScheduleRecord) -> Result<(), ScheduleError> {
        let mut guard = self.records.write().expect("schedule store lock poisoned");
        guard.insert(record.id, record);
        Ok(())
    }

    fn update<F>(&self, id: Uuid, f: F) -> Result<ScheduleRecord, ScheduleError>
    where
        F: FnOnce(&mut ScheduleRecord) -> Result<(), ScheduleError>,
    {
        let mut guard = self.records.write().expect("schedule store lock poisoned");
        let current = guard
            .get(&id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;

        // Mutate a copy so a failing closure leaves the record untouched.
        let mut next = current.clone();
        f(&mut next)?;
        guard.insert(id, next.clone());
        Ok(next)
    }

    fn list_by_owner(&self, owner: &Address) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let guard = self.records.read().expect("schedule store lock poisoned");
        let mut records: Vec<ScheduleRecord> = guard
            .values()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    fn list_all(&self) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let guard = self.records.read().expect("schedule store lock poisoned");
        Ok(guard.values().cloned().collect())
    }
}
