use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::entity::{Entity, EventRecord};
use crate::repository::{Commit, GetOne, RepositoryError};

/// In-memory event store: one append-only stream per entity id.
///
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct HashMapRepository {
    storage: Arc<RwLock<HashMap<String, Vec<EventRecord>>>>,
}

impl HashMapRepository {
    pub fn new() -> Self {
        HashMapRepository::default()
    }

    /// Number of committed events in the stream `id`.
    pub fn stream_len(&self, id: &str) -> Result<u64, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        Ok(storage.get(id).map(|events| events.len() as u64).unwrap_or(0))
    }
}

impl GetOne for HashMapRepository {
    fn get_one(&self, id: &str) -> Result<Option<Entity>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;

        if let Some(events) = storage.get(id) {
            let mut entity = Entity::with_id(id);
            entity.load_from_history(events.clone());
            Ok(Some(entity))
        } else {
            Ok(None)
        }
    }

    fn version(&self, id: &str) -> Result<u64, RepositoryError> {
        self.stream_len(id)
    }
}

impl Commit for HashMapRepository {
    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError> {
        let expected_version = entity.committed_version();
        let id = entity.id().to_string();

        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;
        let actual_version = storage
            .get(&id)
            .map(|events| events.len() as u64)
            .unwrap_or(0);

        if actual_version != expected_version {
            return Err(RepositoryError::ConcurrentWrite {
                id,
                expected: expected_version,
                actual: actual_version,
            });
        }

        let pending = entity.new_events();
        if pending.is_empty() {
            return Ok(());
        }

        storage
            .entry(id.clone())
            .or_default()
            .extend(pending.iter().cloned());
        debug!(entity = %id, appended = pending.len(), version = entity.version(), "stream committed");
        entity.mark_committed();

        Ok(())
    }
}
