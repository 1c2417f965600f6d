use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::{EventRecord, PayloadError};
use crate::identity::Identity;
use crate::log::{self, LogRange};

/// The event stream behind one store instance.
///
/// Records only grow: `digest` appends, nothing edits or removes. Only
/// this crate's aggregates can append, and only inside an accepted mutation.
///
/// A deserialized entity treats its records as committed history: `version`
/// is recomputed from `events`, and nothing is pending for a repository.
#[derive(Serialize, Deserialize)]
#[serde(try_from = "StoredEntity")]
pub struct Entity {
    id: String,
    version: u64,
    events: Vec<EventRecord>,
    #[serde(skip, default)]
    replaying: bool,
    #[serde(skip, default)]
    committed_version: u64,
    timestamp: SystemTime,
}

#[derive(Deserialize)]
struct StoredEntity {
    id: String,
    events: Vec<EventRecord>,
    timestamp: SystemTime,
}

impl TryFrom<StoredEntity> for Entity {
    type Error = PayloadError;

    fn try_from(stored: StoredEntity) -> Result<Self, Self::Error> {
        for (index, record) in stored.events.iter().enumerate() {
            let expected = index as u64 + 1;
            if record.sequence != expected {
                return Err(PayloadError::new(format!(
                    "entry at position {expected} has sequence {}",
                    record.sequence
                )));
            }
        }

        let mut entity = Entity::with_id(stored.id);
        entity.load_from_history(stored.events);
        entity.timestamp = stored.timestamp;
        Ok(entity)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity {
            id: String::new(),
            version: 0,
            events: Vec::new(),
            replaying: false,
            committed_version: 0,
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("events", &self.events.len())
            .field("replaying", &self.replaying)
            .field("committed_version", &self.committed_version)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        Entity {
            id: self.id.clone(),
            version: self.version,
            events: self.events.clone(),
            replaying: self.replaying,
            committed_version: self.committed_version,
            timestamp: self.timestamp,
        }
    }
}

impl Entity {
    pub fn new() -> Self {
        Entity::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let mut entity = Entity::default();
        entity.id = id.into();
        entity
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn committed_version(&self) -> u64 {
        self.committed_version
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Sequence the next accepted entry will receive.
    pub fn checkpoint(&self) -> u64 {
        self.version + 1
    }

    /// Returns events added since the entity was loaded (not yet persisted).
    pub fn new_events(&self) -> &[EventRecord] {
        &self.events[self.committed_version as usize..]
    }

    /// Mark all current events as committed. Called by repository after successful commit.
    pub(crate) fn mark_committed(&mut self) {
        self.committed_version = self.version;
    }

    /// Append one record for an accepted mutation performed by `actor`.
    ///
    /// The payload is encoded before anything is touched, so an encoding
    /// failure leaves the stream unchanged. No-op while replaying.
    pub(crate) fn digest<T: Serialize>(
        &mut self,
        name: impl Into<String>,
        actor: &Identity,
        payload: &T,
    ) -> Result<(), PayloadError> {
        if self.replaying {
            return Ok(());
        }

        let record = EventRecord::encode(name, payload, self.checkpoint(), actor)?;
        self.events.push(record);
        self.version = self.events.len() as u64;
        self.timestamp = SystemTime::now();
        Ok(())
    }

    pub(crate) fn load_from_history(&mut self, history: Vec<EventRecord>) {
        self.events = history;
        self.version = self.events.len() as u64;
        self.committed_version = self.version;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub(crate) fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    /// Records of `kind` inside `range`, oldest first.
    pub fn query<'a>(
        &'a self,
        kind: &'a str,
        range: LogRange,
    ) -> impl Iterator<Item = &'a EventRecord> + 'a {
        log::select(&self.events, kind, range)
    }
}
