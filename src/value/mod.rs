//! Single-value register with change history.

use crate::entity::{Entity, EventRecord, PayloadError};
use crate::error::StoreError;
use crate::hashmap::HashMapRepository;
use crate::identity::Identity;
use crate::log::{self, LogEntry, LogRange};
use crate::repository::Repository;
use crate::store::Store;

/// A value store behind the transaction boundary.
pub type ValueStore<R = HashMapRepository> = Store<ValueRegister, R>;

/// Logged when the register is written: `(old, new)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberChanged {
    pub old: u64,
    pub new: u64,
}

impl NumberChanged {
    pub const NAME: &'static str = "NumberChanged";
}

impl TryFrom<&EventRecord> for NumberChanged {
    type Error = PayloadError;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        if record.event_name != Self::NAME {
            return Err(PayloadError::new(format!(
                "Unknown event: {}",
                record.event_name
            )));
        }
        let (old, new) = record.decode()?;
        Ok(NumberChanged { old, new })
    }
}

#[derive(Clone, Debug, Default)]
pub struct ValueRegister {
    entity: Entity,
    value: u64,
}

impl ValueRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Overwrite the value. Always accepted, even when unchanged.
    pub fn set_value(&mut self, caller: &Identity, value: u64) -> Result<(), StoreError> {
        self.entity
            .digest(NumberChanged::NAME, caller, &(self.value, value))?;
        self.value = value;
        Ok(())
    }

    pub fn history(&self, range: LogRange) -> Result<Vec<LogEntry<NumberChanged>>, StoreError> {
        log::decode_all(self.entity.query(NumberChanged::NAME, range))
    }

    fn replay(&mut self, event: &EventRecord) -> Result<(), StoreError> {
        let actor = event.actor().ok_or(StoreError::MissingActor {
            sequence: event.sequence,
        })?;
        let change = NumberChanged::try_from(event)?;
        self.set_value(&actor, change.new)
    }
}

crate::impl_aggregate!(ValueRegister, "value-store", entity, replay);

impl<R: Repository> Store<ValueRegister, R> {
    pub fn set_value(&self, caller: &Identity, value: u64) -> Result<(), StoreError> {
        self.execute(|register| register.set_value(caller, value))
    }

    pub fn value(&self) -> Result<u64, StoreError> {
        self.read(|register| Ok(register.value()))
    }
}
