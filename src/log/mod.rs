//! Typed, read-only view over an entity's event stream.
//!
//! Records are appended only by accepted mutations (`Entity::digest`); this
//! module filters them by kind and checkpoint window and decodes them into
//! each store's event enum.

mod range;

use std::time::SystemTime;

use crate::entity::{EventRecord, PayloadError};
use crate::error::StoreError;
use crate::identity::Identity;

pub use range::LogRange;

/// A decoded event-log entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry<E> {
    pub sequence: u64,
    pub actor: Identity,
    pub timestamp: SystemTime,
    pub event: E,
}

impl<E> LogEntry<E>
where
    E: for<'a> TryFrom<&'a EventRecord, Error = PayloadError>,
{
    pub fn from_record(record: &EventRecord) -> Result<Self, StoreError> {
        let actor = record.actor().ok_or(StoreError::MissingActor {
            sequence: record.sequence,
        })?;
        Ok(LogEntry {
            sequence: record.sequence,
            actor,
            timestamp: record.timestamp,
            event: E::try_from(record)?,
        })
    }
}

/// Records of `kind` whose sequence falls inside `range`, in acceptance order.
pub fn select<'a>(
    events: &'a [EventRecord],
    kind: &'a str,
    range: LogRange,
) -> impl Iterator<Item = &'a EventRecord> + 'a {
    events
        .iter()
        .filter(move |record| record.event_name == kind && range.contains(record.sequence))
}

/// Decode every record into a [`LogEntry`], failing on the first bad record.
pub fn decode_all<'a, E, I>(records: I) -> Result<Vec<LogEntry<E>>, StoreError>
where
    E: for<'r> TryFrom<&'r EventRecord, Error = PayloadError>,
    I: IntoIterator<Item = &'a EventRecord>,
{
    records.into_iter().map(LogEntry::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping(u64);

    impl TryFrom<&EventRecord> for Ping {
        type Error = PayloadError;

        fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
            Ok(Ping(record.decode()?))
        }
    }

    fn stream() -> Vec<EventRecord> {
        let actor = Identity::new("alice");
        vec![
            EventRecord::encode("Ping", &10u64, 1, &actor).unwrap(),
            EventRecord::encode("Pong", &11u64, 2, &actor).unwrap(),
            EventRecord::encode("Ping", &12u64, 3, &actor).unwrap(),
            EventRecord::encode("Ping", &13u64, 4, &actor).unwrap(),
        ]
    }

    #[test]
    fn select_filters_kind_and_range() {
        let events = stream();
        let sequences: Vec<u64> = select(&events, "Ping", LogRange::all())
            .map(|r| r.sequence)
            .collect();
        assert_eq!(sequences, vec![1, 3, 4]);

        let sequences: Vec<u64> = select(&events, "Ping", LogRange::between(2, 3))
            .map(|r| r.sequence)
            .collect();
        assert_eq!(sequences, vec![3]);
    }

    #[test]
    fn decode_all_produces_typed_entries() {
        let events = stream();
        let entries: Vec<LogEntry<Ping>> =
            decode_all(select(&events, "Ping", LogRange::from(3))).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, Ping(12));
        assert_eq!(entries[1].event, Ping(13));
        assert_eq!(entries[0].actor, Identity::new("alice"));
    }

    #[test]
    fn missing_actor_is_reported() {
        let record = EventRecord::new("Ping", bitcode::serialize(&1u64).unwrap(), 9);
        let result = LogEntry::<Ping>::from_record(&record);
        assert_eq!(result, Err(StoreError::MissingActor { sequence: 9 }));
    }
}
