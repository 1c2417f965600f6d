use std::collections::HashMap;
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::identity::Identity;

/// Metadata key holding the identity that caused the event.
pub const ACTOR_KEY: &str = "actor";

/// Error when encoding or decoding an event payload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("payload error: {message}")]
pub struct PayloadError {
    pub message: String,
}

impl PayloadError {
    pub fn new(message: impl Into<String>) -> Self {
        PayloadError {
            message: message.into(),
        }
    }
}

/// One immutable entry of an event stream.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EventRecord {
    pub event_name: String,
    #[serde(with = "payload_serde")]
    pub payload: Vec<u8>,
    pub sequence: u64,
    pub timestamp: SystemTime,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl EventRecord {
    pub fn new(event_name: impl Into<String>, payload: Vec<u8>, sequence: u64) -> Self {
        EventRecord {
            event_name: event_name.into(),
            payload,
            sequence,
            timestamp: SystemTime::now(),
            metadata: HashMap::new(),
        }
    }

    /// Encode `payload` with bitcode and stamp the record with its actor.
    pub fn encode<T: Serialize>(
        event_name: impl Into<String>,
        payload: &T,
        sequence: u64,
        actor: &Identity,
    ) -> Result<Self, PayloadError> {
        let bytes = bitcode::serialize(payload).map_err(|e| PayloadError::new(e.to_string()))?;
        let mut record = EventRecord::new(event_name, bytes, sequence);
        record
            .metadata
            .insert(ACTOR_KEY.to_string(), actor.as_str().to_string());
        Ok(record)
    }

    /// Deserialize the payload into the specified type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        bitcode::deserialize(&self.payload).map_err(|e| PayloadError::new(e.to_string()))
    }

    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// The identity that performed the mutation, if recorded.
    pub fn actor(&self) -> Option<Identity> {
        self.meta(ACTOR_KEY).map(Identity::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let payload = bitcode::serialize(&(0u64, "title")).unwrap();
        let record = EventRecord::new("TodoAdded", payload.clone(), 1);
        assert_eq!(record.event_name, "TodoAdded");
        assert_eq!(record.payload, payload);
        assert_eq!(record.sequence, 1);
        assert!(record.metadata.is_empty());
        assert_eq!(record.actor(), None);
    }

    #[test]
    fn encode_stamps_actor() {
        let alice = Identity::new("alice");
        let record = EventRecord::encode("Voted", &("alice", "Bob"), 3, &alice).unwrap();
        assert_eq!(record.sequence, 3);
        assert_eq!(record.actor(), Some(alice));
        assert_eq!(record.meta(ACTOR_KEY), Some("alice"));
    }

    #[test]
    fn decode_payload() {
        let actor = Identity::new("owner");
        let record = EventRecord::encode("NumberChanged", &(200u64, 300u64), 1, &actor).unwrap();
        let decoded: (u64, u64) = record.decode().unwrap();
        assert_eq!(decoded, (200, 300));
    }

    #[test]
    fn decode_wrong_shape_fails() {
        let record = EventRecord::new("TodoCompleted", vec![0xff], 1);
        let result: Result<(u64, String, String), _> = record.decode();
        assert!(result.is_err());
    }

    #[test]
    fn json_roundtrip_keeps_payload_and_actor() {
        let actor = Identity::new("bob");
        let record = EventRecord::encode("TodoCompleted", &7u64, 2, &actor).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.decode::<u64>().unwrap(), 7);
    }

    #[test]
    fn metadata_skipped_when_empty_in_serialization() {
        let record = EventRecord::new("TodoAdded", vec![], 1);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("metadata"));
    }
}
