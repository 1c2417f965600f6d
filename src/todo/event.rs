use crate::entity::{EventRecord, PayloadError};

/// Entries the todo list writes to its log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoEvent {
    Added { id: u64, title: String, body: String },
    Completed { id: u64 },
}

impl TodoEvent {
    pub const ADDED: &'static str = "TodoAdded";
    pub const COMPLETED: &'static str = "TodoCompleted";

    pub fn event_name(&self) -> &'static str {
        match self {
            TodoEvent::Added { .. } => Self::ADDED,
            TodoEvent::Completed { .. } => Self::COMPLETED,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            TodoEvent::Added { id, .. } | TodoEvent::Completed { id } => *id,
        }
    }
}

impl TryFrom<&EventRecord> for TodoEvent {
    type Error = PayloadError;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        match record.event_name.as_str() {
            TodoEvent::ADDED => {
                let (id, title, body): (u64, String, String) = record.decode()?;
                Ok(TodoEvent::Added { id, title, body })
            }
            TodoEvent::COMPLETED => Ok(TodoEvent::Completed {
                id: record.decode()?,
            }),
            other => Err(PayloadError::new(format!("Unknown event: {other}"))),
        }
    }
}
