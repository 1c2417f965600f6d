use crate::entity::PayloadError;
use crate::identity::Identity;
use crate::repository::RepositoryError;

/// Errors returned by store operations.
///
/// Every error aborts the whole mutation: no state changes and no log entry
/// is appended.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid todo id {id} (count is {count})")]
    OutOfRange { id: u64, count: u64 },

    #[error("todo {id} is already completed")]
    AlreadyCompleted { id: u64 },

    #[error("{voter} has already voted")]
    AlreadyVoted { voter: Identity },

    #[error("log entry {sequence} has no actor")]
    MissingActor { sequence: u64 },

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
