use super::error::RepositoryError;
use crate::entity::Entity;

/// Load the committed stream of one entity.
pub trait GetOne {
    fn get_one(&self, id: &str) -> Result<Option<Entity>, RepositoryError>;

    /// Number of committed events in the stream `id`; 0 when it does not exist.
    fn version(&self, id: &str) -> Result<u64, RepositoryError> {
        Ok(self.get_one(id)?.map(|entity| entity.version()).unwrap_or(0))
    }
}

/// Persist the uncommitted events of one entity, all or nothing.
pub trait Commit {
    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError>;
}

/// Full repository trait combining all capabilities.
pub trait Repository: GetOne + Commit {}

// Blanket implementation: anything implementing all traits is a Repository
impl<T> Repository for T where T: GetOne + Commit {}
