use std::fmt;

use tracing::warn;

use crate::entity::{Entity, EventRecord};
use crate::repository::RepositoryError;

/// Trait for stores whose state is rebuilt by replaying their event stream.
pub trait Aggregate: Sized + Default {
    type ReplayError: fmt::Display;

    /// Stream id used when no configuration names one.
    const DEFAULT_ID: &'static str;

    fn new_empty() -> Self {
        Self::default()
    }
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;
    fn replay_event(&mut self, event: &EventRecord) -> Result<(), Self::ReplayError>;
}

#[macro_export]
macro_rules! impl_aggregate {
    ($ty:ty, $id:literal, $entity:ident, $replay:ident) => {
        $crate::impl_aggregate!($ty, $id, $entity, $replay, $crate::StoreError);
    };
    ($ty:ty, $id:literal, $entity:ident, $replay:ident, $err:ty) => {
        impl $crate::Aggregate for $ty {
            type ReplayError = $err;

            const DEFAULT_ID: &'static str = $id;

            fn entity(&self) -> &$crate::Entity {
                &self.$entity
            }

            fn entity_mut(&mut self) -> &mut $crate::Entity {
                &mut self.$entity
            }

            fn replay_event(
                &mut self,
                event: &$crate::EventRecord,
            ) -> Result<(), Self::ReplayError> {
                Self::$replay(self, event)
            }
        }
    };
}

/// Hydrate an aggregate from an entity by replaying its events.
pub fn hydrate<A: Aggregate>(entity: Entity) -> Result<A, RepositoryError> {
    let mut agg = A::new_empty();
    *agg.entity_mut() = entity;

    let events = agg.entity().events().to_vec();

    agg.entity_mut().set_replaying(true);
    for event in &events {
        if let Err(err) = agg.replay_event(event) {
            agg.entity_mut().set_replaying(false);
            warn!(
                entity = agg.entity().id(),
                sequence = event.sequence,
                event = %event.event_name,
                error = %err,
                "history replay failed"
            );
            return Err(RepositoryError::Replay(err.to_string()));
        }
    }
    agg.entity_mut().set_replaying(false);

    Ok(agg)
}
