use serde::{Deserialize, Serialize};

use super::event::TodoEvent;
use crate::entity::{Entity, EventRecord};
use crate::error::StoreError;
use crate::identity::Identity;
use crate::log::{self, LogEntry, LogRange};
use crate::repository::RepositoryError;

/// One entry of the list. `id` is its position in creation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub is_completed: bool,
    pub creator: Identity,
}

/// Append-only todo ledger.
///
/// Records live in an arena indexed by id, so ids stay dense and are never
/// reused. Completion flips `false -> true` once per record.
///
/// The log only grows through `add_todo` and `complete_todo`; the stream
/// cannot be appended to or put into replay mode from outside:
///
/// ```compile_fail
/// use sourced_stores::{Aggregate, Identity, TodoList};
///
/// let mut list = TodoList::new();
/// let _ = list
///     .entity_mut()
///     .digest("TodoAdded", &Identity::new("alice"), &(9u64, "x", "y"));
/// ```
///
/// ```compile_fail
/// use sourced_stores::{Aggregate, Identity, TodoList};
///
/// let mut list = TodoList::new();
/// list.entity_mut().set_replaying(true);
/// let _ = list.add_todo(&Identity::new("alice"), "silent", "");
/// ```
#[derive(Clone, Debug, Default)]
pub struct TodoList {
    entity: Entity,
    todos: Vec<Todo>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and log `TodoAdded(id, title, body)`. Returns the new id.
    ///
    /// Title and body are stored as given, empty strings included.
    pub fn add_todo(
        &mut self,
        creator: &Identity,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<u64, StoreError> {
        let id = self.count();
        let title = title.into();
        let body = body.into();

        self.entity
            .digest(TodoEvent::ADDED, creator, &(id, &title, &body))?;
        self.todos.push(Todo {
            id,
            title,
            body,
            is_completed: false,
            creator: creator.clone(),
        });
        Ok(id)
    }

    pub fn todo(&self, id: u64) -> Result<&Todo, StoreError> {
        self.position(id).map(|index| &self.todos[index])
    }

    /// Mark `id` completed and log `TodoCompleted(id)`.
    ///
    /// The range check runs before the completion check. Any caller may
    /// complete any record.
    pub fn complete_todo(&mut self, caller: &Identity, id: u64) -> Result<(), StoreError> {
        let index = self.position(id)?;
        if self.todos[index].is_completed {
            return Err(StoreError::AlreadyCompleted { id });
        }

        self.entity.digest(TodoEvent::COMPLETED, caller, &id)?;
        self.todos[index].is_completed = true;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.todos.len() as u64
    }

    /// Ids of records not yet completed, ascending. Recomputed on every call.
    pub fn active_ids(&self) -> Vec<u64> {
        self.active().map(|todo| todo.id).collect()
    }

    /// Records not yet completed, ascending by id.
    pub fn active_todos(&self) -> Vec<&Todo> {
        self.active().collect()
    }

    pub fn history(
        &self,
        kind: &str,
        range: LogRange,
    ) -> Result<Vec<LogEntry<TodoEvent>>, StoreError> {
        log::decode_all(self.entity.query(kind, range))
    }

    fn active(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|todo| !todo.is_completed)
    }

    fn position(&self, id: u64) -> Result<usize, StoreError> {
        usize::try_from(id)
            .ok()
            .filter(|index| *index < self.todos.len())
            .ok_or(StoreError::OutOfRange {
                id,
                count: self.count(),
            })
    }

    fn replay(&mut self, event: &EventRecord) -> Result<(), StoreError> {
        let actor = event.actor().ok_or(StoreError::MissingActor {
            sequence: event.sequence,
        })?;

        match TodoEvent::try_from(event)? {
            TodoEvent::Added { id, title, body } => {
                let assigned = self.add_todo(&actor, title, body)?;
                if assigned != id {
                    return Err(RepositoryError::Replay(format!(
                        "entry {} records todo {id} but the next id is {assigned}",
                        event.sequence
                    ))
                    .into());
                }
            }
            TodoEvent::Completed { id } => self.complete_todo(&actor, id)?,
        }
        Ok(())
    }
}

crate::impl_aggregate!(TodoList, "todo-list", entity, replay);
