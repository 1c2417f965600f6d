use super::{Todo, TodoList};
use crate::error::StoreError;
use crate::hashmap::HashMapRepository;
use crate::identity::Identity;
use crate::repository::Repository;
use crate::store::Store;

/// A todo list behind the transaction boundary.
pub type TodoStore<R = HashMapRepository> = Store<TodoList, R>;

impl<R: Repository> Store<TodoList, R> {
    pub fn add_todo(
        &self,
        creator: &Identity,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<u64, StoreError> {
        let title = title.into();
        let body = body.into();
        self.execute(|todos| todos.add_todo(creator, title, body))
    }

    pub fn complete_todo(&self, caller: &Identity, id: u64) -> Result<(), StoreError> {
        self.execute(|todos| todos.complete_todo(caller, id))
    }

    pub fn todo(&self, id: u64) -> Result<Todo, StoreError> {
        self.read(|todos| todos.todo(id).cloned())
    }

    pub fn todo_count(&self) -> Result<u64, StoreError> {
        self.read(|todos| Ok(todos.count()))
    }

    pub fn active_ids(&self) -> Result<Vec<u64>, StoreError> {
        self.read(|todos| Ok(todos.active_ids()))
    }

    pub fn active_todos(&self) -> Result<Vec<Todo>, StoreError> {
        self.read(|todos| Ok(todos.active_todos().into_iter().cloned().collect()))
    }
}
