mod event;
mod store;
mod todo;

pub use event::TodoEvent;
pub use store::TodoStore;
pub use todo::{Todo, TodoList};
