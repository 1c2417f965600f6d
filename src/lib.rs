//! Event-sourced record stores.
//!
//! Every store owns an append-only event stream ([`Entity`]). Accepted
//! mutations append exactly one entry; rejected ones append nothing and
//! change nothing. State is rebuilt by replaying the stream ([`Aggregate`]),
//! and a [`Store`] serialises mutations and commits them to a repository.
//!
//! - [`TodoList`]: dense-id task ledger with a completion flag and an
//!   active-subset query.
//! - [`Ballot`]: one vote per identity.
//! - [`ValueRegister`]: a single value with change history.

mod aggregate;
mod ballot;
mod entity;
mod error;
mod hashmap;
mod identity;
mod log;
mod repository;
mod store;
mod todo;
mod value;

pub use aggregate::{hydrate, Aggregate};
pub use ballot::{Ballot, BallotStore, Voted};
pub use entity::{Entity, EventRecord, PayloadError, ACTOR_KEY};
pub use error::StoreError;
pub use hashmap::HashMapRepository;
pub use identity::Identity;
pub use log::{LogEntry, LogRange};
pub use repository::{Commit, GetOne, Repository, RepositoryError};
pub use store::{Store, StoreConfig};
pub use todo::{Todo, TodoEvent, TodoList, TodoStore};
pub use value::{NumberChanged, ValueRegister, ValueStore};
