use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use tracing::debug;
#[cfg(feature = "emitter")]
use tracing::warn;

use super::config::StoreConfig;
use crate::aggregate::{hydrate, Aggregate};
use crate::entity::{EventRecord, PayloadError};
use crate::error::StoreError;
use crate::hashmap::HashMapRepository;
use crate::log::{self, LogEntry, LogRange};
use crate::repository::{Repository, RepositoryError};

/// One store instance: an aggregate type bound to a stream in a repository.
///
/// Mutations are serialised through `state` and run validate → mutate → log
/// → commit as one step. `state` caches the last committed aggregate; it is
/// replayed from the repository only when the stream moved past it (another
/// handle on the same repository) or a mutation failed.
///
/// Callers mutate only through the typed surfaces (`add_todo`, `vote`,
/// `set_value`), never with an arbitrary closure:
///
/// ```compile_fail
/// use sourced_stores::{StoreError, TodoList, TodoStore};
///
/// let store = TodoStore::new();
/// let _ = store.execute(|todos: &mut TodoList| Ok::<_, StoreError>(todos.count()));
/// ```
pub struct Store<A, R = HashMapRepository> {
    id: String,
    config: StoreConfig,
    repository: R,
    state: Mutex<Option<A>>,
    #[cfg(feature = "emitter")]
    emitter: Mutex<EventEmitter>,
}

impl<A: Aggregate> Store<A, HashMapRepository> {
    pub fn new() -> Self {
        Store::with_config(StoreConfig::default(), HashMapRepository::new())
    }
}

impl<A: Aggregate> Default for Store<A, HashMapRepository> {
    fn default() -> Self {
        Store::new()
    }
}

impl<A, R> Store<A, R>
where
    A: Aggregate,
    R: Repository,
{
    pub fn with_config(config: StoreConfig, repository: R) -> Self {
        let id = config.resolved_id(A::DEFAULT_ID).to_string();
        Store {
            id,
            config,
            repository,
            state: Mutex::new(None),
            #[cfg(feature = "emitter")]
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run one mutation against the current state.
    ///
    /// `Ok` commits every entry the closure appended; `Err` drops the cached
    /// state, so the next call starts again from the committed stream.
    pub(crate) fn execute<T, F>(&self, mutation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut A) -> Result<T, StoreError>,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("store state"))?;
        let aggregate = self.current(&mut state)?;

        let output = match mutation(&mut *aggregate) {
            Ok(output) => output,
            Err(err) => {
                *state = None;
                debug!(store = %self.id, error = %err, "mutation rejected");
                return Err(err);
            }
        };

        let appended = aggregate.entity().new_events().to_vec();
        if let Err(err) = self.repository.commit(aggregate.entity_mut()) {
            *state = None;
            return Err(err.into());
        }
        debug!(
            store = %self.id,
            version = aggregate.entity().version(),
            appended = appended.len(),
            "mutation committed"
        );
        drop(state);

        self.publish(&appended);
        Ok(output)
    }

    /// Run a query against the last committed state.
    pub fn read<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: FnOnce(&A) -> Result<T, StoreError>,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("store state"))?;
        let aggregate: &A = self.current(&mut state)?;
        query(aggregate)
    }

    /// Sequence the next committed entry will receive.
    pub fn checkpoint(&self) -> Result<u64, StoreError> {
        self.read(|aggregate| Ok(aggregate.entity().checkpoint()))
    }

    /// Committed entries of `kind` inside `range`, decoded.
    pub fn history<E>(&self, kind: &str, range: LogRange) -> Result<Vec<LogEntry<E>>, StoreError>
    where
        E: for<'a> TryFrom<&'a EventRecord, Error = PayloadError>,
    {
        self.read(|aggregate| log::decode_all(aggregate.entity().query(kind, range)))
    }

    /// The cached aggregate, replayed again if the committed stream has grown.
    fn current<'a>(&self, state: &'a mut Option<A>) -> Result<&'a mut A, StoreError> {
        let committed = self.repository.version(&self.id)?;
        let aggregate = match state.take() {
            Some(cached) if cached.entity().version() == committed => cached,
            _ => self.load()?,
        };
        Ok(state.insert(aggregate))
    }

    fn load(&self) -> Result<A, StoreError> {
        match self.repository.get_one(&self.id)? {
            Some(entity) => Ok(hydrate::<A>(entity)?),
            None => {
                let mut aggregate = A::new_empty();
                aggregate.entity_mut().set_id(&self.id);
                Ok(aggregate)
            }
        }
    }

    #[cfg(feature = "emitter")]
    fn publish(&self, records: &[EventRecord]) {
        if !self.config.emit_committed || records.is_empty() {
            return;
        }

        let Ok(mut emitter) = self.emitter.lock() else {
            warn!(store = %self.id, "emitter lock poisoned; committed entries not published");
            return;
        };
        for record in records {
            match serde_json::to_string(record) {
                Ok(json) => {
                    emitter.emit(&record.event_name, json);
                }
                Err(err) => {
                    warn!(store = %self.id, sequence = record.sequence, error = %err, "failed to encode entry for listeners");
                }
            }
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn publish(&self, _records: &[EventRecord]) {}
}

#[cfg(feature = "emitter")]
impl<A, R> Store<A, R>
where
    A: Aggregate,
    R: Repository,
{
    /// Register a listener for committed entries of `kind`.
    ///
    /// Listeners run on the emitter's own threads after the commit; they only
    /// fire when the store was configured with `emit_committed`.
    pub fn on<F>(&self, kind: &str, listener: F) -> Result<String, StoreError>
    where
        F: Fn(EventRecord) + Send + Sync + 'static,
    {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned("emitter"))?;
        let kind_name = kind.to_string();
        Ok(emitter.on(kind, move |json: String| {
            match serde_json::from_str::<EventRecord>(&json) {
                Ok(record) => listener(record),
                Err(err) => warn!(kind = %kind_name, error = %err, "listener received undecodable entry"),
            }
        }))
    }
}
