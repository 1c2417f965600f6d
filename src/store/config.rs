use serde::{Deserialize, Serialize};

/// Settings for one [`Store`](super::Store) instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Stream id in the repository. Empty means the aggregate's default id.
    pub id: String,
    /// Publish committed entries to listeners registered with `Store::on`.
    pub emit_committed: bool,
}

impl StoreConfig {
    pub fn new() -> Self {
        StoreConfig::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_emit_committed(mut self, emit: bool) -> Self {
        self.emit_committed = emit;
        self
    }

    pub(crate) fn resolved_id<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.id.is_empty() {
            fallback
        } else {
            &self.id
        }
    }
}
