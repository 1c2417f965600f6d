/// Inclusive window of event-log checkpoints.
///
/// A checkpoint is the 1-based sequence an entry received when it was
/// accepted. `to: None` reads through the latest entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogRange {
    pub from: u64,
    pub to: Option<u64>,
}

impl LogRange {
    /// Every entry ever accepted.
    pub fn all() -> Self {
        LogRange::default()
    }

    /// Entries at or after `checkpoint`, through latest.
    pub fn from(checkpoint: u64) -> Self {
        LogRange {
            from: checkpoint,
            to: None,
        }
    }

    /// Entries with `from <= sequence <= to`. Empty when `to < from`.
    pub fn between(from: u64, to: u64) -> Self {
        LogRange { from, to: Some(to) }
    }

    pub fn contains(&self, sequence: u64) -> bool {
        sequence >= self.from && self.to.map_or(true, |to| sequence <= to)
    }
}
