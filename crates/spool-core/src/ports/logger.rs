//! Logger port - fire-and-forget message sink.

/// Where the drainer (and processors, if they like) report progress.
///
/// Kept separate from `tracing` so an embedding program can route the
/// per-item messages somewhere of its own choosing.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}
