/// Ambient configuration for a [`crate::registry::Registry`]. Neither field
/// corresponds to an environment variable or file; the core reads its
/// configuration only from this struct, passed in by the embedding
/// application.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
  /// Static bulk size used by the shared (handle-0) session's own grouping.
  /// Default `1` emits each ungrouped command as its own single-command
  /// bulk, treating the shared session like an unbuffered stdin-like
  /// stream.
  pub shared_bulk_size: usize,
  /// `None` selects unbounded output queues (the reference design's
  /// choice); `Some(n)` selects bounded queues of capacity `n`.
  pub queue_capacity: Option<usize>,
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      shared_bulk_size: 1,
      queue_capacity: None,
    }
  }
}
