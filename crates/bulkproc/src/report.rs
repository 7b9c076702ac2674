use std::fmt;

use crate::writer::Counters;

/// One writer's final tally, named for the report.
#[derive(Debug, Clone, Copy)]
pub struct WriterReport {
  pub name: &'static str,
  pub counters: Counters,
}

/// Final statistics emitted on teardown: one line per writer plus a
/// main-thread aggregate.
#[derive(Debug, Clone)]
pub struct Report {
  pub writers: Vec<WriterReport>,
}

impl Report {
  pub(crate) fn new(writers: Vec<WriterReport>) -> Self {
    Self { writers }
  }

  /// Sum of `blocks`/`commands` across every writer.
  #[must_use]
  pub fn aggregate(&self) -> Counters {
    self.writers.iter().fold(Counters::default(), |mut acc, w| {
      acc.blocks += w.counters.blocks;
      acc.commands += w.counters.commands;
      acc
    })
  }
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for w in &self.writers {
      writeln!(
        f,
        "{} thread — {} blocks, {} commands",
        w.name, w.counters.blocks, w.counters.commands
      )?;
    }
    let agg = self.aggregate();
    write!(f, "main thread — {} blocks, {} commands", agg.blocks, agg.commands)
  }
}
