use std::time::SystemTime;

use crate::command::Command;

/// An ordered sequence of [`Command`]s collected into a single rendered
/// block, with a creation time fixed to the timestamp of the *first*
/// command added to it.
#[derive(Debug, Clone)]
pub struct Bulk {
  commands: Vec<Command>,
  created_at: SystemTime,
}

impl Bulk {
  pub(crate) fn new(created_at: SystemTime) -> Self {
    Self {
      commands: Vec::new(),
      created_at,
    }
  }

  pub(crate) fn push(&mut self, command: Command) {
    self.commands.push(command);
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.commands.len()
  }

  #[must_use]
  pub fn created_at(&self) -> SystemTime {
    self.created_at
  }

  #[must_use]
  pub fn commands(&self) -> &[Command] {
    &self.commands
  }

  /// Renders this bulk as `"bulk: c1, c2, …, cn\n"`.
  #[must_use]
  pub fn render(&self) -> String {
    let mut out = String::from("bulk: ");
    for (i, cmd) in self.commands.iter().enumerate() {
      if i > 0 {
        out.push_str(", ");
      }
      out.push_str(cmd.as_str());
    }
    out.push('\n');
    out
  }

  /// The filename a bulk renders to: `bulk<seconds-since-epoch>.log`.
  #[must_use]
  pub fn filename(&self) -> String {
    let secs = self
      .created_at
      .duration_since(SystemTime::UNIX_EPOCH)
      .map(|d| d.as_secs())
      .unwrap_or(0);
    format!("bulk{secs}.log")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_comma_separated_line() {
    let mut b = Bulk::new(SystemTime::now());
    b.push(Command::new("c1"));
    b.push(Command::new("c2"));
    assert_eq!(b.render(), "bulk: c1, c2\n");
  }

  #[test]
  fn empty_bulk_renders_trivially() {
    let b = Bulk::new(SystemTime::now());
    assert!(b.is_empty());
    assert_eq!(b.render(), "bulk: \n");
  }

  #[test]
  fn filename_derives_from_creation_time() {
    let t = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(42);
    let b = Bulk::new(t);
    assert_eq!(b.filename(), "bulk42.log");
  }
}
