use std::fmt;
use std::ops::Deref;

/// A single non-empty input line, newline stripped, preserved verbatim
/// otherwise (internal whitespace is significant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

impl Command {
  pub(crate) fn new(text: impl Into<String>) -> Self {
    Command(text.into())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Deref for Command {
  type Target = str;

  fn deref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
