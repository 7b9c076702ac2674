use log::{debug, trace};

use crate::bulk::Bulk;
use crate::parser::Parser;
use crate::token::Tokenizer;

/// Owns one client's tokeniser and parser. A `Session` is affine to its
/// [`crate::handle::Handle`]: the registry hands out at most one `Session`
/// per handle and guards it with a single per-session mutex, so `Session`
/// itself need not be internally synchronized.
pub(crate) struct Session {
  tokenizer: Tokenizer,
  parser: Parser,
}

impl Session {
  pub(crate) fn new(static_bulk_size: usize) -> Self {
    Self {
      tokenizer: Tokenizer::new(),
      parser: Parser::new(static_bulk_size),
    }
  }

  /// Appends `bytes` and drives the parser for every token the tokeniser can
  /// now produce, returning every bulk completed along the way, in order.
  pub(crate) fn deliver(&mut self, bytes: &[u8]) -> Vec<Bulk> {
    let tokens = self.tokenizer.feed(bytes);
    let mut bulks = Vec::new();
    for token in tokens {
      trace!(target: "bulkproc::session", "stepping parser with {token:?}");
      if let Some(bulk) = self.parser.step(token) {
        debug!(target: "bulkproc::session", "completed bulk of {} command(s)", bulk.len());
        bulks.push(bulk);
      }
    }
    bulks
  }

  /// Drives the end-of-stream transition, flushing a partial static block
  /// or discarding a partial dynamic block.
  pub(crate) fn close(&mut self) -> Option<Bulk> {
    self.parser.end_of_stream()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deliver_splits_and_groups_across_calls() {
    let mut s = Session::new(3);
    let bulks = s.deliver(b"1\n2\n3\n4\n5\n");
    assert_eq!(bulks.len(), 1);
    assert_eq!(bulks[0].render(), "bulk: 1, 2, 3\n");

    let remainder = s.close();
    assert_eq!(remainder.unwrap().render(), "bulk: 4, 5\n");
  }

  #[test]
  fn dynamic_block_spanning_multiple_deliver_calls() {
    let mut s = Session::new(3);
    assert!(s.deliver(b"{\na\n").is_empty());
    let bulks = s.deliver(b"b\n}\n");
    assert_eq!(bulks.len(), 1);
    assert_eq!(bulks[0].render(), "bulk: a, b\n");
  }
}
