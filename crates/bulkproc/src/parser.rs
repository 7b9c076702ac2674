use std::time::SystemTime;

use crate::bulk::Bulk;
use crate::command::Command;
use crate::token::Token;

/// The parser's visible state. `dynamic_level` is tracked alongside rather
/// than as a variant payload: `dynamic_level == 0` holds only in
/// `StartingBlock` or `CollectingStaticBlock`; `dynamic_level >= 1` holds
/// only in `ExpectingDynamicCommand` or `CollectingDynamicBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
  StartingBlock,
  CollectingStaticBlock,
  ExpectingDynamicCommand,
  CollectingDynamicBlock,
}

/// Bulk-grouping state machine. Consumes one [`Token`] at a time and, when a
/// bulk completes, hands the finished [`Bulk`] to the caller via the return
/// value of [`Parser::step`] / [`Parser::end_of_stream`] rather than a
/// callback, keeping the state machine free of any notion of where output
/// goes (that's [`crate::session::Session`]'s job).
pub(crate) struct Parser {
  static_bulk_size: usize,
  state: State,
  dynamic_level: u32,
  current: Bulk,
}

impl Parser {
  pub(crate) fn new(static_bulk_size: usize) -> Self {
    Self {
      static_bulk_size,
      state: State::StartingBlock,
      dynamic_level: 0,
      current: Bulk::new(SystemTime::now()),
    }
  }

  #[cfg(test)]
  pub(crate) fn state(&self) -> State {
    self.state
  }

  #[cfg(test)]
  pub(crate) fn dynamic_level(&self) -> u32 {
    self.dynamic_level
  }

  fn add_command(&mut self, command: Command) {
    if self.current.is_empty() {
      self.current = Bulk::new(SystemTime::now());
    }
    self.current.push(command);
  }

  /// Replaces `current` with a fresh, empty bulk and returns the old one.
  fn take_bulk(&mut self) -> Bulk {
    std::mem::replace(&mut self.current, Bulk::new(SystemTime::now()))
  }

  /// Feeds one token through the FSM. Returns `Some(bulk)` exactly when a
  /// bulk is completed and should be emitted; each bulk is returned exactly
  /// once, the moment it completes.
  pub(crate) fn step(&mut self, token: Token) -> Option<Bulk> {
    match (self.state, token) {
      (State::StartingBlock, Token::Command(cmd)) => {
        self.add_command(cmd);
        self.state = State::CollectingStaticBlock;
        None
      }
      (State::StartingBlock, Token::Open) => {
        self.dynamic_level = 1;
        self.state = State::ExpectingDynamicCommand;
        None
      }
      (State::StartingBlock, Token::Close) => None,

      (State::CollectingStaticBlock, Token::Command(cmd)) => {
        self.add_command(cmd);
        if self.current.len() >= self.static_bulk_size {
          self.state = State::StartingBlock;
          Some(self.take_bulk())
        } else {
          None
        }
      }
      (State::CollectingStaticBlock, Token::Open) => {
        let finished = self.take_bulk();
        self.dynamic_level = 1;
        self.state = State::ExpectingDynamicCommand;
        if finished.is_empty() {
          None
        } else {
          Some(finished)
        }
      }
      (State::CollectingStaticBlock, Token::Close) => None,

      (State::ExpectingDynamicCommand, Token::Command(cmd)) => {
        self.add_command(cmd);
        self.state = State::CollectingDynamicBlock;
        None
      }
      (State::ExpectingDynamicCommand, Token::Open) => {
        self.dynamic_level += 1;
        None
      }
      (State::ExpectingDynamicCommand, Token::Close) => {
        self.dynamic_level -= 1;
        if self.dynamic_level == 0 {
          self.state = State::StartingBlock;
          let finished = self.take_bulk();
          if finished.is_empty() { None } else { Some(finished) }
        } else {
          None
        }
      }

      (State::CollectingDynamicBlock, Token::Command(cmd)) => {
        self.add_command(cmd);
        None
      }
      (State::CollectingDynamicBlock, Token::Open) => {
        self.dynamic_level += 1;
        None
      }
      (State::CollectingDynamicBlock, Token::Close) => {
        self.dynamic_level -= 1;
        if self.dynamic_level == 0 {
          self.state = State::StartingBlock;
          Some(self.take_bulk())
        } else {
          None
        }
      }
    }
  }

  /// Drives the end-of-stream transition. A partially collected static
  /// block is flushed; a partially collected dynamic block is discarded
  /// without emitting, since it never reached a matching close brace.
  pub(crate) fn end_of_stream(&mut self) -> Option<Bulk> {
    match self.state {
      State::StartingBlock => None,
      State::CollectingStaticBlock => {
        self.state = State::StartingBlock;
        let finished = self.take_bulk();
        if finished.is_empty() { None } else { Some(finished) }
      }
      State::ExpectingDynamicCommand | State::CollectingDynamicBlock => {
        // Discard: reset bookkeeping but do not emit.
        self.current = Bulk::new(SystemTime::now());
        self.dynamic_level = 0;
        self.state = State::StartingBlock;
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cmd(s: &str) -> Token {
    Token::Command(Command::new(s))
  }

  fn render_all(p: &mut Parser, tokens: Vec<Token>) -> Vec<String> {
    tokens
      .into_iter()
      .filter_map(|t| p.step(t))
      .map(|b| b.render())
      .collect()
  }

  #[test]
  fn static_grouping_exact_multiple() {
    let mut p = Parser::new(3);
    let out = render_all(
      &mut p,
      vec![cmd("1"), cmd("2"), cmd("3"), cmd("4"), cmd("5"), cmd("6")],
    );
    assert_eq!(out, vec!["bulk: 1, 2, 3\n", "bulk: 4, 5, 6\n"]);
    assert_eq!(p.state(), State::StartingBlock);
  }

  #[test]
  fn static_grouping_with_remainder_flushed_on_eos() {
    let mut p = Parser::new(3);
    let mut out = render_all(&mut p, vec![cmd("1"), cmd("2"), cmd("3"), cmd("4"), cmd("5")]);
    assert_eq!(out, vec!["bulk: 1, 2, 3\n"]);
    let eos = p.end_of_stream();
    out.extend(eos.map(|b| b.render()));
    assert_eq!(out, vec!["bulk: 1, 2, 3\n", "bulk: 4, 5\n"]);
  }

  #[test]
  fn no_extra_bulk_on_eos_when_remainder_is_empty() {
    let mut p = Parser::new(3);
    render_all(&mut p, vec![cmd("1"), cmd("2"), cmd("3")]);
    assert!(p.end_of_stream().is_none());
  }

  #[test]
  fn dynamic_block_emits_single_bulk_at_outer_close() {
    let mut p = Parser::new(3);
    let out = render_all(
      &mut p,
      vec![
        Token::Open,
        cmd("a"),
        Token::Open,
        cmd("b"),
        Token::Close,
        cmd("c"),
        Token::Close,
      ],
    );
    assert_eq!(out, vec!["bulk: a, b, c\n"]);
    assert_eq!(p.dynamic_level(), 0);
  }

  #[test]
  fn empty_dynamic_block_emits_nothing() {
    let mut p = Parser::new(3);
    assert!(p.step(Token::Open).is_none());
    assert!(p.step(Token::Close).is_none());
    assert_eq!(p.state(), State::StartingBlock);
  }

  #[test]
  fn static_block_preempted_by_open_brace_flushes_first() {
    let mut p = Parser::new(3);
    let out = render_all(
      &mut p,
      vec![cmd("1"), cmd("2"), Token::Open, cmd("3"), Token::Close],
    );
    assert_eq!(out, vec!["bulk: 1, 2\n", "bulk: 3\n"]);
  }

  #[test]
  fn unclosed_dynamic_block_discarded_on_eos() {
    let mut p = Parser::new(3);
    p.step(cmd("1"));
    let flushed = p.end_of_stream();
    assert_eq!(flushed.unwrap().render(), "bulk: 1\n");

    p.step(Token::Open);
    p.step(cmd("2"));
    assert!(p.end_of_stream().is_none());
  }

  #[test]
  fn close_with_zero_dynamic_level_is_ignored() {
    let mut p = Parser::new(3);
    assert!(p.step(Token::Close).is_none());
    assert_eq!(p.state(), State::StartingBlock);
    p.step(cmd("1"));
    assert!(p.step(Token::Close).is_none());
    assert_eq!(p.state(), State::CollectingStaticBlock);
  }
}
