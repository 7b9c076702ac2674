use crate::command::Command;

/// A single lexical unit produced by the [`Tokenizer`] from newline-delimited
/// input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
  Open,
  Close,
  Command(Command),
}

fn classify(line: &str) -> Option<Token> {
  let trimmed = line.trim();
  if trimmed == "{" {
    Some(Token::Open)
  } else if trimmed == "}" {
    Some(Token::Close)
  } else if !line.is_empty() {
    Some(Token::Command(Command::new(line)))
  } else {
    None
  }
}

/// Buffers raw byte chunks across `deliver` calls and splits them into
/// [`Token`]s on newline boundaries. Partial trailing text without a
/// terminating newline remains buffered until more data (or none) arrives.
#[derive(Debug, Default)]
pub(crate) struct Tokenizer {
  buffer: String,
}

impl Tokenizer {
  pub(crate) fn new() -> Self {
    Self {
      buffer: String::new(),
    }
  }

  /// Appends `bytes` to the buffer and returns every complete token that can
  /// now be produced, in order. Lossy UTF-8 decoding: the core deals in
  /// arbitrary character data from a client program, so invalid byte
  /// sequences are replaced rather than rejected, keeping the public API
  /// total (no input can make it return an error).
  pub(crate) fn feed(&mut self, bytes: &[u8]) -> Vec<Token> {
    self.buffer.push_str(&String::from_utf8_lossy(bytes));

    let mut tokens = Vec::new();
    loop {
      let Some(newline_at) = self.buffer.find('\n') else {
        break;
      };
      let line: String = self.buffer.drain(..=newline_at).collect();
      let line = &line[..line.len() - 1]; // strip the trailing '\n'
      if let Some(tok) = classify(line) {
        tokens.push(tok);
      }
    }
    tokens
  }
}
