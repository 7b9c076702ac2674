use std::fs;
use std::io::{self, Write};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::message::{Message, MessageKind};
use crate::queue::MessageQueue;

/// `(blocks, commands)` tally kept by a single writer thread. Read only
/// after the writer's thread has been joined; the registry never reads a
/// writer's counters while it might still be running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
  pub blocks: u64,
  pub commands: u64,
}

impl Counters {
  fn record(&mut self, msg: &Message) {
    self.blocks += 1;
    self.commands += msg.command_count as u64;
  }
}

/// Writes each `Data` message's text to standard output. One thread, since
/// stdout is a single shared contention point.
pub(crate) struct ConsoleWriter;

impl ConsoleWriter {
  pub(crate) fn spawn(queue: MessageQueue) -> std::io::Result<JoinHandle<Counters>> {
    thread::Builder::new()
      .name("bulkproc-console".into())
      .spawn(move || Self::run(queue))
  }

  fn run(queue: MessageQueue) -> Counters {
    let mut counters = Counters::default();
    loop {
      let Ok(msg) = queue.pop() else {
        break;
      };
      match msg.kind {
        MessageKind::Data => {
          let mut stdout = io::stdout();
          if stdout.write_all(msg.text.as_bytes()).is_ok() {
            counters.record(&msg);
            debug!(target: "bulkproc::writer", "console wrote {} command(s)", msg.command_count);
          } else {
            warn!(target: "bulkproc::writer", "console write failed, dropping bulk");
          }
        }
        MessageKind::EndOfStream => break,
      }
    }
    counters
  }
}

/// Writes each `Data` message's text to a file named `msg.filename` in the
/// current working directory. Two instances share one queue: the first to
/// pop a message wins it, parallelising disk I/O.
pub(crate) struct FileWriter;

impl FileWriter {
  pub(crate) fn spawn(queue: MessageQueue, index: usize) -> std::io::Result<JoinHandle<Counters>> {
    thread::Builder::new()
      .name(format!("bulkproc-file-{index}"))
      .spawn(move || Self::run(queue))
  }

  fn run(queue: MessageQueue) -> Counters {
    let mut counters = Counters::default();
    loop {
      let Ok(msg) = queue.pop() else {
        break;
      };
      match msg.kind {
        MessageKind::Data => match Self::write_file(&msg) {
          Ok(()) => {
            counters.record(&msg);
            debug!(target: "bulkproc::writer", "wrote {}", msg.filename);
          }
          Err(err) => {
            warn!(target: "bulkproc::writer", "failed to write {}: {err}", msg.filename);
          }
        },
        MessageKind::EndOfStream => break,
      }
    }
    counters
  }

  fn write_file(msg: &Message) -> io::Result<()> {
    let mut file = fs::File::create(&msg.filename)?;
    file.write_all(msg.text.as_bytes())
  }
}
