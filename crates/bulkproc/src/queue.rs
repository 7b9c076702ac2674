use crossbeam_channel::{Receiver, RecvError, SendError, Sender, bounded, unbounded};

use crate::message::Message;

/// A FIFO handed to writer threads. Backed by `crossbeam-channel`; `push` is
/// non-blocking when the queue is unbounded (the default) and blocks the
/// producer when a capacity is configured.
#[derive(Clone)]
pub struct MessageQueue {
  tx: Sender<Message>,
  rx: Receiver<Message>,
}

impl MessageQueue {
  /// `capacity: None` creates an unbounded queue; `Some(n)` creates a bounded
  /// one of capacity `n`.
  pub(crate) fn new(capacity: Option<usize>) -> Self {
    let (tx, rx) = match capacity {
      Some(n) => bounded(n),
      None => unbounded(),
    };
    Self { tx, rx }
  }

  /// Enqueues `msg`. Blocks the caller only if the queue is bounded and full.
  pub(crate) fn push(&self, msg: Message) -> Result<(), SendError<Message>> {
    self.tx.send(msg)
  }

  /// Blocks until a message is available or the queue is disconnected.
  pub(crate) fn pop(&self) -> Result<Message, RecvError> {
    self.rx.recv()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::message::MessageKind;

  #[test]
  fn fifo_ordering_is_preserved() {
    let q = MessageQueue::new(None);
    for i in 0..5 {
      q.push(Message {
        kind: MessageKind::Data,
        text: format!("line{i}\n"),
        command_count: 1,
        filename: "f.log".into(),
      })
      .unwrap();
    }
    for i in 0..5 {
      let msg = q.pop().unwrap();
      assert_eq!(msg.text, format!("line{i}\n"));
    }
  }

  #[test]
  fn end_of_stream_terminates_consumer_loop() {
    let q = MessageQueue::new(None);
    q.push(Message::data(&crate::bulk::Bulk::new(
      std::time::SystemTime::now(),
    )))
    .unwrap();
    q.push(Message::end_of_stream()).unwrap();

    let mut seen_data = 0;
    loop {
      let msg = q.pop().unwrap();
      match msg.kind {
        MessageKind::Data => seen_data += 1,
        MessageKind::EndOfStream => break,
      }
    }
    assert_eq!(seen_data, 1);
  }
}
