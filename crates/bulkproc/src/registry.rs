use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use anyhow::Context;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::bulk::Bulk;
use crate::config::RegistryConfig;
use crate::handle::{Handle, HandleAllocator};
use crate::message::Message;
use crate::queue::MessageQueue;
use crate::report::{Report, WriterReport};
use crate::session::Session;
use crate::writer::{ConsoleWriter, Counters, FileWriter};

/// Multi-tenant lifecycle manager for [`Session`]s. Owns the output pipeline
/// (two queues, three writer threads) and the always-present shared session
/// at [`Handle::INVALID`].
///
/// Concurrency discipline: `sessions` is guarded by a single mutex held only
/// for the brief map lookup/insert/remove; the returned `Arc<Mutex<..>>` is
/// then locked on its own, so two `deliver` calls against different handles
/// never contend on the registry-wide lock.
pub struct Registry {
  config: RegistryConfig,
  handles: HandleAllocator,
  sessions: Mutex<HashMap<Handle, Arc<Mutex<Session>>>>,
  console_q: MessageQueue,
  file_q: MessageQueue,
  console_writer: Mutex<Option<JoinHandle<Counters>>>,
  file_writers: Mutex<Vec<JoinHandle<Counters>>>,
  shutting_down: AtomicBool,
  report: Mutex<Option<Report>>,
}

impl Registry {
  /// Builds a registry: spawns the console and two file writer threads and
  /// eagerly creates the shared session, so `deliver(Handle::INVALID, ..)`
  /// works from the very first call rather than requiring a separate
  /// first-open step.
  ///
  /// Fails only if a writer thread cannot be spawned (`std::thread::Builder`
  /// returning an OS error), which is not recoverable to "registry still
  /// usable", so it is propagated to the embedding application rather than
  /// absorbed.
  pub fn new(config: RegistryConfig) -> anyhow::Result<Self> {
    let console_q = MessageQueue::new(config.queue_capacity);
    let file_q = MessageQueue::new(config.queue_capacity);

    let console_writer = ConsoleWriter::spawn(console_q.clone())
      .context("failed to spawn console writer thread")?;
    let file_writers = vec![
      FileWriter::spawn(file_q.clone(), 0).context("failed to spawn file writer thread 0")?,
      FileWriter::spawn(file_q.clone(), 1).context("failed to spawn file writer thread 1")?,
    ];

    let mut sessions = HashMap::new();
    sessions.insert(
      Handle::INVALID,
      Arc::new(Mutex::new(Session::new(config.shared_bulk_size))),
    );

    Ok(Self {
      config,
      handles: HandleAllocator::new(),
      sessions: Mutex::new(sessions),
      console_q,
      file_q,
      console_writer: Mutex::new(Some(console_writer)),
      file_writers: Mutex::new(file_writers),
      shutting_down: AtomicBool::new(false),
      report: Mutex::new(None),
    })
  }

  /// Opens a new session with the given static bulk size. Returns
  /// [`Handle::INVALID`] if `bulk_size < 1` or the registry is shutting
  /// down.
  #[must_use]
  pub fn open(&self, bulk_size: usize) -> Handle {
    if bulk_size < 1 || self.shutting_down.load(Ordering::Acquire) {
      return Handle::INVALID;
    }
    let handle = self.handles.allocate();
    self
      .sessions
      .lock()
      .insert(handle, Arc::new(Mutex::new(Session::new(bulk_size))));
    info!(target: "bulkproc::registry", "opened session {handle} (bulk size {bulk_size})");
    handle
  }

  /// Delivers bytes to the session at `handle`. A silent no-op for an
  /// invalid or unknown handle, or empty input.
  pub fn deliver(&self, handle: Handle, bytes: &[u8]) {
    if bytes.is_empty() {
      return;
    }
    let session = self.sessions.lock().get(&handle).cloned();
    let Some(session) = session else {
      return;
    };
    let bulks = session.lock().deliver(bytes);
    for bulk in &bulks {
      self.emit(bulk);
    }
  }

  /// Closes the session at `handle`: flushes any remaining static bulk and
  /// destroys the session. Idempotent; a no-op for an unknown handle or for
  /// [`Handle::INVALID`] (the shared session is destroyed only by registry
  /// teardown).
  pub fn close(&self, handle: Handle) {
    if handle == Handle::INVALID {
      return;
    }
    let Some(session) = self.sessions.lock().remove(&handle) else {
      return;
    };
    if let Some(bulk) = session.lock().close() {
      self.emit(&bulk);
    }
    info!(target: "bulkproc::registry", "closed session {handle}");
  }

  fn emit(&self, bulk: &Bulk) {
    let msg = Message::data(bulk);
    debug!(target: "bulkproc::registry", "emitting bulk of {} command(s)", msg.command_count);
    if self.console_q.push(msg.clone()).is_err() {
      warn!(target: "bulkproc::registry", "console queue disconnected, dropping bulk");
    }
    if self.file_q.push(msg).is_err() {
      warn!(target: "bulkproc::registry", "file queue disconnected, dropping bulk");
    }
  }

  /// Drives the graceful shutdown protocol: refuses further `open`s, flushes
  /// every remaining session, poisons both queues, joins the writers, and
  /// returns the final report. Idempotent: later calls return the report
  /// produced by the first.
  pub fn shutdown(&self) -> Report {
    if self.shutting_down.swap(true, Ordering::AcqRel) {
      return self
        .report
        .lock()
        .clone()
        .unwrap_or_else(|| Report::new(Vec::new()));
    }

    info!(target: "bulkproc::registry", "shutdown: flushing remaining sessions");
    let remaining: Vec<_> = self.sessions.lock().drain().collect();
    for (handle, session) in remaining {
      if let Some(bulk) = session.lock().close() {
        self.emit(&bulk);
      }
      debug!(target: "bulkproc::registry", "flushed session {handle} at shutdown");
    }

    let _ = self.console_q.push(Message::end_of_stream());
    let _ = self.file_q.push(Message::end_of_stream());
    let _ = self.file_q.push(Message::end_of_stream());

    let console_counters = self
      .console_writer
      .lock()
      .take()
      .and_then(|h| h.join().ok())
      .unwrap_or_default();
    let file_counters: Vec<Counters> = self
      .file_writers
      .lock()
      .drain(..)
      .map(|h| h.join().unwrap_or_default())
      .collect();

    let mut writers = vec![WriterReport {
      name: "console",
      counters: console_counters,
    }];
    for (i, counters) in file_counters.into_iter().enumerate() {
      writers.push(WriterReport {
        name: if i == 0 { "file-0" } else { "file-1" },
        counters,
      });
    }

    let report = Report::new(writers);
    *self.report.lock() = Some(report.clone());
    info!(target: "bulkproc::registry", "shutdown complete");
    report
  }

  /// The static bulk size configured for the shared session.
  #[must_use]
  pub fn shared_bulk_size(&self) -> usize {
    self.config.shared_bulk_size
  }
}

impl Drop for Registry {
  fn drop(&mut self) {
    if !self.shutting_down.load(Ordering::Acquire) {
      let report = self.shutdown();
      info!(target: "bulkproc::registry", "{report}");
    }
  }
}
