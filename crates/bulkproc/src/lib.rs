//! Asynchronous bulk-command grouping and dispatch.
//!
//! A client streams arbitrary character data into one or more independent
//! [`Registry`]-managed sessions; the library tokenises that data into
//! newline-delimited commands, groups commands into bulks according to the
//! static/dynamic block grammar, and, for every completed bulk, emits one
//! rendered block on a console writer and on one of two file writers.
//!
//! This crate is the core: the bulk parser, the session registry, the
//! output pipeline, and the graceful-shutdown protocol. The C-compatible
//! `connect`/`receive`/`disconnect` entry points,
//! the network front-end, and process-level argument parsing are external
//! collaborators layered on top of [`Registry::open`], [`Registry::deliver`],
//! and [`Registry::close`] and are out of scope for this crate.
//!
//! This is a library: it never installs a `log` subscriber itself. Embed it
//! behind `env_logger::init()` or an equivalent to see its diagnostics.

mod bulk;
mod command;
mod config;
mod handle;
mod message;
mod parser;
mod queue;
mod registry;
mod report;
mod session;
mod token;
mod writer;

#[cfg(test)]
mod test_util;

pub use bulk::Bulk;
pub use command::Command;
pub use config::RegistryConfig;
pub use handle::Handle;
pub use message::{Message, MessageKind};
pub use registry::Registry;
pub use report::{Report, WriterReport};
pub use writer::Counters;
