//! Shared helpers for tests that assert on the files a `FileWriter` creates.
//! Those writers always target the process's current directory, so tests
//! that produce output must isolate it in a scratch directory and run
//! serialized with the rest of the suite (`#[serial]`) since the current
//! directory is global process state.

use std::path::PathBuf;

use tempfile::TempDir;

pub(crate) struct ScopedCwd {
  _dir: TempDir,
  previous: PathBuf,
}

impl ScopedCwd {
  pub(crate) fn enter() -> Self {
    let dir = TempDir::new().expect("create scratch directory");
    let previous = std::env::current_dir().expect("read current directory");
    std::env::set_current_dir(dir.path()).expect("enter scratch directory");
    Self { _dir: dir, previous }
  }
}

impl Drop for ScopedCwd {
  fn drop(&mut self) {
    let _ = std::env::set_current_dir(&self.previous);
  }
}
