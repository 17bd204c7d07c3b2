// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::env::var_os;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::path::Path;

use anyhow::bail;
use anyhow::Result;

use tracing::debug;
use tracing::warn;

use crate::exec::command_line;
use crate::exec::Exec;


/// The file marking the root of a Fossil checkout.
pub const FOSSIL_CHECKOUT: &str = ".fslckout";
/// The label of the line in `fossil info` output carrying the checkout
/// hash.
const FOSSIL_CHECKOUT_LABEL: &str = "checkout:";
/// The number of characters of a Fossil checkout hash we use.
const FOSSIL_HASH_LEN: usize = 10;
/// The number of characters of a Git commit hash we use.
const GIT_HASH_LEN: usize = 7;


/// A supported version control system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
  Fossil,
  Git,
}

impl Backend {
  /// The name of the backend as it appears in revision tags.
  pub fn name(&self) -> &'static str {
    match self {
      Self::Fossil => "fossil",
      Self::Git => "git",
    }
  }

  /// The program to run for querying the backend, honoring the
  /// `VERSTAMP_FOSSIL` and `VERSTAMP_GIT` overrides.
  pub fn program(&self) -> OsString {
    self.program_from(|var| var_os(var))
  }

  /// The program to run for querying the backend, looking up
  /// overrides using `lookup`.
  fn program_from<F>(&self, lookup: F) -> OsString
  where
    F: FnOnce(&str) -> Option<OsString>,
  {
    let var = match self {
      Self::Fossil => "VERSTAMP_FOSSIL",
      Self::Git => "VERSTAMP_GIT",
    };
    lookup(var).unwrap_or_else(|| OsString::from(self.name()))
  }

  /// The arguments to pass to the backend's program.
  fn args(&self) -> &'static [&'static str] {
    match self {
      Self::Fossil => &["info"],
      Self::Git => &["rev-parse", "HEAD"],
    }
  }

  /// Extract the revision identifier from the backend's output.
  fn parse(&self, output: &str) -> Option<String> {
    match self {
      Self::Fossil => parse_fossil_info(output),
      Self::Git => parse_git_rev_parse(output),
    }
  }
}


/// A revision tag identifying the state of a working copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
  /// A revision as reported by the given backend.
  Revision { backend: Backend, id: String },
  /// The backend did not report a revision.
  Unknown,
}

impl Display for Tag {
  fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Revision { backend, id } => write!(fmt, "{}-{}", backend.name(), id),
      Self::Unknown => fmt.write_str("unknown"),
    }
  }
}


/// Determine the version control system managing `dir`.
pub fn detect_backend(dir: &Path) -> Backend {
  if dir.join(FOSSIL_CHECKOUT).exists() {
    Backend::Fossil
  } else {
    Backend::Git
  }
}


/// Find the checkout hash in the output of `fossil info`.
fn parse_fossil_info(output: &str) -> Option<String> {
  output.lines().find_map(|line| {
    // Lines with fewer than ten characters after the whitespace are
    // skipped, never padded with the whitespace itself.
    let rest = line.strip_prefix(FOSSIL_CHECKOUT_LABEL)?.trim_start();
    let id = rest.chars().take(FOSSIL_HASH_LEN).collect::<String>();
    (id.chars().count() == FOSSIL_HASH_LEN).then_some(id)
  })
}


/// Extract the abbreviated commit hash from the output of
/// `git rev-parse`.
fn parse_git_rev_parse(output: &str) -> Option<String> {
  let id = output.get(..GIT_HASH_LEN)?;
  id.chars()
    .all(|c| c.is_ascii_hexdigit())
    .then(|| id.to_string())
}


/// Ask `backend` about the revision `dir` is at.
pub fn query_revision<E>(backend: Backend, dir: &Path, exec: &E) -> Result<Tag>
where
  E: Exec,
{
  query(backend, &backend.program(), dir, exec)
}


fn query<E>(backend: Backend, program: &OsStr, dir: &Path, exec: &E) -> Result<Tag>
where
  E: Exec,
{
  let args = backend.args();
  let cmd = command_line(program, args);
  let captured = exec.exec(program, args, dir)?;

  if !captured.success() {
    match captured.code {
      Some(code) => bail!("`{}` failed with exit code {}", cmd, code),
      None => bail!("`{}` was terminated by a signal", cmd),
    }
  }

  if captured.stdout.is_empty() {
    bail!("`{}` did not produce any output", cmd)
  }

  let output = String::from_utf8_lossy(&captured.stdout);
  let tag = match backend.parse(&output) {
    Some(id) => Tag::Revision { backend, id },
    None => {
      warn!("`{}` did not report a revision", cmd);
      Tag::Unknown
    },
  };

  debug!("working copy is at {}", tag);
  Ok(tag)
}
