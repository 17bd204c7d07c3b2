// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs::metadata;
use std::fs::read;
use std::io::Write;
use std::path::Path;

use anyhow::ensure;
use anyhow::Context;
use anyhow::Result;

use chrono::Local;
use chrono::NaiveDate;

use tempfile::NamedTempFile;

use tracing::debug;
use tracing::info;

use crate::exec::Exec;
use crate::vcs::detect_backend;
use crate::vcs::query_revision;
use crate::vcs::Tag;


/// The name of the constant we emit.
const IDENTIFIER: &str = "VERSION";


/// Retrieve the current local date.
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}


/// Combine a date and a revision tag into a version string.
pub fn format_version_string(date: NaiveDate, tag: &Tag) -> String {
  format!("{} {}", date.format("%Y-%m-%d"), tag)
}


/// Format the line declaring the version constant.
pub fn format_declaration(version: &str) -> String {
  format!("{} = \"{}\"\n", IDENTIFIER, version)
}


/// Create a temporary file in `dir` with the permissions a newly
/// created regular file would get.
#[cfg(unix)]
fn temp_file(dir: &Path) -> Result<NamedTempFile> {
  use std::fs::Permissions;
  use std::os::unix::fs::PermissionsExt as _;

  use tempfile::Builder;

  // Subject to the umask, just like `File::create`.
  let file = Builder::new()
    .permissions(Permissions::from_mode(0o666))
    .tempfile_in(dir)?;
  Ok(file)
}

#[cfg(not(unix))]
fn temp_file(dir: &Path) -> Result<NamedTempFile> {
  let file = NamedTempFile::new_in(dir)?;
  Ok(file)
}


/// Write the version constant declaration for `version` to `path`.
///
/// The file is replaced atomically, retaining the permissions of an
/// existing file. If it already has the desired content it is left
/// untouched. A read-only file is never replaced.
pub fn write_output(path: &Path, version: &str) -> Result<()> {
  let content = format_declaration(version);

  if let Ok(existing) = read(path) {
    if existing == content.as_bytes() {
      debug!("{} is up-to-date", path.display());
      return Ok(())
    }
  }

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let () = (|| -> Result<()> {
    let permissions = metadata(path).ok().map(|meta| meta.permissions());
    if let Some(permissions) = &permissions {
      ensure!(!permissions.readonly(), "file is read-only");
    }

    let mut file = temp_file(dir)
      .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    if let Some(permissions) = permissions {
      let () = file.as_file().set_permissions(permissions)?;
    }
    let () = file.write_all(content.as_bytes())?;
    let () = file.flush()?;
    let _file = file.persist(path)?;
    Ok(())
  })()
  .with_context(|| format!("failed to write version file {}", path.display()))?;

  info!("wrote {}", path.display());
  Ok(())
}


/// Determine the version string for the working copy at `dir`.
pub fn version<E>(dir: &Path, date: NaiveDate, exec: &E) -> Result<String>
where
  E: Exec,
{
  let backend = detect_backend(dir);
  debug!("using {} backend", backend.name());

  let tag = query_revision(backend, dir, exec)
    .with_context(|| format!("failed to query {} revision", backend.name()))?;
  Ok(format_version_string(date, &tag))
}


/// Stamp the version of the working copy at `dir` into `output`.
pub fn stamp<E>(dir: &Path, output: &Path, date: NaiveDate, exec: &E) -> Result<String>
where
  E: Exec,
{
  let version = version(dir, date, exec)?;
  let () = write_output(&dir.join(output), &version)?;
  Ok(version)
}


/// Write the version constant declaration for the working copy at
/// `dir` to `writer` instead of a file.
pub fn preview<E, W>(dir: &Path, date: NaiveDate, exec: &E, writer: &mut W) -> Result<String>
where
  E: Exec,
  W: Write,
{
  let version = version(dir, date, exec)?;
  let () = writer
    .write_all(format_declaration(&version).as_bytes())
    .context("failed to write version constant")?;
  Ok(version)
}
