// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use anyhow::Context;
use anyhow::Result;

use tracing::debug;


/// Format a program and its arguments for display purposes.
pub fn command_line(program: &OsStr, args: &[&str]) -> String {
  args
    .iter()
    .fold(program.to_string_lossy().into_owned(), |mut cmd, arg| {
      cmd += &(" ".to_owned() + arg);
      cmd
    })
}


/// The result of running a program to completion.
#[derive(Clone, Debug, PartialEq)]
pub struct Captured {
  /// The exit code of the program, if it exited normally.
  pub code: Option<i32>,
  /// Everything the program wrote to its standard output.
  pub stdout: Vec<u8>,
}

impl Captured {
  /// Check whether the program exited successfully.
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}


/// A capability for running a program and capturing its output.
pub trait Exec {
  /// Run `program` with `args` inside of `dir` and wait for it to
  /// finish.
  ///
  /// An error is only reported if the program could not be launched
  /// at all; a non-zero exit is conveyed through [`Captured::code`].
  fn exec(&self, program: &OsStr, args: &[&str], dir: &Path) -> Result<Captured>;
}


/// An [`Exec`] implementation spawning actual child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl Exec for System {
  fn exec(&self, program: &OsStr, args: &[&str], dir: &Path) -> Result<Captured> {
    debug!(
      dir = display(dir.display()),
      "running `{}`",
      command_line(program, args)
    );

    let output = Command::new(program)
      .args(args)
      .current_dir(dir)
      .output()
      .with_context(|| format!("failed to launch `{}`", command_line(program, args)))?;

    Ok(Captured {
      code: output.status.code(),
      stdout: output.stdout,
    })
  }
}
