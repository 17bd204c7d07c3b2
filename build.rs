// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::process::Command;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;


fn command_line(program: &str, args: &[&str]) -> String {
  args.iter().fold(program.to_string(), |mut cmd, arg| {
    cmd += &(" ".to_owned() + arg);
    cmd
  })
}


/// Run `program` with the provided arguments and read the output it
/// emits.
fn run(program: &str, args: &[&str]) -> Result<String> {
  let output = Command::new(program)
    .args(args)
    .output()
    .with_context(|| format!("failed to run `{}`", command_line(program, args)))?;

  if !output.status.success() {
    bail!("`{}` failed: {}", command_line(program, args), output.status)
  }

  let output = String::from_utf8(output.stdout).with_context(|| {
    format!(
      "failed to read `{}` output as UTF-8 string",
      command_line(program, args)
    )
  })?;

  Ok(output)
}


/// Determine the revision of the tool's own source tree.
fn revision() -> Result<String> {
  if Path::new(".fslckout").exists() {
    let info = run("fossil", &["info"])?;
    info
      .lines()
      .find_map(|line| line.strip_prefix("checkout:"))
      .and_then(|rest| rest.split_whitespace().next())
      .map(|hash| format!("fossil-{}", hash.chars().take(10).collect::<String>()))
      .context("`fossil info` did not report a checkout")
  } else {
    let revision = run("git", &["rev-parse", "--short=7", "HEAD"])?;
    Ok(format!("git-{}", revision.trim()))
  }
}


fn main() -> Result<()> {
  match revision() {
    Ok(revision) => println!(
      "cargo:rustc-env=VERSION={} ({})",
      env!("CARGO_PKG_VERSION"),
      revision
    ),
    // Source archives do not carry version control information.
    Err(err) => {
      println!("cargo:warning=unable to determine revision: {:#}", err);
      println!("cargo:rustc-env=VERSION={}", env!("CARGO_PKG_VERSION"));
    },
  }
  Ok(())
}
