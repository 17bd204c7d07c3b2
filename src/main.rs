// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

mod args;
mod exec;
mod stamp;
mod vcs;

use std::io::stderr;
use std::io::stdout;
use std::io::Write;
use std::process::exit;

use anyhow::Context;
use anyhow::Result;

use clap::Parser;

use tracing::subscriber::set_global_default as set_global_subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::FmtSubscriber;

use crate::args::Args;
use crate::exec::System;
use crate::stamp::preview;
use crate::stamp::stamp;
use crate::stamp::today;


fn run() -> Result<()> {
  let args = Args::parse();
  let level = match args.verbosity {
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  };

  let subscriber = FmtSubscriber::builder()
    .with_max_level(level)
    .with_timer(SystemTime)
    .with_writer(stderr)
    .finish();

  let () = set_global_subscriber(subscriber).with_context(|| "failed to set tracing subscriber")?;

  let date = args.date.unwrap_or_else(today);
  if args.dry_run {
    let _version = preview(&args.directory, date, &System, &mut stdout())?;
  } else {
    let _version = stamp(&args.directory, &args.output, date, &System)?;
  }
  Ok(())
}


fn main() {
  let exit_code = run()
    .map(|_| 0)
    .map_err(|e| {
      eprint!("{}", e);
      e.chain().skip(1).for_each(|cause| eprint!(": {}", cause));
      eprintln!();
    })
    .unwrap_or(1);
  // We exit the process the hard way next, so make sure to flush
  // buffered content.
  let _ = stdout().flush();
  exit(exit_code)
}
