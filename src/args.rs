// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use chrono::NaiveDate;

use clap::ArgAction;
use clap::Parser;


/// Parse a date in `YYYY-MM-DD` format.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| format!("invalid date {} (expected YYYY-MM-DD): {}", s, e))
}


/// A tool for stamping the current Fossil or Git revision of a working
/// copy into a version constant file.
#[derive(Debug, Parser)]
#[clap(version = env!("VERSION"))]
pub struct Args {
  /// The working copy to inspect.
  #[clap(short = 'C', long, default_value = ".")]
  pub directory: PathBuf,
  /// The file to write the version constant to, relative to the
  /// working copy.
  #[clap(short, long, default_value = "version.cr")]
  pub output: PathBuf,
  /// Use this date (YYYY-MM-DD) instead of today's.
  #[clap(long, value_parser = parse_date)]
  pub date: Option<NaiveDate>,
  /// Print the version constant instead of writing it.
  #[clap(short = 'n', long)]
  pub dry_run: bool,
  /// Increase verbosity (can be supplied multiple times).
  #[clap(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
  pub verbosity: u8,
}
