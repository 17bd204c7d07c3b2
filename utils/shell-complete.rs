// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::stdout;

use clap::CommandFactory as _;
use clap::Parser;

use clap_complete::generate;
use clap_complete::Shell;


#[allow(unused)]
mod verstamp {
  include!("../src/args.rs");
}


/// Generate a shell completion script for verstamp.
#[derive(Debug, Parser)]
struct Args {
  /// The shell for which to generate a completion script for.
  #[clap(value_enum)]
  shell: Shell,
  /// The command name to complete.
  #[clap(default_value = "verstamp")]
  command: String,
}


fn main() {
  let args = Args::parse();
  let mut app = verstamp::Args::command();
  generate(args.shell, &mut app, &args.command, &mut stdout());
}
