//! This crate contains the source code for the `tilemaze` command-line front end.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use tilemaze::cli::{self, Cli};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    cli::init_logging(cli.verbose)?;
    cli::run(&cli)
}
