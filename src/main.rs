use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotdeck::cli::{Cli, Command};
use dotdeck::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let name = match &args.command {
        Command::Link => "link",
        Command::Unlink(_) => "unlink",
        Command::Sync(_) => "sync",
        Command::Version => {
            println!("deck {}", dotdeck::VERSION);
            return Ok(());
        }
    };

    logging::init_subscriber(args.verbose, name);
    let log = Arc::new(logging::Logger::new(name));

    match &args.command {
        Command::Link => commands::link::run(&args.global, &log),
        Command::Unlink(opts) => commands::unlink::run(&args.global, opts, &log),
        Command::Sync(opts) => commands::sync::run(&args.global, opts, &log),
        Command::Version => Ok(()),
    }
}
