//! convgen CLI - Rewrites marked conversion functions in a Rust source file
//!
//! ```text
//! convgen -w src/convert.rs            # rewrite in place
//! convgen -w src/convert.rs --debug    # write src/convert.rs.out instead
//! convgen -w src/convert.rs -c my.toml # explicit configuration
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;

mod config;
mod logging;
mod rewrite;
mod splice;

#[derive(Parser)]
#[command(name = "convgen")]
#[command(author, version, about = "Generates struct-to-struct conversion bodies", long_about = None)]
struct Cli {
    /// Source file to rewrite
    #[arg(short, long, value_name = "FILE")]
    write: Option<PathBuf>,

    /// Write the result to <FILE>.out instead of overwriting the source
    #[arg(long)]
    debug: bool,

    /// Path to convgen.toml (default: convgen.toml next to the source file)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let Some(target) = cli.write else {
        tracing::warn!("no source file given");
        return Ok(());
    };

    let options = rewrite::Options {
        target,
        debug: cli.debug,
        config: cli.config,
    };
    rewrite::run(&options)?;

    Ok(())
}
