mod cli;

use std::io::{BufWriter, Write};

use clap::Parser;
use cli::config::{CliArgs, GeneratorConfig};
use cli::mint::run;
use cli::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    init_tracing()?;
    let config = GeneratorConfig::try_from(args)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}
