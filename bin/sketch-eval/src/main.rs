//! Evaluates a Frequent Directions sketch against the full matrix it summarizes.

#![deny(missing_docs)]

use clap::Parser as _;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

mod config;
use self::config::{Cli, Config, InputSource};

mod corpus;
use self::corpus::Corpus;

mod driver;
use self::driver::Driver;

fn main() {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(true)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => info!("sketch-eval stopped."),
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    info!("sketch-eval starting...");

    let mut config = Config::try_from_file(&cli.config_path)?;
    if let Some(path) = cli.input {
        config.input = InputSource::File { path };
    }

    let corpus = Corpus::from_source(&config.input)?;
    let summaries = Driver::new(config, corpus)?.run()?;

    let worst = summaries.iter().map(|s| s.error / s.bound).fold(0.0, f64::max);
    let shrinks = summaries.iter().map(|s| s.shrinks).sum::<u64>();
    info!(
        "Completed {} run(s) with {} shrinks, worst error/bound ratio {:.4}.",
        summaries.len(),
        shrinks,
        worst
    );

    Ok(())
}
