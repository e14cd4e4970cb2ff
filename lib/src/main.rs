//! review-sentiment CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use review_sentiment::app::{self, CliArgs};

fn main() {
    let args = CliArgs::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn execute(args: &CliArgs) -> anyhow::Result<()> {
    let config = args
        .resolve_config()
        .context("invalid configuration")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(&config, args.run_options(), &mut out).with_context(|| {
        format!(
            "failed to classify reviews from {}",
            config.test_path.display()
        )
    })
}
