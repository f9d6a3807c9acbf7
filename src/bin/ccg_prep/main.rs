//! `ccg-prep`: command-line front end for the data-preparation pipeline.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Cli;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` directives plus info-level output from the library and the CLI.
fn log_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("ccg_dataprep=info".parse()?)
        .add_directive("ccg_prep=info".parse()?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter()?).init();

    let cli = Cli::parse();
    cli.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_covers_library_and_cli() {
        let filter = log_filter().unwrap().to_string();
        assert!(filter.contains("ccg_dataprep=info"));
        assert!(filter.contains("ccg_prep=info"));
    }
}
