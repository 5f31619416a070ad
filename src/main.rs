mod cli;
mod logger;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level())?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    let opts = cli.options();
    match &cli.command {
        Commands::Compress { input, output, .. } => {
            let report = huffpack::compress(input, output, &opts)
                .with_context(|| format!("compressing {}", input.display()))?;

            let ratio = if report.input_bytes == 0 {
                1.0
            } else {
                report.output_bytes as f64 / report.input_bytes as f64
            };
            info!(
                symbols = report.symbols,
                distinct = report.distinct_symbols,
                bits = report.encoded_bits,
                ratio,
                "done"
            );
        }
        Commands::Decompress { input, output, .. } => {
            let report = huffpack::decompress(input, output, &opts)
                .with_context(|| format!("decompressing {}", input.display()))?;

            info!(symbols = report.symbols, bits = report.encoded_bits, "done");
        }
    }

    Ok(())
}
