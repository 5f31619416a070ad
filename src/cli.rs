use clap::{ArgAction, Parser, Subcommand};
use huffpack::storage::DEFAULT_CHUNK_BITS;
use huffpack::{Options, SymbolPolicy};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "huffpack", version)]
#[command(about = "Static Huffman compression for text files.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress a file
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// Drop bytes that have no code instead of failing
        #[arg(long)]
        skip_unknown: bool,
    },
    /// Decompress a file produced by `compress`
    Decompress {
        input: PathBuf,
        output: PathBuf,
        /// Bits pulled from the container per read
        #[arg(long, default_value_t = DEFAULT_CHUNK_BITS)]
        chunk_bits: usize,
    },
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }

    pub fn options(&self) -> Options {
        let mut opts = Options::default();
        match &self.command {
            Commands::Compress { skip_unknown, .. } => {
                if *skip_unknown {
                    opts.symbol_policy = SymbolPolicy::Skip;
                }
            }
            Commands::Decompress { chunk_bits, .. } => opts.chunk_bits = *chunk_bits,
        }
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compress() {
        let cli = Cli::try_parse_from(["huffpack", "compress", "in.txt", "out.huff"]).unwrap();

        assert!(matches!(cli.command, Commands::Compress { .. }));
        assert_eq!(cli.log_level(), Level::INFO);
        assert_eq!(cli.options(), Options::default());
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::try_parse_from([
            "huffpack",
            "-vv",
            "compress",
            "--skip-unknown",
            "in.txt",
            "out.huff",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), Level::TRACE);
        assert_eq!(cli.options().symbol_policy, SymbolPolicy::Skip);

        let cli = Cli::try_parse_from([
            "huffpack",
            "decompress",
            "-q",
            "--chunk-bits",
            "64",
            "in.huff",
            "out.txt",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), Level::ERROR);
        assert_eq!(cli.options().chunk_bits, 64);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["huffpack", "-q", "-v", "compress", "a", "b"]).is_err());
    }

    #[test]
    fn needs_both_paths() {
        assert!(Cli::try_parse_from(["huffpack", "decompress", "only-one"]).is_err());
    }
}
