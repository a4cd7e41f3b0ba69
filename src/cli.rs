//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::EngineConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "gambit", version, about = "Chess engine following the UCI protocol")]
pub struct Cli {
    /// Debug logging level [0 (disabled) - 9 (maximum)]
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub debug: u8,

    /// Write logs to FILE instead of stderr
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub log: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Search depth in plies
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub depth: Option<u32>,

    /// Search threads (0 = one per CPU)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Break ties between equal moves at random
    #[arg(long)]
    pub random: bool,

    /// Seed for the random tie-break
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`
    pub fn apply_to(&self, config: &mut EngineConfig) {
        if let Some(depth) = self.depth {
            config.max_search_depth = depth;
        }
        if let Some(threads) = self.threads {
            config.workers = threads;
        }
        if self.random {
            config.random = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["gambit"]).unwrap();
        assert_eq!(cli.debug, 0);
        assert!(cli.log.is_none());
        let mut config = EngineConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "gambit", "-d5", "--depth", "6", "--threads", "2", "--random", "--seed", "11",
        ])
        .unwrap();
        assert_eq!(cli.debug, 5);
        assert_eq!(cli.seed, Some(11));
        let mut config = EngineConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.max_search_depth, 6);
        assert_eq!(config.workers, 2);
        assert!(config.random);
    }

    #[test]
    fn test_debug_level_out_of_range() {
        assert!(Cli::try_parse_from(["gambit", "--debug", "10"]).is_err());
        assert!(Cli::try_parse_from(["gambit", "--depth", "0"]).is_err());
    }
}
