use clap::Parser;
use std::path::PathBuf;

use crate::stage::STAGE_COUNT;

pub const APP_DIR_NAME: &str = "geometric-barrage";
pub const SCORES_FILE: &str = "scores.json";
pub const LOG_FILE: &str = "geometric-barrage.log";

#[derive(Parser, Debug, Clone)]
#[command(name = "geometric-barrage")]
#[command(about = "Terminal arcade shooter: survive three timed stages of geometric enemies")]
pub struct Cli {
    /// Directory for the high score file and the log
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Skip the stage select and start at this stage (1-based)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=STAGE_COUNT as i64))]
    pub stage: Option<u8>,
    /// Disable sound effects
    #[arg(long)]
    pub mute: bool,
    /// Seed for the simulation RNG, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
    /// Tracing filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// `--data-dir`, else the platform data directory, else the working
    /// directory
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    pub fn scores_path(&self) -> PathBuf {
        self.resolve_data_dir().join(SCORES_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve_data_dir().join(LOG_FILE)
    }

    /// 0-based index of the requested start stage
    pub fn start_stage(&self) -> Option<usize> {
        self.stage.map(|n| usize::from(n) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["geometric-barrage"]).expect("parse");
        assert!(cli.data_dir.is_none());
        assert!(!cli.mute);
        assert_eq!(cli.start_stage(), None);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_paths_follow_data_dir() {
        let cli = Cli::try_parse_from(["geometric-barrage", "--data-dir", "/tmp/gb"])
            .expect("parse");
        assert_eq!(cli.scores_path(), PathBuf::from("/tmp/gb/scores.json"));
        assert_eq!(cli.log_path(), PathBuf::from("/tmp/gb/geometric-barrage.log"));
    }

    #[test]
    fn test_stage_is_one_based() {
        let cli = Cli::try_parse_from(["geometric-barrage", "--stage", "3", "--seed", "7", "--mute"])
            .expect("parse");
        assert_eq!(cli.start_stage(), Some(2));
        assert_eq!(cli.seed, Some(7));
        assert!(cli.mute);
    }

    #[test]
    fn test_stage_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["geometric-barrage", "--stage", "0"]).is_err());
        assert!(Cli::try_parse_from(["geometric-barrage", "--stage", "4"]).is_err());
    }
}
