use std::time::Duration;

use blockfall_engine::{BASE_DROP_INTERVAL, ColorPolicy, EngineConfig, GameSeed, GameState};
use clap::{Parser, Subcommand};

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a seeded headless game with a scripted player and print a JSON summary
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

/// Engine settings shared by every mode.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EngineArg {
    /// Board width in cells
    #[arg(long, default_value_t = blockfall_engine::DEFAULT_BOARD_WIDTH)]
    width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = blockfall_engine::DEFAULT_BOARD_HEIGHT)]
    height: usize,
    /// Gravity interval at level 1, in milliseconds
    #[arg(long, default_value_t = duration_millis(BASE_DROP_INTERVAL))]
    drop_interval_ms: u64,
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
    /// How piece colors are chosen
    #[arg(long, value_enum, default_value_t = ColorPolicyArg::Independent)]
    color_policy: ColorPolicyArg,
}

impl Default for EngineArg {
    fn default() -> Self {
        Self {
            width: blockfall_engine::DEFAULT_BOARD_WIDTH,
            height: blockfall_engine::DEFAULT_BOARD_HEIGHT,
            drop_interval_ms: duration_millis(BASE_DROP_INTERVAL),
            seed: None,
            color_policy: ColorPolicyArg::Independent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ColorPolicyArg {
    /// Random palette color for every piece
    Independent,
    /// Fixed color per piece kind
    ByKind,
}

impl From<ColorPolicyArg> for ColorPolicy {
    fn from(arg: ColorPolicyArg) -> Self {
        match arg {
            ColorPolicyArg::Independent => ColorPolicy::Independent,
            ColorPolicyArg::ByKind => ColorPolicy::ByKind,
        }
    }
}

impl EngineArg {
    pub(crate) fn config(&self) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            base_drop_interval: Duration::from_millis(self.drop_interval_ms),
            color_policy: self.color_policy.into(),
        }
    }

    /// The requested seed, or a fresh random one.
    pub(crate) fn seed(&self) -> GameSeed {
        self.seed.unwrap_or_else(rand::random)
    }

    pub(crate) fn new_game(&self) -> anyhow::Result<(GameState, GameSeed)> {
        let seed = self.seed();
        let state = GameState::with_seed(self.config(), seed)?;
        Ok((state, seed))
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_play() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_engine_args_build_config() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "simulate",
            "--width",
            "12",
            "--height",
            "24",
            "--drop-interval-ms",
            "500",
            "--color-policy",
            "by-kind",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
        ])
        .unwrap();
        let Some(Mode::Simulate(arg)) = args.mode else {
            panic!("expected simulate mode");
        };
        let config = arg.engine().config();
        assert_eq!((config.width, config.height), (12, 24));
        assert_eq!(config.base_drop_interval, Duration::from_millis(500));
        assert_eq!(config.color_policy, ColorPolicy::ByKind);
        assert_eq!(
            arg.engine().seed().to_string(),
            "000102030405060708090a0b0c0d0e0f"
        );
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let result = CommandArgs::try_parse_from(["blockfall", "play", "--seed", "xyz"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tiny_board_fails_to_start() {
        let arg = EngineArg {
            width: 2,
            ..EngineArg::default()
        };
        let err = arg.new_game().unwrap_err();
        assert!(err.to_string().contains("at least 4x4"), "{err}");
    }
}
