use std::{path::PathBuf, time::Duration};

use blockfall_engine::{Action, EngineConfig, GameEvent, GameSeed, GameState, Phase, Snapshot};
use log::{LevelFilter, info};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::EngineArg, logger, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    engine: EngineArg,
    /// Stop after this many frames even if the game is still running
    #[arg(long, default_value_t = 100_000)]
    max_frames: u64,
    /// Simulated time per frame, in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// The player acts once every this many frames
    #[arg(long, default_value_t = 6)]
    think_frames: u64,
    /// Include the final snapshot in the summary
    #[arg(long)]
    snapshot: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print engine log records to stderr
    #[arg(long, short)]
    verbose: bool,
}

impl SimulateArg {
    #[cfg(test)]
    pub(crate) fn engine(&self) -> &EngineArg {
        &self.engine
    }

    fn options(&self) -> SimulationOptions {
        SimulationOptions {
            max_frames: self.max_frames,
            frame: Duration::from_millis(self.frame_ms),
            think_frames: self.think_frames.max(1),
            include_snapshot: self.snapshot,
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    if arg.verbose {
        logger::init(LevelFilter::Debug)?;
    }

    let seed = arg.engine.seed();
    let summary = simulate(arg.engine.config(), seed, &arg.options())?;
    info!(
        "simulation finished after {} frames: {:?}",
        summary.frames, summary.phase
    );

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    output.write_json(&summary)?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct SimulationOptions {
    max_frames: u64,
    frame: Duration,
    think_frames: u64,
    include_snapshot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SimulationSummary {
    seed: GameSeed,
    frames: u64,
    simulated_ms: u64,
    phase: Phase,
    score: u64,
    level: usize,
    lines_cleared: usize,
    pieces: usize,
    /// Locks by number of rows cleared, 0 through 4.
    line_clears: [usize; 5],
    events: EventTally,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<Snapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
struct EventTally {
    moves: usize,
    rotations: usize,
    soft_drops: usize,
    hard_drops: usize,
    holds: usize,
    locks: usize,
    level_ups: usize,
}

impl EventTally {
    fn record(&mut self, event: GameEvent) {
        match event {
            GameEvent::Moved => self.moves += 1,
            GameEvent::Rotated => self.rotations += 1,
            GameEvent::SoftDropped => self.soft_drops += 1,
            GameEvent::HardDropped { .. } => self.hard_drops += 1,
            GameEvent::Held => self.holds += 1,
            GameEvent::Locked => self.locks += 1,
            GameEvent::LevelUp(_) => self.level_ups += 1,
            GameEvent::LinesCleared(_)
            | GameEvent::GameOver
            | GameEvent::Paused
            | GameEvent::Resumed
            | GameEvent::Restarted => {}
        }
    }
}

/// Picks the scripted player's next input.
fn choose_action(rng: &mut Pcg32) -> Action {
    match rng.random_range(0..100) {
        0..30 => Action::MoveLeft,
        30..60 => Action::MoveRight,
        60..78 => Action::Rotate,
        78..83 => Action::Hold,
        83..90 => Action::SoftDrop,
        _ => Action::HardDrop,
    }
}

/// Plays one game at a fixed frame step until game over or the frame limit.
fn simulate(
    config: EngineConfig,
    seed: GameSeed,
    options: &SimulationOptions,
) -> anyhow::Result<SimulationSummary> {
    let mut state = GameState::with_seed(config, seed)?;
    // Inverted seed bytes select a different PCG stream than the piece generator.
    let mut player = Pcg32::from_seed(seed.to_bytes().map(|b| !b));
    let mut events = EventTally::default();

    let mut frames = 0;
    while frames < options.max_frames && !state.phase().is_game_over() {
        if frames % options.think_frames == 0 {
            for event in state.perform(choose_action(&mut player)) {
                events.record(event);
            }
        }
        for event in state.perform(Action::Tick(options.frame)) {
            events.record(event);
        }
        frames += 1;
    }

    let stats = state.stats();
    Ok(SimulationSummary {
        seed,
        frames,
        simulated_ms: u64::try_from(options.frame.as_millis())
            .unwrap_or(u64::MAX)
            .saturating_mul(frames),
        phase: state.phase(),
        score: state.score(),
        level: state.level(),
        lines_cleared: state.lines_cleared(),
        pieces: stats.completed_pieces(),
        line_clears: *stats.line_cleared_counter(),
        events,
        snapshot: options.include_snapshot.then(|| state.snapshot()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: GameSeed = GameSeed::from_bytes([
        0xC0, 0xFF, 0xEE, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB,
        0xCC,
    ]);

    fn options() -> SimulationOptions {
        SimulationOptions {
            max_frames: 50_000,
            frame: Duration::from_millis(16),
            think_frames: 6,
            include_snapshot: false,
        }
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let a = simulate(EngineConfig::default(), SEED, &options()).unwrap();
        let b = simulate(EngineConfig::default(), SEED, &options()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulation_runs_to_game_over() {
        let summary = simulate(EngineConfig::default(), SEED, &options()).unwrap();
        assert_eq!(summary.phase, Phase::GameOver);
        assert!(summary.frames < 50_000);
        assert!(summary.pieces > 0);
        assert_eq!(summary.events.locks, summary.pieces);
        assert_eq!(summary.line_clears.iter().sum::<usize>(), summary.pieces);
        assert_eq!(summary.level, summary.lines_cleared / 10 + 1);
    }

    #[test]
    fn test_frame_limit_stops_simulation() {
        let options = SimulationOptions {
            max_frames: 10,
            ..options()
        };
        let summary = simulate(EngineConfig::default(), SEED, &options).unwrap();
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.simulated_ms, 160);
        assert_eq!(summary.phase, Phase::Running);
    }

    #[test]
    fn test_summary_json() {
        let options = SimulationOptions {
            max_frames: 100,
            include_snapshot: true,
            ..options()
        };
        let summary = simulate(EngineConfig::default(), SEED, &options).unwrap();
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["seed"], "c0ffee00112233445566778899aabbcc");
        assert!(value["snapshot"]["board"].is_array());
        assert!(value["events"]["moves"].is_u64());

        let summary = simulate(EngineConfig::default(), SEED, &self::options()).unwrap();
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("snapshot").is_none());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = EngineConfig {
            height: 3,
            ..EngineConfig::default()
        };
        assert!(simulate(config, SEED, &options()).is_err());
    }
}
