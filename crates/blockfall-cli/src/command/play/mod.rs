use crate::{command::EngineArg, tui::Runtime};

use self::app::PlayApp;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    engine: EngineArg,
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    no_ghost: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let (state, seed) = arg.engine.new_game()?;
    let mut app = PlayApp::new(state, !arg.no_ghost);

    Runtime::new().run(&mut app)?;

    let state = app.state();
    println!(
        "seed {seed}: score {}, level {}, lines {}",
        state.score(),
        state.level(),
        state.lines_cleared()
    );
    Ok(())
}
