mod autopilot;
mod config;

use clap::{Parser, ValueEnum};
use snake_arcade_common::games::SessionRng;
use snake_arcade_common::games::snake::{
    HostCommand, Mode, SnakeGameState, SnakeSession, YamlHighScoreStore,
};
use snake_arcade_common::{log, logger};

use autopilot::play_run;
use config::{CONFIG_FILE, get_config_manager};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Classic,
    Portal,
    Obstacles,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => Mode::Classic,
            ModeArg::Portal => Mode::Portal,
            ModeArg::Obstacles => Mode::Obstacles,
        }
    }
}

#[derive(Parser)]
#[command(name = "snake_arcade_headless")]
struct Args {
    /// Overrides `default_mode` from the config file.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = CONFIG_FILE)]
    config: String,

    #[arg(long, default_value_t = 1)]
    runs: u32,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Headless".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = get_config_manager(&args.config).get_config()?;
    let mode = args.mode.map(Mode::from).unwrap_or(config.default_mode);
    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Playing {} run(s) in {} mode with seed {}", args.runs, mode, rng.seed());

    let store = YamlHighScoreStore::from_file(&config.high_score_file);
    let state = SnakeGameState::new(config.game.clone(), Box::new(store), rng)?;
    let (handle, mut events, session_task) = SnakeSession::spawn(state);

    handle.send(HostCommand::SelectMode(mode))?;
    if !config.sound_enabled {
        handle.send(HostCommand::ToggleSound)?;
    }

    let games = async {
        let mut best = 0;
        for run in 1..=args.runs {
            let summary = play_run(&handle, &mut events).await?;
            log!("Run {}/{} finished with score {}", run, args.runs, summary.score);
            best = best.max(summary.score);
        }
        Ok::<u32, String>(best)
    };

    tokio::select! {
        result = games => {
            let best = result?;
            log!("Best score this session: {}", best);
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            log!("Interrupted, stopping the session");
        }
    }

    handle.send(HostCommand::Shutdown)?;
    let final_state = session_task.await?;
    log!("High score: {}", final_state.snapshot().high_score);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_arg_maps_onto_game_mode() {
        assert_eq!(Mode::from(ModeArg::Classic), Mode::Classic);
        assert_eq!(Mode::from(ModeArg::Portal), Mode::Portal);
        assert_eq!(Mode::from(ModeArg::Obstacles), Mode::Obstacles);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "snake_arcade_headless",
            "--mode",
            "portal",
            "--seed",
            "7",
            "--runs",
            "3",
        ]);
        assert_eq!(args.mode, Some(ModeArg::Portal));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.runs, 3);
        assert_eq!(args.config, CONFIG_FILE);
        assert!(!args.use_log_prefix);
    }
}
