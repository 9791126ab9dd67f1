mod simulation;

use std::process;

use blackjack_drivers::{
    load_saved_state, parse_config_from_file, save_state, ConfigError, SavedState,
};
use blackjack_engine::{Bankroll, GameStats, Ledger, Rule};
use clap::Parser;
use tracing::{error, info, Level};

use self::simulation::{run_simulation, SimulationSettings};

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Number of rounds to play, overriding the config file
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Seed for the shoe, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum log level
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn resolve_config_path(config: String) -> Result<String, ConfigError> {
    if config != DEFAULT_CONFIG_PATH {
        return Ok(config);
    }
    let home_dir = home::home_dir().ok_or(ConfigError::InvalidValue {
        field: "config",
        message: String::from("cannot find home directory"),
    })?;
    let config_file_path = home_dir.join(".blackjack.yml");
    if config_file_path.is_dir() {
        return Err(ConfigError::InvalidValue {
            field: "config",
            message: String::from("this should be a file rather than a directory"),
        });
    }
    config_file_path
        .to_str()
        .map(String::from)
        .ok_or(ConfigError::InvalidValue {
            field: "config",
            message: String::from("config path is not valid UTF-8"),
        })
}

fn run(args: CommandLineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(args.config)?;
    let config = parse_config_from_file(&config_path)?;
    info!(path = %config_path, "config loaded");

    let rule: Rule = config.rule.try_into()?;
    let simulator = config.table_simulator;
    let settings = SimulationSettings {
        rounds: args.rounds.unwrap_or(simulator.rounds),
        bet: simulator.bet,
        seed: args.seed.or(simulator.seed),
        strategy: simulator.strategy_kind()?,
        insurance: simulator.insurance_policy()?,
    };

    let mut state = match &simulator.stats_path {
        Some(path) => load_saved_state(path, simulator.starting_balance)?,
        None => SavedState {
            balance: simulator.starting_balance,
            stats: GameStats::default(),
        },
    };
    let mut bankroll = Bankroll::new(state.balance);

    let report = run_simulation(&rule, &settings, &mut bankroll, &mut state.stats)?;
    info!(
        rounds = report.rounds_played,
        wagered = report.total_wagered,
        credited = report.total_credited,
        splits = report.splits,
        burned_cards = report.burned_cards,
        starting_balance = report.starting_balance,
        final_balance = bankroll.current_balance(),
        "simulation finished"
    );
    info!(
        wins = state.stats.wins,
        losses = state.stats.losses,
        pushes = state.stats.pushes,
        busts = state.stats.busts,
        player_blackjacks = state.stats.player_blackjacks,
        dealer_blackjacks = state.stats.dealer_blackjacks,
        win_percentage = %format!("{:.2}", state.stats.win_percentage()),
        "statistics"
    );

    if let Some(path) = &simulator.stats_path {
        state.balance = bankroll.current_balance();
        save_state(path, &state)?;
        info!(path = %path, "state saved");
    }
    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse();
    init_logging(args.log_level);

    if let Err(err) = run(args) {
        error!("{}", err);
        process::exit(1);
    }
}
