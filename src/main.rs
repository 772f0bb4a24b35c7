//! gamebot - Keno & Crash against fake credits
//!
//! Interactive console front end plus batch simulation.

use clap::{Parser, Subcommand};
use gamebot::config::{generate_sample_config, ConfigLoader, GameConfig};
use gamebot::console::{self, ConsoleCommand};
use gamebot::games::keno::KenoPicks;
use gamebot::games::simulation::{SimulationReport, SimulationScenario, Simulator};
use gamebot::games::types::Multiplier;
use gamebot::player::Player;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gamebot")]
#[command(about = "Keno and Crash mini-games played with fake credits", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the random number generator (reproducible rounds)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactively on the console
    Play,

    /// Play many rounds and report return-to-player statistics
    Simulate {
        #[command(subcommand)]
        game: SimulateGame,

        /// Number of rounds to play
        #[arg(long, default_value = "10000", global = true)]
        rounds: u64,

        /// Bet per round
        #[arg(long, default_value = "10", global = true)]
        bet: u64,

        /// Print the report as JSON
        #[arg(long, global = true)]
        json: bool,
    },

    /// Write a sample configuration file
    InitConfig {
        /// Destination path
        #[arg(default_value = "gamebot.toml")]
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum SimulateGame {
    /// Keno with a fixed set of picks
    Keno {
        /// Comma-separated numbers, e.g. 1,5,9
        #[arg(long, value_delimiter = ',', default_value = "1,2,3,4,5")]
        picks: Vec<u8>,
    },
    /// Crash with a fixed cash-out target
    Crash {
        /// Cash-out multiplier, e.g. 2.0
        #[arg(long, default_value = "2.0")]
        target: Multiplier,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let command = match args.command {
        Some(Command::InitConfig { path }) => {
            generate_sample_config(&path.to_string_lossy())?;
            println!("Sample configuration written to {}", path.display());
            return Ok(());
        }
        other => other,
    };

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    init_logging(&config);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match command {
        Some(Command::Simulate {
            game,
            rounds,
            bet,
            json,
        }) => {
            let scenario = match game {
                SimulateGame::Keno { picks } => SimulationScenario::Keno {
                    picks: KenoPicks::from_numbers(picks)?,
                    bet_amount: bet,
                    rounds,
                },
                SimulateGame::Crash { target } => SimulationScenario::Crash {
                    target,
                    bet_amount: bet,
                    rounds,
                },
            };
            let report = Simulator::new(&config).run(&scenario, &mut rng)?;
            print_report(&report, json)?;
        }
        _ => run_console(config, &mut rng).await?,
    }

    Ok(())
}

fn init_logging(config: &GameConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_console(config: GameConfig, rng: &mut StdRng) -> Result<(), Box<dyn std::error::Error>> {
    let mut player = Player::new(config);
    info!(balance = player.balance(), "console session started");
    println!("{}", console::welcome(&player));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = console::parse_line(&line, player.session()) else {
            if !line.trim().is_empty() {
                println!("Unrecognised input. Type /help for commands.");
            }
            continue;
        };

        let output = match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Menu => console::welcome(&player),
            ConsoleCommand::Help => console::help(player.config()),
            ConsoleCommand::Balance => console::balance(&player),
            ConsoleCommand::Stats => console::stats(&player),
            ConsoleCommand::Event(event) => match player.handle(event, rng) {
                Ok(reply) => console::reply(&reply, &player),
                Err(e) => {
                    warn!(error = %e, "input rejected");
                    format!("{}\n{}", console::error(&e), console::prompt(player.session(), &player))
                }
            },
        };
        println!("{}\n", output);
    }

    info!(balance = player.balance(), "console session ended");
    println!("Thanks for playing! Final balance: {} credits", player.balance());
    Ok(())
}

fn print_report(report: &SimulationReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Scenario:         {}", report.scenario);
    println!("Rounds:           {}", report.rounds);
    println!("Wins / pushes:    {} / {}", report.wins, report.pushes);
    println!("Win rate:         {:.2}%", report.win_rate * 100.0);
    println!("Total bet:        {}", report.total_bet);
    println!("Total payout:     {}", report.total_payout);
    println!("Return to player: {:.2}%", report.return_to_player * 100.0);
    println!("House edge:       {:.2}%", report.house_edge * 100.0);
    println!("Refills:          {}", report.refills);
    println!("Elapsed:          {:?}", report.execution_time);
    Ok(())
}
