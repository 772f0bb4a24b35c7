//! Batch simulation
//!
//! Plays many rounds of one game with fixed inputs and reports long-run
//! statistics (win rate, return to player, house edge). The ledger is
//! refilled to the starting balance whenever it can no longer cover the bet.

use crate::config::GameConfig;
use crate::errors::ArcadeResult;
use crate::games::keno::KenoPicks;
use crate::games::processor::GameProcessor;
use crate::games::types::{GameTally, GameType, Multiplier, PlayCommand};
use crate::ledger::Ledger;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// What to simulate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationScenario {
    Keno {
        picks: KenoPicks,
        bet_amount: u64,
        rounds: u64,
    },
    Crash {
        target: Multiplier,
        bet_amount: u64,
        rounds: u64,
    },
}

impl SimulationScenario {
    fn rounds(&self) -> u64 {
        match self {
            SimulationScenario::Keno { rounds, .. } | SimulationScenario::Crash { rounds, .. } => *rounds,
        }
    }

    fn command(&self) -> PlayCommand {
        match self {
            SimulationScenario::Keno { picks, bet_amount, .. } => PlayCommand::Keno {
                bet_amount: *bet_amount,
                picks: picks.clone(),
            },
            SimulationScenario::Crash { target, bet_amount, .. } => PlayCommand::Crash {
                bet_amount: *bet_amount,
                target: *target,
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            SimulationScenario::Keno { picks, bet_amount, rounds } => format!(
                "keno: {} picks, bet {}, {} rounds",
                picks.len(),
                bet_amount,
                rounds
            ),
            SimulationScenario::Crash { target, bet_amount, rounds } => {
                format!("crash: target {}, bet {}, {} rounds", target, bet_amount, rounds)
            }
        }
    }
}

/// Aggregate results of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub game_type: GameType,
    pub rounds: u64,
    pub wins: u64,
    pub pushes: u64,
    pub total_bet: u64,
    pub total_payout: u64,
    pub win_rate: f64,
    pub return_to_player: f64,
    pub house_edge: f64,
    pub refills: u64,
    pub final_balance: u64,
    pub execution_time: Duration,
}

/// Runs simulation scenarios on a private ledger
pub struct Simulator {
    processor: GameProcessor,
    starting_balance: u64,
}

impl Simulator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            processor: GameProcessor::new(config),
            starting_balance: config.ledger.starting_balance,
        }
    }

    /// Execute a scenario and return its report
    pub fn run<R: Rng + ?Sized>(
        &self,
        scenario: &SimulationScenario,
        rng: &mut R,
    ) -> ArcadeResult<SimulationReport> {
        let start_time = Instant::now();
        let command = scenario.command();
        let bet_amount = command.bet_amount();
        let mut ledger = Ledger::new(self.starting_balance);
        let mut tally = GameTally::default();
        let mut refills = 0;

        for _ in 0..scenario.rounds() {
            if !ledger.can_cover(bet_amount) {
                ledger = Ledger::new(self.starting_balance);
                refills += 1;
            }
            let record = self.processor.process(&mut ledger, &command, rng)?;
            tally.record(&record.round);
        }

        let report = SimulationReport {
            scenario: scenario.describe(),
            game_type: command.game_type(),
            rounds: tally.rounds,
            wins: tally.wins,
            pushes: tally.pushes,
            total_bet: tally.wagered,
            total_payout: tally.paid_out,
            win_rate: tally.win_rate(),
            return_to_player: tally.return_to_player(),
            house_edge: tally.house_edge(),
            refills,
            final_balance: ledger.balance(),
            execution_time: start_time.elapsed(),
        };

        info!(
            scenario = %report.scenario,
            rtp = report.return_to_player,
            win_rate = report.win_rate,
            "simulation finished"
        );
        Ok(report)
    }
}
