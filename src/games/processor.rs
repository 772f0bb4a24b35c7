//! Dispatches a complete play command to the matching engine and stamps the
//! settled round with an id and timestamp.

use crate::config::GameConfig;
use crate::errors::GameResult;
use crate::games::crash::CrashEngine;
use crate::games::keno::KenoEngine;
use crate::games::types::{GameRecord, PlayCommand, RoundOutcome};
use crate::ledger::Ledger;
use rand::Rng;
use tracing::info;

/// Routes a ready round to its engine and records the result
#[derive(Debug, Clone)]
pub struct GameProcessor {
    keno: KenoEngine,
    crash: CrashEngine,
}

impl GameProcessor {
    /// Create a new game processor
    pub fn new(config: &GameConfig) -> Self {
        Self {
            keno: KenoEngine::new(config.betting.clone(), config.keno.clone()),
            crash: CrashEngine::new(config.betting.clone(), config.crash.clone()),
        }
    }

    pub fn keno(&self) -> &KenoEngine {
        &self.keno
    }

    pub fn crash(&self) -> &CrashEngine {
        &self.crash
    }

    /// Play the round described by `command` and generate its record
    pub fn process<R: Rng + ?Sized>(
        &self,
        ledger: &mut Ledger,
        command: &PlayCommand,
        rng: &mut R,
    ) -> GameResult<GameRecord> {
        let round = match command {
            PlayCommand::Keno { bet_amount, picks } => {
                RoundOutcome::Keno(self.keno.play(ledger, *bet_amount, picks, rng)?)
            }
            PlayCommand::Crash { bet_amount, target } => {
                RoundOutcome::Crash(self.crash.play(ledger, *bet_amount, *target, rng)?)
            }
        };

        let record = GameRecord::new(round, ledger.balance());
        info!(
            game_id = %record.game_id,
            game = %record.game_type,
            bet = record.round.bet_amount(),
            winnings = record.round.winnings(),
            balance = record.balance_after,
            "round settled"
        );
        Ok(record)
    }
}
