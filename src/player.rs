//! The player: one ledger, one session and the engines that settle it
//!
//! `Player` is the whole in-process interface a presentation layer needs.
//! Calls must be serialized by the caller; nothing here locks.

use crate::config::GameConfig;
use crate::errors::{ArcadeResult, GameResult, SessionError};
use crate::games::keno::KenoPicks;
use crate::games::processor::GameProcessor;
use crate::games::types::{GameRecord, GameTally, GameType, Multiplier, PlayCommand};
use crate::ledger::Ledger;
use crate::session::{SessionEvent, SessionState};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What the presentation layer should show after an event
#[derive(Debug, Clone)]
pub enum Reply {
    /// Input accepted; the session is now in this state
    Prompt(SessionState),
    /// A round was played
    Settled(GameRecord),
    /// The in-progress game was abandoned
    Cancelled,
}

/// Per-game running totals for the current process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub keno: GameTally,
    pub crash: GameTally,
}

impl PlayerStats {
    pub fn tally(&self, game: GameType) -> &GameTally {
        match game {
            GameType::Keno => &self.keno,
            GameType::Crash => &self.crash,
        }
    }

    fn record(&mut self, record: &GameRecord) {
        match record.game_type {
            GameType::Keno => self.keno.record(&record.round),
            GameType::Crash => self.crash.record(&record.round),
        }
    }
}

/// Owned state for the single player
pub struct Player {
    config: GameConfig,
    ledger: Ledger,
    session: SessionState,
    processor: GameProcessor,
    stats: PlayerStats,
}

impl Player {
    pub fn new(config: GameConfig) -> Self {
        Self {
            ledger: Ledger::new(config.ledger.starting_balance),
            session: SessionState::Idle,
            processor: GameProcessor::new(&config),
            stats: PlayerStats::default(),
            config,
        }
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Largest bet the player may place right now
    pub fn max_bet(&self) -> u64 {
        self.config.betting.max_allowed(self.balance())
    }

    /// Feed one input event through the session. Rejected input leaves both
    /// the session and the ledger unchanged.
    pub fn handle<R: Rng + ?Sized>(&mut self, event: SessionEvent, rng: &mut R) -> ArcadeResult<Reply> {
        let was_active = !self.session.is_idle();
        let is_cancel = event == SessionEvent::Cancel;
        let transition = self.session.step(event, &self.config, self.balance())?;

        let reply = match transition.command {
            Some(command) => {
                let record = self.settle(&command, rng).map_err(|e| SessionError::Rejected {
                    game: command.game_type(),
                    source: e,
                })?;
                Reply::Settled(record)
            }
            None if is_cancel && was_active => Reply::Cancelled,
            None => Reply::Prompt(transition.state.clone()),
        };

        self.session = transition.state;
        Ok(reply)
    }

    /// Play a Keno round directly, bypassing the session
    pub fn play_keno<R: Rng + ?Sized>(
        &mut self,
        bet_amount: u64,
        picks: KenoPicks,
        rng: &mut R,
    ) -> ArcadeResult<GameRecord> {
        let command = PlayCommand::Keno { bet_amount, picks };
        Ok(self.settle(&command, rng)?)
    }

    /// Play a Crash round directly, bypassing the session
    pub fn play_crash<R: Rng + ?Sized>(
        &mut self,
        bet_amount: u64,
        target: Multiplier,
        rng: &mut R,
    ) -> ArcadeResult<GameRecord> {
        let command = PlayCommand::Crash { bet_amount, target };
        Ok(self.settle(&command, rng)?)
    }

    fn settle<R: Rng + ?Sized>(
        &mut self,
        command: &PlayCommand,
        rng: &mut R,
    ) -> GameResult<GameRecord> {
        let record = self.processor.process(&mut self.ledger, command, rng)?;
        self.stats.record(&record);
        Ok(record)
    }
}
