//! Keno engine
//!
//! The player picks up to `max_picks` numbers from `1..=total_numbers`; the
//! house draws `drawn_numbers` distinct numbers and pays by match count.

use crate::config::{BettingConfig, KenoConfig};
use crate::errors::{GameResult, SelectionError};
use crate::games::types::net_result;
use crate::ledger::Ledger;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// The player's chosen numbers, kept sorted and unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KenoPicks(BTreeSet<u8>);

impl KenoPicks {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Build from a list, rejecting repeated numbers
    pub fn from_numbers<I: IntoIterator<Item = u8>>(numbers: I) -> Result<Self, SelectionError> {
        let mut picks = BTreeSet::new();
        for n in numbers {
            if !picks.insert(n) {
                return Err(SelectionError::DuplicatePick(n));
            }
        }
        Ok(Self(picks))
    }

    /// Add `number` if absent, remove it if present. Returns whether the number
    /// is selected afterwards.
    pub fn toggle(&mut self, number: u32, config: &KenoConfig) -> Result<bool, SelectionError> {
        let number = check_range(number, config)?;
        if self.0.remove(&number) {
            return Ok(false);
        }
        if self.0.len() >= config.max_picks as usize {
            return Err(SelectionError::TooManyPicks {
                count: self.0.len() + 1,
                max: config.max_picks as usize,
            });
        }
        self.0.insert(number);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.contains(&number)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Check count and range against the board
    pub fn validate(&self, config: &KenoConfig) -> Result<(), SelectionError> {
        if self.0.is_empty() {
            return Err(SelectionError::NoPicks);
        }
        if self.0.len() > config.max_picks as usize {
            return Err(SelectionError::TooManyPicks {
                count: self.0.len(),
                max: config.max_picks as usize,
            });
        }
        self.iter()
            .try_for_each(|n| check_range(u32::from(n), config).map(|_| ()))
    }
}

/// `number` as a board position, if it lies in `1..=total_numbers`
fn check_range(number: u32, config: &KenoConfig) -> Result<u8, SelectionError> {
    match u8::try_from(number) {
        Ok(n) if n >= 1 && n <= config.total_numbers => Ok(n),
        _ => Err(SelectionError::PickOutOfRange {
            pick: number,
            max: config.total_numbers,
        }),
    }
}

/// Result of one Keno round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KenoOutcome {
    pub picks: Vec<u8>,
    pub drawn: Vec<u8>,
    pub matches: Vec<u8>,
    pub match_count: usize,
    pub payout_multiplier: u64,
    pub bet_amount: u64,
    pub winnings: u64,
    pub net: i64,
}

/// Validates, draws and settles Keno rounds against a ledger
#[derive(Debug, Clone)]
pub struct KenoEngine {
    betting: BettingConfig,
    config: KenoConfig,
}

impl KenoEngine {
    pub fn new(betting: BettingConfig, config: KenoConfig) -> Self {
        Self { betting, config }
    }

    pub fn config(&self) -> &KenoConfig {
        &self.config
    }

    /// Payout multiplier for a match count; counts past the table use the
    /// last entry
    pub fn payout_multiplier(&self, match_count: usize) -> u64 {
        self.config
            .payouts
            .get(match_count)
            .or_else(|| self.config.payouts.last())
            .copied()
            .unwrap_or(0)
    }

    /// Check a bet and picks without touching the ledger
    pub fn validate(&self, bet_amount: u64, picks: &KenoPicks, balance: u64) -> GameResult<()> {
        self.betting.validate(bet_amount, balance)?;
        picks.validate(&self.config)?;
        Ok(())
    }

    /// Uniformly random `drawn_numbers`-subset of the board, sorted
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u8> {
        let mut drawn: Vec<u8> = index::sample(
            rng,
            self.config.total_numbers as usize,
            self.config.drawn_numbers as usize,
        )
        .into_iter()
        .map(|i| i as u8 + 1)
        .collect();
        drawn.sort_unstable();
        drawn
    }

    /// Play one round: validate, debit, draw, credit winnings
    pub fn play<R: Rng + ?Sized>(
        &self,
        ledger: &mut Ledger,
        bet_amount: u64,
        picks: &KenoPicks,
        rng: &mut R,
    ) -> GameResult<KenoOutcome> {
        self.validate(bet_amount, picks, ledger.balance())?;
        ledger.debit(bet_amount);
        let drawn = self.draw(rng);
        Ok(self.pay_out(ledger, bet_amount, picks, drawn))
    }

    /// Settle a round against a known draw. The draw must have exactly
    /// `drawn_numbers` distinct numbers on the board.
    pub fn settle(
        &self,
        ledger: &mut Ledger,
        bet_amount: u64,
        picks: &KenoPicks,
        drawn: &[u8],
    ) -> GameResult<KenoOutcome> {
        self.validate(bet_amount, picks, ledger.balance())?;
        let drawn = self.check_draw(drawn)?;
        ledger.debit(bet_amount);
        Ok(self.pay_out(ledger, bet_amount, picks, drawn))
    }

    /// Sorted copy of `drawn` if it is a legal draw for this board
    fn check_draw(&self, drawn: &[u8]) -> Result<Vec<u8>, SelectionError> {
        let mut sorted = drawn.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let on_board = sorted
            .iter()
            .all(|&n| n >= 1 && n <= self.config.total_numbers);
        if !on_board || sorted.len() != drawn.len() || drawn.len() != self.config.drawn_numbers as usize {
            return Err(SelectionError::MalformedDraw {
                drawn: drawn.to_vec(),
                expected: self.config.drawn_numbers,
                max: self.config.total_numbers,
            });
        }
        Ok(sorted)
    }

    fn pay_out(&self, ledger: &mut Ledger, bet_amount: u64, picks: &KenoPicks, drawn: Vec<u8>) -> KenoOutcome {
        let matches: Vec<u8> = picks.iter().filter(|n| drawn.binary_search(n).is_ok()).collect();
        let match_count = matches.len();
        let payout_multiplier = self.payout_multiplier(match_count);
        let winnings = bet_amount.saturating_mul(payout_multiplier);

        if winnings > 0 {
            ledger.credit(winnings);
        }

        debug!(match_count, payout_multiplier, winnings, "keno round settled");

        KenoOutcome {
            picks: picks.iter().collect(),
            drawn,
            matches,
            match_count,
            payout_multiplier,
            bet_amount,
            winnings,
            net: net_result(bet_amount, winnings),
        }
    }
}
