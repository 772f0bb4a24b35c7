//! Crash engine
//!
//! The player names a cash-out target before launch. A crash point is drawn
//! from a tiered, piecewise-uniform distribution; the round wins when the
//! target does not exceed the crash point.

use crate::config::{BettingConfig, CrashConfig};
use crate::errors::{GameResult, SelectionError};
use crate::games::types::{net_result, Multiplier};
use crate::ledger::Ledger;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One band of the crash point distribution. A draw `u` lands in the first
/// tier whose `cumulative` exceeds it, then the crash point is uniform in
/// `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrashTier {
    pub cumulative: f64,
    pub low: f64,
    pub high: f64,
}

impl CrashTier {
    pub const fn new(cumulative: f64, low: f64, high: f64) -> Self {
        Self {
            cumulative,
            low,
            high,
        }
    }

    /// Map `v` in `[0, 1)` into this tier, rounded to hundredths and kept
    /// strictly below `high`
    fn sample(&self, v: f64) -> Multiplier {
        let value = self.low + v * (self.high - self.low);
        let ceiling = ((self.high * 100.0).ceil() as u32).saturating_sub(1);
        let hundredths = ((value * 100.0).round() as u32).min(ceiling);
        Multiplier::from_hundredths(hundredths)
    }
}

/// Crash point for two uniform inputs in `[0, 1)`: `u` picks the tier, `v`
/// the position inside it
pub fn crash_point(tiers: &[CrashTier], u: f64, v: f64) -> Multiplier {
    let tier = tiers
        .iter()
        .find(|tier| u < tier.cumulative)
        .or_else(|| tiers.last());
    match tier {
        Some(tier) => tier.sample(v),
        None => Multiplier::ONE,
    }
}

/// Result of one Crash round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashOutcome {
    pub target: Multiplier,
    pub crash_point: Multiplier,
    pub won: bool,
    pub bet_amount: u64,
    pub winnings: u64,
    pub net: i64,
}

/// Validates, draws and settles Crash rounds against a ledger
#[derive(Debug, Clone)]
pub struct CrashEngine {
    betting: BettingConfig,
    config: CrashConfig,
}

impl CrashEngine {
    pub fn new(betting: BettingConfig, config: CrashConfig) -> Self {
        Self { betting, config }
    }

    pub fn config(&self) -> &CrashConfig {
        &self.config
    }

    /// Check that a target lies in the configured range
    pub fn validate_target(&self, target: Multiplier) -> Result<(), SelectionError> {
        self.config.check_target(target)
    }

    /// Check a bet and target without touching the ledger
    pub fn validate(&self, bet_amount: u64, target: Multiplier, balance: u64) -> GameResult<()> {
        self.betting.validate(bet_amount, balance)?;
        self.validate_target(target)?;
        Ok(())
    }

    /// Draw a crash point from the configured tiers
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Multiplier {
        let u: f64 = rng.gen();
        let v: f64 = rng.gen();
        crash_point(&self.config.tiers, u, v)
    }

    /// Play one round: validate, debit, draw, credit winnings
    pub fn play<R: Rng + ?Sized>(
        &self,
        ledger: &mut Ledger,
        bet_amount: u64,
        target: Multiplier,
        rng: &mut R,
    ) -> GameResult<CrashOutcome> {
        self.validate(bet_amount, target, ledger.balance())?;
        ledger.debit(bet_amount);
        let crash_point = self.draw(rng);
        Ok(self.pay_out(ledger, bet_amount, target, crash_point))
    }

    /// Settle a round against a known crash point
    pub fn settle(
        &self,
        ledger: &mut Ledger,
        bet_amount: u64,
        target: Multiplier,
        crash_point: Multiplier,
    ) -> GameResult<CrashOutcome> {
        self.validate(bet_amount, target, ledger.balance())?;
        ledger.debit(bet_amount);
        Ok(self.pay_out(ledger, bet_amount, target, crash_point))
    }

    fn pay_out(
        &self,
        ledger: &mut Ledger,
        bet_amount: u64,
        target: Multiplier,
        crash_point: Multiplier,
    ) -> CrashOutcome {
        let won = target <= crash_point;
        let winnings = if won { target.apply(bet_amount) } else { 0 };

        if winnings > 0 {
            ledger.credit(winnings);
        }

        debug!(%target, %crash_point, won, winnings, "crash round settled");

        CrashOutcome {
            target,
            crash_point,
            won,
            bet_amount,
            winnings,
            net: net_result(bet_amount, winnings),
        }
    }
}
