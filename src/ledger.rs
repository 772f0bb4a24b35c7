//! Credit ledger
//!
//! Holds the player's fake credit balance. Balances never go below zero: a
//! debit larger than the balance clamps to 0 instead of failing.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// In-memory credit balance for the single player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balance: u64,
}

impl Ledger {
    /// Create a ledger holding `starting_balance` credits
    pub fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
        }
    }

    /// Current balance
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Apply a signed delta, clamping at zero
    pub fn apply_delta(&mut self, delta: i64) {
        if delta >= 0 {
            self.credit(delta as u64);
        } else {
            self.debit(delta.unsigned_abs());
        }
    }

    /// Remove credits, clamping at zero
    pub fn debit(&mut self, amount: u64) {
        if amount > self.balance {
            warn!(
                balance = self.balance,
                amount, "debit exceeds balance, clamping to zero"
            );
        }
        self.balance = self.balance.saturating_sub(amount);
    }

    /// Add credits
    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Whether a bet of `amount` can be covered without clamping
    pub fn can_cover(&self, amount: u64) -> bool {
        amount <= self.balance
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_apply_delta_credits_and_debits() {
        let mut ledger = Ledger::new(1000);
        ledger.apply_delta(-100);
        assert_eq!(ledger.balance(), 900);
        ledger.apply_delta(250);
        assert_eq!(ledger.balance(), 1150);
    }

    #[test]
    fn test_debit_clamps_at_zero() {
        let mut ledger = Ledger::new(40);
        ledger.apply_delta(-100);
        assert_eq!(ledger.balance(), 0);

        ledger.apply_delta(i64::MIN);
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_credit_saturates() {
        let mut ledger = Ledger::new(u64::MAX - 1);
        ledger.apply_delta(i64::MAX);
        assert_eq!(ledger.balance(), u64::MAX);
    }

    #[test]
    fn test_balance_is_idempotent() {
        let ledger = Ledger::new(1000);
        assert_eq!(ledger.balance(), ledger.balance());
    }

    #[test]
    fn test_random_deltas_never_go_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ledger = Ledger::new(1000);
        let mut expected: i128 = 1000;

        for _ in 0..10_000 {
            let delta: i64 = rng.gen_range(-2_000..2_000);
            ledger.apply_delta(delta);
            expected = (expected + delta as i128).max(0);
            assert_eq!(ledger.balance() as i128, expected);
        }
    }

    #[test]
    fn test_can_cover() {
        let ledger = Ledger::new(100);
        assert!(ledger.can_cover(100));
        assert!(!ledger.can_cover(101));
    }
}
