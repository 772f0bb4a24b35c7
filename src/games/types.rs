//! Shared game types: game kinds, fixed-point multipliers, play commands and
//! round records.

use crate::errors::SelectionError;
use crate::games::crash::CrashOutcome;
use crate::games::keno::{KenoOutcome, KenoPicks};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Keno,
    Crash,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Keno => write!(f, "keno"),
            GameType::Crash => write!(f, "crash"),
        }
    }
}

/// Payout multiplier in fixed-point hundredths (`250` is `2.50x`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Multiplier = Multiplier(100);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    /// Convert a float that is a whole number of hundredths. Anything finer is
    /// rejected rather than rounded.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = value * 100.0;
        let hundredths = scaled.round();
        if hundredths > u32::MAX as f64 || (scaled - hundredths).abs() > 1e-6 {
            return None;
        }
        Some(Self(hundredths as u32))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `floor(amount × self)`, exact
    pub fn apply(self, amount: u64) -> u64 {
        let scaled = amount as u128 * self.0 as u128 / 100;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Multiplier {
    type Err = SelectionError;

    /// Accepts `2.5`, `2.50x` and `2.5X`. At most two significant decimal
    /// places; `1.099` is malformed, not `1.10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || SelectionError::MalformedTarget(trimmed.to_string());
        let number = trimmed
            .strip_suffix('x')
            .or_else(|| trimmed.strip_suffix('X'))
            .unwrap_or(trimmed)
            .trim();

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(malformed());
        }
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > 2 {
            return Err(malformed());
        }

        let whole: u32 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| malformed())?
        };
        let cents: u32 = format!("{:0<2}", fraction).parse().map_err(|_| malformed())?;

        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .map(Multiplier)
            .ok_or_else(malformed)
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = SelectionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Multiplier::from_f64(value).ok_or_else(|| SelectionError::MalformedTarget(value.to_string()))
    }
}

impl From<Multiplier> for f64 {
    fn from(m: Multiplier) -> Self {
        m.as_f64()
    }
}

/// Game outcome from the player's point of view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Win,
    Push,
    Loss,
}

impl GameOutcome {
    pub fn from_net(net: i64) -> Self {
        match net {
            n if n > 0 => GameOutcome::Win,
            0 => GameOutcome::Push,
            _ => GameOutcome::Loss,
        }
    }
}

/// `winnings - bet` as a signed amount
pub fn net_result(bet_amount: u64, winnings: u64) -> i64 {
    let net = winnings as i128 - bet_amount as i128;
    net.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// A round whose inputs are complete and valid, ready for an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum PlayCommand {
    Keno { bet_amount: u64, picks: KenoPicks },
    Crash { bet_amount: u64, target: Multiplier },
}

impl PlayCommand {
    pub fn game_type(&self) -> GameType {
        match self {
            PlayCommand::Keno { .. } => GameType::Keno,
            PlayCommand::Crash { .. } => GameType::Crash,
        }
    }

    pub fn bet_amount(&self) -> u64 {
        match self {
            PlayCommand::Keno { bet_amount, .. } | PlayCommand::Crash { bet_amount, .. } => *bet_amount,
        }
    }
}

/// Game-specific outcome (discriminated union)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum RoundOutcome {
    Keno(KenoOutcome),
    Crash(CrashOutcome),
}

impl RoundOutcome {
    pub fn game_type(&self) -> GameType {
        match self {
            RoundOutcome::Keno(_) => GameType::Keno,
            RoundOutcome::Crash(_) => GameType::Crash,
        }
    }

    pub fn bet_amount(&self) -> u64 {
        match self {
            RoundOutcome::Keno(o) => o.bet_amount,
            RoundOutcome::Crash(o) => o.bet_amount,
        }
    }

    pub fn winnings(&self) -> u64 {
        match self {
            RoundOutcome::Keno(o) => o.winnings,
            RoundOutcome::Crash(o) => o.winnings,
        }
    }

    pub fn net(&self) -> i64 {
        match self {
            RoundOutcome::Keno(o) => o.net,
            RoundOutcome::Crash(o) => o.net,
        }
    }
}

/// Complete record of one settled round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub game_type: GameType,
    pub played_at: DateTime<Utc>,
    pub outcome: GameOutcome,
    pub balance_after: u64,
    pub round: RoundOutcome,
}

impl GameRecord {
    /// Stamp a settled round with a fresh id and the current time
    pub fn new(round: RoundOutcome, balance_after: u64) -> Self {
        Self {
            game_id: Uuid::new_v4().to_string(),
            game_type: round.game_type(),
            played_at: Utc::now(),
            outcome: GameOutcome::from_net(round.net()),
            balance_after,
            round,
        }
    }
}

/// Running totals for one game type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTally {
    pub rounds: u64,
    pub wins: u64,
    pub pushes: u64,
    pub wagered: u64,
    pub paid_out: u64,
}

impl GameTally {
    pub fn record(&mut self, round: &RoundOutcome) {
        self.rounds += 1;
        match GameOutcome::from_net(round.net()) {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Push => self.pushes += 1,
            GameOutcome::Loss => {}
        }
        self.wagered = self.wagered.saturating_add(round.bet_amount());
        self.paid_out = self.paid_out.saturating_add(round.winnings());
    }

    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins as f64 / self.rounds as f64
        }
    }

    /// Total paid out ÷ total wagered
    pub fn return_to_player(&self) -> f64 {
        if self.wagered == 0 {
            0.0
        } else {
            self.paid_out as f64 / self.wagered as f64
        }
    }

    pub fn house_edge(&self) -> f64 {
        if self.wagered == 0 {
            0.0
        } else {
            1.0 - self.return_to_player()
        }
    }
}
