//! Error types for the gamebot arcade
//!
//! Every game and session error is recoverable: the caller re-prompts and the
//! ledger is left untouched.

use crate::games::types::{GameType, Multiplier};
use thiserror::Error;

/// Root error type for all arcade operations
#[derive(Debug, Error)]
pub enum ArcadeError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Rejected bets and selections
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Input that does not fit the current session state
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

/// Errors raised by the engines before any credits move
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid bet: {0}")]
    InvalidBet(#[from] BetError),

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
}

/// Bet amount outside `[min_bet, min(max_bet, balance)]`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BetError {
    #[error("minimum bet is {min} credits, got {amount}")]
    BelowMinimum { amount: u64, min: u64 },

    #[error("maximum bet is {max} credits, got {amount}")]
    AboveMaximum { amount: u64, max: u64 },

    #[error("insufficient balance: bet {amount} but only {balance} credits available")]
    InsufficientBalance { amount: u64, balance: u64 },
}

/// Keno picks or Crash target that the engine cannot accept
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("select at least one number")]
    NoPicks,

    #[error("at most {max} numbers may be picked, got {count}")]
    TooManyPicks { count: usize, max: usize },

    #[error("number {pick} is outside 1-{max}")]
    PickOutOfRange { pick: u32, max: u8 },

    #[error("number {0} was picked twice")]
    DuplicatePick(u8),

    #[error("choose a cash-out multiplier first")]
    NoTarget,

    #[error("target {target} is outside {min}-{max}")]
    TargetOutOfRange {
        target: Multiplier,
        min: Multiplier,
        max: Multiplier,
    },

    #[error("'{0}' is not a multiplier")]
    MalformedTarget(String),

    #[error("draw {drawn:?} is not {expected} distinct numbers from 1-{max}")]
    MalformedDraw { drawn: Vec<u8>, expected: u8, max: u8 },
}

/// Errors from the input-gathering state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("'{event}' is not accepted while {state}")]
    UnexpectedEvent { state: String, event: String },

    #[error("'{0}' is not a valid bet amount")]
    MalformedBet(String),

    #[error("{game} input rejected: {source}")]
    Rejected {
        game: GameType,
        #[source]
        source: GameError,
    },
}

impl From<std::io::Error> for ArcadeError {
    fn from(e: std::io::Error) -> Self {
        ArcadeError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<toml::de::Error> for ConfigurationError {
    fn from(e: toml::de::Error) -> Self {
        ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e))
    }
}

impl From<toml::ser::Error> for ConfigurationError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e))
    }
}

impl From<BetError> for ArcadeError {
    fn from(e: BetError) -> Self {
        ArcadeError::Game(GameError::InvalidBet(e))
    }
}

impl From<SelectionError> for ArcadeError {
    fn from(e: SelectionError) -> Self {
        ArcadeError::Game(GameError::InvalidSelection(e))
    }
}

impl ArcadeError {
    /// Whether the caller can simply re-prompt the player
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ArcadeError::Configuration(_))
    }
}

// Convenience type aliases for Results
pub type ArcadeResult<T> = Result<T, ArcadeError>;
pub type GameResult<T> = Result<T, GameError>;
