//! Configuration management with validation and defaults
//!
//! Settings come from built-in defaults, an optional TOML file and `GAMEBOT_*`
//! environment variables, in that order of precedence (lowest first).

use crate::errors::{ArcadeResult, BetError, ConfigurationError, SelectionError};
use crate::games::crash::CrashTier;
use crate::games::types::Multiplier;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Complete arcade configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ledger: LedgerConfig,
    pub betting: BettingConfig,
    pub keno: KenoConfig,
    pub crash: CrashConfig,
    pub logging: LoggingConfig,
}

/// Starting state of the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub starting_balance: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
        }
    }
}

/// Bet limits shared by both games
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BettingConfig {
    pub min_bet: u64,
    pub max_bet: u64,
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            min_bet: 10,
            max_bet: 500,
        }
    }
}

impl BettingConfig {
    /// Check `min_bet <= amount <= min(max_bet, balance)`
    pub fn validate(&self, amount: u64, balance: u64) -> Result<(), BetError> {
        if amount < self.min_bet {
            return Err(BetError::BelowMinimum {
                amount,
                min: self.min_bet,
            });
        }
        if amount > balance {
            return Err(BetError::InsufficientBalance { amount, balance });
        }
        if amount > self.max_bet {
            return Err(BetError::AboveMaximum {
                amount,
                max: self.max_bet,
            });
        }
        Ok(())
    }

    /// Largest bet currently allowed
    pub fn max_allowed(&self, balance: u64) -> u64 {
        self.max_bet.min(balance)
    }
}

/// Keno board and payout table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KenoConfig {
    /// Numbers on the board, `1..=total_numbers`
    pub total_numbers: u8,
    /// Numbers drawn per round
    pub drawn_numbers: u8,
    /// Most numbers a player may pick
    pub max_picks: u8,
    /// Payout multiplier indexed by match count; the last entry covers every
    /// higher count
    pub payouts: Vec<u64>,
}

impl Default for KenoConfig {
    fn default() -> Self {
        Self {
            total_numbers: 20,
            drawn_numbers: 10,
            max_picks: 10,
            payouts: vec![0, 0, 1, 2, 3, 5, 10, 10, 10, 10, 10],
        }
    }
}

/// Crash target range and crash point distribution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashConfig {
    pub min_multiplier: Multiplier,
    pub max_multiplier: Multiplier,
    /// Preset cash-out targets offered to the player
    pub menu: Vec<Multiplier>,
    pub tiers: Vec<CrashTier>,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            min_multiplier: Multiplier::from_hundredths(110),
            max_multiplier: Multiplier::from_hundredths(1000),
            menu: [110, 150, 200, 250, 300, 400, 500, 750, 1000]
                .into_iter()
                .map(Multiplier::from_hundredths)
                .collect(),
            tiers: vec![
                CrashTier::new(0.33, 1.0, 2.0),
                CrashTier::new(0.65, 2.0, 4.0),
                CrashTier::new(0.85, 4.0, 7.0),
                CrashTier::new(0.95, 7.0, 15.0),
                CrashTier::new(1.0, 15.0, 50.0),
            ],
        }
    }
}

impl CrashConfig {
    /// Check that a cash-out target lies in `[min_multiplier, max_multiplier]`
    pub fn check_target(&self, target: Multiplier) -> Result<(), SelectionError> {
        if target < self.min_multiplier || target > self.max_multiplier {
            return Err(SelectionError::TargetOutOfRange {
                target,
                min: self.min_multiplier,
                max: self.max_multiplier,
            });
        }
        Ok(())
    }
}

/// Log filter used when `RUST_LOG` is not set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> ArcadeResult<GameConfig> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            GameConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        self.validate(&config)?;

        Ok(config)
    }

    /// Load configuration from TOML file
    fn load_from_file(&self, path: &str) -> ArcadeResult<GameConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        Ok(toml::from_str(&content).map_err(ConfigurationError::from)?)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut GameConfig) -> ArcadeResult<()> {
        if let Some(balance) = env_u64("GAMEBOT_STARTING_BALANCE")? {
            config.ledger.starting_balance = balance;
        }
        if let Some(min_bet) = env_u64("GAMEBOT_MIN_BET")? {
            config.betting.min_bet = min_bet;
        }
        if let Some(max_bet) = env_u64("GAMEBOT_MAX_BET")? {
            config.betting.max_bet = max_bet;
        }
        if let Ok(level) = env::var("GAMEBOT_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self, config: &GameConfig) -> ArcadeResult<()> {
        validate_betting(config)?;
        validate_keno(&config.keno)?;
        validate_crash(&config.crash)?;

        if config.logging.level.trim().is_empty() {
            return Err(ConfigurationError::MissingRequired("logging.level".to_string()).into());
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, config: &GameConfig, path: &str) -> ArcadeResult<()> {
        let toml_string = toml::to_string_pretty(config).map_err(ConfigurationError::from)?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

fn env_u64(key: &str) -> Result<Option<u64>, ConfigurationError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigurationError::InvalidValue {
                field: key.to_string(),
                value,
                reason: "Expected a non-negative integer".to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_betting(config: &GameConfig) -> Result<(), ConfigurationError> {
    let betting = &config.betting;
    if betting.min_bet == 0 {
        return Err(invalid("betting.min_bet", 0, "Minimum bet cannot be zero"));
    }
    if betting.min_bet >= betting.max_bet {
        return Err(invalid(
            "betting.min_bet",
            betting.min_bet,
            "Minimum bet must be less than maximum bet",
        ));
    }
    if config.ledger.starting_balance < betting.min_bet {
        return Err(invalid(
            "ledger.starting_balance",
            config.ledger.starting_balance,
            "Starting balance must be at least the minimum bet",
        ));
    }
    Ok(())
}

fn validate_keno(keno: &KenoConfig) -> Result<(), ConfigurationError> {
    if keno.total_numbers == 0 {
        return Err(invalid("keno.total_numbers", 0, "Board cannot be empty"));
    }
    if keno.drawn_numbers == 0 || keno.drawn_numbers > keno.total_numbers {
        return Err(invalid(
            "keno.drawn_numbers",
            keno.drawn_numbers,
            "Must be between 1 and total_numbers",
        ));
    }
    if keno.max_picks == 0 || keno.max_picks > keno.total_numbers {
        return Err(invalid(
            "keno.max_picks",
            keno.max_picks,
            "Must be between 1 and total_numbers",
        ));
    }
    if keno.payouts.is_empty() {
        return Err(ConfigurationError::MissingRequired("keno.payouts".to_string()));
    }
    if keno.payouts.windows(2).any(|w| w[0] > w[1]) {
        return Err(invalid(
            "keno.payouts",
            format!("{:?}", keno.payouts),
            "Payouts must not decrease as matches increase",
        ));
    }
    Ok(())
}

fn validate_crash(crash: &CrashConfig) -> Result<(), ConfigurationError> {
    if crash.min_multiplier < Multiplier::ONE {
        return Err(invalid(
            "crash.min_multiplier",
            crash.min_multiplier,
            "Targets below 1.00x are not allowed",
        ));
    }
    if crash.min_multiplier > crash.max_multiplier {
        return Err(invalid(
            "crash.max_multiplier",
            crash.max_multiplier,
            "Maximum must not be below minimum",
        ));
    }
    if let Some(m) = crash
        .menu
        .iter()
        .find(|m| **m < crash.min_multiplier || **m > crash.max_multiplier)
    {
        return Err(invalid("crash.menu", m, "Menu entry outside the target range"));
    }

    if crash.tiers.is_empty() {
        return Err(ConfigurationError::MissingRequired("crash.tiers".to_string()));
    }
    let mut previous = 0.0;
    for (i, tier) in crash.tiers.iter().enumerate() {
        let field = format!("crash.tiers[{}]", i);
        if !(tier.cumulative > previous && tier.cumulative <= 1.0) {
            return Err(invalid(
                &field,
                tier.cumulative,
                "Cumulative probabilities must increase strictly up to 1.0",
            ));
        }
        if !(tier.low >= 1.0 && tier.low < tier.high && tier.high.is_finite()) {
            return Err(invalid(
                &field,
                format!("[{}, {})", tier.low, tier.high),
                "Range must satisfy 1.0 <= low < high",
            ));
        }
        previous = tier.cumulative;
    }
    if previous != 1.0 {
        return Err(invalid(
            "crash.tiers",
            previous,
            "Last tier must reach cumulative probability 1.0",
        ));
    }
    Ok(())
}

/// Builder pattern for creating configurations
pub struct ConfigBuilder {
    config: GameConfig,
}

impl ConfigBuilder {
    /// Create a new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
        }
    }

    pub fn starting_balance(mut self, balance: u64) -> Self {
        self.config.ledger.starting_balance = balance;
        self
    }

    pub fn betting(mut self, min_bet: u64, max_bet: u64) -> Self {
        self.config.betting = BettingConfig { min_bet, max_bet };
        self
    }

    pub fn keno(mut self, keno: KenoConfig) -> Self {
        self.config.keno = keno;
        self
    }

    pub fn crash(mut self, crash: CrashConfig) -> Self {
        self.config.crash = crash;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> GameConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> ArcadeResult<()> {
    let config = GameConfig::default();
    ConfigLoader::new().save(&config, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ArcadeError;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.ledger.starting_balance, 1000);
        assert_eq!(config.betting.min_bet, 10);
        assert_eq!(config.betting.max_bet, 500);
        assert_eq!(config.keno.payouts.len(), 11);
        assert_eq!(config.crash.menu.len(), 9);
        assert!(ConfigLoader::new().validate(&config).is_ok());
    }

    #[test]
    fn test_bet_validation_order() {
        let betting = BettingConfig::default();

        assert_eq!(
            betting.validate(9, 1000),
            Err(BetError::BelowMinimum { amount: 9, min: 10 })
        );
        assert_eq!(
            betting.validate(101, 100),
            Err(BetError::InsufficientBalance { amount: 101, balance: 100 })
        );
        assert_eq!(
            betting.validate(501, 1000),
            Err(BetError::AboveMaximum { amount: 501, max: 500 })
        );
        assert!(betting.validate(10, 10).is_ok());
        assert!(betting.validate(500, 1000).is_ok());
        assert_eq!(betting.max_allowed(120), 120);
    }

    #[test]
    fn test_config_validation() {
        let loader = ConfigLoader::new();

        let mut config = GameConfig::default();
        config.betting.min_bet = 500;
        assert!(loader.validate(&config).is_err());

        let mut config = GameConfig::default();
        config.ledger.starting_balance = 5;
        assert!(loader.validate(&config).is_err());

        let mut config = GameConfig::default();
        config.keno.payouts = vec![0, 2, 1];
        assert!(loader.validate(&config).is_err());

        let mut config = GameConfig::default();
        config.keno.drawn_numbers = 21;
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_crash_tier_validation() {
        let loader = ConfigLoader::new();

        let mut config = GameConfig::default();
        config.crash.tiers.pop();
        assert!(matches!(
            loader.validate(&config),
            Err(ArcadeError::Configuration(ConfigurationError::InvalidValue { .. }))
        ));

        let mut config = GameConfig::default();
        config.crash.tiers[1] = CrashTier::new(0.2, 2.0, 4.0);
        assert!(loader.validate(&config).is_err());

        let mut config = GameConfig::default();
        config.crash.tiers[0] = CrashTier::new(0.33, 0.5, 2.0);
        assert!(loader.validate(&config).is_err());

        let mut config = GameConfig::default();
        config.crash.menu.push(Multiplier::from_hundredths(1200));
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .starting_balance(250)
            .betting(5, 50)
            .log_level("debug")
            .build();

        assert_eq!(config.ledger.starting_balance, 250);
        assert_eq!(config.betting.min_bet, 5);
        assert_eq!(config.betting.max_bet, 50);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [betting]
            max_bet = 100

            [crash]
            max_multiplier = 5.0
            menu = [1.5, 2.0, 5.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.betting.min_bet, 10);
        assert_eq!(config.betting.max_bet, 100);
        assert_eq!(config.crash.max_multiplier, Multiplier::from_hundredths(500));
        assert_eq!(config.crash.tiers.len(), 5);
        assert_eq!(config.keno.total_numbers, 20);
    }

    #[test]
    fn test_save_and_load_config() -> ArcadeResult<()> {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let original_config = GameConfig::default();

        let loader = ConfigLoader::new();
        loader.save(&original_config, path)?;

        let loaded_config = ConfigLoader::new().with_path(path).load()?;

        assert_eq!(loaded_config.keno, original_config.keno);
        assert_eq!(loaded_config.crash.menu, original_config.crash.menu);
        assert_eq!(loaded_config.crash.tiers, original_config.crash.tiers);

        Ok(())
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let result = ConfigLoader::new().with_path("/nonexistent/gamebot.toml").load();
        assert!(matches!(
            result,
            Err(ArcadeError::Configuration(ConfigurationError::LoadFailed(_)))
        ));
    }
}
