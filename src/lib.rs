//! gamebot - Keno and Crash against a fake-credit balance
//!
//! Single-user game core: a ledger that never goes negative, two game
//! engines, and a session state machine that turns chat-style input into
//! settled rounds. The console adapter in [`console`] is one presentation
//! layer; anything else can drive [`Player`] directly.

pub mod config;
pub mod console;
pub mod errors;
pub mod games;
pub mod ledger;
pub mod player;
pub mod session;

pub use config::{ConfigBuilder, ConfigLoader, GameConfig};
pub use errors::{ArcadeError, ArcadeResult};
pub use games::{GameProcessor, GameRecord, GameType, Multiplier};
pub use ledger::Ledger;
pub use player::{Player, Reply};
pub use session::{SessionEvent, SessionState};
