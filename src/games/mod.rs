//! Game engines
//!
//! Keno and Crash engines, the processor that dispatches between them and a
//! batch simulator built on top.

pub mod types;
pub mod keno;
pub mod crash;
pub mod processor;
pub mod simulation;

pub use types::*;
pub use keno::{KenoEngine, KenoOutcome, KenoPicks};
pub use crash::{crash_point, CrashEngine, CrashOutcome, CrashTier};
pub use processor::GameProcessor;
pub use simulation::{SimulationReport, SimulationScenario, Simulator};
