//! Input-gathering state machine
//!
//! A session collects a bet and the game-specific selection one event at a
//! time. `SessionState::step` is pure: it maps `(state, event)` to the next
//! state plus, when the player launches the round, the command to hand to an
//! engine. Rejected events leave the current state in place.

use crate::config::GameConfig;
use crate::errors::{GameError, SelectionError, SessionError};
use crate::games::keno::KenoPicks;
use crate::games::types::{GameType, Multiplier, PlayCommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The single in-progress game, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingBet {
        game: GameType,
    },
    AwaitingPicks {
        bet_amount: u64,
        picks: KenoPicks,
    },
    AwaitingTarget {
        bet_amount: u64,
        target: Option<Multiplier>,
    },
}

/// Player input, already decoded by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Start(GameType),
    Bet(String),
    TogglePick(u32),
    ClearPicks,
    ChooseTarget(Multiplier),
    Play,
    Cancel,
}

/// Outcome of a successful step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub command: Option<PlayCommand>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self { state, command: None }
    }

    fn play(command: PlayCommand) -> Self {
        Self {
            state: SessionState::Idle,
            command: Some(command),
        }
    }
}

impl SessionState {
    /// Game the session belongs to, if one is running
    pub fn game(&self) -> Option<GameType> {
        match self {
            SessionState::Idle => None,
            SessionState::AwaitingBet { game } => Some(*game),
            SessionState::AwaitingPicks { .. } => Some(GameType::Keno),
            SessionState::AwaitingTarget { .. } => Some(GameType::Crash),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// Compute the next state for `event`. `balance` is the ledger balance
    /// used to bound the bet.
    pub fn step(
        &self,
        event: SessionEvent,
        config: &GameConfig,
        balance: u64,
    ) -> Result<Transition, SessionError> {
        let transition = match (self, event) {
            (_, SessionEvent::Start(game)) => Transition::to(SessionState::AwaitingBet { game }),
            (_, SessionEvent::Cancel) => Transition::to(SessionState::Idle),

            (SessionState::AwaitingBet { game }, SessionEvent::Bet(text)) => {
                let bet_amount = parse_bet(&text)?;
                config
                    .betting
                    .validate(bet_amount, balance)
                    .map_err(|e| rejected(*game, e.into()))?;
                match game {
                    GameType::Keno => Transition::to(SessionState::AwaitingPicks {
                        bet_amount,
                        picks: KenoPicks::new(),
                    }),
                    GameType::Crash => Transition::to(SessionState::AwaitingTarget {
                        bet_amount,
                        target: None,
                    }),
                }
            }

            (SessionState::AwaitingPicks { bet_amount, picks }, SessionEvent::TogglePick(number)) => {
                let mut picks = picks.clone();
                picks
                    .toggle(number, &config.keno)
                    .map_err(|e| rejected(GameType::Keno, e.into()))?;
                Transition::to(SessionState::AwaitingPicks {
                    bet_amount: *bet_amount,
                    picks,
                })
            }
            (SessionState::AwaitingPicks { bet_amount, .. }, SessionEvent::ClearPicks) => {
                Transition::to(SessionState::AwaitingPicks {
                    bet_amount: *bet_amount,
                    picks: KenoPicks::new(),
                })
            }
            (SessionState::AwaitingPicks { bet_amount, picks }, SessionEvent::Play) => {
                picks
                    .validate(&config.keno)
                    .map_err(|e| rejected(GameType::Keno, e.into()))?;
                Transition::play(PlayCommand::Keno {
                    bet_amount: *bet_amount,
                    picks: picks.clone(),
                })
            }

            (SessionState::AwaitingTarget { bet_amount, .. }, SessionEvent::ChooseTarget(target)) => {
                config
                    .crash
                    .check_target(target)
                    .map_err(|e| rejected(GameType::Crash, e.into()))?;
                Transition::to(SessionState::AwaitingTarget {
                    bet_amount: *bet_amount,
                    target: Some(target),
                })
            }
            (SessionState::AwaitingTarget { bet_amount, target }, SessionEvent::Play) => {
                let target = target
                    .ok_or_else(|| rejected(GameType::Crash, SelectionError::NoTarget.into()))?;
                Transition::play(PlayCommand::Crash {
                    bet_amount: *bet_amount,
                    target,
                })
            }

            (state, event) => {
                return Err(SessionError::UnexpectedEvent {
                    state: state.to_string(),
                    event: event.to_string(),
                })
            }
        };

        debug!(from = %self, to = %transition.state, launched = transition.command.is_some(), "session step");
        Ok(transition)
    }
}

fn parse_bet(text: &str) -> Result<u64, SessionError> {
    text.trim()
        .parse()
        .map_err(|_| SessionError::MalformedBet(text.trim().to_string()))
}

fn rejected(game: GameType, source: GameError) -> SessionError {
    SessionError::Rejected { game, source }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::AwaitingBet { game } => write!(f, "awaiting a {} bet", game),
            SessionState::AwaitingPicks { picks, .. } => {
                write!(f, "picking keno numbers ({} selected)", picks.len())
            }
            SessionState::AwaitingTarget { target: Some(t), .. } => {
                write!(f, "choosing a crash target ({} selected)", t)
            }
            SessionState::AwaitingTarget { target: None, .. } => write!(f, "choosing a crash target"),
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Start(game) => write!(f, "start {}", game),
            SessionEvent::Bet(text) => write!(f, "bet {}", text),
            SessionEvent::TogglePick(n) => write!(f, "pick {}", n),
            SessionEvent::ClearPicks => write!(f, "clear"),
            SessionEvent::ChooseTarget(m) => write!(f, "target {}", m),
            SessionEvent::Play => write!(f, "play"),
            SessionEvent::Cancel => write!(f, "cancel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BetError;

    fn m(hundredths: u32) -> Multiplier {
        Multiplier::from_hundredths(hundredths)
    }

    fn run(events: Vec<SessionEvent>) -> Result<Transition, SessionError> {
        let config = GameConfig::default();
        let mut transition = Transition::to(SessionState::Idle);
        for event in events {
            transition = transition.state.step(event, &config, 1000)?;
        }
        Ok(transition)
    }

    #[test]
    fn test_keno_flow_launches_command() {
        let transition = run(vec![
            SessionEvent::Start(GameType::Keno),
            SessionEvent::Bet("100".into()),
            SessionEvent::TogglePick(3),
            SessionEvent::TogglePick(9),
            SessionEvent::TogglePick(3),
            SessionEvent::TogglePick(12),
            SessionEvent::Play,
        ])
        .unwrap();

        assert_eq!(transition.state, SessionState::Idle);
        assert_eq!(
            transition.command,
            Some(PlayCommand::Keno {
                bet_amount: 100,
                picks: KenoPicks::from_numbers([9, 12]).unwrap(),
            })
        );
    }

    #[test]
    fn test_crash_flow_launches_command() {
        let transition = run(vec![
            SessionEvent::Start(GameType::Crash),
            SessionEvent::Bet(" 50 ".into()),
            SessionEvent::ChooseTarget(m(150)),
            SessionEvent::ChooseTarget(m(300)),
            SessionEvent::Play,
        ])
        .unwrap();

        assert_eq!(
            transition.command,
            Some(PlayCommand::Crash {
                bet_amount: 50,
                target: m(300),
            })
        );
    }

    #[test]
    fn test_bad_bets_keep_state() {
        let config = GameConfig::default();
        let state = SessionState::AwaitingBet { game: GameType::Keno };

        assert_eq!(
            state.step(SessionEvent::Bet("ten".into()), &config, 1000),
            Err(SessionError::MalformedBet("ten".into()))
        );
        assert_eq!(
            state.step(SessionEvent::Bet("9".into()), &config, 1000),
            Err(SessionError::Rejected {
                game: GameType::Keno,
                source: GameError::InvalidBet(BetError::BelowMinimum { amount: 9, min: 10 }),
            })
        );
        assert!(state.step(SessionEvent::Bet("201".into()), &config, 200).is_err());
        assert!(state.step(SessionEvent::Bet("-5".into()), &config, 1000).is_err());
    }

    #[test]
    fn test_play_without_selection_is_rejected() {
        let config = GameConfig::default();

        let picking = SessionState::AwaitingPicks {
            bet_amount: 10,
            picks: KenoPicks::new(),
        };
        assert_eq!(
            picking.step(SessionEvent::Play, &config, 1000),
            Err(SessionError::Rejected {
                game: GameType::Keno,
                source: GameError::InvalidSelection(SelectionError::NoPicks),
            })
        );

        let targeting = SessionState::AwaitingTarget {
            bet_amount: 10,
            target: None,
        };
        assert!(targeting.step(SessionEvent::Play, &config, 1000).is_err());
        assert!(targeting
            .step(SessionEvent::ChooseTarget(m(1050)), &config, 1000)
            .is_err());
    }

    #[test]
    fn test_cancel_and_restart() {
        let config = GameConfig::default();
        let picking = SessionState::AwaitingPicks {
            bet_amount: 10,
            picks: KenoPicks::from_numbers([1, 2]).unwrap(),
        };

        let cancelled = picking.step(SessionEvent::Cancel, &config, 1000).unwrap();
        assert_eq!(cancelled.state, SessionState::Idle);
        assert!(cancelled.command.is_none());

        let restarted = picking
            .step(SessionEvent::Start(GameType::Crash), &config, 1000)
            .unwrap();
        assert_eq!(restarted.state, SessionState::AwaitingBet { game: GameType::Crash });
    }

    #[test]
    fn test_unexpected_events() {
        let config = GameConfig::default();

        let err = SessionState::Idle
            .step(SessionEvent::Play, &config, 1000)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::UnexpectedEvent {
                state: "idle".into(),
                event: "play".into(),
            }
        );

        let targeting = SessionState::AwaitingTarget {
            bet_amount: 10,
            target: None,
        };
        assert!(targeting.step(SessionEvent::TogglePick(4), &config, 1000).is_err());
        assert!(SessionState::AwaitingBet { game: GameType::Crash }
            .step(SessionEvent::ChooseTarget(m(200)), &config, 1000)
            .is_err());
    }

    #[test]
    fn test_clear_picks() {
        let transition = run(vec![
            SessionEvent::Start(GameType::Keno),
            SessionEvent::Bet("10".into()),
            SessionEvent::TogglePick(1),
            SessionEvent::TogglePick(2),
            SessionEvent::ClearPicks,
        ])
        .unwrap();

        assert_eq!(
            transition.state,
            SessionState::AwaitingPicks {
                bet_amount: 10,
                picks: KenoPicks::new(),
            }
        );
        assert_eq!(transition.state.game(), Some(GameType::Keno));
    }
}
