//! Line-oriented console front end
//!
//! Decodes typed lines into session events and renders replies as plain
//! text. Holds no game state of its own.

use crate::config::GameConfig;
use crate::errors::ArcadeError;
use crate::games::crash::CrashOutcome;
use crate::games::keno::KenoOutcome;
use crate::games::types::{GameRecord, GameType, Multiplier, RoundOutcome};
use crate::player::{Player, Reply};
use crate::session::{SessionEvent, SessionState};
use std::fmt::Write;

/// A decoded line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Event(SessionEvent),
    Balance,
    Stats,
    Help,
    Menu,
    Quit,
}

/// Decode one line. Bare input is read according to the session state: a bet
/// amount, a number to toggle, or a cash-out target.
pub fn parse_line(line: &str, state: &SessionState) -> Option<ConsoleCommand> {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();
    let mut words = lower.split_whitespace();
    let head = words.next()?;
    let arg = words.next();

    let command = match (head, arg) {
        ("/start" | "/menu", None) => ConsoleCommand::Menu,
        ("/help", None) => ConsoleCommand::Help,
        ("/balance", None) => ConsoleCommand::Balance,
        ("/stats", None) => ConsoleCommand::Stats,
        ("/quit" | "/exit", None) => ConsoleCommand::Quit,
        ("/keno", None) => ConsoleCommand::Event(SessionEvent::Start(GameType::Keno)),
        ("/crash", None) => ConsoleCommand::Event(SessionEvent::Start(GameType::Crash)),
        ("/cancel", None) => ConsoleCommand::Event(SessionEvent::Cancel),
        ("/play" | "/launch", None) => ConsoleCommand::Event(SessionEvent::Play),
        ("/clear", None) => ConsoleCommand::Event(SessionEvent::ClearPicks),
        ("pick", Some(n)) => ConsoleCommand::Event(SessionEvent::TogglePick(n.parse().ok()?)),
        ("target", Some(m)) => ConsoleCommand::Event(SessionEvent::ChooseTarget(m.parse().ok()?)),
        (_, None) => match state {
            SessionState::AwaitingBet { .. } => ConsoleCommand::Event(SessionEvent::Bet(line.to_string())),
            SessionState::AwaitingPicks { .. } => ConsoleCommand::Event(SessionEvent::TogglePick(head.parse().ok()?)),
            SessionState::AwaitingTarget { .. } => {
                ConsoleCommand::Event(SessionEvent::ChooseTarget(head.parse::<Multiplier>().ok()?))
            }
            SessionState::Idle => return None,
        },
        _ => return None,
    };

    if words.next().is_some() {
        return None;
    }
    Some(command)
}

pub fn welcome(player: &Player) -> String {
    format!(
        "Welcome to the arcade!\n\
         Balance: {} credits\n\n\
         /keno  - pick up to {} numbers, {} are drawn\n\
         /crash - cash out before the rocket crashes\n\
         /balance, /stats, /help, /quit",
        player.balance(),
        player.config().keno.max_picks,
        player.config().keno.drawn_numbers,
    )
}

pub fn help(config: &GameConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "KENO");
    let _ = writeln!(
        out,
        "  Bet, then toggle numbers 1-{} (type a number or 'pick N'), /clear to reset, /play to draw.",
        config.keno.total_numbers
    );
    let payouts: Vec<String> = config
        .keno
        .payouts
        .iter()
        .enumerate()
        .filter(|(_, m)| **m > 0)
        .map(|(matches, m)| format!("{} matches: {}x", matches, m))
        .collect();
    let _ = writeln!(out, "  Payouts: {}", payouts.join(", "));
    let _ = writeln!(out, "CRASH");
    let _ = writeln!(
        out,
        "  Bet, choose a target between {} and {} (e.g. '2.5x'), /launch to play.",
        config.crash.min_multiplier, config.crash.max_multiplier
    );
    let _ = writeln!(out, "  You win bet x target if the crash point reaches your target.");
    let _ = write!(
        out,
        "Bets: {}-{} credits. /cancel abandons the current game.",
        config.betting.min_bet, config.betting.max_bet
    );
    out
}

pub fn balance(player: &Player) -> String {
    format!("Your current balance: {} credits", player.balance())
}

pub fn stats(player: &Player) -> String {
    let mut out = String::new();
    for game in [GameType::Keno, GameType::Crash] {
        let tally = player.stats().tally(game);
        let _ = writeln!(
            out,
            "{:<5} rounds {:>4}  wins {:>4}  wagered {:>6}  paid {:>6}  rtp {:.2}",
            game.to_string(),
            tally.rounds,
            tally.wins,
            tally.wagered,
            tally.paid_out,
            tally.return_to_player()
        );
    }
    out.trim_end().to_string()
}

pub fn error(err: &ArcadeError) -> String {
    format!("Error: {}. Please try again.", err)
}

/// Render the reply to an event
pub fn reply(reply: &Reply, player: &Player) -> String {
    match reply {
        Reply::Prompt(state) => prompt(state, player),
        Reply::Settled(record) => settled(record),
        Reply::Cancelled => format!("Game cancelled.\n{}", balance(player)),
    }
}

/// What the player should do next in `state`
pub fn prompt(state: &SessionState, player: &Player) -> String {
    let config = player.config();
    match state {
        SessionState::Idle => welcome(player),
        SessionState::AwaitingBet { game } => format!(
            "{}\nBalance: {} credits\nEnter your bet amount ({}-{}):",
            game.to_string().to_uppercase(),
            player.balance(),
            config.betting.min_bet,
            player.max_bet()
        ),
        SessionState::AwaitingPicks { bet_amount, picks } => {
            let mut out = format!(
                "Bet: {} credits | Selected: {}/{}\n",
                bet_amount,
                picks.len(),
                config.keno.max_picks
            );
            for row in (1..=config.keno.total_numbers).collect::<Vec<_>>().chunks(5) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|n| {
                        if picks.contains(*n) {
                            format!("[{:>2}]", n)
                        } else {
                            format!(" {:>2} ", n)
                        }
                    })
                    .collect();
                let _ = writeln!(out, "{}", cells.join(" "));
            }
            out.push_str("Type a number to toggle it, /clear, /play or /cancel.");
            out
        }
        SessionState::AwaitingTarget { bet_amount, target } => {
            let menu: Vec<String> = config.crash.menu.iter().map(|m| m.to_string()).collect();
            let mut out = format!("Bet: {} credits\nTargets: {}\n", bet_amount, menu.join("  "));
            match target {
                Some(t) => {
                    let _ = writeln!(
                        out,
                        "Current target: {} | Potential winnings: {} credits",
                        t,
                        t.apply(*bet_amount)
                    );
                    out.push_str("Choose another target, /launch or /cancel.");
                }
                None => out.push_str("Type a target such as 2.5x:"),
            }
            out
        }
    }
}

fn settled(record: &GameRecord) -> String {
    let body = match &record.round {
        RoundOutcome::Keno(outcome) => keno_result(outcome),
        RoundOutcome::Crash(outcome) => crash_result(outcome),
    };
    let net = record.round.net();
    let verdict = match net {
        n if n > 0 => "Congratulations!",
        0 => "Break even!",
        _ => "Better luck next time!",
    };
    format!(
        "{}\nBet: {} credits\nWinnings: {} credits\nNet result: {}{} credits\nNew balance: {} credits\n{}",
        body,
        record.round.bet_amount(),
        record.round.winnings(),
        if net >= 0 { "+" } else { "" },
        net,
        record.balance_after,
        verdict
    )
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
}

fn keno_result(outcome: &KenoOutcome) -> String {
    let yours: Vec<String> = outcome
        .picks
        .iter()
        .map(|n| {
            if outcome.matches.contains(n) {
                format!("*{}*", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    let matches = if outcome.matches.is_empty() {
        "None".to_string()
    } else {
        join_numbers(&outcome.matches)
    };
    format!(
        "KENO RESULTS\nYour numbers: {}\nWinning numbers: {}\nMatches: {} ({})\nPayout: {}x",
        yours.join(" "),
        join_numbers(&outcome.drawn),
        matches,
        outcome.match_count,
        outcome.payout_multiplier
    )
}

fn crash_result(outcome: &CrashOutcome) -> String {
    let description = if outcome.won {
        format!("SUCCESS! Cashed out safely at {}", outcome.target)
    } else {
        format!(
            "CRASHED! Crashed at {} before your {} target",
            outcome.crash_point, outcome.target
        )
    };
    format!(
        "CRASH RESULTS\nYour target: {}\nCrash point: {}\n{}",
        outcome.target, outcome.crash_point, description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::keno::KenoPicks;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_parse_commands() {
        let idle = SessionState::Idle;
        assert_eq!(
            parse_line("/keno", &idle),
            Some(ConsoleCommand::Event(SessionEvent::Start(GameType::Keno)))
        );
        assert_eq!(
            parse_line("  /LAUNCH ", &idle),
            Some(ConsoleCommand::Event(SessionEvent::Play))
        );
        assert_eq!(parse_line("/balance", &idle), Some(ConsoleCommand::Balance));
        assert_eq!(parse_line("42", &idle), None);
        assert_eq!(parse_line("", &idle), None);
        assert_eq!(parse_line("/keno now", &idle), None);
    }

    #[test]
    fn test_bare_input_depends_on_state() {
        let betting = SessionState::AwaitingBet { game: GameType::Crash };
        assert_eq!(
            parse_line("50", &betting),
            Some(ConsoleCommand::Event(SessionEvent::Bet("50".into())))
        );

        let picking = SessionState::AwaitingPicks {
            bet_amount: 50,
            picks: KenoPicks::new(),
        };
        assert_eq!(
            parse_line("7", &picking),
            Some(ConsoleCommand::Event(SessionEvent::TogglePick(7)))
        );
        assert_eq!(
            parse_line("pick 12", &picking),
            Some(ConsoleCommand::Event(SessionEvent::TogglePick(12)))
        );
        assert_eq!(parse_line("seven", &picking), None);
        assert_eq!(
            parse_line("300", &picking),
            Some(ConsoleCommand::Event(SessionEvent::TogglePick(300)))
        );

        let targeting = SessionState::AwaitingTarget {
            bet_amount: 50,
            target: None,
        };
        assert_eq!(
            parse_line("2.5x", &targeting),
            Some(ConsoleCommand::Event(SessionEvent::ChooseTarget(
                Multiplier::from_hundredths(250)
            )))
        );
        assert_eq!(
            parse_line("target 7.5", &targeting),
            Some(ConsoleCommand::Event(SessionEvent::ChooseTarget(
                Multiplier::from_hundredths(750)
            )))
        );
        assert_eq!(parse_line("1.099", &targeting), None);
        assert_eq!(parse_line("target 10.004x", &targeting), None);
    }

    #[test]
    fn test_render_keno_board_marks_picks() {
        let player = Player::new(GameConfig::default());
        let state = SessionState::AwaitingPicks {
            bet_amount: 20,
            picks: KenoPicks::from_numbers([3, 17]).unwrap(),
        };

        let text = prompt(&state, &player);
        assert!(text.contains("Selected: 2/10"));
        assert!(text.contains("[ 3]"));
        assert!(text.contains("[17]"));
        assert!(text.contains(" 20 "));
    }

    #[test]
    fn test_render_settled_round() {
        let mut player = Player::new(GameConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let record = player
            .play_crash(50, Multiplier::from_hundredths(200), &mut rng)
            .unwrap();

        let text = reply(&Reply::Settled(record.clone()), &player);
        assert!(text.contains("CRASH RESULTS"));
        assert!(text.contains("Your target: 2.00x"));
        assert!(text.contains(&format!("New balance: {} credits", record.balance_after)));
    }

    #[test]
    fn test_help_lists_payouts() {
        let text = help(&GameConfig::default());
        assert!(text.contains("2 matches: 1x"));
        assert!(text.contains("10 matches: 10x"));
        assert!(text.contains("1.10x and 10.00x"));
    }
}
