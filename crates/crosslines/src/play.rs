//! Hot-seat match on stdin/stdout.

use anyhow::Result;
use crosslines_rules::{
    GameSession, Point, PointParseError, RulesConfig, export_snapshot, import_snapshot,
};
use derive_more::{Display, Error, From};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

const HELP: &str = "\
Commands:
  x,y          select an origin or a destination
  x,y x,y      move from the first point to the second
  clear        drop the current selection
  hints        list hint points
  undo         take back the last step
  reset        start over (keep sides); `reset full` restores sides
  swap         exchange start and goal edges and start over
  export       print a snapshot
  import JSON  load a snapshot
  help         show this text
  quit         leave";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    /// Two-phase pointer input.
    Click(Point),
    /// Direct move for the player to move.
    Move(Point, Point),
    /// Drop the selection.
    Clear,
    /// List hint points.
    Hints,
    /// Undo one step.
    Undo,
    /// Reset; `true` also restores the default sides.
    Reset(bool),
    /// Swap sides.
    Swap,
    /// Print a snapshot.
    Export,
    /// Load a snapshot.
    Import(String),
    /// Show commands.
    Help,
    /// Leave.
    Quit,
}

/// Input line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum PlayCommandError {
    /// Unknown word.
    #[display("Unknown command {:?}; type `help`", _0)]
    #[from(ignore)]
    Unknown(#[error(not(source))] String),
    /// Coordinates that do not parse.
    #[display("{}", _0)]
    Point(PointParseError),
}

impl FromStr for PlayCommand {
    type Err = PlayCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        match (word, rest) {
            ("quit" | "q" | "exit", "") => Ok(PlayCommand::Quit),
            ("help" | "?", "") => Ok(PlayCommand::Help),
            ("clear", "") => Ok(PlayCommand::Clear),
            ("hints", "") => Ok(PlayCommand::Hints),
            ("undo", "") => Ok(PlayCommand::Undo),
            ("reset", "") => Ok(PlayCommand::Reset(false)),
            ("reset", "full") => Ok(PlayCommand::Reset(true)),
            ("swap", "") => Ok(PlayCommand::Swap),
            ("export", "") => Ok(PlayCommand::Export),
            ("import", json) if !json.is_empty() => Ok(PlayCommand::Import(json.to_string())),
            (first, "") if first.contains(',') => Ok(PlayCommand::Click(first.parse()?)),
            (first, second) if first.contains(',') => {
                Ok(PlayCommand::Move(first.parse()?, second.parse()?))
            }
            _ => Err(PlayCommandError::Unknown(line.to_string())),
        }
    }
}

/// Runs the interactive loop until `quit` or end of input.
#[instrument(skip(config))]
pub async fn run(config: RulesConfig) -> Result<()> {
    let mut session = GameSession::new(config)
        .with_status_observer(|status: &str| println!(">> {}", status));
    info!("Hot-seat match started");

    println!("{}", HELP);
    render(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<PlayCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!(?command, "Command");
        if command == PlayCommand::Quit {
            break;
        }
        if let Some(reply) = execute(&mut session, command) {
            println!("{}", reply);
        }
        render(&session);
    }

    info!(outcome = ?session.outcome(), "Hot-seat match ended");
    Ok(())
}

/// Applies a command; returns text to print besides the status line.
pub fn execute(session: &mut GameSession, command: PlayCommand) -> Option<String> {
    match command {
        PlayCommand::Click(point) => session
            .click(point)
            .err()
            .map(|e| format!("Rejected: {}", e)),
        PlayCommand::Move(from, to) => {
            let player = session.current_player();
            session
                .propose_move(from, to, player)
                .err()
                .map(|e| format!("Rejected: {}", e))
        }
        PlayCommand::Clear => {
            session.clear_selection();
            None
        }
        PlayCommand::Hints => {
            let hints = session.hint_points();
            if hints.is_empty() {
                Some("No hints".to_string())
            } else {
                let list: Vec<String> = hints.iter().map(ToString::to_string).collect();
                Some(format!("Hints: {}", list.join(" ")))
            }
        }
        PlayCommand::Undo => (!session.undo()).then(|| "Nothing to undo".to_string()),
        PlayCommand::Reset(full) => {
            session.reset(full);
            None
        }
        PlayCommand::Swap => {
            session.swap_sides();
            None
        }
        PlayCommand::Export => Some(export_snapshot(session)),
        PlayCommand::Import(json) => import_snapshot(session, &json)
            .err()
            .map(|e| format!("Import failed: {}", e)),
        PlayCommand::Help => Some(HELP.to_string()),
        PlayCommand::Quit => None,
    }
}

fn render(session: &GameSession) {
    print!("{}", session.board());
    println!("{}", session.status_text());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosslines_rules::Player;

    #[test]
    fn test_parse_commands() {
        assert_eq!("2,4".parse(), Ok(PlayCommand::Click(Point::new(2, 4))));
        assert_eq!(
            " 2,4   2,3 ".parse(),
            Ok(PlayCommand::Move(Point::new(2, 4), Point::new(2, 3)))
        );
        assert_eq!("reset full".parse(), Ok(PlayCommand::Reset(true)));
        assert_eq!("q".parse(), Ok(PlayCommand::Quit));
        assert_eq!(
            "import {\"v\":1}".parse(),
            Ok(PlayCommand::Import("{\"v\":1}".to_string()))
        );
        assert!(matches!(
            "dance".parse::<PlayCommand>(),
            Err(PlayCommandError::Unknown(_))
        ));
        assert!(matches!(
            "2,x".parse::<PlayCommand>(),
            Err(PlayCommandError::Point(_))
        ));
    }

    #[test]
    fn test_execute_moves_and_undo() {
        let mut session = GameSession::default();
        assert_eq!(
            execute(
                &mut session,
                PlayCommand::Move(Point::new(2, 4), Point::new(2, 3))
            ),
            None
        );
        assert_eq!(session.current_player(), Player::P2);

        let rejected = execute(
            &mut session,
            PlayCommand::Move(Point::new(2, 0), Point::new(2, 3)),
        );
        assert!(rejected.is_some_and(|r| r.starts_with("Rejected")));

        assert_eq!(execute(&mut session, PlayCommand::Undo), None);
        assert_eq!(
            execute(&mut session, PlayCommand::Undo),
            Some("Nothing to undo".to_string())
        );
    }

    #[test]
    fn test_execute_reports_refused_click() {
        let mut session = GameSession::default();
        assert_eq!(
            execute(&mut session, PlayCommand::Click(Point::new(2, 2))),
            Some("Rejected: (2,2) is not on your start edge".to_string())
        );
        assert_eq!(execute(&mut session, PlayCommand::Click(Point::new(2, 4))), None);
        assert_eq!(session.selected(), Some(Point::new(2, 4)));
    }

    #[test]
    fn test_export_import_through_commands() {
        let mut session = GameSession::default();
        execute(&mut session, PlayCommand::Click(Point::new(0, 4)));
        execute(&mut session, PlayCommand::Click(Point::new(0, 3)));
        let snapshot = execute(&mut session, PlayCommand::Export).unwrap();

        let mut other = GameSession::default();
        assert_eq!(execute(&mut other, PlayCommand::Import(snapshot)), None);
        assert_eq!(other.board(), session.board());
    }
}
