//! Parsing of UCI input lines into typed commands.

use std::str::FromStr;

use super::error::UciError;
use crate::engine::GoParams;

/// Base position of a `position` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionBase {
    StartPos,
    Fen(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionCommand {
    pub base: PositionBase,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    /// `None` when `debug` came without an argument
    Debug(Option<bool>),
    IsReady,
    SetOption { name: String, value: Option<String> },
    UciNewGame,
    Position(PositionCommand),
    Go(GoParams),
    Stop,
    Quit,
    Perft(u32),
    Unknown(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_uci_command(line: &str) -> Result<Option<UciCommand>, UciError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = parts.split_first() else {
        return Ok(None);
    };

    let cmd = match keyword {
        "uci" => UciCommand::Uci,
        "debug" => UciCommand::Debug(args.first().map(|arg| *arg == "on")),
        "isready" => UciCommand::IsReady,
        "setoption" => match parse_setoption(args) {
            Some((name, value)) => UciCommand::SetOption { name, value },
            None => UciCommand::Unknown(line.trim().to_string()),
        },
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(parse_position(args)?),
        "go" => UciCommand::Go(parse_go(args)?),
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "perft" => {
            let depth = match args.first() {
                Some(token) => parse_number("perft", Some(token))?,
                None => 1,
            };
            UciCommand::Perft(depth)
        }
        _ => UciCommand::Unknown(line.trim().to_string()),
    };

    Ok(Some(cmd))
}

/// `position [startpos | fen <FEN>] [moves <m1> <m2> ...]`.
///
/// Without `startpos` or `fen` the base is the start position, so
/// `position moves e2e4` is accepted.
fn parse_position(args: &[&str]) -> Result<PositionCommand, UciError> {
    let moves_at = args.iter().position(|t| *t == "moves");
    let (head, moves) = match moves_at {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[][..]),
    };

    let base = match head.first() {
        Some(&"fen") => {
            if head.len() < 2 {
                return Err(UciError::MissingFen);
            }
            PositionBase::Fen(head[1..].join(" "))
        }
        _ => PositionBase::StartPos,
    };

    Ok(PositionCommand {
        base,
        moves: moves.iter().map(|m| (*m).to_string()).collect(),
    })
}

fn parse_number<T: FromStr>(keyword: &str, token: Option<&&str>) -> Result<T, UciError> {
    let token = token.ok_or_else(|| UciError::InvalidNumber {
        keyword: keyword.to_string(),
        token: None,
    })?;
    token.parse::<T>().map_err(|_| UciError::InvalidNumber {
        keyword: keyword.to_string(),
        token: Some((*token).to_string()),
    })
}

/// Clock values may arrive negative when a GUI lets the engine overstep.
fn parse_millis(keyword: &str, token: Option<&&str>) -> Result<u64, UciError> {
    let ms: i64 = parse_number(keyword, token)?;
    Ok(ms.max(0) as u64)
}

/// `go` arguments. Unknown tokens are skipped.
fn parse_go(args: &[&str]) -> Result<GoParams, UciError> {
    let mut go = GoParams::default();
    let mut i = 0;
    while i < args.len() {
        let keyword = args[i];
        let value = args.get(i + 1);
        let mut consumed = 2;
        match keyword {
            "infinite" => {
                go.infinite = true;
                consumed = 1;
            }
            "movetime" => go.movetime = Some(parse_millis(keyword, value)?),
            "wtime" => go.wtime = Some(parse_millis(keyword, value)?),
            "btime" => go.btime = Some(parse_millis(keyword, value)?),
            "winc" => go.winc = Some(parse_millis(keyword, value)?),
            "binc" => go.binc = Some(parse_millis(keyword, value)?),
            "movestogo" => go.movestogo = Some(parse_number(keyword, value)?),
            "depth" => go.depth = Some(parse_number(keyword, value)?),
            "nodes" => go.nodes = Some(parse_number(keyword, value)?),
            _ => consumed = 1,
        }
        i += consumed;
    }
    Ok(go)
}

/// Split `name <N...> [value <V...>]`. Names may contain spaces.
#[must_use]
pub fn parse_setoption(args: &[&str]) -> Option<(String, Option<String>)> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in args {
        match *part {
            "name" if mode.is_empty() => mode = "name",
            "value" if mode == "name" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> UciCommand {
        parse_uci_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_uci_command("   ").unwrap(), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("uci"), UciCommand::Uci);
        assert_eq!(parse("  isready  "), UciCommand::IsReady);
        assert_eq!(parse("ucinewgame"), UciCommand::UciNewGame);
        assert_eq!(parse("stop"), UciCommand::Stop);
        assert_eq!(parse("quit"), UciCommand::Quit);
        assert_eq!(parse("xyzzy 1 2"), UciCommand::Unknown("xyzzy 1 2".to_string()));
    }

    #[test]
    fn test_debug() {
        assert_eq!(parse("debug on"), UciCommand::Debug(Some(true)));
        assert_eq!(parse("debug off"), UciCommand::Debug(Some(false)));
        assert_eq!(parse("debug"), UciCommand::Debug(None));
    }

    #[test]
    fn test_position_startpos_with_moves() {
        let UciCommand::Position(cmd) = parse("position startpos moves e2e4 e7e5") else {
            panic!("expected position");
        };
        assert_eq!(cmd.base, PositionBase::StartPos);
        assert_eq!(cmd.moves, vec!["e2e4", "e7e5"]);
    }

    #[test]
    fn test_position_defaults_to_startpos() {
        let UciCommand::Position(cmd) = parse("position moves e2e4") else {
            panic!("expected position");
        };
        assert_eq!(cmd.base, PositionBase::StartPos);
        assert_eq!(cmd.moves, vec!["e2e4"]);

        let UciCommand::Position(cmd) = parse("position") else {
            panic!("expected position");
        };
        assert_eq!(cmd.base, PositionBase::StartPos);
        assert!(cmd.moves.is_empty());
    }

    #[test]
    fn test_position_fen() {
        let UciCommand::Position(cmd) =
            parse("position fen 8/8/8/8/8/8/8/K6k w - - 0 1 moves a1a2")
        else {
            panic!("expected position");
        };
        assert_eq!(
            cmd.base,
            PositionBase::Fen("8/8/8/8/8/8/8/K6k w - - 0 1".to_string())
        );
        assert_eq!(cmd.moves, vec!["a1a2"]);
    }

    #[test]
    fn test_position_fen_missing() {
        assert!(matches!(
            parse_uci_command("position fen"),
            Err(UciError::MissingFen)
        ));
        assert!(matches!(
            parse_uci_command("position fen moves e2e4"),
            Err(UciError::MissingFen)
        ));
    }

    #[test]
    fn test_go_params() {
        let UciCommand::Go(go) =
            parse("go wtime 300000 btime 299000 winc 2000 binc 2000 movestogo 40 depth 12")
        else {
            panic!("expected go");
        };
        assert_eq!(go.wtime, Some(300_000));
        assert_eq!(go.btime, Some(299_000));
        assert_eq!(go.winc, Some(2_000));
        assert_eq!(go.binc, Some(2_000));
        assert_eq!(go.movestogo, Some(40));
        assert_eq!(go.depth, Some(12));
        assert!(!go.infinite);
    }

    #[test]
    fn test_go_infinite_and_unknown_tokens() {
        let UciCommand::Go(go) = parse("go ponder infinite nodes 5000") else {
            panic!("expected go");
        };
        assert!(go.infinite);
        assert_eq!(go.nodes, Some(5000));
        assert_eq!(parse("go"), UciCommand::Go(GoParams::default()));
    }

    #[test]
    fn test_go_negative_clock_is_zero() {
        let UciCommand::Go(go) = parse("go wtime -150 btime 1000") else {
            panic!("expected go");
        };
        assert_eq!(go.wtime, Some(0));
    }

    #[test]
    fn test_go_bad_numbers() {
        assert!(matches!(
            parse_uci_command("go movetime soon"),
            Err(UciError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_uci_command("go depth"),
            Err(UciError::InvalidNumber { token: None, .. })
        ));
    }

    #[test]
    fn test_perft() {
        assert_eq!(parse("perft 4"), UciCommand::Perft(4));
        assert_eq!(parse("perft"), UciCommand::Perft(1));
        assert!(parse_uci_command("perft x").is_err());
    }

    #[test]
    fn test_setoption() {
        assert_eq!(
            parse("setoption name Move Overhead value 100"),
            UciCommand::SetOption {
                name: "Move Overhead".to_string(),
                value: Some("100".to_string()),
            }
        );
        assert_eq!(
            parse("setoption name Clear Hash"),
            UciCommand::SetOption {
                name: "Clear Hash".to_string(),
                value: None,
            }
        );
        assert!(matches!(parse("setoption value 3"), UciCommand::Unknown(_)));
    }
}
