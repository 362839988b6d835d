// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Commands understood by the arm, and their text keywords.
//!
//! Keywords are matched case-insensitively.

use heapless::Vec;

use super::parser::{leading_int, parse_or_default, CommandLine, MAX_ARGS};

// Keywords
pub const KW_SERVO: &str = "SERVO";
pub const KW_SERVOS: &str = "SERVOS";
pub const KW_HOME: &str = "HOME";
pub const KW_ANGLE: &str = "ANGLE";
pub const KW_HELP: &str = "HELP";

/// Static usage text printed by `HELP`.
pub const HELP_TEXT: &[&str] = &[
    "List of Commands:",
    "SERVO index angle (moves a single servo)",
    "SERVOS a1 a2 a3 [a4 a5] (moves all servos at once)",
    "ANGLE index (gets current angle of servo)",
    "HOME (Resets all servos to 90 degrees)",
    "HELP (provides list of commands)",
    "",
    "Make sure a number/char is placed after space (Help 1)",
];

/// Keyword did not name any command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand;

/// A fully parsed command with typed arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Move one servo.
    Servo { index: usize, angle: f32 },
    /// Move every servo; angles in index order, as given on the line.
    Servos(Vec<f32, MAX_ARGS>),
    Home,
    /// Read the feedback angle of one servo.
    Angle { index: usize },
    Help,
}

impl Command {
    /// Resolve the keyword and convert the arguments to the types the command expects.
    ///
    /// Indices are read as their leading integer; missing or malformed angles become zero. A line
    /// that starts with a number is a bare `SERVOS` line.
    pub fn parse(line: &CommandLine<'_>) -> Result<Self, UnknownCommand> {
        let keyword = line.keyword;

        if keyword.eq_ignore_ascii_case(KW_SERVO) {
            Ok(Command::Servo {
                index: parse_index(line.arg(0)),
                angle: parse_or_default(line.arg(1)),
            })
        } else if keyword.eq_ignore_ascii_case(KW_SERVOS) {
            Ok(Command::Servos(parse_angles(line.args.iter().copied())))
        } else if keyword.eq_ignore_ascii_case(KW_HOME) {
            Ok(Command::Home)
        } else if keyword.eq_ignore_ascii_case(KW_ANGLE) {
            Ok(Command::Angle {
                index: parse_index(line.arg(0)),
            })
        } else if keyword.eq_ignore_ascii_case(KW_HELP) {
            Ok(Command::Help)
        } else if looks_numeric(keyword) && keyword.parse::<f32>().is_ok() {
            Ok(Command::Servos(parse_angles(line.tokens())))
        } else {
            Err(UnknownCommand)
        }
    }
}

/// Servo index argument. Negative values become an index no table can hold.
fn parse_index(token: Option<&str>) -> usize {
    usize::try_from(leading_int(token)).unwrap_or(usize::MAX)
}

/// Keeps `nan` and `inf` keywords out of the bare-angle path.
fn looks_numeric(token: &str) -> bool {
    matches!(
        token.as_bytes().first(),
        Some(b'0'..=b'9' | b'-' | b'+' | b'.')
    )
}

fn parse_angles<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<f32, MAX_ARGS> {
    tokens
        .take(MAX_ARGS)
        .map(|t| parse_or_default(Some(t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, UnknownCommand> {
        Command::parse(&CommandLine::tokenize(line).unwrap())
    }

    #[test]
    fn test_servo() {
        assert_eq!(
            parse("SERVO 1 45.5"),
            Ok(Command::Servo {
                index: 1,
                angle: 45.5
            })
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse("home"), Ok(Command::Home));
        assert_eq!(parse("Help"), Ok(Command::Help));
        assert_eq!(parse("angle 2"), Ok(Command::Angle { index: 2 }));
    }

    #[test]
    fn test_malformed_args_become_zero() {
        assert_eq!(
            parse("SERVO x y"),
            Ok(Command::Servo {
                index: 0,
                angle: 0.0
            })
        );
        assert_eq!(parse("ANGLE"), Ok(Command::Angle { index: 0 }));
    }

    #[test]
    fn test_negative_index() {
        assert_eq!(parse("ANGLE -1"), Ok(Command::Angle { index: usize::MAX }));
    }

    #[test]
    fn test_servos() {
        let Ok(Command::Servos(angles)) = parse("SERVOS 10 20 30.5 abc") else {
            panic!("expected SERVOS");
        };
        assert_eq!(&angles[..], &[10.0, 20.0, 30.5, 0.0]);
    }

    #[test]
    fn test_bare_angles() {
        let Ok(Command::Servos(angles)) = parse("90 45 120") else {
            panic!("expected bare SERVOS");
        };
        assert_eq!(&angles[..], &[90.0, 45.0, 120.0]);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse("JUMP 3"), Err(UnknownCommand));
        assert_eq!(parse("SERVOX 1 2"), Err(UnknownCommand));
    }

    #[test]
    fn test_index_reads_leading_integer() {
        assert_eq!(
            parse("SERVO 1.5 90"),
            Ok(Command::Servo {
                index: 1,
                angle: 90.0
            })
        );
        assert_eq!(parse("ANGLE 2x"), Ok(Command::Angle { index: 2 }));
    }

    #[test]
    fn test_float_words_are_not_angles() {
        assert_eq!(parse("nan"), Err(UnknownCommand));
        assert_eq!(parse("inf 90"), Err(UnknownCommand));
        assert_eq!(parse("Infinity"), Err(UnknownCommand));
        assert!(matches!(parse(".5 -1"), Ok(Command::Servos(_))));
    }
}
