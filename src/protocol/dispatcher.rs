// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command dispatch.
//!
//! Each complete line runs exactly one engine operation and writes human-readable status text to
//! the output sink. Nothing here is fatal: every rejection is reported and control returns to the
//! read loop.

use core::fmt::Write;

use embedded_hal::blocking::delay::DelayMs;
use heapless::Vec;

use super::messages::{Command, HELP_TEXT};
use super::parser::{CommandLine, Event, LineAssembler, MAX_ARGS};
use crate::servo::{AnalogFeedback, PulseOutput, ServoEngine, ServoError};

/// What a dispatched line did.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Blank line, nothing dispatched.
    Ignored,
    Moved,
    Homed,
    Feedback(f32),
    Help,
    /// Arguments failed validation; no servo moved.
    Rejected,
    /// The PWM device failed part-way through.
    DeviceFault,
    /// Keyword not recognized; the engine was not called.
    Unknown,
}

/// Tokenize `line`, run the command it names, and report on `out`.
pub fn dispatch<P, A, D, W, const N: usize>(
    line: &str,
    engine: &mut ServoEngine<P, A, D, N>,
    out: &mut W,
) -> Outcome
where
    P: PulseOutput,
    A: AnalogFeedback,
    D: DelayMs<u32>,
    W: Write,
{
    let Some(tokens) = CommandLine::tokenize(line) else {
        return Outcome::Ignored;
    };

    let Ok(command) = Command::parse(&tokens) else {
        log_debug!("Unknown keyword {}", tokens.keyword);
        let _ = write!(out, "Invalid Command\r\n");
        return Outcome::Unknown;
    };

    match command {
        Command::Servo { index, angle } => {
            let _ = write!(out, "Moving servo {} to {}\r\n", index, angle);
            report(engine.set_one_angle(index, angle), Outcome::Moved, out)
        }
        Command::Servos(given) => {
            let angles = fill_batch(&given, engine.active());
            let _ = write!(out, "Setting servos to angles: ");
            for (i, a) in angles.iter().enumerate() {
                let sep = if i + 1 < angles.len() { ", " } else { "" };
                let _ = write!(out, "{}{}", a, sep);
            }
            let _ = write!(out, "\r\n");
            report(engine.set_all_angles(&angles), Outcome::Moved, out)
        }
        Command::Home => {
            let _ = write!(out, "Homing all servos\r\n");
            report(engine.home_all(), Outcome::Homed, out)
        }
        Command::Angle { index } => match engine.read_feedback_angle(index) {
            Ok(angle) => {
                let _ = write!(out, "Angle is: {:.1}\r\n", angle);
                Outcome::Feedback(angle)
            }
            Err(e) => report(Err(e), Outcome::Rejected, out),
        },
        Command::Help => {
            for line in HELP_TEXT {
                let _ = write!(out, "{}\r\n", line);
            }
            Outcome::Help
        }
    }
}

/// One angle per active servo: missing arguments count as zero, extras are ignored.
fn fill_batch(given: &[f32], active: usize) -> Vec<f32, MAX_ARGS> {
    (0..active.min(MAX_ARGS))
        .map(|i| given.get(i).copied().unwrap_or_default())
        .collect()
}

fn report<E, W: Write>(result: Result<(), ServoError<E>>, ok: Outcome, out: &mut W) -> Outcome {
    let msg = match result {
        Ok(()) => return ok,
        Err(ServoError::AngleOutOfRange) => "Invalid angle(s)",
        Err(ServoError::IndexOutOfRange) => "Invalid servo index",
        Err(ServoError::AngleCount { .. }) => "Wrong number of angles",
        Err(ServoError::Device(_)) => {
            let _ = write!(out, "PWM device error\r\n");
            return Outcome::DeviceFault;
        }
    };
    let _ = write!(out, "{}\r\n", msg);
    Outcome::Rejected
}

/// Serial console: assembles lines from raw bytes and dispatches each one.
pub struct Console<const C: usize> {
    lines: LineAssembler<C>,
    echo: bool,
}

impl<const C: usize> Console<C> {
    pub const fn new(echo: bool) -> Self {
        Self {
            lines: LineAssembler::new(),
            echo,
        }
    }

    /// Feed one byte from the transport.
    ///
    /// Returns the outcome when the byte completed a line. Runs to completion before returning,
    /// so the caller reads no further input while a command is executing.
    pub fn feed<P, A, D, W, const N: usize>(
        &mut self,
        byte: u8,
        engine: &mut ServoEngine<P, A, D, N>,
        out: &mut W,
    ) -> Option<Outcome>
    where
        P: PulseOutput,
        A: AnalogFeedback,
        D: DelayMs<u32>,
        W: Write,
    {
        match self.lines.push(byte) {
            Event::Idle => None,
            Event::Echo(b) => {
                if self.echo {
                    let _ = out.write_char(b as char);
                }
                None
            }
            Event::Erase => {
                if self.echo {
                    let _ = out.write_str("\x08 \x08");
                }
                None
            }
            Event::Line(line) => {
                if self.echo {
                    let _ = out.write_str("\r\n");
                }
                Some(dispatch(line, engine, out))
            }
        }
    }
}
