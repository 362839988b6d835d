// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line-based text command protocol used to drive the arm over serial.
//!
//! ```text
//! SERVO <index> <angle>      moves one servo
//! SERVOS <a1> <a2> <a3> ...  moves all servos at once (a bare "a1 a2 a3" line works too)
//! HOME                       neutral position, all servos
//! ANGLE <index>              prints the feedback angle
//! HELP                       prints the command list
//! ```

pub mod dispatcher;
pub mod messages;
pub mod parser;

pub use dispatcher::{dispatch, Console, Outcome};
pub use messages::{Command, UnknownCommand};
pub use parser::{CommandLine, Event, LineAssembler};
