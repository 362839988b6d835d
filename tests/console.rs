// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! End-to-end tests: raw serial bytes in, pulse writes and status text out, using the arm's real
//! calibration table.

use std::cell::RefCell;
use std::rc::Rc;

use armctl::config::{self, ARM, LINE_CAPACITY};
use armctl::protocol::{Console, Outcome};
use armctl::servo::{calibration::map, AnalogFeedback, PulseOutput, ServoEngine};
use embedded_hal::blocking::delay::DelayMs;

/// Writes seen by the PWM board, shared with the simulated sensors.
type Bus = Rc<RefCell<Vec<(u8, u16)>>>;

struct Board {
    bus: Bus,
}

impl PulseOutput for Board {
    type Error = ();

    fn set_pulse(&mut self, address: u8, pulse: u16) -> Result<(), Self::Error> {
        self.bus.borrow_mut().push((address, pulse));
        Ok(())
    }
}

/// Ideal potentiometers: each sensor tracks the last pulse on its servo's channel.
struct Sensors {
    bus: Bus,
}

impl AnalogFeedback for Sensors {
    fn read_raw(&mut self, index: usize) -> u16 {
        let channel = &ARM.channels[index];
        let pulse = self
            .bus
            .borrow()
            .iter()
            .rev()
            .find(|(a, _)| *a == channel.address)
            .map(|&(_, p)| p as i32)
            .unwrap_or(ARM.pulse.neutral());
        map(
            pulse,
            config::SERVO_MIN,
            config::SERVO_MAX,
            channel.feedback.raw_min,
            channel.feedback.raw_max,
        ) as u16
    }
}

struct NoDelay;

impl DelayMs<u32> for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

struct Rig {
    bus: Bus,
    engine: ServoEngine<Board, Sensors, NoDelay, { config::NUM_SERVOS }>,
    console: Console<LINE_CAPACITY>,
}

impl Rig {
    fn new(echo: bool) -> Self {
        let bus: Bus = Rc::default();
        let engine = ServoEngine::new(
            &ARM,
            Board { bus: bus.clone() },
            Sensors { bus: bus.clone() },
            NoDelay,
        );
        Self {
            bus,
            engine,
            console: Console::new(echo),
        }
    }

    /// Feed raw bytes; returns every outcome and everything written back.
    fn send(&mut self, bytes: &[u8]) -> (Vec<Outcome>, String) {
        let mut out = String::new();
        let outcomes = bytes
            .iter()
            .filter_map(|&b| self.console.feed(b, &mut self.engine, &mut out))
            .collect();
        (outcomes, out)
    }

    fn writes(&self) -> Vec<(u8, u16)> {
        self.bus.borrow().clone()
    }
}

#[test]
fn home_writes_one_pulse_per_active_servo() {
    let mut rig = Rig::new(false);
    let (outcomes, out) = rig.send(b"HOME\n");

    assert_eq!(outcomes, vec![Outcome::Homed]);
    assert_eq!(out, "Homing all servos\r\n");
    assert_eq!(
        rig.writes(),
        vec![(0, 352), (1, 480), (2, 496), (4, 352), (5, 352)]
    );
}

#[test]
fn full_batch_fits_the_line_buffer() {
    let mut rig = Rig::new(false);
    let (outcomes, _) = rig.send(b"SERVOS 0 45 90 135 180\n");

    assert_eq!(outcomes, vec![Outcome::Moved]);
    let addresses: Vec<u8> = rig.writes().iter().map(|&(a, _)| a).collect();
    assert_eq!(addresses, vec![0, 1, 2, 4, 5]);
    assert_eq!(rig.writes()[0], (0, 145));
    assert_eq!(rig.writes()[4], (5, 560));
}

#[test]
fn out_of_range_angle_moves_nothing() {
    let mut rig = Rig::new(false);
    let (outcomes, out) = rig.send(b"SERVOS 90 90 181 90 90\nSERVO 3 -1\n");

    assert_eq!(outcomes, vec![Outcome::Rejected, Outcome::Rejected]);
    assert!(out.contains("Invalid angle(s)\r\n"));
    assert!(rig.writes().is_empty());
}

#[test]
fn boundary_angles_hit_the_pulse_limits() {
    let mut rig = Rig::new(false);
    rig.send(b"SERVO 0 0\nSERVO 0 180\nSERVO 0 180.5\n");

    assert_eq!(rig.writes(), vec![(0, 145), (0, 560)]);
}

#[test]
fn feedback_tracks_commanded_angle() {
    let mut rig = Rig::new(false);
    let (outcomes, _) = rig.send(b"SERVO 0 90\nANGLE 0\n");

    let Outcome::Feedback(angle) = outcomes[1] else {
        panic!("expected a feedback reading, got {:?}", outcomes[1]);
    };
    assert!((angle - 90.0).abs() < 1.0, "read back {}", angle);
}

#[test]
fn bad_index_and_unknown_keyword_are_reported() {
    let mut rig = Rig::new(false);
    let (outcomes, out) = rig.send(b"SERVO 7 90\nANGLE -1\nWAVE\n");

    assert_eq!(
        outcomes,
        vec![Outcome::Rejected, Outcome::Rejected, Outcome::Unknown]
    );
    assert!(out.ends_with("Invalid servo index\r\nInvalid servo index\r\nInvalid Command\r\n"));
    assert!(rig.writes().is_empty());
}

#[test]
fn overlong_line_is_truncated_not_rejected() {
    let mut rig = Rig::new(false);
    // 40 spaces push the argument past the buffer; only the keyword survives.
    let mut line = b"HOME".to_vec();
    line.extend_from_slice(&[b' '; 40]);
    line.extend_from_slice(b"garbage\nHELP\n");

    let (outcomes, _) = rig.send(&line);
    assert_eq!(outcomes, vec![Outcome::Homed, Outcome::Help]);
}

#[test]
fn echo_mirrors_typing() {
    let mut rig = Rig::new(true);
    let (_, out) = rig.send(b"hx\x08elp\r\n");

    assert!(out.starts_with("hx\x08 \x08elp\r\nList of Commands:\r\n"));
}
