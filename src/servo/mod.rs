// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Servo Actuation
//!
//! Converts joint angles into calibrated pulse widths and drives them onto a PWM device.
//!
//! ## Modules
//!
//! - [`calibration`] - Integer affine maps between angle, pulse, and sensor domains.
//! - [`engine`] - [`ServoEngine`]: validation, single/all-channel moves, homing, feedback.
//! - `mock` - Spy collaborators for tests (`mock` feature or unit tests).
//!
//! The hardware is reached only through [`PulseOutput`] and [`AnalogFeedback`], so the engine runs
//! unchanged on the board and in host tests.

pub mod calibration;
pub mod engine;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use calibration::{FeedbackRange, PulseRange};
pub use engine::{Homing, ServoEngine};

/// A PWM output device that accepts a channel address and a pulse width.
///
/// The device applies whatever it is given. Range checking is the caller's job.
pub trait PulseOutput {
    type Error;

    fn set_pulse(&mut self, address: u8, pulse: u16) -> Result<(), Self::Error>;
}

/// Analog position sensors, one per logical servo index.
///
/// Samples are expected in the 10-bit range the feedback calibration was characterized in.
pub trait AnalogFeedback {
    fn read_raw(&mut self, index: usize) -> u16;
}

/// Why an engine operation was rejected or failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError<E> {
    /// At least one angle is outside `[0, 180]`. Nothing was written.
    AngleOutOfRange,
    /// Servo index outside `[0, active)`. Nothing was written.
    IndexOutOfRange,
    /// Batch size does not match the number of active servos. Nothing was written.
    AngleCount { expected: usize, got: usize },
    /// The PWM device reported an error; writes after the failing one were skipped.
    Device(E),
}

/// One physical servo and its calibration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoChannel {
    /// Output channel on the PWM device. Need not match the logical index.
    pub address: u8,
    /// Signed correction for mechanical misalignment, in degrees.
    pub angle_offset_deg: i32,
    /// Whether homing adds the table-wide general offset to this channel.
    pub general_offset: bool,
    pub feedback: FeedbackRange,
}

impl ServoChannel {
    /// Default sensor characterization of the arm's feedback potentiometers.
    pub const DEFAULT_FEEDBACK: FeedbackRange = FeedbackRange::new(104, 662);

    pub const fn new(address: u8) -> Self {
        Self {
            address,
            angle_offset_deg: 0,
            general_offset: false,
            feedback: Self::DEFAULT_FEEDBACK,
        }
    }

    pub const fn with_offset(mut self, degrees: i32) -> Self {
        assert!(degrees >= -90 && degrees <= 90, "offset must be within ±90°");
        self.angle_offset_deg = degrees;
        self
    }

    pub const fn with_general_offset(mut self) -> Self {
        self.general_offset = true;
        self
    }

    pub const fn with_feedback(mut self, raw_min: i32, raw_max: i32) -> Self {
        self.feedback = FeedbackRange::new(raw_min, raw_max);
        self
    }
}

/// Full actuator configuration, fixed at build time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoTable<const N: usize> {
    pub pulse: PulseRange,
    pub channels: [ServoChannel; N],
    /// Number of addressable servos, counted from index 0.
    pub active: usize,
    /// Extra homing offset, in degrees, for channels flagged with `general_offset`.
    pub general_offset_deg: i32,
    /// Pause between homing writes, in milliseconds. `0` disables it.
    pub home_settle_ms: u32,
}

impl<const N: usize> ServoTable<N> {
    pub const fn new(pulse: PulseRange, channels: [ServoChannel; N], active: usize) -> Self {
        assert!(active <= N, "more active servos than table entries");
        Self {
            pulse,
            channels,
            active,
            general_offset_deg: 0,
            home_settle_ms: 0,
        }
    }

    pub const fn with_general_offset(mut self, degrees: i32) -> Self {
        self.general_offset_deg = degrees;
        self
    }

    pub const fn with_home_settle_ms(mut self, ms: u32) -> Self {
        self.home_settle_ms = ms;
        self
    }
}
