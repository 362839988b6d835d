// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo actuation engine.
//!
//! Owns the PWM device, the feedback sensors, and the settle delay. Calibration offsets are
//! converted to pulse deltas once at construction; every later operation only reads them.

use embedded_hal::blocking::delay::DelayMs;

use super::calibration::{angle_in_range, PulseRange};
use super::{AnalogFeedback, PulseOutput, ServoChannel, ServoError, ServoTable};

/// Largest value the 12-bit PWM counter accepts.
pub const PULSE_COUNTER_MAX: i32 = 4095;

/// Result of a homing sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Homing {
    Complete,
    /// Stopped early; the first `written` channels were homed.
    Interrupted { written: usize },
}

/// A table entry with its offset already in pulse units.
#[derive(Copy, Clone, Debug)]
struct Calibrated {
    channel: ServoChannel,
    pulse_offset: i32,
}

pub struct ServoEngine<P, A, D, const N: usize> {
    pwm: P,
    feedback: A,
    delay: D,
    pulse: PulseRange,
    channels: [Calibrated; N],
    active: usize,
    general_pulse_offset: i32,
    home_settle_ms: u32,
}

impl<P, A, D, const N: usize> ServoEngine<P, A, D, N>
where
    P: PulseOutput,
    A: AnalogFeedback,
    D: DelayMs<u32>,
{
    /// Build the engine from a calibration table and its hardware collaborators.
    pub fn new(table: &ServoTable<N>, pwm: P, feedback: A, delay: D) -> Self {
        let pulse = table.pulse;
        let channels = table.channels.map(|channel| Calibrated {
            pulse_offset: pulse.offset_to_pulse(channel.angle_offset_deg),
            channel,
        });

        Self {
            pwm,
            feedback,
            delay,
            pulse,
            channels,
            active: table.active.min(N),
            general_pulse_offset: pulse.general_offset_to_pulse(table.general_offset_deg),
            home_settle_ms: table.home_settle_ms,
        }
    }

    /// Number of addressable servos.
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Calibration offset of an active servo, in pulse units.
    pub fn pulse_offset(&self, index: usize) -> Option<i32> {
        self.channels[..self.active]
            .get(index)
            .map(|c| c.pulse_offset)
    }

    /// Pulse delta added to flagged channels while homing.
    #[inline]
    pub fn general_pulse_offset(&self) -> i32 {
        self.general_pulse_offset
    }

    /// Access the PWM device.
    #[inline]
    pub fn pwm(&mut self) -> &mut P {
        &mut self.pwm
    }

    /// Release the hardware collaborators.
    pub fn free(self) -> (P, A, D) {
        (self.pwm, self.feedback, self.delay)
    }

    /// Calibrated pulse for `angle` on servo `index`. The angle must already be validated.
    fn pulse_for(&self, index: usize, angle: f32) -> i32 {
        // Fractional degrees truncate toward zero before mapping.
        self.pulse.angle_to_pulse(angle as i32) + self.channels[index].pulse_offset
    }

    /// Move every active servo at once.
    ///
    /// All angles are validated before the first write: if any one is out of range, nothing is
    /// written. Channels are written in increasing index order.
    pub fn set_all_angles(&mut self, angles: &[f32]) -> Result<(), ServoError<P::Error>> {
        if angles.len() != self.active {
            log_warn!(
                "set_all_angles: expected {} angles, got {}",
                self.active,
                angles.len()
            );
            return Err(ServoError::AngleCount {
                expected: self.active,
                got: angles.len(),
            });
        }

        if !angles.iter().all(|&a| angle_in_range(a)) {
            log_warn!("set_all_angles: angle out of range, batch rejected");
            return Err(ServoError::AngleOutOfRange);
        }

        for (index, &angle) in angles.iter().enumerate() {
            let pulse = self.pulse_for(index, angle);
            self.write(index, pulse)?;
        }

        Ok(())
    }

    /// Move one servo, leaving the others untouched.
    pub fn set_one_angle(&mut self, index: usize, angle: f32) -> Result<(), ServoError<P::Error>> {
        if index >= self.active {
            log_warn!("set_one_angle: index {} out of range", index);
            return Err(ServoError::IndexOutOfRange);
        }
        if !angle_in_range(angle) {
            log_warn!("set_one_angle: angle {} out of range", angle);
            return Err(ServoError::AngleOutOfRange);
        }

        let pulse = self.pulse_for(index, angle);
        self.write(index, pulse)
    }

    /// Drive every active servo to its calibrated 90° position.
    pub fn home_all(&mut self) -> Result<(), ServoError<P::Error>> {
        self.home_all_until(|| false).map(|_| ())
    }

    /// Homing sequence that polls `stop` between writes.
    ///
    /// `stop` is checked before every write except the first. When the table has a settle pause,
    /// it is taken after each write except the last.
    pub fn home_all_until<F>(&mut self, mut stop: F) -> Result<Homing, ServoError<P::Error>>
    where
        F: FnMut() -> bool,
    {
        let neutral = self.pulse.neutral();
        log_info!("Homing {} servos, neutral pulse {}", self.active, neutral);

        for index in 0..self.active {
            if index > 0 {
                if self.home_settle_ms > 0 {
                    self.delay.delay_ms(self.home_settle_ms);
                }
                if stop() {
                    log_warn!("Homing interrupted after {} servos", index);
                    return Ok(Homing::Interrupted { written: index });
                }
            }

            let pulse = self.home_pulse(index);
            self.write(index, pulse)?;
        }

        Ok(Homing::Complete)
    }

    /// Pulse that homing writes to servo `index`.
    fn home_pulse(&self, index: usize) -> i32 {
        let c = &self.channels[index];
        let general = if c.channel.general_offset {
            self.general_pulse_offset
        } else {
            0
        };
        self.pulse.neutral() + c.pulse_offset + general
    }

    /// Estimated joint angle from the analog position sensor of servo `index`.
    ///
    /// Telemetry only; the value never feeds back into the commanded pulse.
    pub fn read_feedback_angle(&mut self, index: usize) -> Result<f32, ServoError<P::Error>> {
        if index >= self.active {
            return Err(ServoError::IndexOutOfRange);
        }

        let raw = self.feedback.read_raw(index);
        let degrees = self.channels[index].channel.feedback.to_degrees(raw);
        log_debug!("Feedback servo {}: raw {} -> {} deg", index, raw, degrees);
        Ok(degrees)
    }

    fn write(&mut self, index: usize, pulse: i32) -> Result<(), ServoError<P::Error>> {
        let address = self.channels[index].channel.address;
        let clamped = pulse.clamp(0, PULSE_COUNTER_MAX);
        if clamped != pulse {
            log_warn!(
                "Servo {} pulse {} outside counter range, clamped to {}",
                index,
                pulse,
                clamped
            );
        }

        log_debug!("Servo {} (ch {}) <- {}", index, address, clamped);
        self.pwm
            .set_pulse(address, clamped as u16)
            .map_err(|e| {
                log_error!("PWM write failed on channel {}", address);
                ServoError::Device(e)
            })
    }
}
