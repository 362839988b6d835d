// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Spy collaborators for testing the engine without hardware.
//!
//! Available in unit tests and with the `mock` feature.

use embedded_hal::blocking::delay::DelayMs;
use heapless::Vec;

use super::{AnalogFeedback, PulseOutput};

/// Capacity of the write log kept by [`SpyPwm`].
pub const SPY_CAPACITY: usize = 64;

/// Error returned by [`SpyPwm`] for a channel marked with [`SpyPwm::fail_on`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpyError;

/// PWM device that records every `(address, pulse)` write in order.
#[derive(Debug, Default)]
pub struct SpyPwm {
    writes: Vec<(u8, u16), SPY_CAPACITY>,
    fail_on: Option<u8>,
}

impl SpyPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes to `address` fail without being recorded.
    pub fn fail_on(&mut self, address: u8) {
        self.fail_on = Some(address);
    }

    pub fn writes(&self) -> &[(u8, u16)] {
        &self.writes
    }

    /// Most recent pulse written to `address`.
    pub fn last_pulse(&self, address: u8) -> Option<u16> {
        self.writes
            .iter()
            .rev()
            .find(|(a, _)| *a == address)
            .map(|&(_, p)| p)
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl PulseOutput for SpyPwm {
    type Error = SpyError;

    fn set_pulse(&mut self, address: u8, pulse: u16) -> Result<(), Self::Error> {
        if self.fail_on == Some(address) {
            return Err(SpyError);
        }
        // Oldest entries are kept; tests never come close to the capacity.
        let _ = self.writes.push((address, pulse));
        Ok(())
    }
}

/// Feedback source returning the same raw sample on every channel.
#[derive(Debug, Clone, Copy)]
pub struct FixedFeedback {
    raw: u16,
}

impl FixedFeedback {
    pub fn new(raw: u16) -> Self {
        Self { raw }
    }
}

impl AnalogFeedback for FixedFeedback {
    fn read_raw(&mut self, _index: usize) -> u16 {
        self.raw
    }
}

/// Delay that returns immediately and records each requested pause.
#[derive(Debug, Default)]
pub struct SpyDelay {
    calls: Vec<u32, SPY_CAPACITY>,
}

impl SpyDelay {
    pub fn calls(&self) -> &[u32] {
        &self.calls
    }
}

impl DelayMs<u32> for SpyDelay {
    fn delay_ms(&mut self, ms: u32) {
        let _ = self.calls.push(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spy_pwm_records_in_order() {
        let mut pwm = SpyPwm::new();
        pwm.set_pulse(3, 100).unwrap();
        pwm.set_pulse(1, 200).unwrap();
        pwm.set_pulse(3, 300).unwrap();

        assert_eq!(pwm.writes(), &[(3, 100), (1, 200), (3, 300)]);
        assert_eq!(pwm.last_pulse(3), Some(300));
        assert_eq!(pwm.last_pulse(7), None);
    }

    #[test]
    fn test_spy_pwm_failure() {
        let mut pwm = SpyPwm::new();
        pwm.fail_on(2);
        assert_eq!(pwm.set_pulse(2, 100), Err(SpyError));
        assert!(pwm.writes().is_empty());
    }
}
