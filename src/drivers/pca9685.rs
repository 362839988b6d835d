// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PCA9685 16-channel, 12-bit I2C PWM board as the servo pulse output.
//!
//! Register access comes from the `pwm-pca9685` crate. This module only adds what the arm needs on
//! top of it: the prescaler for a servo frame rate, and the [`PulseOutput`] binding that maps a
//! servo address onto an output channel with ON fixed at tick 0.

use embedded_hal::blocking::i2c::{Write, WriteRead};
use pwm_pca9685::Channel;

pub use pwm_pca9685::Pca9685;

use crate::servo::PulseOutput;

/// Internal oscillator frequency.
pub const OSC_HZ: u32 = 25_000_000;

/// Output channels in address order.
const OUTPUTS: [Channel; 16] = [
    Channel::C0,
    Channel::C1,
    Channel::C2,
    Channel::C3,
    Channel::C4,
    Channel::C5,
    Channel::C6,
    Channel::C7,
    Channel::C8,
    Channel::C9,
    Channel::C10,
    Channel::C11,
    Channel::C12,
    Channel::C13,
    Channel::C14,
    Channel::C15,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    I2c(E),
    /// Address past the last output.
    InvalidChannel(u8),
    /// The device rejected a tick count or prescaler.
    InvalidInput,
}

impl<E> From<pwm_pca9685::Error<E>> for Error<E> {
    fn from(e: pwm_pca9685::Error<E>) -> Self {
        match e {
            pwm_pca9685::Error::I2C(e) => Error::I2c(e),
            pwm_pca9685::Error::InvalidInputData => Error::InvalidInput,
        }
    }
}

/// Output channel for a servo address.
pub fn channel(address: u8) -> Option<Channel> {
    OUTPUTS.get(address as usize).copied()
}

/// Prescaler value for an output frequency, as the datasheet rounds it.
///
/// `round(osc / (4096 * f)) - 1`, limited to the hardware range `[3, 255]`.
pub const fn prescale_for(frequency_hz: u32) -> u8 {
    let div = frequency_hz.saturating_mul(4096);
    if div == 0 {
        return 255;
    }
    let rounded = (OSC_HZ + div / 2) / div;
    let value = rounded.saturating_sub(1);
    if value < 3 {
        3
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

/// Program the frame rate and start the outputs.
pub fn start<I2C, E>(pwm: &mut Pca9685<I2C>, frequency_hz: u32) -> Result<(), Error<E>>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    let prescale = prescale_for(frequency_hz);
    pwm.set_prescale(prescale)?;
    pwm.enable()?;
    log_info!("PCA9685 at {} Hz, prescale {}", frequency_hz, prescale);
    Ok(())
}

impl<I2C, E> PulseOutput for Pca9685<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = Error<E>;

    fn set_pulse(&mut self, address: u8, pulse: u16) -> Result<(), Self::Error> {
        let output = channel(address).ok_or(Error::InvalidChannel(address))?;
        self.set_channel_on_off(output, 0, pulse)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Captures every I2C write as `(address, bytes)`; reads return zeros.
    #[derive(Default)]
    struct BusSpy {
        writes: std::vec::Vec<(u8, std::vec::Vec<u8>)>,
        fail: bool,
    }

    impl Write for BusSpy {
        type Error = ();

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.writes.push((address, bytes.to_vec()));
            Ok(())
        }
    }

    impl WriteRead for BusSpy {
        type Error = ();

        fn write_read(
            &mut self,
            _address: u8,
            _bytes: &[u8],
            buffer: &mut [u8],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            buffer.fill(0);
            Ok(())
        }
    }

    fn board(bus: BusSpy, address: u8) -> Pca9685<BusSpy> {
        Pca9685::new(bus, address).unwrap()
    }

    #[test]
    fn test_prescale() {
        // 25 MHz / (4096 * 50) = 122.07
        assert_eq!(prescale_for(50), 121);
        // 25 MHz / (4096 * 1000) = 6.10
        assert_eq!(prescale_for(1000), 5);
        assert_eq!(prescale_for(1), 255);
        assert_eq!(prescale_for(10_000), 3);
        assert_eq!(prescale_for(0), 255);
    }

    #[test]
    fn test_channel_lookup() {
        assert!(matches!(channel(0), Some(Channel::C0)));
        assert!(matches!(channel(15), Some(Channel::C15)));
        assert!(channel(16).is_none());
    }

    #[test]
    fn test_start_programs_prescale() {
        let mut pwm = board(BusSpy::default(), 0x40);
        start(&mut pwm, 50).unwrap();

        let bus = pwm.destroy();
        assert!(bus.writes.iter().all(|(a, _)| *a == 0x40));
        assert!(bus.writes.iter().any(|(_, b)| b[..] == [0xFE, 121]));
    }

    #[test]
    fn test_set_pulse_frame() {
        let mut pwm = board(BusSpy::default(), 0x41);
        pwm.set_pulse(3, 352).unwrap();

        let bus = pwm.destroy();
        // LED3_ON_L = 0x06 + 4 * 3, ON = 0, OFF = 352
        let last = bus.writes.last().unwrap();
        assert_eq!(last, &(0x41, vec![0x12, 0, 0, 0x60, 0x01]));
    }

    #[test]
    fn test_invalid_channel() {
        let mut pwm = board(BusSpy::default(), 0x40);
        assert_eq!(pwm.set_pulse(16, 300), Err(Error::InvalidChannel(16)));
        assert!(pwm.destroy().writes.is_empty());
    }

    #[test]
    fn test_bus_error() {
        let mut pwm = board(
            BusSpy {
                fail: true,
                ..Default::default()
            },
            0x40,
        );
        assert_eq!(pwm.set_pulse(0, 300), Err(Error::I2c(())));
    }
}
