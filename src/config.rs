// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration for the arm.
//!
//! Nothing here changes at runtime. Invalid combinations fail the build through the `const`
//! assertions in the table builders.

use crate::servo::{PulseRange, ServoChannel, ServoTable};

// Pulse range, in PCA9685 counter ticks (out of 4096)
pub const SERVO_MIN: i32 = 145;
pub const SERVO_MAX: i32 = 560;

/// PWM frequency for analog hobby servos.
pub const SERVO_FREQ_HZ: u32 = 50;

/// Total number of servo channels on the arm.
pub const NUM_SERVOS: usize = 5;

/// Servos that accept commands, counted from index 0.
pub const ACTIVE_SERVOS: usize = 5;

/// Homing offset added to the shoulder and elbow joints, in degrees.
///
/// The host-side kinematics add the same offset to their angles.
pub const GENERAL_ANGLE_OFFSET: i32 = 60;

/// Pause between homing writes, in milliseconds.
pub const HOME_SETTLE_MS: u32 = 100;

/// Line buffer capacity in bytes. Longer lines are truncated.
pub const LINE_CAPACITY: usize = 32;

/// Echo typed characters back to the terminal.
pub const ECHO: bool = true;

/// Serial link baud rate.
pub const SERIAL_BAUD: u32 = 9_600;

/// I2C address of the PCA9685 PWM board.
pub const PCA9685_ADDRESS: u8 = 0x40;

/// I2C bus clock, in kHz.
pub const I2C_FREQ_KHZ: u32 = 100;

pub const PULSE: PulseRange = PulseRange::new(SERVO_MIN, SERVO_MAX, SERVO_FREQ_HZ);

/// Calibration table for the arm.
///
/// | Index | Joint | Notes |
/// | ----- | ----- | ----- |
/// | 0 | Base | Homes without the general offset |
/// | 1 | Shoulder | General offset; sensor characterized over `[102, 664]` |
/// | 2 | Elbow | General offset |
/// | 3 | Gripper left | |
/// | 4 | Gripper right | |
///
/// The shoulder sensor range differs from the others in the bench measurements. It is kept as
/// measured until the sensor is recharacterized.
pub const ARM: ServoTable<NUM_SERVOS> = ServoTable::new(
    PULSE,
    [
        ServoChannel::new(0),
        ServoChannel::new(1)
            .with_offset(-4)
            .with_general_offset()
            .with_feedback(102, 664),
        ServoChannel::new(2).with_offset(3).with_general_offset(),
        ServoChannel::new(4),
        ServoChannel::new(5),
    ],
    ACTIVE_SERVOS,
)
.with_general_offset(GENERAL_ANGLE_OFFSET)
.with_home_settle_ms(HOME_SETTLE_MS);

/// Analog feedback inputs available on the board.
pub const FEEDBACK_INPUTS: usize = 5;

const _: () = assert!(ACTIVE_SERVOS <= FEEDBACK_INPUTS, "not enough analog inputs");
const _: () = assert!(SERVO_MAX <= 4095, "pulse range exceeds the 12-bit counter");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_table() {
        assert_eq!(ARM.active, ACTIVE_SERVOS);
        assert!(!ARM.channels[0].general_offset);
        assert!(ARM.channels[1].general_offset);
        assert!(ARM.channels[2].general_offset);
        assert!(!ARM.channels[3].general_offset);
        assert_eq!(ARM.pulse.neutral(), 352);
    }

    #[test]
    fn test_addresses_unique() {
        for (i, a) in ARM.channels.iter().enumerate() {
            for b in &ARM.channels[i + 1..] {
                assert_ne!(a.address, b.address);
            }
        }
    }
}
