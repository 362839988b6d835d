// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Angle ↔ pulse calibration math.
//!
//! All conversions use the same integer affine map, truncating toward zero, so that existing
//! calibration constants reproduce the exact pulse widths measured on the arm.

/// Lowest commandable joint angle, in degrees.
pub const ANGLE_MIN: i32 = 0;

/// Highest commandable joint angle, in degrees.
pub const ANGLE_MAX: i32 = 180;

/// Integer affine map from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// `x` is not clamped. Division truncates toward zero.
#[inline]
pub const fn map(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Whether `angle` lies inside the inclusive `[0, 180]` joint range. NaN is never in range.
#[inline]
pub fn angle_in_range(angle: f32) -> bool {
    (ANGLE_MIN as f32..=ANGLE_MAX as f32).contains(&angle)
}

/// Pulse-width bounds shared by every servo, in PWM counter ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseRange {
    pub min_pulse: i32,
    pub max_pulse: i32,
    pub frequency_hz: u32,
}

impl PulseRange {
    /// Panics at compile time when used in a `const` with `min_pulse >= max_pulse`.
    pub const fn new(min_pulse: i32, max_pulse: i32, frequency_hz: u32) -> Self {
        assert!(min_pulse < max_pulse, "min_pulse must be below max_pulse");
        assert!(frequency_hz > 0, "PWM frequency must be non-zero");
        Self {
            min_pulse,
            max_pulse,
            frequency_hz,
        }
    }

    /// Width of the pulse domain.
    #[inline]
    pub const fn span(&self) -> i32 {
        self.max_pulse - self.min_pulse
    }

    /// Pulse for a whole-degree angle, before any calibration offset.
    #[inline]
    pub const fn angle_to_pulse(&self, degrees: i32) -> i32 {
        map(degrees, ANGLE_MIN, ANGLE_MAX, self.min_pulse, self.max_pulse)
    }

    /// Pulse for the 90° reference position.
    #[inline]
    pub const fn neutral(&self) -> i32 {
        self.angle_to_pulse(90)
    }

    /// Fixed pulse delta for a signed calibration offset in degrees.
    ///
    /// Maps `[-90, 90]` onto `[-span / 2, span / 2]`, so the delta does not depend on the
    /// commanded angle.
    #[inline]
    pub const fn offset_to_pulse(&self, offset_degrees: i32) -> i32 {
        let half = self.span() / 2;
        map(offset_degrees, -90, 90, -half, half)
    }

    /// Pulse delta for the homing "general offset", mapped over `[0, 180]` → `[0, span]`.
    #[inline]
    pub const fn general_offset_to_pulse(&self, degrees: i32) -> i32 {
        map(degrees, ANGLE_MIN, ANGLE_MAX, 0, self.span())
    }
}

/// Characterized raw range of one analog position sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedbackRange {
    pub raw_min: i32,
    pub raw_max: i32,
}

impl FeedbackRange {
    pub const fn new(raw_min: i32, raw_max: i32) -> Self {
        assert!(raw_min < raw_max, "raw_min must be below raw_max");
        Self { raw_min, raw_max }
    }

    /// Convert a raw sample into degrees.
    ///
    /// The sample is mapped to hundredths of a degree and then scaled down, so the result carries
    /// the same resolution as the integer map allows. Samples outside the characterized range
    /// extrapolate past 0° / 180°.
    pub fn to_degrees(&self, raw: u16) -> f32 {
        let hundredths = map(
            i32::from(raw),
            self.raw_min,
            self.raw_max,
            0,
            ANGLE_MAX * 100,
        );
        hundredths as f32 / 100.0
    }
}
