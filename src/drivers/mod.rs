// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit between the MCU peripherals and the
//! servo engine. They are generic over `embedded-hal` traits so they build and test on the host.
//!
//! ## Existing drivers
//!
//! - [`pca9685`] – NXP PCA9685 16-channel 12-bit I2C PWM driver (Adafruit servo board)

pub mod pca9685;

pub use pca9685::Pca9685;
