// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # armctl Firmware
//!
//! Firmware for a multi-servo robot arm controller, written in Rust, targeting an STM32F777 MCU
//! driving a PCA9685 PWM board.
//!
//! Operators talk to the arm over a serial link with short text commands (`SERVO 1 45`, `HOME`,
//! ...). Each line is tokenized, dispatched, and turned into calibrated pulse widths.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Compile-time board and calibration constants |
//! | [`protocol`] | Line assembly, tokenizing and command dispatch |
//! | [`servo`] | Angle → pulse conversion, calibration and homing |
//! | [`drivers`] | Device-level drivers (PCA9685) |
//! | `hw` | MCU-level wrappers around USART and ADC (`board` feature) |
//!
//! ## Getting Started
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod logging;

pub mod config;
pub mod drivers;
#[cfg(feature = "board")]
pub mod hw;
pub mod protocol;
pub mod servo;
