// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers for the STM32F777 arm controller board.

pub mod adc;
pub mod pins;
pub mod usart;

pub use adc::FeedbackAdc;
pub use pins::BoardPins;
pub use usart::Usart;
