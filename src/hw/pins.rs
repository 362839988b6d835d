// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 arm controller.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, Alternate, Analog, OpenDrain},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub feedback: FeedbackPins,
}

/// Operator console
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// I2C1 to the PCA9685 PWM board
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// Servo potentiometer taps
pub struct FeedbackPins {
    pub s0: gpioa::PA0<Analog>, // ADC1_IN0
    pub s1: gpioa::PA1<Analog>, // ADC1_IN1
    pub s2: gpioa::PA2<Analog>, // ADC1_IN2
    pub s3: gpioa::PA3<Analog>, // ADC1_IN3
    pub s4: gpioa::PA4<Analog>, // ADC1_IN4
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            feedback: FeedbackPins {
                s0: gpioa.pa0.into_analog(),
                s1: gpioa.pa1.into_analog(),
                s2: gpioa.pa2.into_analog(),
                s3: gpioa.pa3.into_analog(),
                s4: gpioa.pa4.into_analog(),
            },
        }
    }
}
