// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo position feedback on ADC1, using direct PAC register access.
//!
//! Each servo's potentiometer tap is wired to one ADC1 input (PA0..PA4 are IN0..IN4). Samples are
//! taken with blocking single conversions and reduced from 12 to 10 bits, the resolution the
//! feedback calibration was measured at.

use stm32f7xx_hal::pac;

use crate::config::FEEDBACK_INPUTS;
use crate::servo::AnalogFeedback;

/// ADC1 input for each logical servo index.
pub const FEEDBACK_CHANNELS: [u8; FEEDBACK_INPUTS] = [0, 1, 2, 3, 4];

pub struct FeedbackAdc {
    adc: pac::ADC1,
}

impl FeedbackAdc {
    /// Enable and configure ADC1 for software-triggered single conversions.
    pub fn new(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc1.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger
        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Long sample time on the feedback inputs; the pots are high impedance.
        adc1.smpr2.modify(|_, w| {
            w.smp0().bits(0b111);
            w.smp1().bits(0b111);
            w.smp2().bits(0b111);
            w.smp3().bits(0b111);
            w.smp4().bits(0b111);
            w
        });

        // Sequence length = 1 conversion
        adc1.sqr1.modify(|_, w| w.l().bits(0));

        adc1.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc: adc1 }
    }

    #[inline]
    pub fn free(self) -> pac::ADC1 {
        self.adc
    }

    /// Raw 12-bit sample of one ADC1 input.
    pub fn read(&mut self, channel: u8) -> u16 {
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
        while self.adc.sr.read().eoc().bit_is_clear() {}

        self.adc.dr.read().data().bits() as u16
    }
}

impl AnalogFeedback for FeedbackAdc {
    fn read_raw(&mut self, index: usize) -> u16 {
        match FEEDBACK_CHANNELS.get(index) {
            Some(&channel) => self.read(channel) >> 2,
            None => {
                log_warn!("No feedback input for servo {}", index);
                0
            }
        }
    }
}
