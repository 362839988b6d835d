// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    delay::Delay,
    i2c::{BlockingI2c, Mode},
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use armctl::{
    config,
    drivers::pca9685::{self, Pca9685},
    hw::{BoardPins, FeedbackAdc, Usart},
    log_error, log_info,
    protocol::Console,
    servo::ServoEngine,
};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb1 = rcc.apb1;

    let delay = Delay::new(cp.SYST, clocks);
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB);

    // USART1 (console)
    let usart_cfg = Config {
        baud_rate: config::SERIAL_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let mut usart = Usart::new(serial);

    // I2C1 -> PCA9685
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::standard(config::I2C_FREQ_KHZ.kHz()),
        &clocks,
        &mut apb1,
        10_000,
    );
    let mut pca = match Pca9685::new(i2c, config::PCA9685_ADDRESS) {
        Ok(pca) => pca,
        Err(_) => {
            log_error!("Invalid PCA9685 address");
            loop {
                cortex_m::asm::nop();
            }
        }
    };
    if pca9685::start(&mut pca, config::SERVO_FREQ_HZ).is_err() {
        log_error!("PCA9685 init failed");
        usart.println("PWM device error");
    }

    // ADC1 (feedback); pins stay in analog mode for the lifetime of the program
    let _feedback_pins = pins.feedback;
    let adc = FeedbackAdc::new(dp.ADC1);

    let mut engine = ServoEngine::new(&config::ARM, pca, adc, delay);

    match engine.home_all() {
        Ok(()) => log_info!("Homed {} servos", engine.active()),
        Err(_) => {
            log_error!("Homing failed");
            usart.println("PWM device error");
        }
    }

    usart.println("Servo arm ready. Type HELP for commands.");

    let mut console = Console::<{ config::LINE_CAPACITY }>::new(config::ECHO);
    loop {
        while let Some(b) = usart.read_byte() {
            if let Some(outcome) = console.feed(b, &mut engine, &mut usart) {
                log_info!("Command outcome: {:?}", outcome);
            }
        }
    }
}
