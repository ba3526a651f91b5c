//! Bring up a 1.44" ST7735R module and draw a few shapes and a line of text. This runs on an
//! STM32F303RE with the module on SPI1, PA8 for D/C, PA9 for /RESET and PA10 for /CS.
//!
//! Not built with the crate; copy it into a firmware project that depends on the HAL crates
//! below.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate smalldisplay;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use smalldisplay::st7735::{self, Gamma};
use smalldisplay::{Display, Rgb565, SpiInterface, St7735};

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // SPI1 is Alternate Function 5 on PA5,6,7. The panel never talks back, but the HAL wants a
    // MISO pin anyway.
    let sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let tft_spi = spi::Spi::spi1(
        dp.SPI1,
        (sck, miso, mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleLow,
            phase: hal_api::spi::Phase::CaptureOnFirstTransition,
        },
        8.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    let dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let cs = gpioa
        .pa10
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // The driver pulses /RESET itself as part of init.
    let mut tft = St7735::new(
        SpiInterface::new(tft_spi, dc),
        cs,
        rst,
        st7735::Config::new()
            .panel_size(128, 128)
            .offset(2, 3)
            .memory_access(st7735::madctl::MX | st7735::madctl::MY | st7735::madctl::BGR),
    );
    tft.init(&mut delay).unwrap();
    tft.set_gamma(Gamma::G22).unwrap();

    tft.fill_screen(Rgb565::BLACK).unwrap();
    tft.draw_rectangle(0, 0, 127, 127, Rgb565::BLUE).unwrap();
    tft.fill_circle(64, 64, 20, Rgb565::new(0xFF, 0x80, 0x00)).unwrap();
    tft.draw_line(0, 127, 127, 0, Rgb565::GREEN).unwrap();

    tft.set_cursor(8, 8);
    tft.write_str("Hello, 20\u{b0}C", Rgb565::WHITE, Rgb565::BLACK)
        .unwrap();

    loop {
        asm::wfi();
    }
}
