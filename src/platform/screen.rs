//! SSD1306 OLED over TWIM.

use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use static_cell::StaticCell;

use crate::board::BoardProfile;
use crate::canvas::{Panel, TextCanvas};
use crate::error::Error;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Buffered 128×64 SSD1306 on any I²C bus.
pub type Oled<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// The firmware's screen.
pub type OledCanvas = TextCanvas<Oled<Twim<'static, peripherals::TWISPI0>>>;

impl<I2C> Panel for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn present(&mut self) -> Result<(), Self::Error> {
        self.flush()
    }
}

/// Initialise the panel and return a blank canvas laid out for `profile`.
pub fn init<I2C>(i2c: I2C, profile: BoardProfile) -> Result<TextCanvas<Oled<I2C>>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;

    let mut canvas = TextCanvas::new(display, profile);
    canvas.clear()?;
    crate::display::Display::flush(&mut canvas)?;
    Ok(canvas)
}

/// Bring up TWIM0 on P0.26 (SDA) / P0.27 (SCL) and the panel behind it.
pub fn oled(
    twim: peripherals::TWISPI0,
    sda: peripherals::P0_26,
    scl: peripherals::P0_27,
    profile: BoardProfile,
) -> Result<OledCanvas, Error> {
    static TX_BUFFER: StaticCell<[u8; 32]> = StaticCell::new();

    interrupt::TWISPI0.set_priority(Priority::P3);
    let mut config = twim::Config::default();
    config.frequency = twim::Frequency::K400;
    let bus = Twim::new(twim, Irqs, sda, scl, config, TX_BUFFER.init([0; 32]));
    info!("OLED on TWIM0");
    init(bus, profile)
}
