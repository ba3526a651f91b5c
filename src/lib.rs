//! Drawing API and drivers for small SPI/I2C display panels: the Solomon Systech SSD1306
//! monochrome OLED controller and the Sitronix ST7735 RGB565 TFT controller.
//!
//! Both backends implement the same `Display` trait, so lines, circles, rectangles and text are
//! drawn the same way on either. The SSD1306 backend draws into a caller-provided framebuffer and
//! transfers it on `refresh`; the ST7735 backend has no framebuffer and streams every primitive
//! to the panel as it is drawn.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate embedded_hal as hal;
#[macro_use]
extern crate log;


pub mod color;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod raster;
pub mod ssd1306;
pub mod st7735;
pub mod text;

// Re-exports for primary API.
pub use crate::color::Rgb565;
pub use crate::display::{Display, PixelTarget, Size};
pub use crate::error::Error;
pub use crate::font::{Font, FONT_8X8};
pub use crate::interface::i2c::I2cInterface;
pub use crate::interface::spi::SpiInterface;
pub use crate::ssd1306::Ssd1306;
pub use crate::st7735::St7735;
pub use crate::text::Cursor;
