//! Byte-level transports to the display controllers.
//!
//! Both controllers understand a stream of command bytes and a stream of data bytes. How the two
//! are told apart is the transport's business: the SPI interface drives a D/C line, the I2C
//! interface prefixes every transfer with a control byte.

use crate::error::Error;

pub trait DisplayInterface {
    /// Send a single command byte.
    fn send_command(&mut self, cmd: u8) -> Result<(), Error>;
    /// Send a run of data bytes.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Error>;
}

pub mod spi {
    //! The "4-wire" SPI interface, where each word on the bus is 8 bits and a separate GPIO tells
    //! the controller whether the byte is a command or data.

    use hal::blocking::spi::Write;
    use hal::digital::v2::OutputPin;

    use super::DisplayInterface;
    use crate::error::Error;

    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the controller.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the controller.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: Write<u8>,
        DC: OutputPin,
    {
        /// Create a new SPI interface. `spi` is the SPI master device, and `dc` is the GPIO output
        /// pin connected to the D/C pin of the controller.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }

        /// Give back the bus and the pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: Write<u8>,
        DC: OutputPin,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), Error> {
            self.dc.set_low().map_err(|_| Error::DataCommand)?;
            self.spi.write(&[cmd]).map_err(|_| Error::Bus)?;
            self.dc.set_high().map_err(|_| Error::DataCommand)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Error> {
            self.dc.set_high().map_err(|_| Error::DataCommand)?;
            self.spi.write(buf).map_err(|_| Error::Bus)
        }
    }
}

pub mod i2c {
    //! The I2C interface. The controller has no D/C line on this bus; instead every transfer
    //! starts with a control byte selecting the command or the data register.

    use hal::blocking::i2c::Write;

    use super::DisplayInterface;
    use crate::error::Error;

    /// The usual 7-bit address of an SSD1306 module with SA0 tied low.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;

    const CONTROL_COMMAND: u8 = 0x00;
    const CONTROL_DATA: u8 = 0x40;

    /// Data bytes per bus transaction, not counting the control byte.
    const CHUNK: usize = 16;

    pub struct I2cInterface<I2C> {
        i2c: I2C,
        /// 7-bit device address, not shifted.
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: Write,
    {
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: Write,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), Error> {
            self.i2c
                .write(self.address, &[CONTROL_COMMAND, cmd])
                .map_err(|_| Error::Bus)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Error> {
            let mut frame = [0u8; CHUNK + 1];
            frame[0] = CONTROL_DATA;
            for chunk in buf.chunks(CHUNK) {
                frame[1..=chunk.len()].copy_from_slice(chunk);
                self.i2c
                    .write(self.address, &frame[..=chunk.len()])
                    .map_err(|_| Error::Bus)?;
            }
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::i2c::{I2cInterface, DEFAULT_ADDRESS};
    use super::spi::SpiInterface;
    use super::test_spy::{BrokenBus, Sent, TestSpyInterface};
    use super::DisplayInterface;
    use crate::error::Error;

    #[test]
    fn spi_toggles_dc_around_commands() {
        let di = TestSpyInterface::new();
        let mut spi = SpiInterface::new(di.bus(), di.pin("dc"));
        spi.send_command(0xAF).unwrap();
        spi.send_data(&[1, 2, 3]).unwrap();
        di.check_multi(sends!(
            (pin "dc" false),
            [0xAF],
            (pin "dc" true),
            (pin "dc" true),
            [1, 2, 3]
        ));
    }

    #[test]
    fn spi_bus_failure() {
        let di = TestSpyInterface::new();
        let mut spi = SpiInterface::new(BrokenBus, di.pin("dc"));
        assert_eq!(spi.send_command(0xAF), Err(Error::Bus));
        assert_eq!(spi.send_data(&[0]), Err(Error::Bus));
    }

    #[test]
    fn i2c_control_bytes() {
        let di = TestSpyInterface::new();
        let mut i2c = I2cInterface::new(di.bus(), DEFAULT_ADDRESS);
        i2c.send_command(0xAE).unwrap();
        i2c.send_data(&[0xAA, 0x55]).unwrap();
        di.check_multi(&[
            Sent::I2c(0x3C, vec![0x00, 0xAE]),
            Sent::I2c(0x3C, vec![0x40, 0xAA, 0x55]),
        ]);
    }

    #[test]
    fn i2c_data_is_chunked() {
        let di = TestSpyInterface::new();
        let mut i2c = I2cInterface::new(di.bus(), 0x3D);
        let data = (0..40).collect::<Vec<u8>>();
        i2c.send_data(&data).unwrap();

        let mut first = vec![0x40];
        first.extend(0..16);
        let mut second = vec![0x40];
        second.extend(16..32);
        let mut third = vec![0x40];
        third.extend(32..40);
        di.check_multi(&[
            Sent::I2c(0x3D, first),
            Sent::I2c(0x3D, second),
            Sent::I2c(0x3D, third),
        ]);
    }

    #[test]
    fn i2c_bus_failure() {
        let mut i2c = I2cInterface::new(BrokenBus, DEFAULT_ADDRESS);
        assert_eq!(i2c.send_command(0xAE), Err(Error::Bus));
        assert_eq!(i2c.send_data(&[1, 2]), Err(Error::Bus));
    }
}
