use embedded_hal::i2c;

use crate::Error;

/// Fixed I2C address of the VEML7700.
pub const DEFAULT_ADDRESS: u8 = 0x10;

/// Trait for reading and writing the 16 bit device registers.
pub trait RegisterAccess {
    type Error;

    /// Reads the 16 bit word at `register`.
    fn read_register(&mut self, register: u8) -> Result<u16, Self::Error>;

    /// Writes a 16 bit word to `register`.
    fn write_register(&mut self, register: u8, value: u16) -> Result<(), Self::Error>;
}

pub struct I2cInterface<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }
}

impl<I2C: i2c::I2c> I2cInterface<I2C> {
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, IE> RegisterAccess for I2cInterface<I2C>
where
    I2C: i2c::I2c<Error = IE>,
{
    type Error = Error<IE>;

    fn read_register(&mut self, register: u8) -> Result<u16, Self::Error> {
        let mut data = [0u8; 2];

        // command code write followed by a repeated-start read
        self.i2c
            .write_read(self.address, &[register], &mut data)
            .map_err(Error::Interface)?;

        Ok(u16::from_le_bytes(data))
    }

    fn write_register(&mut self, register: u8, value: u16) -> Result<(), Self::Error> {
        let value = value.to_le_bytes();

        self.i2c
            .write(self.address, &[register, value[0], value[1]])
            .map_err(Error::Interface)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_i2c_read_register() {
        const REGISTER: u8 = 0x04;
        const VALUE: u16 = 0xABCD;

        let i2c = I2cMock::new(&[I2cTransaction::write_read(
            DEFAULT_ADDRESS,
            vec![REGISTER],
            vec![0xCD, 0xAB],
        )]);

        let mut i2c_if = I2cInterface::new(i2c, DEFAULT_ADDRESS);

        let value = i2c_if.read_register(REGISTER).unwrap();
        assert_eq!(value, VALUE);

        i2c_if.release().done();
    }

    #[test]
    fn test_i2c_write_register() {
        const REGISTER: u8 = 0x00;
        const VALUE: u16 = 0x1842;

        let i2c = I2cMock::new(&[I2cTransaction::write(
            DEFAULT_ADDRESS,
            vec![REGISTER, 0x42, 0x18],
        )]);

        let mut i2c_if = I2cInterface::new(i2c, DEFAULT_ADDRESS);

        i2c_if.write_register(REGISTER, VALUE).unwrap();

        i2c_if.release().done();
    }
}
