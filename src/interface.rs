//! SPI bus interface for the IIM-42652
//!
//! Implements the `device-driver` register interface over an `embedded-hal`
//! [`SpiDevice`](embedded_hal::spi::SpiDevice). The first byte of every
//! transaction is the register address with bit 7 set for reads. Reads may be
//! of any length; the FIFO burst relies on this.

use device_driver::RegisterInterface;

/// Read flag in the address byte
const DIR_READ: u8 = 0x80;

/// SPI interface for the IIM-42652
///
/// # Note on Chip Select
///
/// The `SpiDevice` manages chip select. With `embedded-hal-bus`:
/// ```ignore
/// let spi_device = embedded_hal_bus::spi::ExclusiveDevice::new(spi_bus, cs_pin, delay);
/// let interface = SpiInterface::new(spi_device);
/// ```
///
/// The device supports SPI modes 0 and 3 up to 24 MHz.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Create a new SPI interface with the given SPI device
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Consume the interface and return the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> RegisterInterface for SpiInterface<SPI>
where
    SPI: embedded_hal::spi::SpiDevice<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        let read_address = address | DIR_READ;

        let mut operations = [
            embedded_hal::spi::Operation::Write(&[read_address]),
            embedded_hal::spi::Operation::Read(read_data),
        ];

        self.spi.transaction(&mut operations)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits;
        let write_address = address & !DIR_READ;

        // Address and payload share one chip select assertion
        let mut operations = [
            embedded_hal::spi::Operation::Write(&[write_address]),
            embedded_hal::spi::Operation::Write(write_data),
        ];

        self.spi.transaction(&mut operations)
    }
}
