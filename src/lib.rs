//! Driver for the Vishay VEML7700 ambient light sensor. Exposes the high
//! resolution ALS channel and the wide-range White channel as calibrated
//! lux values.
//!
//! Datasheet: <https://www.vishay.com/docs/84286/veml7700.pdf>
//!
//! The host configures gain, integration time and an optional attenuation
//! factor once, attaches up to two [`LuxSink`]s and then calls
//! [`Veml7700::poll()`] on a fixed interval.

#![cfg_attr(not(test), no_std)]

mod configuration;
pub mod interface;
pub mod lux;
mod register;

pub use configuration::ConfigBuilder;
use configuration::Configuration;
use embedded_hal::delay::DelayNs;
use interface::RegisterAccess;
use log::{debug, error, info, warn};
use register::Register;

/// Error enum for the VEML7700 driver
#[derive(Debug)]
pub enum Error<IE> {
    /// An interface related error has occured
    Interface(IE),
}

/// Time to wait after configuration before the first measurement, allowing
/// the signal processor and oscillator to start up (datasheet: 2.5ms).
pub const T_STARTUP_US: u32 = 2500;

pub trait ToRegisterValue<T> {
    fn register_value(&self) -> T;
}

/// ALS gain selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// x1 gain
    X1,
    /// x2 gain
    X2,
    /// x1/8 gain
    X1_8,
    /// x1/4 gain
    X1_4,
}

impl ToRegisterValue<u16> for Gain {
    fn register_value(&self) -> u16 {
        match self {
            Gain::X1 => 0b00,
            Gain::X2 => 0b01,
            Gain::X1_8 => 0b10,
            Gain::X1_4 => 0b11,
        }
    }
}

impl Gain {
    pub(crate) fn from_code(code: u16) -> Self {
        match code & 0b11 {
            0b00 => Gain::X1,
            0b01 => Gain::X2,
            0b10 => Gain::X1_8,
            _ => Gain::X1_4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gain::X1 => "x1",
            Gain::X2 => "x2",
            Gain::X1_8 => "x1/8",
            Gain::X1_4 => "x1/4",
        }
    }
}

/// ALS integration time setting.
///
/// The wire codes are not contiguous: 25ms and 50ms live in the upper code
/// range while the remaining times count up from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationTime {
    /// 25ms
    Ms25,
    /// 50ms
    Ms50,
    /// 100ms
    Ms100,
    /// 200ms
    Ms200,
    /// 400ms
    Ms400,
    /// 800ms
    Ms800,
}

impl ToRegisterValue<u16> for IntegrationTime {
    fn register_value(&self) -> u16 {
        match self {
            IntegrationTime::Ms25 => 0b1100,
            IntegrationTime::Ms50 => 0b1000,
            IntegrationTime::Ms100 => 0b0000,
            IntegrationTime::Ms200 => 0b0001,
            IntegrationTime::Ms400 => 0b0010,
            IntegrationTime::Ms800 => 0b0011,
        }
    }
}

impl IntegrationTime {
    /// Decodes a raw integration time code. Codes with no defined meaning
    /// fall back to the 100ms default.
    pub(crate) fn from_code(code: u16) -> Self {
        match code & 0b1111 {
            0b1100 => IntegrationTime::Ms25,
            0b1000 => IntegrationTime::Ms50,
            0b0000 => IntegrationTime::Ms100,
            0b0001 => IntegrationTime::Ms200,
            0b0010 => IntegrationTime::Ms400,
            0b0011 => IntegrationTime::Ms800,
            _ => IntegrationTime::Ms100,
        }
    }

    pub fn as_millis(&self) -> u16 {
        match self {
            IntegrationTime::Ms25 => 25,
            IntegrationTime::Ms50 => 50,
            IntegrationTime::Ms100 => 100,
            IntegrationTime::Ms200 => 200,
            IntegrationTime::Ms400 => 400,
            IntegrationTime::Ms800 => 800,
        }
    }
}

/// ALS interrupt persistence setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    One,
    Two,
    Four,
    Eight,
}

impl ToRegisterValue<u16> for Persistence {
    fn register_value(&self) -> u16 {
        match self {
            Persistence::One => 0b00,
            Persistence::Two => 0b01,
            Persistence::Four => 0b10,
            Persistence::Eight => 0b11,
        }
    }
}

impl Persistence {
    pub(crate) fn from_code(code: u16) -> Self {
        match code & 0b11 {
            0b00 => Persistence::One,
            0b01 => Persistence::Two,
            0b10 => Persistence::Four,
            _ => Persistence::Eight,
        }
    }
}

/// Power saving mode selection. The mode bits are written to the device,
/// but power saving itself is always left disabled by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSavingMode {
    Mode1,
    Mode2,
    Mode3,
    Mode4,
}

impl ToRegisterValue<u16> for PowerSavingMode {
    fn register_value(&self) -> u16 {
        match self {
            PowerSavingMode::Mode1 => 0b00,
            PowerSavingMode::Mode2 => 0b01,
            PowerSavingMode::Mode3 => 0b10,
            PowerSavingMode::Mode4 => 0b11,
        }
    }
}

/// Sink accepting a calibrated lux reading, typically backed by the host's
/// sensor abstraction.
pub trait LuxSink {
    fn publish(&mut self, lux: f32);
}

impl LuxSink for () {
    fn publish(&mut self, _lux: f32) {}
}

/// One poll cycle worth of sensor data.
///
/// A channel whose register read failed on the bus reports zero counts for
/// that cycle. Readings are recomputed every poll, nothing is retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Raw ALS channel counts
    pub als_counts: u16,
    /// Raw White channel counts
    pub white_counts: u16,
    /// Calibrated ALS channel value in lux
    pub als_lux: f32,
    /// Calibrated White channel value in lux
    pub white_lux: f32,
}

/// VEML7700 driver.
///
/// Generic over the register interface `I` and the two optional output
/// sinks `A` (ambient light) and `W` (white).
pub struct Veml7700<I, A = (), W = ()> {
    interface: I,
    config: Configuration,
    failed: bool,
    reading: bool,
    ambient_light_sink: Option<A>,
    white_sink: Option<W>,
}

impl<I2C, IE> Veml7700<interface::I2cInterface<I2C>>
where
    I2C: embedded_hal::i2c::I2c<Error = IE>,
{
    /// Create a new driver instance talking I2C at the given address
    /// (the VEML7700 is fixed at [`interface::DEFAULT_ADDRESS`]).
    pub fn new_with_i2c(config: &ConfigBuilder, i2c: I2C, address: u8) -> Self {
        Veml7700::new(config, interface::I2cInterface::new(i2c, address))
    }
}

impl<I> Veml7700<I> {
    /// Create a new driver instance with the given `config` and `interface`.
    ///
    /// The device is untouched until [`Veml7700::setup()`] is called.
    pub fn new(config: &ConfigBuilder, interface: I) -> Self {
        Veml7700 {
            interface,
            config: config.configuration,
            failed: false,
            reading: false,
            ambient_light_sink: None,
            white_sink: None,
        }
    }
}

impl<I, A, W> Veml7700<I, A, W> {
    /// Attach a sink for the ALS channel. Without one the channel is still
    /// read and converted but not published.
    pub fn with_ambient_light_sink<A2>(self, sink: A2) -> Veml7700<I, A2, W> {
        Veml7700 {
            interface: self.interface,
            config: self.config,
            failed: self.failed,
            reading: self.reading,
            ambient_light_sink: Some(sink),
            white_sink: self.white_sink,
        }
    }

    /// Attach a sink for the White channel.
    pub fn with_white_sink<W2>(self, sink: W2) -> Veml7700<I, A, W2> {
        Veml7700 {
            interface: self.interface,
            config: self.config,
            failed: self.failed,
            reading: self.reading,
            ambient_light_sink: self.ambient_light_sink,
            white_sink: Some(sink),
        }
    }

    /// True once a configuration attempt has failed. A failed driver stays
    /// failed until the system is restarted; [`Veml7700::poll()`] becomes a
    /// no-op.
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

impl<I, A, W, IE> Veml7700<I, A, W>
where
    I: RegisterAccess<Error = Error<IE>>,
    A: LuxSink,
    W: LuxSink,
{
    /// Configures the device and starts sampling.
    ///
    /// Any transport error marks the driver as failed, see
    /// [`Veml7700::is_failed()`].
    pub fn setup<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<IE>> {
        debug!("setting up VEML7700");

        match self.configure(delay) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("sensor configuration failed");
                self.failed = true;
                Err(err)
            }
        }
    }

    fn configure<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<IE>> {
        let als_conf = self.config.als_conf_reg_value();
        debug!("setting ALS_CONF to {als_conf:#06x}");
        self.interface.write_register(Register::ALS_CONF, als_conf)?;

        // interrupts stay disabled, the threshold window is pushed out of
        // the way regardless
        self.interface.write_register(Register::ALS_WH, 0x0000)?;
        self.interface.write_register(Register::ALS_WL, 0xffff)?;

        let psm = self.config.psm_reg_value();
        debug!("setting PSM to {psm:#06x}");
        self.interface.write_register(Register::PSM, psm)?;

        delay.delay_us(T_STARTUP_US);

        // the device echoes the configuration back, a successful read is the
        // configuration-success check
        let readback = self.interface.read_register(Register::ALS_CONF)?;
        let (gain, integration_time, _) = configuration::decode_als_conf(readback);
        debug!(
            "read back ALS_CONF {readback:#06x} (gain {}, integration time {}ms)",
            gain.as_str(),
            integration_time.as_millis()
        );

        Ok(())
    }

    /// Runs one poll cycle: reads both count registers, converts to lux and
    /// publishes every configured channel.
    ///
    /// Returns `None` without touching the bus when the driver is failed or
    /// when a previous poll is still in flight. A single failed register
    /// read is logged and reported as zero counts, it does not fail the
    /// cycle.
    pub fn poll(&mut self) -> Option<Reading> {
        debug!("updating");

        if self.failed || self.reading {
            return None;
        }

        self.reading = true;
        let reading = self.read_sensor_data();
        self.reading = false;

        Some(reading)
    }

    fn read_sensor_data(&mut self) -> Reading {
        debug!("reading sensor data");

        let als_counts = match self.interface.read_register(Register::ALS) {
            Ok(counts) => counts,
            Err(_) => {
                warn!("error reading ALS register");
                0
            }
        };
        let white_counts = match self.interface.read_register(Register::WHITE) {
            Ok(counts) => counts,
            Err(_) => {
                warn!("error reading WHITE register");
                0
            }
        };

        let gain = self.config.gain;
        let integration_time = self.config.integration_time;
        debug!(
            "resolution lx/counts = {}",
            lux::resolution(gain, integration_time)
        );

        let als_lux =
            lux::compute_lux(als_counts, gain, integration_time) * self.config.attenuation_factor;
        let white_lux = lux::compute_lux(white_counts, gain, integration_time)
            * self.config.attenuation_factor;

        debug!("ALS counts = {als_counts}, lux = {als_lux}");
        debug!("WHITE counts = {white_counts}, lux = {white_lux}");

        if let Some(sink) = self.ambient_light_sink.as_mut() {
            sink.publish(als_lux);
        }
        if let Some(sink) = self.white_sink.as_mut() {
            sink.publish(white_lux);
        }

        Reading {
            als_counts,
            white_counts,
            als_lux,
            white_lux,
        }
    }

    /// Logs the active configuration.
    pub fn dump_config(&self) {
        info!("VEML7700:");
        info!("  gain: {}", self.config.gain.as_str());
        info!(
            "  integration time: {}ms",
            self.config.integration_time.as_millis()
        );
        info!("  attenuation factor: {}", self.config.attenuation_factor);

        if self.ambient_light_sink.is_some() {
            info!("  ALS full spectrum channel");
        }
        if self.white_sink.is_some() {
            info!("  white channel");
        }

        if self.failed {
            error!("  communication with VEML7700 failed!");
        }
    }
}

impl<I2C: embedded_hal::i2c::I2c, A, W> Veml7700<interface::I2cInterface<I2C>, A, W> {
    /// Destroys the driver and releases the owned `I2c`-interface.
    pub fn release(self) -> I2C {
        self.interface.release()
    }
}

#[cfg(test)]
impl<A, W> Veml7700<interface::mock::MockInterface, A, W> {
    /// Destroys the driver and returns the owned [`MockInterface`].
    pub fn release(self) -> interface::mock::MockInterface {
        self.interface
    }
}
