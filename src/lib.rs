#![cfg_attr(not(test), no_std)]

//! # BH1750 Ambient Light Sensor Driver
//!
//! A platform-agnostic driver for the ROHM BH1750FVI digital light sensor,
//! built on the [`embedded-hal`](https://crates.io/crates/embedded-hal) 1.0
//! traits. The sensor is commanded over I²C with single instruction bytes and
//! answers with a 16-bit big-endian count that this driver converts to lux.
//!
//! Configuring the I²C bus itself is expected to happen in user code; the
//! driver works with whatever [`I2c`] implementation it is handed, so a
//! borrowed or shared bus handle works as well as an owned one.
//!
//! ## Features
//! - **Six measurement modes**: continuous and one-time, each in low, high,
//!   and double-density high resolution.
//! - **Sensitivity tuning** through the measurement time register (MTreg).
//! - **Non-blocking readiness query** paced by an injected millisecond clock,
//!   so callers decide whether to poll, sleep, or do other work.
//! - **`defmt` formatting** for all public types behind the `defmt` feature.
//!
//! ## Usage
//! ```no_run
//! use bh1750_driver::{Address, Bh1750, Config, Monotonic};
//!
//! # struct Ticks;
//! # impl Monotonic for Ticks {
//! #     fn now_ms(&mut self) -> u64 { 0 }
//! # }
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//! let mut sensor = Bh1750::new(i2c, delay, Ticks, Address::Low);
//! sensor.init(Config::default())?;
//!
//! while !sensor.measurement_ready(false) {}
//! let _lux = sensor.read_light_level()?;
//! # Ok::<(), bh1750_driver::error::Bh1750Error<embedded_hal::i2c::ErrorKind>>(())
//! ```
//!
//! One-time modes power the sensor down after a single conversion; the driver
//! performs no automatic re-arming, so call
//! [`configure`](Bh1750::configure) again before each reading.

mod calc;
mod settings;

pub use settings::{Address, Bh1750Builder, Config, Mode};

use crate::error::Bh1750Error;
use embedded_hal::{delay::DelayNs, i2c::I2c};

/// Default measurement time register value per the datasheet.
pub const DEFAULT_MTREG: u8 = 69;

/// Settle time after a mode or sensitivity command, in milliseconds.
const SETTLE_DELAY_MS: u32 = 10;

/// Instruction opcodes without a measurement payload.
mod opcodes {
    /// No active state; also the byte an unconfigured driver re-asserts.
    pub const POWER_DOWN: u8 = 0x00;
    /// Waiting for a measurement command.
    pub const POWER_ON: u8 = 0x01;
    /// Clears the data register; only accepted while powered on.
    pub const RESET: u8 = 0x07;
}

/// Error types for the BH1750 driver.
pub mod error {
    /// Errors that can occur during communication or configuration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Bh1750Error<E> {
        /// A command transfer failed on the bus. Driver state is unchanged;
        /// the caller decides whether to retry.
        Transport(E),
        /// MTreg value outside the accepted `32..=254` range.
        MtregOutOfRange,
        /// A reading was requested before any successful mode configuration.
        NotConfigured,
        /// The data read failed and no usable measurement was returned.
        NoValidReading,
    }

    /// Result type alias for BH1750 operations.
    pub type Result<T, E> = core::result::Result<T, Bh1750Error<E>>;
}

/// Monotonic millisecond clock used to pace measurements.
///
/// Implement this over whatever tick source the target provides: a SysTick
/// millisecond counter, an RTC, or `std::time::Instant` on hosted platforms.
/// The driver only ever subtracts two readings, so the epoch is arbitrary.
pub trait Monotonic {
    /// Milliseconds elapsed since some fixed, arbitrary epoch.
    fn now_ms(&mut self) -> u64;
}

/// The main BH1750 driver structure.
///
/// Holds the bus, delay, and clock collaborators together with the sensor
/// state: address, armed measurement mode, MTreg value, and the timestamp of
/// the last measurement exchange. One instance drives one physical sensor;
/// the driver performs no locking, so the caller serializes access.
#[derive(Debug)]
pub struct Bh1750<I2C, D, M> {
    i2c: I2C,
    delay: D,
    clock: M,
    address: Address,
    mode: Option<Mode>,
    mtreg: u8,
    last_measurement: u64,
}

impl<I2C, D, M, E> Bh1750<I2C, D, M>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    M: Monotonic,
{
    /// Creates a new, unconfigured driver instance.
    ///
    /// This does not communicate with the sensor yet; call [`init`](Self::init)
    /// or [`configure`](Self::configure) to arm a measurement mode.
    pub fn new(i2c: I2C, delay: D, clock: M, address: Address) -> Self {
        Bh1750 {
            i2c,
            delay,
            clock,
            address,
            mode: None,
            mtreg: DEFAULT_MTREG,
            last_measurement: 0,
        }
    }

    /// Arms the configured mode and applies the initial MTreg in one call.
    ///
    /// # Errors
    /// Returns an error if either underlying command fails; see
    /// [`configure`](Self::configure) and [`set_mtreg`](Self::set_mtreg).
    pub fn init(&mut self, config: Config) -> error::Result<(), E> {
        self.configure(config.mode)?;
        self.set_mtreg(config.mtreg)
    }

    /// Puts the sensor into the given measurement mode.
    ///
    /// On success the mode is stored and the measurement timer restarts, so
    /// [`measurement_ready`](Self::measurement_ready) reports against the
    /// fresh conversion. A transport failure leaves the previous mode armed.
    pub fn configure(&mut self, mode: Mode) -> error::Result<(), E> {
        self.write_command(mode.opcode())?;

        // Wait a few moments to wake up.
        self.settle();

        self.mode = Some(mode);
        self.last_measurement = self.clock.now_ms();
        Ok(())
    }

    /// Sets the measurement time register (MTreg) to adjust sensitivity.
    ///
    /// Accepts values in `32..=254`; the default is [`DEFAULT_MTREG`].
    /// Raising MTreg lengthens the integration window (more counts per lux,
    /// usable in low light), lowering it shortens the window for direct
    /// sunlight. The current mode is re-asserted afterwards so the sensor
    /// re-arms with the correct measurement type.
    ///
    /// # Errors
    /// - [`Bh1750Error::MtregOutOfRange`] for out-of-range values, before
    ///   any transfer.
    /// - [`Bh1750Error::Transport`] if any of the three transfers fails; the
    ///   stored MTreg is left unchanged.
    pub fn set_mtreg(&mut self, mtreg: u8) -> error::Result<(), E> {
        // Lowest value accepted by the sensor seems to be 32.
        if mtreg <= 31 || mtreg > 254 {
            return Err(Bh1750Error::MtregOutOfRange);
        }

        let [high, low] = calc::mtreg_command(mtreg);
        self.write_command(high)?;
        self.write_command(low)?;
        self.write_command(self.mode.map_or(opcodes::POWER_DOWN, Mode::opcode))?;

        self.settle();

        self.mtreg = mtreg;
        Ok(())
    }

    /// Checks whether enough time has passed for a new measurement.
    ///
    /// Non-blocking: compares the elapsed time since the last mode change or
    /// reading against the expected conversion duration for the armed mode
    /// and MTreg value. `max_wait` selects the datasheet's maximum
    /// conversion time instead of the typical one; use it when a stale
    /// reading matters more than latency. An unconfigured driver always
    /// reports ready.
    pub fn measurement_ready(&mut self, max_wait: bool) -> bool {
        let wait = calc::measurement_time_ms(self.mode, self.mtreg, max_wait);
        let elapsed = self.clock.now_ms().saturating_sub(self.last_measurement);
        elapsed >= u64::from(wait)
    }

    /// Reads the light level from the sensor and converts it to lux.
    ///
    /// The raw 16-bit count is scaled for a non-default MTreg, halved in the
    /// `..HighRes2` modes (they report at double count density), and divided
    /// by the datasheet's optical correction factor of 1.2.
    ///
    /// The measurement timer restarts whether or not the read succeeds.
    ///
    /// # Errors
    /// - [`Bh1750Error::NotConfigured`] before any successful
    ///   [`configure`](Self::configure).
    /// - [`Bh1750Error::NoValidReading`] when the data read itself fails.
    pub fn read_light_level(&mut self) -> error::Result<f32, E> {
        let mode = self.mode.ok_or(Bh1750Error::NotConfigured)?;

        let mut raw = [0u8; 2];
        let outcome = self.i2c.read(self.address.value(), &mut raw);
        self.last_measurement = self.clock.now_ms();

        if outcome.is_err() {
            return Err(Bh1750Error::NoValidReading);
        }

        Ok(calc::raw_to_lux(u16::from_be_bytes(raw), mode, self.mtreg))
    }

    /// Puts the sensor into its inactive power-down state.
    ///
    /// Any armed measurement mode is discarded; configure again before the
    /// next reading.
    pub fn power_down(&mut self) -> error::Result<(), E> {
        self.write_command(opcodes::POWER_DOWN)?;
        self.mode = None;
        Ok(())
    }

    /// Wakes the sensor into its powered, waiting-for-command state.
    pub fn power_on(&mut self) -> error::Result<(), E> {
        self.write_command(opcodes::POWER_ON)
    }

    /// Clears the sensor's data register.
    ///
    /// The sensor only accepts this instruction while powered on.
    pub fn reset(&mut self) -> error::Result<(), E> {
        self.write_command(opcodes::RESET)
    }

    /// Currently armed measurement mode, if any.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Current measurement time register value.
    pub fn mtreg(&self) -> u8 {
        self.mtreg
    }

    /// Releases the bus handle, consuming the driver.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Writes a single instruction byte to the sensor.
    fn write_command(&mut self, opcode: u8) -> error::Result<(), E> {
        self.i2c
            .write(self.address.value(), &[opcode])
            .map_err(Bh1750Error::Transport)
    }

    /// Blocks for the fixed settle time the sensor needs after a command.
    fn settle(&mut self) {
        self.delay.delay_ms(SETTLE_DELAY_MS);
    }
}
