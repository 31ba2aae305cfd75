use crate::DEFAULT_MTREG;

/// Measurement modes supported by the sensor.
///
/// Continuous modes keep sampling after each conversion. One-time modes power
/// the device down after a single conversion and must be re-armed through
/// [`configure`](crate::Bh1750::configure) before the next reading.
///
/// The discriminant of each variant is the instruction byte sent on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// 1 lx resolution, typically 120 ms per measurement.
    ContinuousHighRes = 0x10,
    /// 0.5 lx resolution, typically 120 ms per measurement.
    ContinuousHighRes2 = 0x11,
    /// 4 lx resolution, typically 16 ms per measurement.
    ContinuousLowRes = 0x13,
    /// 1 lx resolution, single conversion.
    OneTimeHighRes = 0x20,
    /// 0.5 lx resolution, single conversion.
    OneTimeHighRes2 = 0x21,
    /// 4 lx resolution, single conversion.
    OneTimeLowRes = 0x23,
}

impl Mode {
    /// Instruction byte that starts a measurement in this mode.
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Whether the sensor keeps measuring after the first conversion.
    pub const fn is_continuous(self) -> bool {
        matches!(
            self,
            Mode::ContinuousHighRes | Mode::ContinuousHighRes2 | Mode::ContinuousLowRes
        )
    }

    pub(crate) const fn is_high_res(self) -> bool {
        !matches!(self, Mode::ContinuousLowRes | Mode::OneTimeLowRes)
    }

    /// The `_2` variants report counts at double density.
    pub(crate) const fn is_high_res_2(self) -> bool {
        matches!(self, Mode::ContinuousHighRes2 | Mode::OneTimeHighRes2)
    }
}

/// I²C address selected by the sensor's ADD pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// ADD pin low or floating: `0x23`.
    Low,
    /// ADD pin tied to VCC: `0x5C`.
    High,
    /// Caller-supplied override, e.g. behind an address translator.
    Custom(u8),
}

impl Address {
    pub(crate) const fn value(self) -> u8 {
        match self {
            Address::Low => 0x23,
            Address::High => 0x5C,
            Address::Custom(addr) => addr,
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::Low
    }
}

/// Initial mode and sensitivity applied by [`init`](crate::Bh1750::init).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Measurement mode to arm.
    pub mode: Mode,
    /// Measurement time register value, `32..=254`.
    pub mtreg: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::ContinuousHighRes,
            mtreg: DEFAULT_MTREG,
        }
    }
}

/// Convenience builder for [`Config`].
#[derive(Debug, Default)]
pub struct Bh1750Builder {
    config: Config,
}

impl Bh1750Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the measurement mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Sets the measurement time register value.
    pub fn mtreg(mut self, mtreg: u8) -> Self {
        self.config.mtreg = mtreg;
        self
    }

    /// Finalizes the builder and returns the `Config`.
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_match_the_instruction_set() {
        assert_eq!(Mode::ContinuousHighRes.opcode(), 0x10);
        assert_eq!(Mode::ContinuousHighRes2.opcode(), 0x11);
        assert_eq!(Mode::ContinuousLowRes.opcode(), 0x13);
        assert_eq!(Mode::OneTimeHighRes.opcode(), 0x20);
        assert_eq!(Mode::OneTimeHighRes2.opcode(), 0x21);
        assert_eq!(Mode::OneTimeLowRes.opcode(), 0x23);
    }

    #[test]
    fn one_time_modes_are_not_continuous() {
        assert!(Mode::ContinuousLowRes.is_continuous());
        assert!(!Mode::OneTimeHighRes.is_continuous());
        assert!(!Mode::OneTimeHighRes2.is_continuous());
        assert!(!Mode::OneTimeLowRes.is_continuous());
    }

    #[test]
    fn addresses_match_the_add_pin_levels() {
        assert_eq!(Address::Low.value(), 0x23);
        assert_eq!(Address::High.value(), 0x5C);
        assert_eq!(Address::Custom(0x42).value(), 0x42);
    }
}
