//! Ambient-light monitoring on a Linux I²C bus (e.g. a Raspberry Pi).
//!
//! This demo:
//! 1. Initializes the driver in its default continuous high-resolution mode.
//! 2. Polls the non-blocking readiness query instead of sleeping for the
//!    worst-case conversion time.
//! 3. Re-tunes the measurement window after each reading: short windows in
//!    direct sunlight, long windows in the dark.

use std::time::{Duration, Instant};

use bh1750_driver::{error::Bh1750Error, Address, Bh1750, Config, Monotonic, DEFAULT_MTREG};
use linux_embedded_hal::{Delay, I2cdev};

/// Millisecond clock counted from process start.
struct SystemClock(Instant);

impl Monotonic for SystemClock {
    fn now_ms(&mut self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

fn main() {
    env_logger::init();

    let i2c = I2cdev::new("/dev/i2c-1").expect("I2C bus not available");
    let mut sensor = Bh1750::new(i2c, Delay, SystemClock(Instant::now()), Address::Low);

    sensor
        .init(Config::default())
        .expect("failed to initialize BH1750");
    log::info!("BH1750 monitoring started");

    loop {
        // Max wait as a fail-safe: a reading taken here is never stale.
        if sensor.measurement_ready(true) {
            match sensor.read_light_level() {
                Ok(lux) => {
                    log::info!("light level: {lux:.1} lx");
                    retune(&mut sensor, lux);
                }
                Err(e) => log::error!("reading failed: {e:?}"),
            }
        }
        std::thread::sleep(Duration::from_millis(200));
    }
}

/// Keeps the sensor in its usable range: a short integration window in
/// direct sunlight, a long one in near-darkness (values from the datasheet's
/// MTreg examples).
fn retune(sensor: &mut Bh1750<I2cdev, Delay, SystemClock>, lux: f32) {
    let mtreg = if lux > 40_000.0 {
        32
    } else if lux > 10.0 {
        DEFAULT_MTREG
    } else {
        138
    };

    if mtreg != sensor.mtreg() {
        match sensor.set_mtreg(mtreg) {
            Ok(()) => log::info!("MTreg set to {mtreg}"),
            Err(Bh1750Error::Transport(e)) => log::error!("MTreg update failed: {e:?}"),
            Err(e) => log::error!("MTreg update rejected: {e:?}"),
        }
    }
}
