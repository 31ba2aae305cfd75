//! Two BH1750 sensors sharing one Linux I²C bus, one per hardware address
//! (ADD pin low and high). The bus is wrapped in a `RefCell` so each driver
//! instance gets its own serialized handle; the driver itself performs no
//! coordination between instances.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use bh1750_driver::{Address, Bh1750, Config, Monotonic};
use embedded_hal_bus::i2c::RefCellDevice;
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

    let bus = RefCell::new(I2cdev::new("/dev/i2c-1").expect("I2C bus not available"));

    let mut sensor_a = Bh1750::new(
        RefCellDevice::new(&bus),
        Delay,
        SystemClock(Instant::now()),
        Address::Low,
    );
    let mut sensor_b = Bh1750::new(
        RefCellDevice::new(&bus),
        Delay,
        SystemClock(Instant::now()),
        Address::High,
    );

    sensor_a
        .init(Config::default())
        .expect("sensor A failed to initialize");
    sensor_b
        .init(Config::default())
        .expect("sensor B failed to initialize");

    loop {
        for (name, sensor) in [("A", &mut sensor_a), ("B", &mut sensor_b)] {
            if sensor.measurement_ready(false) {
                match sensor.read_light_level() {
                    Ok(lux) => log::info!("{name}: {lux:.1} lx"),
                    Err(e) => log::error!("{name}: read failed: {e:?}"),
                }
            }
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}
