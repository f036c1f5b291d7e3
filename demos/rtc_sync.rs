extern crate segclock;

use anyhow::Result;
use ds323x::Ds323x;
use linux_embedded_hal::I2cdev;
use segclock::{bcd, Clock};
use std::thread::sleep;
use std::time::Duration;

/// Example loading the clock from a DS3231 RTC,
/// assuming linux environment (such as Raspberry Pi 3+)
/// with the DS3231 attached to i2c1.
/// The engine is ticked at 1 Hz from this loop and compared against the RTC
/// every ten seconds, which shows how far the tick source drifts.

const CHECK_INTERVAL_SECS: u32 = 10;

fn main() -> Result<()> {
  let i2c = I2cdev::new("/dev/i2c-1")?;
  let mut rtc = Ds323x::new_ds3231(i2c);

  let mut clock = Clock::new(1);
  let valid = clock.sync_from(&mut rtc).map_err(|e| anyhow::anyhow!("rtc read failed: {:?}", e))?;
  println!("synced, valid: {} time: {:?}", valid, clock.naive_time());

  let mut reference = Clock::new(1);
  let mut elapsed = 0u32;
  loop {
    sleep(Duration::from_secs(1));
    clock.tick();
    elapsed += 1;

    if elapsed % CHECK_INTERVAL_SECS == 0 {
      reference.sync_from(&mut rtc).map_err(|e| anyhow::anyhow!("rtc read failed: {:?}", e))?;
      let (h, m, s) = bcd::to_binary(&clock.time());
      let (rh, rm, rs) = bcd::to_binary(&reference.time());
      println!("engine {:02}:{:02}:{:02} rtc {:02}:{:02}:{:02}", h, m, s, rh, rm, rs);
    }
  }
}
