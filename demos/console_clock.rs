extern crate segclock;

use anyhow::{anyhow, Result};
use chrono::{Timelike, Utc};
use segclock::{bcd, AlarmEvent, Clock, Display, DisplayDriver, Error};
use segclock::display::{DIGIT_SEGMENTS, SEGMENT_DP};
use std::time::Duration;

/// Host simulation of the clock firmware:
/// the "interrupt" runs at TICK_HZ from a spin-sleep loop, the clock is seeded
/// from the system time, an alarm is set a few seconds ahead, snoozed once,
/// and the multiplexed display is rendered as text once per second.

const TICK_HZ: u16 = 200;
const DIGITS: u8 = 6;
const RUN_SECONDS: u32 = 20;
const SNOOZE_MINUTES: u8 = 1;

// Remembers what each digit line showed during the last scan
struct ConsoleDriver {
  segments: u8,
  frame: [u8; DIGITS as usize],
}

impl DisplayDriver for ConsoleDriver {
  type Error = Error<core::convert::Infallible>;

  fn digit_lines(&self) -> usize {
    self.frame.len()
  }

  fn all_off(&mut self) -> Result<(), Self::Error> {
    self.segments = 0;
    Ok(())
  }

  fn segments_on(&mut self, segments: u8) -> Result<(), Self::Error> {
    self.segments = segments;
    Ok(())
  }

  fn digit_on(&mut self, digit: u8) -> Result<(), Self::Error> {
    let slot = self.frame.get_mut(digit as usize).ok_or(Error::CapacityExceeded)?;
    *slot = self.segments;
    Ok(())
  }
}

fn render(frame: &[u8]) -> String {
  frame.iter().map(|&segments| {
    let digit = DIGIT_SEGMENTS.iter()
      .position(|&pattern| pattern == segments & !SEGMENT_DP)
      .map(|d| char::from(b'0' + d as u8))
      .unwrap_or(' ');
    let dot = if segments & SEGMENT_DP != 0 { '.' } else { ' ' };
    format!("{}{}", digit, dot)
  }).collect()
}

fn main() -> Result<()> {
  let mut clock = Clock::new(TICK_HZ);
  let now = Utc::now().time().with_nanosecond(0).ok_or_else(|| anyhow!("bad system time"))?;
  clock.set_naive_time(&now);

  // alarm three seconds from now
  let mut alarm = clock.time();
  for _ in 0..3 {
    bcd::increment_second(&mut alarm);
  }
  if !clock.alarm_set_time(&alarm) {
    return Err(anyhow!("alarm rejected: {:?}", alarm));
  }

  let driver = ConsoleDriver { segments: 0, frame: [0; DIGITS as usize] };
  let mut display = Display::new(DIGITS, driver).map_err(|e| anyhow!("{:?}", e))?;
  let period = Duration::from_secs(1) / TICK_HZ as u32;
  let mut snoozed = false;

  for count in 0..RUN_SECONDS * TICK_HZ as u32 {
    let tick = clock.tick();
    match tick.alarm {
      AlarmEvent::Activated if !snoozed => {
        println!("ALARM, snoozing {} minute(s)", SNOOZE_MINUTES);
        clock.alarm_postpone(SNOOZE_MINUTES);
        snoozed = true;
      }
      AlarmEvent::Activated => println!("ALARM again"),
      _ => {}
    }

    display.write_bcd(&clock.time());
    if tick.half_second {
      display.toggle_dot(1).map_err(|e| anyhow!("{:?}", e))?;
    }
    if clock.alarm_get_state() {
      display.toggle_dot(3).map_err(|e| anyhow!("{:?}", e))?;
    }
    display.refresh().map_err(|e| anyhow!("{:?}", e))?;

    // one line per second, once a full scan has been drawn
    if count % TICK_HZ as u32 == TICK_HZ as u32 - 1 {
      println!("{}", render(&display.driver().frame));
    }

    spin_sleep::sleep(period);
  }

  Ok(())
}
