//! Tick driven time of day plus a single alarm with snooze.

use chrono::NaiveTime;
use rtcc::DateTimeAccess;

use crate::bcd::{self, BcdTime, BCD_TIME_DIGITS, MIDNIGHT};
use crate::fmt::{debug, trace};

/// Alarm edge produced by a clock operation.
/// Replaces a callback: the caller acts on it right away (buzzer on / off).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmEvent {
  /// Nothing changed
  NoChange,
  /// The alarm (or the postponed alarm) time was reached
  Activated,
  /// The ringing alarm should stop
  Deactivated,
}

/// Summary of the alarm flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
  /// Alarm will not fire
  Disabled,
  /// Alarm fires at the alarm time
  Armed,
  /// Alarm fires at the postponed time
  Postponed,
}

/// Result of one call to [`Clock::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
  /// True once at least half of the current second has elapsed.
  /// Useful to blink a seconds indicator.
  pub half_second: bool,
  /// Alarm edge caused by this tick
  pub alarm: AlarmEvent,
}

/// Time of day and alarm registers, advanced by a fixed rate tick.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clock {
  time: BcdTime,
  time_valid: bool,
  ticks_per_second: u16,
  ticks: u16,

  alarm: BcdTime,
  // Alarm time shifted by postponing, compared while `postponed` is set
  postponed_alarm: BcdTime,
  alarm_valid: bool,
  alarm_enabled: bool,
  postponed: bool,
  ringing: bool,
}

impl Clock {

  /// New clock at 00:00:00 with an invalid time and a disabled, invalid alarm.
  /// - `ticks_per_second` : number of calls to `tick()` that make up one second.
  /// Zero is treated as one.
  pub const fn new(ticks_per_second: u16) -> Self {
    Clock {
      time: MIDNIGHT,
      time_valid: false,
      ticks_per_second: if ticks_per_second == 0 { 1 } else { ticks_per_second },
      ticks: 0,
      alarm: MIDNIGHT,
      postponed_alarm: MIDNIGHT,
      alarm_valid: false,
      alarm_enabled: false,
      postponed: false,
      ringing: false,
    }
  }

  /// Number of ticks that make up one second
  pub fn ticks_per_second(&self) -> u16 {
    self.ticks_per_second
  }

  /// Advance the tick accumulator. Once per second this also advances the time
  /// and evaluates the alarm.
  pub fn tick(&mut self) -> Tick {
    let mut alarm = AlarmEvent::NoChange;

    self.ticks += 1;
    if self.ticks >= self.ticks_per_second {
      self.ticks = 0;
      bcd::increment_second(&mut self.time);
      alarm = self.alarm_check();
    }

    Tick {
      half_second: self.half_second(),
      alarm,
    }
  }

  /// True once the tick accumulator has reached the middle of the current second
  pub fn half_second(&self) -> bool {
    self.ticks >= self.ticks_per_second / 2
  }

  /// Replace the current time.
  /// An invalid `time` leaves the register untouched but still marks the time as invalid.
  /// Returns whether the time is now valid.
  pub fn set_time(&mut self, time: &[u8]) -> bool {
    match bcd::parse(time) {
      Some(valid) => {
        self.time = valid;
        self.time_valid = true;
      }
      None => {
        debug!("rejected time {=[u8]}", time);
        self.time_valid = false;
      }
    }
    self.time_valid
  }

  /// Copy the current time register into `out` (up to six digits).
  /// Returns whether the register holds a valid time; if not, the digits are meaningless.
  pub fn get_time(&self, out: &mut [u8]) -> bool {
    copy_out(&self.time, out);
    self.time_valid
  }

  /// Current time register by value
  pub fn time(&self) -> BcdTime {
    self.time
  }

  /// Whether the current time has been set to a valid value
  pub fn is_time_valid(&self) -> bool {
    self.time_valid
  }

  /// Current time as a chrono value, if valid
  pub fn naive_time(&self) -> Option<NaiveTime> {
    if self.time_valid {
      bcd::to_naive_time(&self.time)
    }
    else {
      None
    }
  }

  /// Set the current time from a chrono value. Always valid.
  pub fn set_naive_time(&mut self, time: &NaiveTime) {
    let digits = bcd::from_naive_time(time);
    self.set_time(&digits);
  }

  /// Load the current time of day from a hardware RTC.
  /// The date part is ignored. The tick accumulator restarts so the
  /// next second boundary is a full second away.
  pub fn sync_from<R>(&mut self, rtc: &mut R) -> Result<bool, R::Error>
    where R: DateTimeAccess
  {
    let datetime = rtc.datetime()?;
    self.set_naive_time(&datetime.time());
    self.ticks = 0;
    Ok(self.time_valid)
  }

  /// Enable or disable the alarm. The alarm time and snooze state are kept.
  pub fn alarm_enable(&mut self, enable: bool) {
    self.alarm_enabled = enable;
  }

  /// Whether the alarm is enabled
  pub fn alarm_get_state(&self) -> bool {
    self.alarm_enabled
  }

  /// Set the alarm time.
  /// The alarm is disabled first and only re-enabled if `alarm` is a valid time,
  /// so a rejected edit never leaves a stale alarm armed.
  /// Returns whether the alarm time is valid.
  pub fn alarm_set_time(&mut self, alarm: &[u8]) -> bool {
    self.alarm_enable(false);
    match bcd::parse(alarm) {
      Some(valid) => {
        self.alarm = valid;
        self.alarm_enable(true);
        self.alarm_valid = true;
      }
      None => {
        debug!("rejected alarm {=[u8]}", alarm);
        self.alarm_valid = false;
      }
    }
    self.alarm_valid
  }

  /// Copy the alarm register into `out` (up to six digits).
  /// Returns whether the last `alarm_set_time` supplied a valid time.
  pub fn alarm_get_time(&self, out: &mut [u8]) -> bool {
    copy_out(&self.alarm, out);
    self.alarm_valid
  }

  /// Alarm register by value
  pub fn alarm_time(&self) -> BcdTime {
    self.alarm
  }

  /// Time the postponed alarm will fire at, while postponed
  pub fn postponed_time(&self) -> Option<BcdTime> {
    if self.postponed {
      Some(self.postponed_alarm)
    }
    else {
      None
    }
  }

  /// Snooze: push the alarm back by `minutes`.
  /// The first call after the alarm fired copies the alarm time, silences the
  /// alarm and returns `Deactivated`. Further calls keep adding to the postponed time.
  pub fn alarm_postpone(&mut self, minutes: u8) -> AlarmEvent {
    let mut event = AlarmEvent::NoChange;

    if !self.postponed {
      self.postponed_alarm = self.alarm;
      self.postponed = true;
      event = self.deactivate();
    }

    for _ in 0..minutes {
      bcd::increment_minute(&mut self.postponed_alarm);
    }
    trace!("alarm postponed to {=[u8]}", &self.postponed_alarm[..]);

    event
  }

  /// Silence the ringing alarm. The enabled and postponed flags are left as
  /// they are, so the alarm fires again on the next match.
  pub fn alarm_cancel(&mut self) -> AlarmEvent {
    self.deactivate()
  }

  /// Whether the last alarm edge reported was an activation
  pub fn is_ringing(&self) -> bool {
    self.ringing
  }

  /// Alarm flags summarized
  pub fn alarm_state(&self) -> AlarmState {
    match (self.alarm_enabled, self.postponed) {
      (false, _) => AlarmState::Disabled,
      (true, false) => AlarmState::Armed,
      (true, true) => AlarmState::Postponed,
    }
  }

  // Compare the current time against the alarm, called on every second boundary
  fn alarm_check(&mut self) -> AlarmEvent {
    let mut event = AlarmEvent::NoChange;

    if self.alarm_enabled && !self.postponed && self.time == self.alarm {
      event = self.activate();
    }

    if self.alarm_enabled && self.postponed && self.time == self.postponed_alarm {
      event = self.activate();
      self.postponed = false;
    }

    event
  }

  fn activate(&mut self) -> AlarmEvent {
    debug!("alarm activated at {=[u8]}", &self.time[..]);
    self.ringing = true;
    AlarmEvent::Activated
  }

  fn deactivate(&mut self) -> AlarmEvent {
    debug!("alarm deactivated");
    self.ringing = false;
    AlarmEvent::Deactivated
  }
}

fn copy_out(register: &BcdTime, out: &mut [u8]) {
  let len = out.len().min(BCD_TIME_DIGITS);
  out[..len].copy_from_slice(&register[..len]);
}
