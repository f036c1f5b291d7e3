//! Time of day held as six unpacked BCD digits.
//!
//! Digits are ordered most-significant first:
//! hours tens, hours units, minutes tens, minutes units, seconds tens, seconds units.
//! The same layout is used for the current time and for the alarm.

use chrono::{NaiveTime, Timelike};

/// Number of digits in a BCD time value
pub const BCD_TIME_DIGITS: usize = 6;

/// Six unpacked BCD digits, `[H, H, M, M, S, S]`
pub type BcdTime = [u8; BCD_TIME_DIGITS];

/// Midnight, 00:00:00
pub const MIDNIGHT: BcdTime = [0; BCD_TIME_DIGITS];

// Digit positions
const HOURS_TENS: usize = 0;
const HOURS_UNITS: usize = 1;
const MINUTES_TENS: usize = 2;
const MINUTES_UNITS: usize = 3;
const SECONDS_TENS: usize = 4;
const SECONDS_UNITS: usize = 5;

/// Add one minute, wrapping 59 to 00 inside the minutes field.
/// Hours are never touched.
pub fn increment_minute(time: &mut BcdTime) {
  if step_sixty(time, MINUTES_TENS, MINUTES_UNITS) {
    time[MINUTES_TENS] = 0;
  }
}

/// Add one hour, wrapping 23 to 00.
pub fn increment_hour(time: &mut BcdTime) {
  time[HOURS_UNITS] += 1;
  if time[HOURS_UNITS] > 9 {
    time[HOURS_UNITS] = 0;
    time[HOURS_TENS] += 1;
  }
  if time[HOURS_TENS] >= 2 && time[HOURS_UNITS] > 3 {
    time[HOURS_TENS] = 0;
    time[HOURS_UNITS] = 0;
  }
}

/// Subtract one minute, wrapping 00 to 59 inside the minutes field.
pub fn decrement_minute(time: &mut BcdTime) {
  if time[MINUTES_UNITS] == 0 {
    time[MINUTES_UNITS] = 9;
    time[MINUTES_TENS] = match time[MINUTES_TENS] {
      0 => 5,
      tens => tens - 1,
    };
  }
  else {
    time[MINUTES_UNITS] -= 1;
  }
}

/// Subtract one hour, wrapping 00 straight to 23.
pub fn decrement_hour(time: &mut BcdTime) {
  if time[HOURS_UNITS] == 0 {
    if time[HOURS_TENS] == 0 {
      time[HOURS_TENS] = 2;
      time[HOURS_UNITS] = 3;
    }
    else {
      time[HOURS_TENS] -= 1;
      time[HOURS_UNITS] = 9;
    }
  }
  else {
    time[HOURS_UNITS] -= 1;
  }
}

/// Add one second, carrying into minutes and then hours on overflow.
/// 23:59:59 becomes 00:00:00.
pub fn increment_second(time: &mut BcdTime) {
  if !step_sixty(time, SECONDS_TENS, SECONDS_UNITS) {
    return;
  }
  time[SECONDS_TENS] = 0;

  if !step_sixty(time, MINUTES_TENS, MINUTES_UNITS) {
    return;
  }
  time[MINUTES_TENS] = 0;

  increment_hour(time);
}

// Advance a 00..59 field by one. Returns true when the tens digit overflowed,
// in which case the caller resets it and decides whether to carry.
fn step_sixty(time: &mut BcdTime, tens: usize, units: usize) -> bool {
  time[units] += 1;
  if time[units] > 9 {
    time[units] = 0;
    time[tens] += 1;
  }
  time[tens] > 5
}

/// True when `digits` is exactly six digits forming a time in 00:00:00 ..= 23:59:59
pub fn is_valid(digits: &[u8]) -> bool {
  if digits.len() != BCD_TIME_DIGITS {
    return false;
  }

  let hours_ok = match (digits[HOURS_TENS], digits[HOURS_UNITS]) {
    (0..=1, 0..=9) => true,
    (2, 0..=3) => true,
    _ => false,
  };

  hours_ok
    && digits[MINUTES_TENS] <= 5
    && digits[MINUTES_UNITS] <= 9
    && digits[SECONDS_TENS] <= 5
    && digits[SECONDS_UNITS] <= 9
}

/// Converts a slice of digits into a `BcdTime`, if it is a valid time of day
pub fn parse(digits: &[u8]) -> Option<BcdTime> {
  if !is_valid(digits) {
    return None;
  }
  let mut time = MIDNIGHT;
  time.copy_from_slice(digits);
  Some(time)
}

/// Split a chrono time of day into BCD digits. Sub-second precision is dropped.
pub fn from_naive_time(time: &NaiveTime) -> BcdTime {
  let (hours, minutes, seconds) = (time.hour() as u8, time.minute() as u8, time.second() as u8);
  [
    hours / 10, hours % 10,
    minutes / 10, minutes % 10,
    // a leap second reports 59 in chrono, so this stays in range
    seconds / 10, seconds % 10,
  ]
}

/// Combine BCD digits into a chrono time of day, or None if the digits are not valid
pub fn to_naive_time(time: &BcdTime) -> Option<NaiveTime> {
  if !is_valid(time) {
    return None;
  }
  let (hours, minutes, seconds) = to_binary(time);
  NaiveTime::from_hms_opt(hours as u32, minutes as u32, seconds as u32)
}

/// Binary (hours, minutes, seconds) of a BCD time. No validity check.
pub fn to_binary(time: &BcdTime) -> (u8, u8, u8) {
  (
    time[HOURS_TENS] * 10 + time[HOURS_UNITS],
    time[MINUTES_TENS] * 10 + time[MINUTES_UNITS],
    time[SECONDS_TENS] * 10 + time[SECONDS_UNITS],
  )
}

/// Pack into three bytes `[hours, minutes, seconds]`, tens in the high nibble.
/// This is the layout RTC chips keep in their time registers.
pub fn to_packed(time: &BcdTime) -> [u8; 3] {
  [
    (time[HOURS_TENS] << 4) | time[HOURS_UNITS],
    (time[MINUTES_TENS] << 4) | time[MINUTES_UNITS],
    (time[SECONDS_TENS] << 4) | time[SECONDS_UNITS],
  ]
}

/// Unpack three packed BCD bytes `[hours, minutes, seconds]`.
/// Returns None if the result is not a valid time of day.
pub fn from_packed(packed: &[u8; 3]) -> Option<BcdTime> {
  let time = [
    (packed[0] & 0xF0) >> 4, packed[0] & 0x0F,
    (packed[1] & 0xF0) >> 4, packed[1] & 0x0F,
    (packed[2] & 0xF0) >> 4, packed[2] & 0x0F,
  ];
  parse(&time)
}

#[cfg(test)]
mod tests {
  use super::*;

  // Every valid time of the day, in order from midnight
  fn all_times() -> impl Iterator<Item = BcdTime> {
    (0u32..86_400).map(|secs| {
      let (h, m, s) = ((secs / 3600) as u8, ((secs / 60) % 60) as u8, (secs % 60) as u8);
      [h / 10, h % 10, m / 10, m % 10, s / 10, s % 10]
    })
  }

  #[test]
  fn test_full_day_of_seconds() {
    let start = [1, 7, 4, 2, 0, 9];
    let mut time = start;
    for _ in 0..86_400 {
      increment_second(&mut time);
      assert!(is_valid(&time), "invalid intermediate {:?}", time);
    }
    assert_eq!(time, start);
  }

  #[test]
  fn test_increment_second_follows_wall_clock() {
    let mut time = MIDNIGHT;
    for expected in all_times().skip(1) {
      increment_second(&mut time);
      assert_eq!(time, expected);
    }
    increment_second(&mut time);
    assert_eq!(time, MIDNIGHT);
  }

  #[test]
  fn test_increment_second_carries() {
    let mut time = [0, 5, 5, 9, 5, 9];
    increment_second(&mut time);
    assert_eq!(time, [0, 6, 0, 0, 0, 0]);

    let mut time = [1, 9, 5, 9, 5, 9];
    increment_second(&mut time);
    assert_eq!(time, [2, 0, 0, 0, 0, 0]);

    let mut time = [2, 3, 5, 9, 5, 9];
    increment_second(&mut time);
    assert_eq!(time, MIDNIGHT);

    let mut time = [1, 2, 3, 4, 0, 9];
    increment_second(&mut time);
    assert_eq!(time, [1, 2, 3, 4, 1, 0]);
  }

  #[test]
  fn test_field_operations_are_closed_over_valid_times() {
    let ops: [fn(&mut BcdTime); 5] = [
      increment_minute, decrement_minute, increment_hour, decrement_hour, increment_second,
    ];
    for time in all_times() {
      for op in ops.iter() {
        let mut next = time;
        op(&mut next);
        assert!(is_valid(&next), "{:?} -> {:?}", time, next);
      }
    }
  }

  #[test]
  fn test_minute_round_trip() {
    for time in all_times() {
      let mut up = time;
      increment_minute(&mut up);
      decrement_minute(&mut up);
      assert_eq!(up, time);

      let mut down = time;
      decrement_minute(&mut down);
      increment_minute(&mut down);
      assert_eq!(down, time);
    }
  }

  #[test]
  fn test_hour_round_trip() {
    for hour in 0u8..24 {
      let time = [hour / 10, hour % 10, 3, 0, 1, 5];
      let mut up = time;
      increment_hour(&mut up);
      decrement_hour(&mut up);
      assert_eq!(up, time);

      let mut down = time;
      decrement_hour(&mut down);
      increment_hour(&mut down);
      assert_eq!(down, time);
    }
  }

  #[test]
  fn test_field_wraps() {
    let mut time = [2, 3, 5, 9, 0, 0];
    increment_minute(&mut time);
    assert_eq!(time, [2, 3, 0, 0, 0, 0], "minutes must not carry into hours");
    decrement_minute(&mut time);
    assert_eq!(time, [2, 3, 5, 9, 0, 0]);

    increment_hour(&mut time);
    assert_eq!(time, [0, 0, 5, 9, 0, 0]);
    decrement_hour(&mut time);
    assert_eq!(time, [2, 3, 5, 9, 0, 0]);

    let mut time = [1, 9, 0, 0, 0, 0];
    increment_hour(&mut time);
    assert_eq!(time, [2, 0, 0, 0, 0, 0]);
    decrement_hour(&mut time);
    assert_eq!(time, [1, 9, 0, 0, 0, 0]);

    let mut time = [0, 0, 1, 0, 0, 0];
    decrement_minute(&mut time);
    assert_eq!(time, [0, 0, 0, 9, 0, 0]);
  }

  #[test]
  fn test_is_valid_accepts_whole_day() {
    assert!(all_times().all(|time| is_valid(&time)));
  }

  #[test]
  fn test_is_valid_rejects() {
    assert!(!is_valid(&[1, 2, 6, 0, 0, 0]));
    assert!(!is_valid(&[1, 2, 0, 0, 6, 0]));
    assert!(!is_valid(&[3, 0, 0, 0, 0, 0]));
    assert!(!is_valid(&[2, 4, 0, 0, 0, 0]));
    assert!(!is_valid(&[2, 9, 5, 9, 5, 9]));
    assert!(!is_valid(&[0, 10, 0, 0, 0, 0]));
    assert!(!is_valid(&[0, 0, 0, 10, 0, 0]));
    assert!(!is_valid(&[0, 0, 0, 0, 0, 10]));
    // wrong length
    assert!(!is_valid(&[0, 0, 0, 0]));
    assert!(!is_valid(&[0, 0, 0, 0, 0, 0, 0]));
  }

  #[test]
  fn test_parse() {
    assert_eq!(parse(&[0, 7, 3, 0, 0, 0]), Some([0, 7, 3, 0, 0, 0]));
    assert_eq!(parse(&[0, 7, 7, 0, 0, 0]), None);
    assert_eq!(parse(&[0, 7, 3, 0]), None);
  }

  #[test]
  fn test_naive_time_conversion() {
    let naive = NaiveTime::from_hms_opt(21, 4, 38).unwrap();
    let bcd = from_naive_time(&naive);
    assert_eq!(bcd, [2, 1, 0, 4, 3, 8]);
    assert_eq!(to_naive_time(&bcd), Some(naive));
    assert_eq!(to_naive_time(&[2, 5, 0, 0, 0, 0]), None);
  }

  #[test]
  fn test_packed_conversion() {
    let time = [2, 3, 5, 9, 5, 8];
    let packed = to_packed(&time);
    assert_eq!(packed, [0x23, 0x59, 0x58]);
    assert_eq!(from_packed(&packed), Some(time));
    assert_eq!(from_packed(&[0x24, 0x00, 0x00]), None);
    assert_eq!(to_binary(&time), (23, 59, 58));
  }
}
