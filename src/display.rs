//! Multiplexed seven-segment display.
//!
//! One digit is lit per call to [`Display::refresh`]; calling it at a fixed rate
//! from the tick interrupt makes all digits appear lit at once.
//! Digits inside a flashing window are blanked for half of each flash period.

use embedded_hal::digital::v2::OutputPin;

use crate::error::Error;
use crate::fmt::{debug, trace};

/// Largest number of digits a display can hold
pub const DISPLAY_MAX_DIGITS: usize = 8;

// Segment bits, as they appear in the pattern passed to `DisplayDriver::segments_on`
/// Top
pub const SEGMENT_A: u8 = 1 << 0;
/// Upper right
pub const SEGMENT_B: u8 = 1 << 1;
/// Lower right
pub const SEGMENT_C: u8 = 1 << 2;
/// Bottom
pub const SEGMENT_D: u8 = 1 << 3;
/// Lower left
pub const SEGMENT_E: u8 = 1 << 4;
/// Upper left
pub const SEGMENT_F: u8 = 1 << 5;
/// Middle
pub const SEGMENT_G: u8 = 1 << 6;
/// Decimal point
pub const SEGMENT_DP: u8 = 1 << 7;

/// Number of segment lines including the decimal point
pub const SEGMENT_LINES: usize = 8;

/// Segment patterns for the decimal digits 0..9
pub const DIGIT_SEGMENTS: [u8; 10] = [
  SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F,             // 0
  SEGMENT_B | SEGMENT_C,                                                             // 1
  SEGMENT_A | SEGMENT_B | SEGMENT_D | SEGMENT_E | SEGMENT_G,                         // 2
  SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_G,                         // 3
  SEGMENT_B | SEGMENT_C | SEGMENT_F | SEGMENT_G,                                     // 4
  SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_F | SEGMENT_G,                         // 5
  SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G,             // 6
  SEGMENT_A | SEGMENT_B | SEGMENT_C,                                                 // 7
  SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G, // 8
  SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_F | SEGMENT_G,                         // 9
];

/// Low level operations a multiplexed display needs from the hardware.
/// Failures are reported as [`Error`], wrapping the hardware error in `Error::Pin`.
pub trait DisplayDriver {
  /// Error type
  type Error;

  /// Number of digit lines the driver can select
  fn digit_lines(&self) -> usize {
    DISPLAY_MAX_DIGITS
  }

  /// Turn every segment and every digit line off
  fn all_off(&mut self) -> Result<(), Self::Error>;

  /// Light the segments whose bits are set in `segments`
  fn segments_on(&mut self, segments: u8) -> Result<(), Self::Error>;

  /// Enable the common line of digit `digit`.
  /// A digit the driver has no line for is `Error::CapacityExceeded`.
  fn digit_on(&mut self, digit: u8) -> Result<(), Self::Error>;
}

/// Multiplexed display state: segment memory, scan position and flashing window
pub struct Display<D> {
  driver: D,
  digits: u8,
  active_digit: u8,
  flashing_from: u8,
  flashing_to: u8,
  flashing_count: u16,
  flashing_factor: u16,
  memory: [u8; DISPLAY_MAX_DIGITS],
}

impl<D, E> Display<D>
  where
    D: DisplayDriver<Error = Error<E>>,
{

  /// New display of `digits` digits with blank memory and no flashing.
  /// `digits` must be between 1 and the smaller of [`DISPLAY_MAX_DIGITS`]
  /// and the driver's digit lines. The display is turned off right away.
  pub fn new(digits: u8, mut driver: D) -> Result<Self, Error<E>> {
    let capacity = driver.digit_lines().min(DISPLAY_MAX_DIGITS);
    if digits == 0 || digits as usize > capacity {
      debug!("display of {} digits exceeds capacity {}", digits, capacity);
      return Err(Error::CapacityExceeded);
    }
    driver.all_off()?;

    Ok(Display {
      driver,
      digits,
      // first refresh lands on digit 0
      active_digit: digits - 1,
      flashing_from: 0,
      flashing_to: 0,
      flashing_count: 0,
      flashing_factor: 0,
      memory: [0; DISPLAY_MAX_DIGITS],
    })
  }

  /// Number of digits
  pub fn digits(&self) -> u8 {
    self.digits
  }

  /// Stored segment bytes, one per digit
  pub fn memory(&self) -> &[u8] {
    &self.memory[..self.digits as usize]
  }

  /// The driver, e.g. to inspect a simulated display
  pub fn driver(&self) -> &D {
    &self.driver
  }

  /// Release the driver
  pub fn release(self) -> D {
    self.driver
  }

  /// Clear the display memory and write decimal digits, one per display digit.
  /// Extra values beyond the number of digits are ignored.
  /// Values must be 0..9; anything else renders blank.
  /// Decimal points are cleared too.
  pub fn write_bcd(&mut self, number: &[u8]) {
    self.memory = [0; DISPLAY_MAX_DIGITS];
    for (slot, &value) in self.memory.iter_mut().zip(number).take(self.digits as usize) {
      *slot = DIGIT_SEGMENTS.get(value as usize).copied().unwrap_or(0);
    }
  }

  /// Show the next digit. Call this at a fixed rate.
  pub fn refresh(&mut self) -> Result<(), Error<E>> {
    // segments off before switching digit lines avoids ghosting
    self.driver.all_off()?;

    self.active_digit = (self.active_digit + 1) % self.digits;
    let mut segments = self.memory[self.active_digit as usize];

    if self.flashing_factor != 0 {
      if self.active_digit == 0 {
        self.flashing_count = (self.flashing_count + 1) % self.flashing_factor;
      }
      if self.is_flashing(self.active_digit) && self.flashing_count > self.flashing_factor / 2 {
        segments = 0;
      }
    }

    self.driver.segments_on(segments)?;
    self.driver.digit_on(self.active_digit)
  }

  /// Flash digits `from..=to`. `factor` is the flash period counted in full
  /// display scans; the digits are blank for roughly the second half of it.
  /// A `factor` of zero stops flashing.
  pub fn flash_digits(&mut self, from: u8, to: u8, factor: u16) {
    trace!("flash digits {}..={} factor {}", from, to, factor);
    self.flashing_from = from;
    self.flashing_to = to;
    self.flashing_count = 0;
    self.flashing_factor = factor;
  }

  /// Flip the decimal point of digit `position`
  pub fn toggle_dot(&mut self, position: u8) -> Result<(), Error<E>> {
    if position >= self.digits {
      return Err(Error::CapacityExceeded);
    }
    self.memory[position as usize] ^= SEGMENT_DP;
    Ok(())
  }

  fn is_flashing(&self, digit: u8) -> bool {
    digit >= self.flashing_from && digit <= self.flashing_to
  }
}

/// Display driver using one GPIO per segment line and one per digit line.
/// - `segments` : pins for segments A..G and the decimal point, in that order
/// - `digits` : common line of each digit, leftmost first
pub struct PinDriver<SEG, DIG, const N: usize> {
  segments: [SEG; SEGMENT_LINES],
  digits: [DIG; N],
  segments_inverted: bool,
  digits_inverted: bool,
}

impl<SEG, DIG, E, const N: usize> PinDriver<SEG, DIG, N>
  where
    SEG: OutputPin<Error = E>,
    DIG: OutputPin<Error = E>,
{
  /// New driver with segment and digit lines active high
  pub fn new(segments: [SEG; SEGMENT_LINES], digits: [DIG; N]) -> Self {
    Self::new_with_polarity(segments, digits, false, false)
  }

  /// New driver where either side may be active low,
  /// such as common anode displays or digits switched by PNP transistors
  pub fn new_with_polarity(segments: [SEG; SEGMENT_LINES], digits: [DIG; N],
                           segments_inverted: bool, digits_inverted: bool) -> Self {
    PinDriver {
      segments,
      digits,
      segments_inverted,
      digits_inverted,
    }
  }

  /// Release the pins
  pub fn release(self) -> ([SEG; SEGMENT_LINES], [DIG; N]) {
    (self.segments, self.digits)
  }

  fn drive<P: OutputPin<Error = E>>(pin: &mut P, active: bool, inverted: bool) -> Result<(), Error<E>> {
    if active != inverted {
      pin.set_high().map_err(Error::Pin)
    }
    else {
      pin.set_low().map_err(Error::Pin)
    }
  }
}

impl<SEG, DIG, E, const N: usize> DisplayDriver for PinDriver<SEG, DIG, N>
  where
    SEG: OutputPin<Error = E>,
    DIG: OutputPin<Error = E>,
{
  type Error = Error<E>;

  fn digit_lines(&self) -> usize {
    N
  }

  fn all_off(&mut self) -> Result<(), Self::Error> {
    for pin in self.segments.iter_mut() {
      Self::drive(pin, false, self.segments_inverted)?;
    }
    for pin in self.digits.iter_mut() {
      Self::drive(pin, false, self.digits_inverted)?;
    }
    Ok(())
  }

  fn segments_on(&mut self, segments: u8) -> Result<(), Self::Error> {
    for (bit, pin) in self.segments.iter_mut().enumerate() {
      let active = segments & (1 << bit) != 0;
      Self::drive(pin, active, self.segments_inverted)?;
    }
    Ok(())
  }

  fn digit_on(&mut self, digit: u8) -> Result<(), Self::Error> {
    match self.digits.get_mut(digit as usize) {
      Some(pin) => Self::drive(pin, true, self.digits_inverted),
      None => Err(Error::CapacityExceeded),
    }
  }
}
