//! Logical digital inputs (buttons) and outputs (buzzer, LEDs) on top of embedded-hal pins.
//!
//! Both sides support inverted wiring so the rest of the firmware only deals with
//! "active" and "inactive".

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::clock::AlarmEvent;

/// A digital input that remembers its last reported state, for edge detection
pub struct DigitalInput<P> {
  pin: P,
  inverted: bool,
  last_state: bool,
}

impl<P, E> DigitalInput<P>
  where
    P: InputPin<Error = E>,
{
  /// - `inverted` : true when the input reads low while active (e.g. a button to ground)
  pub fn new(pin: P, inverted: bool) -> Self {
    DigitalInput {
      pin,
      inverted,
      last_state: false,
    }
  }

  /// Current logical state, true when active
  pub fn get_state(&self) -> Result<bool, E> {
    Ok(self.pin.is_high()? != self.inverted)
  }

  /// True when the state differs from the last poll
  pub fn has_changed(&mut self) -> Result<bool, E> {
    let (last, state) = self.poll()?;
    Ok(state != last)
  }

  /// True on an inactive to active transition since the last poll
  pub fn has_activated(&mut self) -> Result<bool, E> {
    let (last, state) = self.poll()?;
    Ok(state && !last)
  }

  /// True on an active to inactive transition since the last poll
  pub fn has_deactivated(&mut self) -> Result<bool, E> {
    let (last, state) = self.poll()?;
    Ok(!state && last)
  }

  /// Release the pin
  pub fn release(self) -> P {
    self.pin
  }

  // Returns (previous, current) and records current
  fn poll(&mut self) -> Result<(bool, bool), E> {
    let state = self.get_state()?;
    let last = self.last_state;
    self.last_state = state;
    Ok((last, state))
  }
}

/// A digital output driven in logical terms
pub struct DigitalOutput<P> {
  pin: P,
  inverted: bool,
  active: bool,
}

impl<P, E> DigitalOutput<P>
  where
    P: OutputPin<Error = E>,
{
  /// The output is driven inactive immediately.
  /// - `inverted` : true when the load is on while the pin is low
  pub fn new(pin: P, inverted: bool) -> Result<Self, E> {
    let mut output = DigitalOutput {
      pin,
      inverted,
      active: false,
    };
    output.set(false)?;
    Ok(output)
  }

  /// Drive the output active
  pub fn activate(&mut self) -> Result<(), E> {
    self.set(true)
  }

  /// Drive the output inactive
  pub fn deactivate(&mut self) -> Result<(), E> {
    self.set(false)
  }

  /// Flip the logical state last driven
  pub fn toggle(&mut self) -> Result<(), E> {
    self.set(!self.active)
  }

  /// Logical state last driven
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Drive the output from an alarm edge, e.g. for a buzzer.
  /// `NoChange` leaves the pin alone.
  pub fn follow(&mut self, event: AlarmEvent) -> Result<(), E> {
    match event {
      AlarmEvent::Activated => self.activate(),
      AlarmEvent::Deactivated => self.deactivate(),
      AlarmEvent::NoChange => Ok(()),
    }
  }

  /// Release the pin
  pub fn release(self) -> P {
    self.pin
  }

  fn set(&mut self, active: bool) -> Result<(), E> {
    if active != self.inverted {
      self.pin.set_high()?;
    }
    else {
      self.pin.set_low()?;
    }
    self.active = active;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction as PinTrans};

  #[test]
  fn test_input_state() {
    let expectations = [
      PinTrans::get(State::High),
      PinTrans::get(State::Low),
    ];
    let input = DigitalInput::new(PinMock::new(&expectations), false);
    assert!(input.get_state().unwrap());
    assert!(!input.get_state().unwrap());
    input.release().done();
  }

  #[test]
  fn test_inverted_input_state() {
    let expectations = [
      PinTrans::get(State::Low),
      PinTrans::get(State::High),
    ];
    let input = DigitalInput::new(PinMock::new(&expectations), true);
    assert!(input.get_state().unwrap());
    assert!(!input.get_state().unwrap());
    input.release().done();
  }

  #[test]
  fn test_input_edges() {
    let expectations = [
      PinTrans::get(State::Low),
      PinTrans::get(State::High),
      PinTrans::get(State::High),
      PinTrans::get(State::Low),
      PinTrans::get(State::High),
      PinTrans::get(State::Low),
    ];
    let mut input = DigitalInput::new(PinMock::new(&expectations), false);
    assert!(!input.has_activated().unwrap());
    assert!(input.has_activated().unwrap());
    // held down, no new edge
    assert!(!input.has_activated().unwrap());
    assert!(input.has_deactivated().unwrap());
    assert!(input.has_changed().unwrap());
    assert!(input.has_changed().unwrap());
    input.release().done();
  }

  #[test]
  fn test_output() {
    let expectations = [
      PinTrans::set(State::Low),
      PinTrans::set(State::High),
      PinTrans::set(State::Low),
      PinTrans::set(State::High),
      PinTrans::set(State::Low),
    ];
    let mut output = DigitalOutput::new(PinMock::new(&expectations), false).unwrap();
    assert!(!output.is_active());
    output.activate().unwrap();
    assert!(output.is_active());
    output.deactivate().unwrap();
    output.toggle().unwrap();
    assert!(output.is_active());
    output.toggle().unwrap();
    assert!(!output.is_active());
    output.release().done();
  }

  #[test]
  fn test_inverted_output_follows_alarm() {
    let expectations = [
      PinTrans::set(State::High),
      PinTrans::set(State::Low),
      PinTrans::set(State::High),
    ];
    let mut buzzer = DigitalOutput::new(PinMock::new(&expectations), true).unwrap();
    buzzer.follow(AlarmEvent::NoChange).unwrap();
    buzzer.follow(AlarmEvent::Activated).unwrap();
    assert!(buzzer.is_active());
    buzzer.follow(AlarmEvent::NoChange).unwrap();
    buzzer.follow(AlarmEvent::Deactivated).unwrap();
    assert!(!buzzer.is_active());
    buzzer.release().done();
  }
}
