//! A clock shared between the tick interrupt and the foreground loop.
//!
//! Every access runs inside a critical section, so the interrupt can never
//! observe a half written time or alarm register.

use core::cell::RefCell;
use critical_section::Mutex;

use crate::clock::{Clock, Tick};

/// [`Clock`] behind a critical section mutex, suitable for a `static`
pub struct SharedClock {
  inner: Mutex<RefCell<Clock>>,
}

impl SharedClock {

  /// Clock as built by [`Clock::new`]
  pub const fn new(ticks_per_second: u16) -> Self {
    SharedClock {
      inner: Mutex::new(RefCell::new(Clock::new(ticks_per_second))),
    }
  }

  /// Run `f` with exclusive access to the clock.
  /// Calling `with` again from inside `f` panics.
  pub fn with<R>(&self, f: impl FnOnce(&mut Clock) -> R) -> R {
    critical_section::with(|cs| f(&mut *self.inner.borrow_ref_mut(cs)))
  }

  /// Tick the clock, for use from the tick interrupt
  pub fn tick(&self) -> Tick {
    self.with(Clock::tick)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::AlarmEvent;
  use std::thread;

  static CLOCK: SharedClock = SharedClock::new(4);

  #[test]
  fn test_shared_clock() {
    assert!(CLOCK.with(|clock| clock.set_time(&[0, 6, 5, 9, 5, 9])));
    assert!(CLOCK.with(|clock| clock.alarm_set_time(&[0, 7, 0, 0, 0, 0])));

    // ticks arrive from another context
    let ticker = thread::spawn(|| {
      (0..4).map(|_| CLOCK.tick().alarm).filter(|event| *event != AlarmEvent::NoChange).count()
    });
    assert_eq!(ticker.join().unwrap(), 1);

    assert_eq!(CLOCK.with(|clock| clock.time()), [0, 7, 0, 0, 0, 0]);
    assert!(CLOCK.with(|clock| clock.is_ringing()));
  }
}
