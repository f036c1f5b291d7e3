#![cfg_attr(not(test), no_std)]

//! Logic core of a seven-segment alarm clock.
//!
//! - [`Clock`]: time of day kept as BCD digits, advanced by a fixed rate tick,
//! with a single alarm that can be postponed (snoozed).
//! - [`Display`]: multiplexed seven-segment renderer with digit flashing and
//! decimal points, driven through a [`DisplayDriver`].
//! - [`DigitalInput`] / [`DigitalOutput`]: buttons and buzzer over embedded-hal pins.
//!
//! Nothing here allocates. A typical firmware ticks the clock and refreshes the
//! display from a periodic interrupt and edits the time from its main loop,
//! sharing the clock through [`SharedClock`].

pub use rtcc::{DateTimeAccess, NaiveTime, Timelike};

mod fmt;

pub mod bcd;
pub mod clock;
pub mod digital;
pub mod display;
pub mod error;
pub mod shared;

pub use bcd::{BcdTime, BCD_TIME_DIGITS};
pub use clock::{AlarmEvent, AlarmState, Clock, Tick};
pub use digital::{DigitalInput, DigitalOutput};
pub use display::{Display, DisplayDriver, PinDriver, DISPLAY_MAX_DIGITS};
pub use error::Error;
pub use shared::SharedClock;
