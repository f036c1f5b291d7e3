/// Errors reported by the display renderer and the pin adapters.
///
/// Invalid time input is not an error: the clock reports it through the
/// boolean result of `set_time` / `alarm_set_time` and keeps the old register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// The underlying pin or display driver failed
  Pin(E),
  /// A digit count or digit index beyond what the display holds
  CapacityExceeded,
}
