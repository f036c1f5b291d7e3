// Logging shims. With the `defmt` feature these forward to defmt,
// otherwise the arguments are type-checked and discarded.

#[cfg(feature = "defmt")]
macro_rules! debug {
  ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
  ($fmt:literal $(, $arg:expr)* $(,)?) => {{
    $( let _ = &$arg; )*
  }};
}

#[cfg(feature = "defmt")]
macro_rules! trace {
  ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
  ($fmt:literal $(, $arg:expr)* $(,)?) => {{
    $( let _ = &$arg; )*
  }};
}

pub(crate) use debug;
pub(crate) use trace;
