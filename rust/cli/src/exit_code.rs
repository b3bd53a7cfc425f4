//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Bad input, bad configuration, I/O or engine failure.
pub const ERROR: i32 = 2;

/// The run was cut short before finishing (Unix convention for SIGINT).
pub const INTERRUPTED: i32 = 130;
