//! Output macros for [`crate::run`].

/// Writes a line, returning [`crate::exit_code::ERROR`] from the enclosing
/// function if the stream is gone.
///
/// ```ignore
/// write_or_exit!(err, "Usage: jetons <command> [options]");
/// ```
#[macro_export]
macro_rules! write_or_exit {
    ($dest:expr, $($arg:tt)*) => {
        if writeln!($dest, $($arg)*).is_err() {
            return $crate::exit_code::ERROR;
        }
    };
}
