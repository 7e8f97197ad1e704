/// Console error types.
///
/// Dropped input is not an error value: the producer runs in interrupt
/// context and simply loses bytes once the ring is full (`append` returns
/// false). Short copies to or from caller memory are reported as partial
/// counts, not errors.
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// The caller was marked for termination while waiting for input.
    Interrupted,
    /// History lookup outside `[0, len)`.
    InvalidIndex { index: usize, len: usize },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Interrupted => write!(f, "read interrupted: caller killed"),
            ConsoleError::InvalidIndex { index, len } => {
                write!(f, "history index {} out of range ({} stored)", index, len)
            }
        }
    }
}
