use embedded_hal::digital::{self, ErrorKind};

/// Faults reported by the hardware lines a device owns
///
/// Note:
/// Timing faults of the LCD controller are not observable, the bus has no acknowledgment line.
/// Only faults the pin or ADC driver itself reports end up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A digital input or output line reported a fault
    #[error("digital line fault: {0:?}")]
    Digital(ErrorKind),
    /// An analog channel failed to deliver a sample
    #[error("analog channel fault")]
    Analog,
}

impl Error {
    pub(crate) fn digital(err: impl digital::Error) -> Self {
        Self::Digital(err.kind())
    }
}
