//! Driver error types.

use core::fmt;

/// Errors that can occur while attaching, running, or detaching a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The hardware device was not found or did not respond.
    DeviceNotFound,
    /// Driver initialization failed.
    InitFailed,
    /// The requested operation is not supported.
    Unsupported,
    /// An I/O error occurred during a hardware operation.
    IoError,
    /// The driver is not in a valid state for this operation.
    InvalidState,
    /// The device describes more memory windows than can be exposed.
    ResourceExhausted,
    /// The requested interrupt line does not exist or is busy.
    IrqUnavailable,
    /// A physical window could not be mapped into kernel space.
    MapFailed,
    /// The exposure subsystem refused the descriptor.
    Rejected,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound => f.write_str("device not found"),
            Self::InitFailed => f.write_str("driver initialization failed"),
            Self::Unsupported => f.write_str("operation not supported"),
            Self::IoError => f.write_str("I/O error"),
            Self::InvalidState => f.write_str("invalid driver state"),
            Self::ResourceExhausted => f.write_str("too many memory regions"),
            Self::IrqUnavailable => f.write_str("interrupt line unavailable"),
            Self::MapFailed => f.write_str("failed to map registers"),
            Self::Rejected => f.write_str("registration rejected"),
        }
    }
}

impl core::error::Error for DriverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_attach_failures() {
        assert_eq!(
            format!("{}", DriverError::ResourceExhausted),
            "too many memory regions"
        );
        assert_eq!(
            format!("{}", DriverError::MapFailed),
            "failed to map registers"
        );
        assert_eq!(
            format!("{}", DriverError::Rejected),
            "registration rejected"
        );
        assert_eq!(
            format!("{}", DriverError::IrqUnavailable),
            "interrupt line unavailable"
        );
    }

    #[test]
    fn error_equality() {
        assert_eq!(DriverError::MapFailed, DriverError::MapFailed);
        assert_ne!(DriverError::MapFailed, DriverError::Rejected);
    }
}
