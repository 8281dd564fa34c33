//! The platform device a driver is bound to.

use crate::error::DriverError;
use crate::resource::{IrqNumber, RawResource};

/// A device instance discovered from a firmware description.
///
/// Resources are reported in firmware order. Interrupt lines are counted
/// separately and acquired by index.
pub trait PlatformDevice {
    /// Returns the device instance name (for logging).
    fn name(&self) -> &str;

    /// Returns the device's resource list in firmware order.
    fn resources(&self) -> &[RawResource];

    /// Returns the number of interrupt lines described for this device.
    fn irq_count(&self) -> usize;

    /// Resolves interrupt line `index` to its platform-assigned number.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::IrqUnavailable`] if the line cannot be
    /// resolved (no such line, controller not ready, ...).
    fn irq(&self, index: usize) -> Result<IrqNumber, DriverError>;
}
