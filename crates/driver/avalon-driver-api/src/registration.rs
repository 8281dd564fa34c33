//! Platform driver registration.
//!
//! Driver crates describe themselves with a static [`PlatformDriverEntry`]
//! and, on bare-metal targets, place it in the `.avalon_platform_drivers`
//! linker section with [`platform_driver_entry!`]. Device bring-up walks the
//! entries, matches compatible strings, and calls `probe` with a
//! [`PlatformProbeContext`] carrying exactly the collaborators a platform
//! driver may use.

use alloc::boxed::Box;

use crate::error::DriverError;
use crate::exposure::ExposureSubsystem;
use crate::mapper::MmioMapper;
use crate::platform::PlatformDevice;

/// Collaborators handed to a platform driver's probe and remove.
#[derive(Clone, Copy)]
pub struct PlatformProbeContext<'a> {
    /// The device being attached.
    pub device: &'a dyn PlatformDevice,
    /// Kernel-side MMIO mapping.
    pub mmio: &'a dyn MmioMapper,
    /// User-space exposure subsystem.
    pub exposure: &'a dyn ExposureSubsystem,
}

/// A successfully attached device instance, owned by bring-up until detach.
pub trait BoundDevice {
    /// Releases everything the probe acquired.
    fn remove(self: Box<Self>, ctx: &PlatformProbeContext<'_>);
}

/// Probe function signature for platform drivers.
pub type PlatformProbeFn =
    fn(&PlatformProbeContext<'_>) -> Result<Box<dyn BoundDevice>, DriverError>;

/// Platform driver entry, matched by compatible string.
#[repr(C)]
pub struct PlatformDriverEntry {
    /// Driver name (for logging).
    pub name: &'static str,
    /// Compatible strings this driver binds to (e.g. "altr,fifo-1.0").
    pub compatible: &'static [&'static str],
    /// Called when a matching device is found.
    pub probe: PlatformProbeFn,
}

impl PlatformDriverEntry {
    /// Returns `true` if `compatible` exactly matches one of this driver's
    /// compatible strings.
    #[must_use]
    pub fn matches(&self, compatible: &str) -> bool {
        self.compatible.iter().any(|c| *c == compatible)
    }
}

/// Returns the first entry that binds to `compatible`.
#[must_use]
pub fn find_driver<'e>(
    entries: &'e [&'e PlatformDriverEntry],
    compatible: &str,
) -> Option<&'e PlatformDriverEntry> {
    entries.iter().copied().find(|e| e.matches(compatible))
}

/// Register a platform driver entry in the `.avalon_platform_drivers` linker
/// section.
///
/// # Example
///
/// ```ignore
/// avalon_driver_api::platform_driver_entry!(MY_DRIVER_ENTRY, MY_DRIVER);
/// ```
#[macro_export]
macro_rules! platform_driver_entry {
    ($name:ident, $entry:path) => {
        #[used]
        #[unsafe(link_section = ".avalon_platform_drivers")]
        static $name: &$crate::registration::PlatformDriverEntry = &$entry;
    };
}
