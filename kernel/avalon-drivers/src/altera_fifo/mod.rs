//! Altera Avalon FIFO exposure driver.
//!
//! Binds to `altr,fifo-1.0` platform devices and hands their memory windows
//! to user space through the exposure subsystem. When the device describes
//! exactly one control/status window and one interrupt line, the driver also
//! owns the (shared) interrupt: the handler masks the FIFO's sources and the
//! user-space consumer re-arms them. Every other topology is exposed for
//! polling.
//!
//! Probe runs in four stages:
//!
//! 1. [`classify`] sorts resources into the two candidate layouts.
//! 2. [`arbiter`] settles the mode and maps the control/status window.
//! 3. [`registry`] registers the descriptor.
//! 4. [`FifoDevice::remove`] undoes registration, then the mapping.

use alloc::boxed::Box;

use avalon_core::kerr;
use avalon_driver_api::{BoundDevice, DriverError, PlatformDriverEntry, PlatformProbeContext};

pub mod arbiter;
pub mod classify;
pub mod irq;
pub mod region;
pub mod registry;
pub mod regs;

#[cfg(test)]
mod testing;

pub use registry::FifoDevice;

/// Driver name used for the entry and in log lines.
pub const DRIVER_NAME: &str = "altera_fifo";
/// Version string reported with every descriptor.
pub const DRIVER_VERSION: &str = "0.1";
/// Device tree compatible strings. Both spellings appear in shipped trees.
pub const COMPATIBLE: &[&str] = &["ALTR,fifo-1.0", "altr,fifo-1.0"];

/// Resource name of the input control/status window.
pub const IN_CSR_NAME: &str = "in_csr";
/// Resource name of the output control/status window.
pub const OUT_CSR_NAME: &str = "out_csr";

/// How a FIFO instance is presented to user space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interrupt-driven through the input-side control/status window.
    InputInterrupt,
    /// Interrupt-driven through the output-side control/status window.
    OutputInterrupt,
    /// No interrupt; user space polls.
    Polled,
}

impl Mode {
    /// Device name registered with the exposure subsystem.
    #[must_use]
    pub const fn device_name(self) -> &'static str {
        match self {
            Self::InputInterrupt => "altera_fifo_in_irq",
            Self::OutputInterrupt => "altera_fifo_out_irq",
            Self::Polled => "altera_fifo_no_irq",
        }
    }

    /// Returns `true` for the two interrupt-driven modes.
    #[must_use]
    pub const fn is_interrupt_driven(self) -> bool {
        !matches!(self, Self::Polled)
    }
}

/// Which side of the FIFO a control/status window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrDirection {
    /// `in_csr`: the write side.
    Input,
    /// `out_csr`: the read side.
    Output,
}

impl CsrDirection {
    /// Recognizes a control/status resource by its exact name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            IN_CSR_NAME => Some(Self::Input),
            OUT_CSR_NAME => Some(Self::Output),
            _ => None,
        }
    }

    /// The interrupt-driven mode this window selects.
    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::Input => Mode::InputInterrupt,
            Self::Output => Mode::OutputInterrupt,
        }
    }
}

/// Attaches one FIFO instance.
///
/// # Errors
///
/// - [`DriverError::ResourceExhausted`] if the device has too many memory
///   windows.
/// - [`DriverError::MapFailed`] if the control/status window cannot be mapped
///   for an interrupt-driven instance.
/// - Whatever the exposure subsystem returns when it rejects registration.
///
/// On error nothing stays registered or mapped.
pub fn probe(ctx: &PlatformProbeContext<'_>) -> Result<FifoDevice, DriverError> {
    let classification = classify::classify(ctx.device.resources()).inspect_err(|err| {
        kerr!("{}: {err}", ctx.device.name());
    })?;
    let finalized = arbiter::finalize(ctx, classification)?;
    registry::register(ctx, finalized)
}

fn probe_entry(ctx: &PlatformProbeContext<'_>) -> Result<Box<dyn BoundDevice>, DriverError> {
    probe(ctx).map(|dev| Box::new(dev) as Box<dyn BoundDevice>)
}

/// Platform driver entry for the Avalon FIFO.
pub static ALTERA_FIFO_DRIVER: PlatformDriverEntry = PlatformDriverEntry {
    name: DRIVER_NAME,
    compatible: COMPATIBLE,
    probe: probe_entry,
};

#[cfg(target_os = "none")]
avalon_driver_api::platform_driver_entry!(ALTERA_FIFO_PLATFORM_DRIVER, ALTERA_FIFO_DRIVER);
