//! Registration with the exposure subsystem and the matching teardown.

use alloc::sync::Arc;

use avalon_core::{kerr, kinfo};
use avalon_driver_api::{
    BoundDevice, DriverError, ExposureDescriptor, ExposureHandle, MmioRegion, PlatformProbeContext,
};

use super::Mode;
use super::arbiter::Finalized;

/// A FIFO instance that is live in user space.
#[derive(Debug)]
pub struct FifoDevice {
    mode: Mode,
    handle: ExposureHandle,
    descriptor: Arc<ExposureDescriptor>,
    csr_mapping: Option<MmioRegion>,
}

impl FifoDevice {
    /// Returns the mode chosen at probe time.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the exposure subsystem's handle for this instance.
    #[must_use]
    pub const fn handle(&self) -> ExposureHandle {
        self.handle
    }

    /// Returns the registered descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ExposureDescriptor {
        &self.descriptor
    }

    /// Withdraws the device from user space, then releases the kernel-side
    /// control/status mapping.
    ///
    /// The order matters: once `unregister` returns no handler invocation
    /// can still be reading through the mapping.
    pub fn remove(self, ctx: &PlatformProbeContext<'_>) {
        ctx.exposure.unregister(self.handle);
        if let Some(mapping) = self.csr_mapping {
            ctx.mmio.unmap_mmio(mapping);
        }
        kinfo!("{}: removed {}", ctx.device.name(), self.mode.device_name());
    }
}

impl BoundDevice for FifoDevice {
    fn remove(self: alloc::boxed::Box<Self>, ctx: &PlatformProbeContext<'_>) {
        FifoDevice::remove(*self, ctx);
    }
}

/// Hands the finalized descriptor to the exposure subsystem.
///
/// # Errors
///
/// Propagates the subsystem's rejection after releasing the control/status
/// mapping, if one was made.
pub fn register(
    ctx: &PlatformProbeContext<'_>,
    finalized: Finalized,
) -> Result<FifoDevice, DriverError> {
    let Finalized {
        mode,
        descriptor,
        csr_mapping,
    } = finalized;
    let device = ctx.device.name();
    let descriptor = Arc::new(descriptor);

    let handle = match ctx.exposure.register(Arc::clone(&descriptor)) {
        Ok(handle) => handle,
        Err(err) => {
            kerr!("{device}: failed to register exposure device ({err})");
            if let Some(mapping) = csr_mapping {
                ctx.mmio.unmap_mmio(mapping);
            }
            return Err(err);
        }
    };

    kinfo!("{device}: registered in {} mode", mode.device_name());
    Ok(FifoDevice {
        mode,
        handle,
        descriptor,
        csr_mapping,
    })
}
