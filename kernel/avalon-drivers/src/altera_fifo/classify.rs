//! Resource classification.
//!
//! A single pass over the device's resource list feeds two independent
//! region accumulators: one for the interrupt-driven descriptor, which
//! reserves slot 0 for the control/status window, and one for the polling
//! descriptor, which exposes every window in firmware order.

use avalon_core::addr::VirtAddr;
use avalon_driver_api::{DriverError, ExposureDescriptor, MAX_REGIONS, MappedRegion, RawResource};
use planck_noalloc::vec::ArrayVec;

use super::region::map_resource;
use super::{CsrDirection, DRIVER_VERSION, Mode};

/// Accumulates the regions of one exposure descriptor.
#[derive(Debug)]
pub struct RegionBuilder {
    reserve_csr_slot: bool,
    csr: Option<MappedRegion>,
    windows: ArrayVec<MappedRegion, MAX_REGIONS>,
}

impl RegionBuilder {
    /// A builder whose slot 0 is reserved for the control/status window.
    #[must_use]
    pub fn interrupt() -> Self {
        Self {
            reserve_csr_slot: true,
            csr: None,
            windows: ArrayVec::new(),
        }
    }

    /// A builder where every window is an ordinary region.
    #[must_use]
    pub fn polling() -> Self {
        Self {
            reserve_csr_slot: false,
            csr: None,
            windows: ArrayVec::new(),
        }
    }

    fn window_capacity(&self) -> usize {
        MAX_REGIONS - usize::from(self.reserve_csr_slot)
    }

    /// Fills the reserved slot. The first control/status window wins.
    fn set_csr(&mut self, region: MappedRegion) {
        debug_assert!(self.reserve_csr_slot);
        if self.csr.is_none() {
            self.csr = Some(region);
        }
    }

    /// Appends an ordinary region after the reserved slot.
    fn push(&mut self, region: MappedRegion) -> Result<(), DriverError> {
        if self.windows.len() >= self.window_capacity() {
            return Err(DriverError::ResourceExhausted);
        }
        self.windows
            .try_push(region)
            .map_err(|_| DriverError::ResourceExhausted)
    }

    /// Records the kernel-side address of the control/status window.
    pub fn attach_csr_kernel_addr(&mut self, addr: VirtAddr) {
        if let Some(csr) = self.csr.take() {
            self.csr = Some(csr.with_kernel_addr(addr));
        }
    }

    /// Returns the reserved control/status region, if filled.
    #[must_use]
    pub fn csr(&self) -> Option<&MappedRegion> {
        self.csr.as_ref()
    }

    /// Iterates regions in final slot order.
    pub fn regions(&self) -> impl Iterator<Item = &MappedRegion> {
        self.csr.iter().chain(self.windows.iter())
    }

    /// Returns the number of regions accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.csr.is_some()) + self.windows.len()
    }

    /// Returns `true` if no region has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produces the descriptor for `mode`, without interrupt wiring.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::ResourceExhausted`] if the regions do not fit.
    pub fn build(&self, mode: Mode) -> Result<ExposureDescriptor, DriverError> {
        let mut descriptor = ExposureDescriptor::new(mode.device_name(), DRIVER_VERSION);
        for region in self.regions() {
            descriptor.push_region(region.clone())?;
        }
        Ok(descriptor)
    }
}

/// Result of a classification pass.
#[derive(Debug)]
pub struct Classification {
    /// Mode implied by the resource topology alone.
    pub candidate: Mode,
    /// The first control/status resource found.
    pub csr: Option<RawResource>,
    /// How many control/status resources were found.
    pub csr_count: usize,
    /// Regions for the interrupt-driven descriptor.
    pub interrupt: RegionBuilder,
    /// Regions for the polling descriptor.
    pub polling: RegionBuilder,
}

impl Classification {
    /// Returns `true` if more than one control/status resource was found.
    #[must_use]
    pub fn has_csr_conflict(&self) -> bool {
        self.csr_count > 1
    }
}

/// Classifies `resources` in the order given.
///
/// Non-memory resources are skipped. A second control/status resource
/// revokes interrupt mode but classification continues, since a polling
/// consumer still needs every window, the second control/status window
/// included.
///
/// # Errors
///
/// Returns [`DriverError::ResourceExhausted`] if either descriptor would
/// need more than [`MAX_REGIONS`] regions.
pub fn classify(resources: &[RawResource]) -> Result<Classification, DriverError> {
    let mut out = Classification {
        candidate: Mode::Polled,
        csr: None,
        csr_count: 0,
        interrupt: RegionBuilder::interrupt(),
        polling: RegionBuilder::polling(),
    };

    for resource in resources.iter().filter(|r| r.is_memory()) {
        let region = map_resource(resource);
        match CsrDirection::from_name(resource.name()) {
            Some(direction) => {
                out.csr_count += 1;
                if out.csr.is_none() {
                    out.candidate = direction.mode();
                    out.csr = Some(resource.clone());
                } else {
                    out.candidate = Mode::Polled;
                }
                out.interrupt.set_csr(region.clone());
                out.polling.push(region)?;
            }
            None => {
                out.interrupt.push(region.clone())?;
                out.polling.push(region)?;
            }
        }
    }

    Ok(out)
}
