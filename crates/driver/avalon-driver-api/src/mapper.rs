//! Kernel-side MMIO mapping.
//!
//! Exposed regions are handed to user space as opaque physical windows; only
//! code that must touch registers from inside the kernel (an interrupt
//! handler, typically) needs an [`MmioRegion`] from an [`MmioMapper`].

use avalon_core::addr::{PhysAddr, VirtAddr};

use crate::error::DriverError;

/// A physical window mapped into kernel virtual space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioRegion {
    phys_base: PhysAddr,
    virt_base: VirtAddr,
    size: u64,
}

impl MmioRegion {
    /// Creates a new MMIO region descriptor.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - `phys_base` and `virt_base` refer to the same memory.
    /// - The virtual mapping stays valid until handed back to
    ///   [`MmioMapper::unmap_mmio`].
    #[must_use]
    pub const unsafe fn new(phys_base: PhysAddr, virt_base: VirtAddr, size: u64) -> Self {
        Self {
            phys_base,
            virt_base,
            size,
        }
    }

    /// Returns the physical base address.
    #[must_use]
    pub const fn phys_base(&self) -> PhysAddr {
        self.phys_base
    }

    /// Returns the virtual base address.
    #[must_use]
    pub const fn virt_base(&self) -> VirtAddr {
        self.virt_base
    }

    /// Returns the size of the region in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// Maps physical MMIO windows into kernel virtual space.
pub trait MmioMapper {
    /// Maps `size` bytes starting at `phys_base`. The returned region's
    /// virtual base corresponds exactly to `phys_base`, not to its page.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::MapFailed`] if no mapping could be created.
    fn map_mmio(&self, phys_base: PhysAddr, size: u64) -> Result<MmioRegion, DriverError>;

    /// Releases a mapping previously returned by [`map_mmio`](Self::map_mmio).
    fn unmap_mmio(&self, region: MmioRegion);
}
