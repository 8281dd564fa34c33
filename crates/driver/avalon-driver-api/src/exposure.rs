//! User-space exposure of device windows.
//!
//! A driver describes what user space may see as an [`ExposureDescriptor`]:
//! a named, ordered list of page-aligned [`MappedRegion`]s plus optional
//! interrupt wiring. The [`ExposureSubsystem`] makes each region mmap-able
//! and wakes the consumer whenever the wired handler returns
//! [`IrqReturn::Handled`].

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use avalon_core::addr::{PAGE_SIZE, PhysAddr, VirtAddr};
use bitflags::bitflags;
use planck_noalloc::vec::ArrayVec;

use crate::error::DriverError;
use crate::resource::IrqNumber;

/// Maximum number of regions one descriptor can carry.
pub const MAX_REGIONS: usize = 5;

/// A page-aligned, mmap-able window over a physical address range.
///
/// Invariants: `phys_base` is page-aligned, `page_offset < PAGE_SIZE`, and
/// `size` is a whole number of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRegion {
    name: String,
    phys_base: PhysAddr,
    page_offset: u64,
    size: u64,
    kernel_addr: Option<VirtAddr>,
}

impl MappedRegion {
    /// Creates a region without a kernel-side address.
    #[must_use]
    pub fn new(name: impl Into<String>, phys_base: PhysAddr, page_offset: u64, size: u64) -> Self {
        debug_assert!(phys_base.is_aligned(PAGE_SIZE));
        debug_assert!(page_offset < PAGE_SIZE);
        debug_assert!(size % PAGE_SIZE == 0);
        Self {
            name: name.into(),
            phys_base,
            page_offset,
            size,
            kernel_addr: None,
        }
    }

    /// Attaches the kernel-side address of the window's first byte.
    #[must_use]
    pub fn with_kernel_addr(mut self, addr: VirtAddr) -> Self {
        self.kernel_addr = Some(addr);
        self
    }

    /// Returns the region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the page-aligned physical base.
    #[must_use]
    pub const fn phys_base(&self) -> PhysAddr {
        self.phys_base
    }

    /// Returns the offset of the window start within its first page.
    #[must_use]
    pub const fn page_offset(&self) -> u64 {
        self.page_offset
    }

    /// Returns the page-rounded mapping size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the physical address the window starts at.
    #[must_use]
    pub fn start(&self) -> PhysAddr {
        self.phys_base + self.page_offset
    }

    /// Returns the kernel-side address, if one was attached.
    #[must_use]
    pub const fn kernel_addr(&self) -> Option<VirtAddr> {
        self.kernel_addr
    }

    /// Returns `true` if `[start, end]` lies entirely inside this mapping.
    #[must_use]
    pub fn covers(&self, start: PhysAddr, end: PhysAddr) -> bool {
        start >= self.phys_base && end.as_u64() < self.phys_base.as_u64() + self.size
    }
}

bitflags! {
    /// Interrupt request flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u32 {
        /// Other devices may be wired to the same line.
        const SHARED = 1 << 0;
    }
}

/// Result of an interrupt handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqReturn {
    /// This device asserted the interrupt and it was serviced.
    Handled,
    /// Not this device's interrupt; nothing was touched.
    NotMine,
}

/// Signature of a handler wired through an [`ExposureDescriptor`].
pub type IrqHandlerFn = fn(IrqNumber, &ExposureDescriptor) -> IrqReturn;

/// Interrupt wiring carried by a descriptor.
#[derive(Clone, Copy)]
pub struct IrqWiring {
    /// Platform-assigned interrupt number.
    pub number: IrqNumber,
    /// Request flags.
    pub flags: IrqFlags,
    /// Handler invoked on every firing of the line.
    pub handler: IrqHandlerFn,
}

impl fmt::Debug for IrqWiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrqWiring")
            .field("number", &self.number)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// The complete set of regions plus optional interrupt wiring presented for
/// one device instance.
#[derive(Debug)]
pub struct ExposureDescriptor {
    name: &'static str,
    version: &'static str,
    regions: ArrayVec<MappedRegion, MAX_REGIONS>,
    irq: Option<IrqWiring>,
}

impl ExposureDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new(name: &'static str, version: &'static str) -> Self {
        Self {
            name,
            version,
            regions: ArrayVec::new(),
            irq: None,
        }
    }

    /// Appends a region.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::ResourceExhausted`] if all [`MAX_REGIONS`]
    /// slots are taken.
    pub fn push_region(&mut self, region: MappedRegion) -> Result<(), DriverError> {
        self.regions
            .try_push(region)
            .map_err(|_| DriverError::ResourceExhausted)
    }

    /// Wires an interrupt line to this descriptor.
    #[must_use]
    pub fn with_irq(mut self, wiring: IrqWiring) -> Self {
        self.irq = Some(wiring);
        self
    }

    /// Returns the device node name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the driver version string.
    #[must_use]
    pub const fn version(&self) -> &'static str {
        self.version
    }

    /// Returns the regions in slot order.
    #[must_use]
    pub fn regions(&self) -> &[MappedRegion] {
        self.regions.as_slice()
    }

    /// Returns the interrupt wiring, if any.
    #[must_use]
    pub const fn irq(&self) -> Option<&IrqWiring> {
        self.irq.as_ref()
    }

    /// Invokes the wired handler as the interrupt dispatcher would.
    ///
    /// Returns `None` for descriptors without interrupt wiring.
    pub fn dispatch_irq(&self) -> Option<IrqReturn> {
        self.irq.map(|wiring| (wiring.handler)(wiring.number, self))
    }
}

/// Opaque identity of a registered descriptor, minted by the subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExposureHandle(u32);

impl ExposureHandle {
    /// Creates a handle. Only exposure subsystems should call this.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

/// The subsystem that makes descriptors visible to user space.
pub trait ExposureSubsystem {
    /// Registers a descriptor. The subsystem keeps its own reference for
    /// interrupt dispatch until [`unregister`](Self::unregister) returns.
    ///
    /// # Errors
    ///
    /// Returns an error (typically [`DriverError::Rejected`]) if the
    /// descriptor is refused, e.g. on a name collision.
    fn register(&self, descriptor: Arc<ExposureDescriptor>) -> Result<ExposureHandle, DriverError>;

    /// Revokes a registered descriptor. After this returns no handler
    /// invocation for it is in flight or will start.
    fn unregister(&self, handle: ExposureHandle);
}
