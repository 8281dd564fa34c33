//! Driver API traits and types.
//!
//! Defines the seams between a platform driver and the rest of the kernel:
//!
//! - **Inbound**: [`PlatformDevice`] hands the driver its firmware-described
//!   [`RawResource`]s and interrupt lines.
//! - **Kernel services**: [`MmioMapper`] translates physical windows into
//!   kernel-readable [`MmioRegion`]s.
//! - **Outbound**: [`ExposureSubsystem`] accepts an [`ExposureDescriptor`]
//!   and makes its regions and interrupt wakeups visible to user space.
//! - **Registration**: [`PlatformDriverEntry`] ties a compatible string to a
//!   probe function.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod exposure;
pub mod mapper;
pub mod platform;
pub mod registration;
pub mod resource;

pub use avalon_core::addr::{PAGE_SIZE, PhysAddr, VirtAddr};
pub use error::DriverError;
pub use exposure::{
    ExposureDescriptor, ExposureHandle, ExposureSubsystem, IrqFlags, IrqHandlerFn, IrqReturn,
    IrqWiring, MAX_REGIONS, MappedRegion,
};
pub use mapper::{MmioMapper, MmioRegion};
pub use platform::PlatformDevice;
pub use registration::{
    BoundDevice, PlatformDriverEntry, PlatformProbeContext, PlatformProbeFn, find_driver,
};
pub use resource::{IrqNumber, RawResource, ResourceKind};
