//! Firmware-described hardware resources.

use alloc::string::String;
use core::fmt;

use avalon_core::addr::PhysAddr;

/// The kind of a firmware-described resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A memory-mapped window.
    Memory,
    /// An I/O port range.
    Io,
    /// An interrupt specifier.
    Irq,
    /// Anything else (bus numbers, DMA channels, ...).
    Other,
}

/// One named hardware window with inclusive bounds.
///
/// Supplied by the platform for the duration of a probe. `end >= start` is
/// guaranteed by the resource source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResource {
    name: String,
    start: PhysAddr,
    end: PhysAddr,
    kind: ResourceKind,
}

impl RawResource {
    /// Creates a resource covering `[start, end]`.
    #[must_use]
    pub fn new(name: impl Into<String>, start: PhysAddr, end: PhysAddr, kind: ResourceKind) -> Self {
        debug_assert!(end >= start, "resource end precedes start");
        Self {
            name: name.into(),
            start,
            end,
            kind,
        }
    }

    /// Creates a memory resource covering `[start, end]`.
    #[must_use]
    pub fn memory(name: impl Into<String>, start: u64, end: u64) -> Self {
        Self::new(name, PhysAddr::new(start), PhysAddr::new(end), ResourceKind::Memory)
    }

    /// Returns the resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first address of the window.
    #[must_use]
    pub const fn start(&self) -> PhysAddr {
        self.start
    }

    /// Returns the last address of the window (inclusive).
    #[must_use]
    pub const fn end(&self) -> PhysAddr {
        self.end
    }

    /// Returns `true` for memory-mapped windows.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.kind == ResourceKind::Memory
    }

    /// Returns the window length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// A platform-assigned interrupt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct IrqNumber(u32);

impl IrqNumber {
    /// Creates a new `IrqNumber`.
    pub const fn new(val: u32) -> Self {
        Self(val)
    }
}

impl fmt::Display for IrqNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
