//! Page-aligned region arithmetic.
//!
//! User space can only mmap whole pages, but FIFO windows are typically a
//! few words somewhere inside a page. A [`MappedRegion`] therefore carries
//! the enclosing page-aligned span plus the in-page offset of the window.

use avalon_core::addr::{PAGE_SIZE, PhysAddr, page_align_up};
use avalon_driver_api::{MappedRegion, RawResource};

/// Maps the inclusive window `[start, end]` to the smallest page-aligned
/// region covering it.
#[must_use]
pub fn map_window(name: &str, start: PhysAddr, end: PhysAddr) -> MappedRegion {
    let phys_base = start.align_down(PAGE_SIZE);
    let page_offset = start - phys_base;
    let size = page_align_up(end - phys_base + 1);
    MappedRegion::new(name, phys_base, page_offset, size)
}

/// Maps a firmware resource, keeping its name.
#[must_use]
pub fn map_resource(resource: &RawResource) -> MappedRegion {
    map_window(resource.name(), resource.start(), resource.end())
}
