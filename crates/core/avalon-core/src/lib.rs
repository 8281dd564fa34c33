//! Core library for the Avalon driver stack: typed addresses, page
//! arithmetic, and the leveled kernel log macros.

#![cfg_attr(not(test), no_std)]

pub mod addr;
pub mod log;

pub use addr::{PAGE_MASK, PAGE_SIZE, PhysAddr, VirtAddr, page_align_up};
pub use log::LogLevel;
