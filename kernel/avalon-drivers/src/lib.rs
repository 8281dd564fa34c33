//! Platform drivers for Altera Avalon peripherals.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod altera_fifo;

/// Every platform driver this crate provides, for compatible-string matching.
pub static PLATFORM_DRIVERS: &[&avalon_driver_api::PlatformDriverEntry] =
    &[&altera_fifo::ALTERA_FIFO_DRIVER];
