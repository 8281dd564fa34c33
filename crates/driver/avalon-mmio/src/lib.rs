//! Typed MMIO register block abstractions.
//!
//! Re-exports the [`register_block!`] macro from `avalon-mmio-macros`, which
//! generates a typed accessor struct for a memory-mapped register window.
//! All `unsafe` volatile access is consolidated into the struct's `new()`
//! constructor; individual reads and writes are safe.
//!
//! # Example
//!
//! ```ignore
//! use avalon_mmio::register_block;
//!
//! register_block! {
//!     /// Avalon FIFO control/status registers.
//!     pub FifoCsr {
//!         /// Event register.
//!         [0x08; u32; ro] event => FifoEvents,
//!         /// Interrupt enable register.
//!         [0x0C; u32; rw] ienable => FifoEvents,
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate self as avalon_mmio;

pub use avalon_core::addr::VirtAddr;
pub use avalon_mmio_macros::register_block;

#[cfg(test)]
mod tests {
    use super::*;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Status: u32 {
            const READY = 1 << 0;
            const ERROR = 1 << 3;
        }
    }

    register_block! {
        /// Test window with mixed access modes.
        TestRegs {
            /// Identification.
            [0x00; u32; ro] id,
            /// Status flags.
            [0x04; u32; rw] status => Status,
            /// Doorbell.
            [0x08; u16; wo] doorbell,
            /// Counter.
            [0x10; u64; rw] counter,
        }
    }

    fn window(backing: &mut [u64; 4]) -> TestRegs {
        // SAFETY: The backing array outlives the accessor and covers SPAN bytes.
        unsafe { TestRegs::new(VirtAddr::from_ptr(backing.as_mut_ptr())) }
    }

    #[test]
    fn span_covers_last_register() {
        assert_eq!(TestRegs::SPAN, 0x18);
    }

    #[test]
    fn reads_see_backing_memory() {
        let mut backing = [0u64; 4];
        backing[0] = 0x0000_0009_CAFE_F00D;
        let regs = window(&mut backing);
        assert_eq!(regs.id(), 0xCAFE_F00D);
        assert_eq!(regs.status(), Status::READY | Status::ERROR);
    }

    #[test]
    fn writes_land_at_offsets() {
        let mut backing = [0u64; 4];
        let regs = window(&mut backing);
        regs.set_status(Status::ERROR);
        regs.set_doorbell(0xBEEF);
        regs.set_counter(42);
        assert_eq!(regs.counter(), 42);
        assert_eq!(backing[0] >> 32, 0x8);
        assert_eq!(backing[1] & 0xFFFF, 0xBEEF);
        assert_eq!(backing[2], 42);
    }
}
