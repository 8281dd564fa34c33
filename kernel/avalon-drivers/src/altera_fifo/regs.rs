//! Avalon FIFO control/status register definitions.
//!
//! Offsets and bits follow Intel's `altera_avalon_fifo_regs.h`. The event
//! and interrupt-enable registers share one bit layout.

use avalon_mmio::register_block;
use bitflags::bitflags;

register_block! {
    /// Avalon FIFO control/status register window.
    pub FifoCsr {
        /// Event register: sticky FIFO condition bits.
        [0x08; u32; ro] event => FifoEvents,
        /// Interrupt enable register.
        [0x0C; u32; rw] ienable => FifoEvents,
    }
}

bitflags! {
    /// Event / interrupt-enable bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoEvents: u32 {
        /// FIFO is full.
        const FULL = 1 << 0;
        /// FIFO is empty.
        const EMPTY = 1 << 1;
        /// Fill level reached the almost-full threshold.
        const ALMOST_FULL = 1 << 2;
        /// Fill level dropped to the almost-empty threshold.
        const ALMOST_EMPTY = 1 << 3;
        /// Write attempted while full.
        const OVERFLOW = 1 << 4;
        /// Read attempted while empty.
        const UNDERFLOW = 1 << 5;
        /// Enable-register override: treat every event source as enabled.
        /// Only meaningful in `ienable`.
        const ENABLE_ALL = 1 << 6;

        /// Every documented event source.
        const ALL_EVENTS = Self::FULL.bits()
            | Self::EMPTY.bits()
            | Self::ALMOST_FULL.bits()
            | Self::ALMOST_EMPTY.bits()
            | Self::OVERFLOW.bits()
            | Self::UNDERFLOW.bits();
    }
}

impl FifoEvents {
    /// Resolves an interrupt-enable value to the set of sources it actually
    /// enables. The `ENABLE_ALL` bit overrides the literal mask.
    #[must_use]
    pub fn effective_enable(self) -> Self {
        if self.contains(Self::ENABLE_ALL) {
            Self::ALL_EVENTS
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_window_span() {
        assert_eq!(FifoCsr::SPAN, 16);
    }

    #[test]
    fn all_events_mask() {
        assert_eq!(FifoEvents::ALL_EVENTS.bits(), 0x3F);
        assert!(!FifoEvents::ALL_EVENTS.contains(FifoEvents::ENABLE_ALL));
    }

    #[test]
    fn sentinel_overrides_literal_mask() {
        let raw = FifoEvents::from_bits_retain(0x40 | 0x02);
        assert_eq!(raw.effective_enable(), FifoEvents::ALL_EVENTS);
    }

    #[test]
    fn literal_mask_without_sentinel() {
        assert_eq!(FifoEvents::EMPTY.effective_enable(), FifoEvents::EMPTY);
        assert!(FifoEvents::empty().effective_enable().is_empty());
    }
}
