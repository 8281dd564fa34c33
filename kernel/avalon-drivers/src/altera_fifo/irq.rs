//! Interrupt service routine for a FIFO on a shared line.
//!
//! The handler only decides "mine or not" and masks. Servicing the FIFO and
//! re-enabling sources is left to the user-space consumer woken by the
//! exposure subsystem. Enables are zeroed rather than events acknowledged,
//! so a level-triggered line stays quiet until the consumer re-arms it.

use avalon_driver_api::{ExposureDescriptor, IrqNumber, IrqReturn, MappedRegion};

use super::regs::{FifoCsr, FifoEvents};

/// Handler wired into interrupt-driven descriptors.
///
/// Reads through the kernel address of region 0, the control/status window.
pub fn altera_fifo_irq(_irq: IrqNumber, descriptor: &ExposureDescriptor) -> IrqReturn {
    let Some(base) = descriptor
        .regions()
        .first()
        .and_then(MappedRegion::kernel_addr)
    else {
        return IrqReturn::NotMine;
    };
    // SAFETY: Region 0's kernel address maps a control/status window of at
    // least `FifoCsr::SPAN` bytes (smaller windows are exposed for polling
    // only). It is mapped before registration and unmapped only after the
    // exposure subsystem has unregistered the descriptor.
    let csr = unsafe { FifoCsr::new(base) };
    service(&csr)
}

/// Checks whether the FIFO behind `csr` asserted the interrupt and, if so,
/// masks every source.
///
/// Registers are left untouched when the interrupt is not ours.
pub fn service(csr: &FifoCsr) -> IrqReturn {
    let pending = csr.event();
    let enabled = csr.ienable().effective_enable();
    if (pending & enabled).is_empty() {
        return IrqReturn::NotMine;
    }

    csr.set_ienable(FifoEvents::empty());
    IrqReturn::Handled
}
