//! Exposure mode arbitration.
//!
//! Interrupt ownership needs an unambiguous topology: exactly one
//! control/status window, at least [`FifoCsr::SPAN`] bytes long, and exactly
//! one interrupt line that can actually be resolved. Anything else falls back to polling, which is always correct.

use avalon_driver_api::{
    DriverError, ExposureDescriptor, IrqFlags, IrqWiring, MmioRegion, PlatformProbeContext,
};
use avalon_core::{kerr, kwarn};

use super::Mode;
use super::classify::Classification;
use super::irq::altera_fifo_irq;
use super::regs::FifoCsr;

/// The descriptor chosen for registration, with whatever kernel-side
/// mapping it depends on.
#[derive(Debug)]
pub struct Finalized {
    /// The mode the device will run in for its whole lifetime.
    pub mode: Mode,
    /// The descriptor to register.
    pub descriptor: ExposureDescriptor,
    /// Kernel mapping of the control/status window, interrupt modes only.
    pub csr_mapping: Option<MmioRegion>,
}

/// Applies the interrupt-line count to the topology's candidate mode.
///
/// Only ever downgrades.
#[must_use]
pub fn decide_mode(candidate: Mode, irq_count: usize) -> Mode {
    match irq_count {
        1 => candidate,
        _ => Mode::Polled,
    }
}

/// Finalizes the mode and builds the descriptor to register.
///
/// # Errors
///
/// Fails if the control/status window cannot be mapped for an
/// interrupt-driven descriptor, or if the chosen regions do not fit.
pub fn finalize(
    ctx: &PlatformProbeContext<'_>,
    mut classification: Classification,
) -> Result<Finalized, DriverError> {
    let device = ctx.device.name();

    if classification.has_csr_conflict() {
        kwarn!("{device}: multiple CSRs; falling back to polling");
    }

    let irq_count = ctx.device.irq_count();
    if irq_count > 1 {
        kwarn!("{device}: multiple interrupt lines; falling back to polling");
    }
    let mut mode = decide_mode(classification.candidate, irq_count);

    if mode.is_interrupt_driven()
        && classification
            .csr
            .as_ref()
            .is_some_and(|csr| csr.size() < FifoCsr::SPAN)
    {
        kwarn!("{device}: CSR window too small for registers; falling back to polling");
        mode = Mode::Polled;
    }

    let mut irq = None;
    if mode.is_interrupt_driven() {
        match ctx.device.irq(0) {
            Ok(number) => irq = Some(number),
            Err(err) => {
                kwarn!("{device}: failed to get IRQ ({err}); falling back to polling");
                mode = Mode::Polled;
            }
        }
    }

    let (Some(number), Some(csr)) = (irq, classification.csr.as_ref()) else {
        return Ok(Finalized {
            mode: Mode::Polled,
            descriptor: classification.polling.build(Mode::Polled)?,
            csr_mapping: None,
        });
    };

    let mapping = ctx.mmio.map_mmio(csr.start(), csr.size()).inspect_err(|_| {
        kerr!("{device}: failed to map registers");
    })?;
    classification
        .interrupt
        .attach_csr_kernel_addr(mapping.virt_base());

    let descriptor = match classification.interrupt.build(mode) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            ctx.mmio.unmap_mmio(mapping);
            return Err(err);
        }
    };

    Ok(Finalized {
        mode,
        descriptor: descriptor.with_irq(IrqWiring {
            number,
            flags: IrqFlags::SHARED,
            handler: altera_fifo_irq,
        }),
        csr_mapping: Some(mapping),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::altera_fifo::classify::classify;
    use crate::altera_fifo::testing::{Call, FakeDevice, Harness};
    use avalon_core::addr::PhysAddr;
    use avalon_driver_api::{IrqNumber, PlatformDevice, RawResource};

    fn single_input_csr() -> Vec<RawResource> {
        vec![
            RawResource::memory("in_csr", 0xFF20_0020, 0xFF20_003F),
            RawResource::memory("in", 0xFF20_0000, 0xFF20_0007),
        ]
    }

    fn run(harness: &Harness, device: &FakeDevice) -> Result<Finalized, DriverError> {
        let ctx = harness.context(device);
        finalize(&ctx, classify(device.resources())?)
    }

    #[test]
    fn decision_table() {
        assert_eq!(decide_mode(Mode::InputInterrupt, 1), Mode::InputInterrupt);
        assert_eq!(decide_mode(Mode::OutputInterrupt, 1), Mode::OutputInterrupt);
        assert_eq!(decide_mode(Mode::InputInterrupt, 0), Mode::Polled);
        assert_eq!(decide_mode(Mode::OutputInterrupt, 2), Mode::Polled);
        assert_eq!(decide_mode(Mode::InputInterrupt, 7), Mode::Polled);
        assert_eq!(decide_mode(Mode::Polled, 1), Mode::Polled);
    }

    #[test]
    fn single_line_wires_shared_handler() {
        let harness = Harness::new();
        let device = FakeDevice::new(single_input_csr()).with_irqs([Ok(IrqNumber::new(72))]);
        let fin = run(&harness, &device).unwrap();

        assert_eq!(fin.mode, Mode::InputInterrupt);
        assert_eq!(fin.descriptor.name(), "altera_fifo_in_irq");
        let wiring = fin.descriptor.irq().unwrap();
        assert_eq!(wiring.number, IrqNumber::new(72));
        assert!(wiring.flags.contains(IrqFlags::SHARED));

        let csr = &fin.descriptor.regions()[0];
        assert_eq!(csr.name(), "in_csr");
        assert_eq!(csr.kernel_addr(), Some(harness.mapper.window_addr()));
        assert_eq!(fin.csr_mapping.map(|m| m.phys_base()), Some(PhysAddr::new(0xFF20_0020)));
        assert_eq!(fin.csr_mapping.map(|m| m.size()), Some(0x20));
    }

    #[test]
    fn zero_lines_is_polled_without_mapping() {
        let harness = Harness::new();
        let device = FakeDevice::new(single_input_csr());
        let fin = run(&harness, &device).unwrap();

        assert_eq!(fin.mode, Mode::Polled);
        assert_eq!(fin.descriptor.name(), "altera_fifo_no_irq");
        assert!(fin.descriptor.irq().is_none());
        assert!(fin.csr_mapping.is_none());
        assert!(harness.calls().is_empty());
    }

    #[test]
    fn two_lines_is_polled() {
        let harness = Harness::new();
        let device = FakeDevice::new(single_input_csr())
            .with_irqs([Ok(IrqNumber::new(72)), Ok(IrqNumber::new(73))]);
        let fin = run(&harness, &device).unwrap();
        assert_eq!(fin.mode, Mode::Polled);
        assert!(harness.calls().is_empty());
    }

    #[test]
    fn unresolvable_line_is_polled() {
        let harness = Harness::new();
        let device =
            FakeDevice::new(single_input_csr()).with_irqs([Err(DriverError::IrqUnavailable)]);
        let fin = run(&harness, &device).unwrap();
        assert_eq!(fin.mode, Mode::Polled);
        assert!(fin.csr_mapping.is_none());
        assert_eq!(fin.descriptor.regions()[0].name(), "in_csr");
        assert_eq!(fin.descriptor.regions()[1].name(), "in");
    }

    #[test]
    fn csr_conflict_ignores_available_line() {
        let harness = Harness::new();
        let device = FakeDevice::new(vec![
            RawResource::memory("in_csr", 0xFF20_0020, 0xFF20_003F),
            RawResource::memory("out_csr", 0xFF21_0020, 0xFF21_003F),
        ])
        .with_irqs([Ok(IrqNumber::new(72))]);
        let fin = run(&harness, &device).unwrap();

        assert_eq!(fin.mode, Mode::Polled);
        let names: Vec<_> = fin.descriptor.regions().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["in_csr", "out_csr"]);
        assert!(harness.calls().is_empty());
    }

    #[test]
    fn undersized_csr_is_polled_without_mapping() {
        let harness = Harness::new();
        let device = FakeDevice::new(vec![RawResource::memory("in_csr", 0x1000, 0x1007)])
            .with_irqs([Ok(IrqNumber::new(72))]);
        let fin = run(&harness, &device).unwrap();

        assert!(device.resources()[0].size() < FifoCsr::SPAN);
        assert_eq!(fin.mode, Mode::Polled);
        assert!(fin.descriptor.irq().is_none());
        assert!(fin.csr_mapping.is_none());
        assert!(harness.calls().is_empty());
    }

    #[test]
    fn csr_exactly_spanning_registers_is_interrupt_driven() {
        let harness = Harness::new();
        let device = FakeDevice::new(vec![RawResource::memory("out_csr", 0x1000, 0x100F)])
            .with_irqs([Ok(IrqNumber::new(72))]);
        let fin = run(&harness, &device).unwrap();

        assert_eq!(fin.mode, Mode::OutputInterrupt);
        assert_eq!(fin.csr_mapping.map(|m| m.size()), Some(FifoCsr::SPAN));
    }

    #[test]
    fn map_failure_is_fatal() {
        let harness = Harness::new().failing_map();
        let device = FakeDevice::new(single_input_csr()).with_irqs([Ok(IrqNumber::new(72))]);
        assert_eq!(run(&harness, &device).unwrap_err(), DriverError::MapFailed);
        assert_eq!(
            harness.calls(),
            [Call::Map(PhysAddr::new(0xFF20_0020))]
        );
    }
}
