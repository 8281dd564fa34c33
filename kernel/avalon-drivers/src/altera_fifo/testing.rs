//! Host-side fakes for the platform device, the MMIO mapper and the exposure
//! subsystem. Every fake appends to one shared call log so tests can assert
//! on cross-collaborator ordering.

use core::cell::{Cell, RefCell, UnsafeCell};
use std::rc::Rc;
use std::sync::Arc;

use avalon_core::addr::{PhysAddr, VirtAddr};
use avalon_driver_api::{
    DriverError, ExposureDescriptor, ExposureHandle, ExposureSubsystem, IrqNumber, IrqReturn,
    MmioMapper, MmioRegion, PlatformDevice, PlatformProbeContext, RawResource,
};

/// One observable side effect on a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Map(PhysAddr),
    Unmap(PhysAddr),
    Register(&'static str),
    Unregister(ExposureHandle),
}

type CallLog = Rc<RefCell<Vec<Call>>>;

/// Heap-backed stand-in for a control/status register window.
pub struct RegisterWindow {
    words: Box<UnsafeCell<[u32; 8]>>,
}

impl RegisterWindow {
    pub fn new() -> Self {
        Self {
            words: Box::new(UnsafeCell::new([0; 8])),
        }
    }

    pub fn addr(&self) -> VirtAddr {
        VirtAddr::from_ptr(self.words.get().cast_const())
    }

    fn slot(&self, offset: u64) -> *mut u32 {
        assert_eq!(offset % 4, 0);
        let index = usize::try_from(offset / 4).unwrap();
        assert!(index < 8);
        // SAFETY: index is in bounds of the backing array.
        unsafe { self.words.get().cast::<u32>().add(index) }
    }

    pub fn read(&self, offset: u64) -> u32 {
        // SAFETY: slot returns an aligned, in-bounds pointer.
        unsafe { self.slot(offset).read_volatile() }
    }

    pub fn write(&self, offset: u64, value: u32) {
        // SAFETY: slot returns an aligned, in-bounds pointer.
        unsafe { self.slot(offset).write_volatile(value) }
    }
}

pub struct FakeDevice {
    name: &'static str,
    resources: Vec<RawResource>,
    irqs: Vec<Result<IrqNumber, DriverError>>,
}

impl FakeDevice {
    pub fn new(resources: Vec<RawResource>) -> Self {
        Self {
            name: "ff200000.fifo",
            resources,
            irqs: Vec::new(),
        }
    }

    pub fn with_irqs(
        mut self,
        irqs: impl IntoIterator<Item = Result<IrqNumber, DriverError>>,
    ) -> Self {
        self.irqs = irqs.into_iter().collect();
        self
    }
}

impl PlatformDevice for FakeDevice {
    fn name(&self) -> &str {
        self.name
    }

    fn resources(&self) -> &[RawResource] {
        &self.resources
    }

    fn irq_count(&self) -> usize {
        self.irqs.len()
    }

    fn irq(&self, index: usize) -> Result<IrqNumber, DriverError> {
        self.irqs
            .get(index)
            .copied()
            .unwrap_or(Err(DriverError::IrqUnavailable))
    }
}

pub struct FakeMapper {
    log: CallLog,
    window: RegisterWindow,
    fail: Cell<bool>,
}

impl FakeMapper {
    pub fn window(&self) -> &RegisterWindow {
        &self.window
    }

    pub fn window_addr(&self) -> VirtAddr {
        self.window.addr()
    }
}

impl MmioMapper for FakeMapper {
    fn map_mmio(&self, phys_base: PhysAddr, size: u64) -> Result<MmioRegion, DriverError> {
        self.log.borrow_mut().push(Call::Map(phys_base));
        if self.fail.get() {
            return Err(DriverError::MapFailed);
        }
        // SAFETY: The window lives as long as the harness.
        Ok(unsafe { MmioRegion::new(phys_base, self.window.addr(), size) })
    }

    fn unmap_mmio(&self, region: MmioRegion) {
        self.log.borrow_mut().push(Call::Unmap(region.phys_base()));
    }
}

pub struct FakeExposure {
    log: CallLog,
    next: Cell<u32>,
    reject: Cell<bool>,
    live: RefCell<Vec<(ExposureHandle, Arc<ExposureDescriptor>)>>,
}

impl FakeExposure {
    /// Number of descriptors currently registered.
    pub fn live(&self) -> usize {
        self.live.borrow().len()
    }

    /// Delivers an interrupt to the first registered descriptor.
    pub fn fire_irq(&self) -> Option<IrqReturn> {
        let descriptor = self.live.borrow().first().map(|(_, d)| Arc::clone(d))?;
        descriptor.dispatch_irq()
    }
}

impl ExposureSubsystem for FakeExposure {
    fn register(&self, descriptor: Arc<ExposureDescriptor>) -> Result<ExposureHandle, DriverError> {
        self.log.borrow_mut().push(Call::Register(descriptor.name()));
        if self.reject.get() {
            return Err(DriverError::Rejected);
        }
        let handle = ExposureHandle::new(self.next.get());
        self.next.set(self.next.get() + 1);
        self.live.borrow_mut().push((handle, descriptor));
        Ok(handle)
    }

    fn unregister(&self, handle: ExposureHandle) {
        self.log.borrow_mut().push(Call::Unregister(handle));
        self.live.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

pub struct Harness {
    pub mapper: FakeMapper,
    pub exposure: FakeExposure,
    log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            mapper: FakeMapper {
                log: Rc::clone(&log),
                window: RegisterWindow::new(),
                fail: Cell::new(false),
            },
            exposure: FakeExposure {
                log: Rc::clone(&log),
                next: Cell::new(1),
                reject: Cell::new(false),
                live: RefCell::new(Vec::new()),
            },
            log,
        }
    }

    pub fn failing_map(self) -> Self {
        self.mapper.fail.set(true);
        self
    }

    pub fn rejecting(self) -> Self {
        self.exposure.reject.set(true);
        self
    }

    pub fn context<'a>(&'a self, device: &'a FakeDevice) -> PlatformProbeContext<'a> {
        PlatformProbeContext {
            device,
            mmio: &self.mapper,
            exposure: &self.exposure,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }
}
