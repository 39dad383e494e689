//! A simulated counter. It behaves like the hardware as far as the clock can
//! observe, but time only passes when the owner says so: [`SimCounter::tick`]
//! stands in for the crystal.

use crate::{Counter, Interrupts, Mode, PeriodHandler, Specs, Speed, Status};

pub struct SimCounter {
    specs: &'static Specs,
    mode: Option<Mode>,
    speed: Option<Speed>,
    current: u16,
    status: Status,
    interrupts: Interrupts,
    handler: Option<&'static dyn PeriodHandler>,
    drift: u32,
    wraps: u64,
}

impl SimCounter {
    /// Create a stopped counter at zero, with no mode, no interrupt enabled
    /// and no handler installed.
    #[must_use]
    pub const fn new(specs: &'static Specs) -> Self {
        Self {
            specs,
            mode: None,
            speed: None,
            current: 0,
            status: Status::empty(),
            interrupts: Interrupts::empty(),
            handler: None,
            drift: 0,
            wraps: 0,
        }
    }

    /// Let `ticks` counter ticks elapse. Nothing happens while the counter
    /// is disconnected from its clock or before a mode was selected. Each
    /// wrap sets [`Status::DONE`] and, if the interrupt is enabled, runs the
    /// installed handler, which clears the flag like entering the interrupt
    /// vector does. A second wrap while the flag is still set is lost, as on
    /// the real hardware.
    pub fn tick(&mut self, ticks: u32) {
        if self.speed.is_none() || self.mode.is_none() {
            return;
        }

        let period = self.specs.period_ticks();
        let mut remaining = ticks;
        while remaining > 0 {
            let room = period - u32::from(self.current);
            if remaining < room {
                // Bounded by the period, which is at most 2^16.
                #[allow(clippy::cast_possible_truncation)]
                let step = remaining as u16;
                self.current += step;
                break;
            }
            remaining -= room;
            self.current = 0;
            self.wrap();
        }
    }

    /// Let `periods` full periods elapse.
    pub fn tick_periods(&mut self, periods: u32) {
        for _ in 0..periods {
            self.tick(self.specs.period_ticks());
        }
    }

    /// Set [`Status::DONE`] without running the handler, as if the counter
    /// had wrapped while a higher priority context kept the interrupt from
    /// being serviced.
    pub fn raise_pending(&mut self) {
        self.status |= Status::DONE;
        self.wraps += 1;
    }

    /// Make the counter advance by `ticks` every time it is reconnected to
    /// its clock. This stands in for the real time spent between two reads,
    /// so that code polling the clock makes progress.
    pub fn set_drift(&mut self, ticks: u32) {
        self.drift = ticks;
    }

    /// Total number of periods completed so far, serviced or not.
    #[must_use]
    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    /// The selected counting algorithm, if any.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Whether a period handler was installed.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    fn wrap(&mut self) {
        self.wraps += 1;
        self.status |= Status::DONE;
        self.service();
    }

    /// Run the handler if the period event is pending and allowed to
    /// interrupt.
    fn service(&mut self) {
        if !self.status.contains(Status::DONE) || !self.interrupts.contains(Interrupts::ON_DONE) {
            return;
        }
        if let Some(handler) = self.handler {
            self.status.remove(Status::DONE);
            handler.on_period_end();
        }
    }
}

impl Counter for SimCounter {
    fn specs(&self) -> &'static Specs {
        self.specs
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    fn enable(&mut self, speed: Speed) {
        self.speed = Some(speed);
        if self.drift > 0 {
            self.tick(self.drift);
        }
    }

    fn disable(&mut self) {
        self.speed = None;
    }

    fn speed(&self) -> Option<Speed> {
        self.speed
    }

    fn current(&mut self) -> u16 {
        self.current
    }

    fn set_current(&mut self, value: u16) {
        self.current = value & self.specs.max();
    }

    fn status(&self) -> Status {
        self.status
    }

    fn acknowledge(&mut self, status: Status) {
        self.status.remove(status);
    }

    fn interrupts(&self) -> Interrupts {
        self.interrupts
    }

    fn set_interrupts(&mut self, interrupts: Interrupts) {
        self.interrupts = interrupts;
        self.service();
    }

    fn install_period_handler(&mut self, handler: &'static dyn PeriodHandler) {
        self.handler = Some(handler);
    }
}
