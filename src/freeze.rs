use core::ops::{Deref, DerefMut};

use counter::{Counter, Interrupts, Speed};

/// A critical section over a counter: while it is alive, the counter is
/// disconnected from its clock and its period interrupt is masked. The raw
/// value is frozen, no period can complete, and the period handler cannot
/// run, so the timebase and the raw value form a consistent pair.
///
/// Dropping the guard restores the interrupt mask and the speed the counter
/// had when the guard was created, on every exit path. A counter that was
/// stopped stays stopped.
///
/// Every tick spent inside the section is lost to the clock, so keep it
/// short: read or write the timebase, read the raw value, check or clear
/// the period flag, and leave.
pub struct Freeze<'a, C: Counter> {
    counter: &'a mut C,
    speed: Option<Speed>,
    interrupts: Interrupts,
}

impl<'a, C: Counter> Freeze<'a, C> {
    /// Stop the counter, then mask its period interrupt.
    pub fn new(counter: &'a mut C) -> Self {
        let speed = counter.speed();
        counter.disable();

        let interrupts = counter.interrupts();
        counter.set_interrupts(interrupts - Interrupts::ON_DONE);

        Self {
            counter,
            speed,
            interrupts,
        }
    }
}

impl<C: Counter> Deref for Freeze<'_, C> {
    type Target = C;
    fn deref(&self) -> &Self::Target {
        self.counter
    }
}

impl<C: Counter> DerefMut for Freeze<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.counter
    }
}

impl<C: Counter> Drop for Freeze<'_, C> {
    fn drop(&mut self) {
        // Unmask first: a period flagged before the section was entered is
        // serviced before counting resumes.
        self.counter.set_interrupts(self.interrupts);
        if let Some(speed) = self.speed {
            self.counter.enable(speed);
        }
    }
}
