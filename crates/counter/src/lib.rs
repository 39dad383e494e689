//! The hardware counter interface used by the clock. This crate abstracts the
//! register-level details of a free-running counter so that the timekeeping
//! code never touches a register directly.
//!
//! # Adding a new counter
//! Implement the [`Counter`] trait for a type that owns the counter's
//! registers, and describe what the hardware supports with a [`Specs`]
//! table (see [`atmega328`] for an example). The clock only relies on the
//! behavior documented on each trait method.
//!
//! The [`sim`] module provides a simulated counter implementing the same
//! trait, used to exercise the clock on a host machine.
#![cfg_attr(not(test), no_std)]

pub mod atmega328;
pub mod regs;
pub mod sim;
pub mod specs;

pub use regs::{Interrupts, Status};
pub use specs::{Speed, Specs};

/// The counting algorithm of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Count from zero up to the maximum value allowed by the counter width,
    /// then wrap back to zero and raise [`Status::DONE`]. One trip through
    /// the whole range is a period.
    CountToMax,
}

/// A routine called by the hardware each time the counter completes a
/// period. Implementations run in interrupt context: they must not block
/// and must not assume anything about the state of other interrupts.
pub trait PeriodHandler: Sync {
    fn on_period_end(&self);
}

/// A free-running hardware counter with a power-of-two prescaler and a
/// "period complete" event.
pub trait Counter {
    /// The capability table of this counter.
    fn specs(&self) -> &'static Specs;

    /// Select the counting algorithm. This does not start or stop counting.
    fn set_mode(&mut self, mode: Mode);

    /// Connect the counter to the clock, slowed down by the prescale that
    /// `speed` encodes. Counting starts (or resumes) immediately.
    fn enable(&mut self, speed: Speed);

    /// Disconnect the counter from its clock. The current value is frozen
    /// and no period can complete until the counter is enabled again.
    fn disable(&mut self);

    /// The speed the counter is currently driven at, or `None` if it is
    /// disconnected from its clock.
    #[must_use]
    fn speed(&self) -> Option<Speed>;

    /// Read the raw counter value. Reading may have side effects on some
    /// hardware (latched multi-byte reads), hence the mutable borrow.
    fn current(&mut self) -> u16;

    /// Overwrite the raw counter value.
    fn set_current(&mut self, value: u16);

    /// Read the status flags.
    #[must_use]
    fn status(&self) -> Status;

    /// Clear the given status flags. Like most hardware event flags, they
    /// are cleared by writing a one to them, so this is the only way to
    /// clear them: writing zero has no effect.
    fn acknowledge(&mut self, status: Status);

    /// The set of events currently allowed to raise an interrupt.
    #[must_use]
    fn interrupts(&self) -> Interrupts;

    /// Replace the set of events allowed to raise an interrupt. Enabling an
    /// event whose status flag is already set raises the interrupt right
    /// away.
    fn set_interrupts(&mut self, interrupts: Interrupts);

    /// Install the routine called when a period completes and
    /// [`Interrupts::ON_DONE`] is enabled. Replaces any previous routine.
    fn install_period_handler(&mut self, handler: &'static dyn PeriodHandler);
}
