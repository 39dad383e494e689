use core::cell::Cell;

use counter::PeriodHandler;
use critical_section::Mutex;

use crate::Duration;

/// The coarse part of the clock: the time accumulated by every completed
/// counter period, and the amount one period adds.
///
/// A timebase is shared between the interrupt routine, which advances it
/// once per period, and the foreground code reading the clock. It is meant
/// to live in a `static` so that it can be installed as the counter's
/// period handler. Every access to the ledger happens inside a critical
/// section, so the interrupt routine can never observe or produce a torn
/// value, and never waits on a foreground holder.
pub struct Timebase {
    ledger: Mutex<Cell<Ledger>>,
}

#[derive(Debug, Clone, Copy)]
struct Ledger {
    elapsed: Duration,
    advancement: Duration,
}

impl Timebase {
    /// Create a timebase at zero that does not advance until it is reset
    /// with a non-zero advancement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ledger: Mutex::new(Cell::new(Ledger {
                elapsed: Duration::ZERO,
                advancement: Duration::ZERO,
            })),
        }
    }

    /// Account for one completed period. Wraps around silently past
    /// [`Duration::MAX`].
    ///
    /// This is the routine installed as the period interrupt handler, and
    /// it is also called directly when a period completed without its
    /// interrupt being serviced.
    pub fn advance(&self) {
        critical_section::with(|cs| {
            let cell = self.ledger.borrow(cs);
            let mut ledger = cell.get();
            ledger.elapsed = ledger.elapsed.wrapping_add(ledger.advancement);
            cell.set(ledger);
        });
    }

    /// Time accumulated by completed periods.
    pub(crate) fn elapsed(&self) -> Duration {
        critical_section::with(|cs| self.ledger.borrow(cs).get().elapsed)
    }

    /// Time added by each completed period.
    #[cfg(test)]
    pub(crate) fn advancement(&self) -> Duration {
        critical_section::with(|cs| self.ledger.borrow(cs).get().advancement)
    }

    /// Set the elapsed time back to zero and replace the per-period
    /// advancement.
    pub(crate) fn reset(&self, advancement: Duration) {
        critical_section::with(|cs| {
            self.ledger.borrow(cs).set(Ledger {
                elapsed: Duration::ZERO,
                advancement,
            });
        });
    }

    /// Overwrite the elapsed time, keeping the advancement.
    pub(crate) fn set_elapsed(&self, elapsed: Duration) {
        critical_section::with(|cs| {
            let cell = self.ledger.borrow(cs);
            let mut ledger = cell.get();
            ledger.elapsed = elapsed;
            cell.set(ledger);
        });
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodHandler for Timebase {
    fn on_period_end(&self) {
        self.advance();
    }
}
