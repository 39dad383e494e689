//! A clock measuring time since start-up on devices without a real-time
//! clock. It turns a free-running hardware counter and its "period complete"
//! interrupt into a monotonically advancing [`Duration`] with microsecond
//! resolution.
//!
//! The counter abstraction lives in the [`counter`] crate. A clock is built
//! on any [`counter::Counter`] and a `'static` [`Timebase`], which the
//! clock installs as the counter's period handler:
//!
//! ```rust
//! use clock::{Clock, Timebase};
//! use clock::counter::{atmega328, sim::SimCounter};
//!
//! static TIMEBASE: Timebase = Timebase::new();
//!
//! let mut clock = Clock::new(SimCounter::new(&atmega328::COUNTER_3), &TIMEBASE);
//! clock.init(4).expect("4 us ticks are available at 16 MHz");
//! clock.start();
//!
//! clock.counter_mut().tick(1000);
//! assert_eq!(clock.time().as_micros(), 4000);
//! ```
#![cfg_attr(not(test), no_std)]

pub mod duration;
pub mod engine;
pub mod freeze;
pub mod scaling;
pub mod timebase;

pub use counter;
pub use duration::Duration;
pub use engine::{Clock, Config, InitError, State};
pub use timebase::Timebase;
