#![no_std]

/// The frequency of the clock that drives the counter before any prescaling,
/// in Hertz. On the reference board this is the CPU crystal, and every tick
/// and period duration is derived from it.
///
/// Changing this value without changing the crystal will make the clock run
/// fast or slow by the same ratio. There is no runtime calibration.
pub const CPU_FREQUENCY_HZ: u32 = 16_000_000;

/// The tick duration, in microseconds, that firmware asks for when it has no
/// particular requirement. At 16 MHz this maps exactly to a prescale of 2^6,
/// which gives a period of about one millisecond on an 8-bit counter.
pub const DEFAULT_PRECISION_US: u16 = 4;

/// Whether a successful initialization also starts counting.
///
/// The default keeps the clock stopped after `init` so that callers decide
/// when time zero is. Boards that only ever want "time since boot" can flip
/// this and skip the explicit start.
pub const START_ON_INIT: bool = false;
