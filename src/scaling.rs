//! Conversions between the counter's view of time (ticks at a power-of-two
//! prescale of the base clock) and durations.
//!
//! A tick at prescale `p` lasts `2^p / base_frequency_hz` seconds. All the
//! arithmetic below is done on integers scaled by the base frequency, so no
//! intermediate value is rounded until the final division.
use counter::Specs;

use crate::Duration;

/// The largest prescale exponent the clock accepts. Larger prescales are
/// skipped during selection, which keeps every intermediate product below
/// 2^53 for counters up to 16 bits wide.
pub const MAX_PRESCALE: u8 = 16;

const MICROS_PER_SEC: u64 = 1_000_000;

/// Why no prescale could be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// A tick duration of zero was asked for.
    ZeroPrecision,

    /// The counter's base clock frequency is zero, so no tick duration is
    /// finite.
    ZeroFrequency,

    /// The counter supports no prescale the clock can work with.
    NoCandidate,
}

/// Select the prescale whose tick duration is the closest to the wished
/// one, in microseconds.
///
/// When two prescales are equally close, the smaller one wins: it gives a
/// finer resolution at the cost of more frequent period interrupts.
///
/// # Errors
/// Fails if the wished duration or the base frequency is zero, or if the
/// counter lists no prescale up to [`MAX_PRESCALE`]. Nothing is modified
/// in that case, so the caller's current configuration stays valid.
pub fn select_prescale(wished_tick_us: u16, specs: &Specs) -> Result<u8, SelectError> {
    if wished_tick_us == 0 {
        return Err(SelectError::ZeroPrecision);
    }
    if specs.base_frequency_hz == 0 {
        return Err(SelectError::ZeroFrequency);
    }

    // Both sides are scaled by the base frequency: a tick of 2^p lasts
    // 2^p * 10^6 / f microseconds, to be compared with `wished`.
    let target = u64::from(wished_tick_us) * u64::from(specs.base_frequency_hz);

    let mut best: Option<(u8, u64)> = None;
    for &prescale in specs.prescales {
        if prescale > MAX_PRESCALE {
            continue;
        }
        let achieved = (1u64 << prescale) * MICROS_PER_SEC;
        let distance = achieved.abs_diff(target);
        let better = match best {
            None => true,
            Some((best_prescale, best_distance)) => {
                distance < best_distance || (distance == best_distance && prescale < best_prescale)
            }
        };
        if better {
            best = Some((prescale, distance));
        }
    }

    best.map(|(prescale, _)| prescale)
        .ok_or(SelectError::NoCandidate)
}

/// Convert a number of counter ticks at the given prescale to a duration,
/// truncated to whole microseconds.
///
/// `ticks` may be as large as one full period (2^16 on a 16-bit counter)
/// and `prescale` should not exceed [`MAX_PRESCALE`]. A zero base frequency
/// yields [`Duration::ZERO`].
#[must_use]
pub fn ticks_to_duration(ticks: u32, prescale: u8, specs: &Specs) -> Duration {
    debug_assert!(prescale <= MAX_PRESCALE);

    let Some(frequency) = core::num::NonZeroU64::new(u64::from(specs.base_frequency_hz)) else {
        return Duration::ZERO;
    };

    let scaled = (u64::from(ticks) << prescale).saturating_mul(MICROS_PER_SEC);
    Duration::from_micros(scaled / frequency)
}

/// Convert a duration to the number of whole counter ticks it spans at the
/// given prescale, truncating any partial tick. The inverse of
/// [`ticks_to_duration`] within one microsecond of rounding.
///
/// Saturates at `u32::MAX` for durations longer than that many ticks. A
/// zero base frequency yields zero ticks.
#[must_use]
pub fn duration_to_ticks(duration: Duration, prescale: u8, specs: &Specs) -> u32 {
    debug_assert!(prescale <= MAX_PRESCALE);

    // Up to 2^46 microseconds times a 32-bit frequency: needs 128 bits.
    let scaled = u128::from(duration.as_micros()) * u128::from(specs.base_frequency_hz);
    let per_tick = u128::from(MICROS_PER_SEC) << prescale;
    u32::try_from(scaled / per_tick).unwrap_or(u32::MAX)
}

/// The duration of a single tick at the given prescale, truncated to whole
/// microseconds. Zero when a tick is shorter than one microsecond.
#[must_use]
pub fn tick_duration(prescale: u8, specs: &Specs) -> Duration {
    ticks_to_duration(1, prescale, specs)
}

/// The duration of one full period of the counter at the given prescale:
/// the time it takes to count from zero through its maximum value and wrap.
#[must_use]
pub fn period_duration(prescale: u8, specs: &Specs) -> Duration {
    ticks_to_duration(specs.period_ticks(), prescale, specs)
}
