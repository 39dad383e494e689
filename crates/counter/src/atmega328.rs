//! Capability tables of the ATmega328 counters, clocked from the CPU crystal.

use crate::Specs;

/// The first 8-bit counter (timer 0 in the datasheet).
pub const COUNTER_1: Specs = Specs {
    base_frequency_hz: config::CPU_FREQUENCY_HZ,
    width: 8,
    prescales: &[0, 3, 6, 8, 10],
};

/// The 16-bit counter (timer 1 in the datasheet).
pub const COUNTER_2: Specs = Specs {
    base_frequency_hz: config::CPU_FREQUENCY_HZ,
    width: 16,
    prescales: &[0, 3, 6, 8, 10],
};

/// The second 8-bit counter (timer 2 in the datasheet). It has a finer
/// prescaler than the other two.
pub const COUNTER_3: Specs = Specs {
    base_frequency_hz: config::CPU_FREQUENCY_HZ,
    width: 8,
    prescales: &[0, 3, 5, 6, 7, 8, 10],
};
