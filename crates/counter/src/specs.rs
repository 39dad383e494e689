use core::num::NonZeroU8;

/// A hardware speed code: the value written into the counter's clock select
/// field to drive it at a given prescale. Zero means "no clock" on every
/// counter we support, so a valid speed is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Speed(NonZeroU8);

impl Speed {
    /// Create a speed from its raw hardware code. Returns `None` for zero,
    /// which is the "stopped" code.
    #[must_use]
    pub const fn new(code: u8) -> Option<Self> {
        match NonZeroU8::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    /// The raw hardware code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0.get()
    }
}

/// What a counter is able to do.
///
/// The prescales are given as powers of two, in the order of their hardware
/// speed codes: the prescale at index `i` is selected by code `i + 1`. This
/// matches the clock select encoding of the AVR counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specs {
    /// Frequency of the clock feeding the prescaler, in Hertz.
    pub base_frequency_hz: u32,

    /// Width of the counter register, in bits. At most 16.
    pub width: u8,

    /// Supported prescales, as powers of two, ordered by speed code.
    pub prescales: &'static [u8],
}

impl Specs {
    /// The speed code selecting the given prescale, if the counter
    /// supports it.
    #[must_use]
    pub fn speed(&self, prescale: u8) -> Option<Speed> {
        let index = self.prescales.iter().position(|&p| p == prescale)?;
        u8::try_from(index + 1).ok().and_then(Speed::new)
    }

    /// The prescale selected by the given speed code, if the code is valid
    /// for this counter.
    #[must_use]
    pub fn prescale(&self, speed: Speed) -> Option<u8> {
        let index = usize::from(speed.code()) - 1;
        self.prescales.get(index).copied()
    }

    /// Number of ticks in one period: the counter visits every value from
    /// zero to its maximum once.
    #[must_use]
    pub const fn period_ticks(&self) -> u32 {
        1 << self.width
    }

    /// The largest raw value the counter can hold.
    #[must_use]
    pub const fn max(&self) -> u16 {
        // Widths are at most 16 bits, the subtraction result always fits.
        #[allow(clippy::cast_possible_truncation)]
        let max = (self.period_ticks() - 1) as u16;
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: Specs = Specs {
        base_frequency_hz: 16_000_000,
        width: 8,
        prescales: &[0, 3, 6, 8, 10],
    };

    #[test]
    fn test_speed_rejects_zero() {
        assert!(Speed::new(0).is_none());
        assert_eq!(Speed::new(5).map(Speed::code), Some(5));
    }

    #[test]
    fn test_speed_code_follows_table_order() {
        assert_eq!(SPECS.speed(0).map(Speed::code), Some(1));
        assert_eq!(SPECS.speed(6).map(Speed::code), Some(3));
        assert_eq!(SPECS.speed(10).map(Speed::code), Some(5));
        assert_eq!(SPECS.speed(5), None);
    }

    #[test]
    fn test_prescale_from_speed() {
        for &prescale in SPECS.prescales {
            let speed = SPECS.speed(prescale).unwrap();
            assert_eq!(SPECS.prescale(speed), Some(prescale));
        }
        assert_eq!(SPECS.prescale(Speed::new(6).unwrap()), None);
    }

    #[test]
    fn test_period_and_max() {
        assert_eq!(SPECS.period_ticks(), 256);
        assert_eq!(SPECS.max(), 255);

        let wide = Specs { width: 16, ..SPECS };
        assert_eq!(wide.period_ticks(), 65_536);
        assert_eq!(wide.max(), u16::MAX);
    }
}
