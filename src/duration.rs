use core::fmt;

/// A span of time with microsecond resolution, stored as escalating units:
/// kilo-seconds, seconds, milliseconds and microseconds. Every unit below
/// kilo-seconds is always less than 1000.
///
/// The largest representable value is just under 65536 kilo-seconds
/// (about two years). Arithmetic past that point wraps around to zero
/// instead of trapping: code measuring intervals should subtract with
/// [`Duration::wrapping_sub`], which stays correct across one wrap.
///
/// Fields are declared from the most to the least significant, so the
/// derived ordering is the chronological one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    kilos: u16,
    secs: u16,
    millis: u16,
    micros: u16,
}

impl Duration {
    /// A duration of zero.
    pub const ZERO: Self = Self {
        kilos: 0,
        secs: 0,
        millis: 0,
        micros: 0,
    };

    /// The largest representable duration.
    pub const MAX: Self = Self {
        kilos: u16::MAX,
        secs: 999,
        millis: 999,
        micros: 999,
    };

    /// Number of microseconds after which durations wrap around to zero.
    pub const WRAP_MICROS: u64 = (u16::MAX as u64 + 1) * 1_000_000_000;

    /// Build a duration from its units. Returns `None` if any unit below
    /// kilo-seconds is 1000 or more.
    #[must_use]
    pub const fn from_parts(kilos: u16, secs: u16, millis: u16, micros: u16) -> Option<Self> {
        if secs >= 1000 || millis >= 1000 || micros >= 1000 {
            return None;
        }
        Some(Self {
            kilos,
            secs,
            millis,
            micros,
        })
    }

    /// Build a duration from a count of microseconds, wrapping around past
    /// [`Duration::MAX`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_micros(micros: u64) -> Self {
        let micros = micros % Self::WRAP_MICROS;
        // Each unit is reduced modulo its range before the cast.
        Self {
            kilos: (micros / 1_000_000_000) as u16,
            secs: (micros / 1_000_000 % 1000) as u16,
            millis: (micros / 1000 % 1000) as u16,
            micros: (micros % 1000) as u16,
        }
    }

    /// Build a duration from a count of milliseconds, wrapping around past
    /// [`Duration::MAX`].
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self::from_micros(millis % (Self::WRAP_MICROS / 1000) * 1000)
    }

    /// The total number of microseconds in this duration.
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.kilos as u64 * 1_000_000_000
            + self.secs as u64 * 1_000_000
            + self.millis as u64 * 1000
            + self.micros as u64
    }

    #[must_use]
    pub const fn kilos(self) -> u16 {
        self.kilos
    }

    #[must_use]
    pub const fn secs(self) -> u16 {
        self.secs
    }

    #[must_use]
    pub const fn millis(self) -> u16 {
        self.millis
    }

    #[must_use]
    pub const fn micros(self) -> u16 {
        self.micros
    }

    /// Add two durations, returning the wrapped sum and whether the sum
    /// went past [`Duration::MAX`].
    ///
    /// Works unit by unit with a carry so that no wide integer arithmetic
    /// is needed: this runs from interrupt context on 8-bit targets.
    #[must_use]
    pub const fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let (micros, carry) = add_unit(self.micros, rhs.micros, 0);
        let (millis, carry) = add_unit(self.millis, rhs.millis, carry);
        let (secs, carry) = add_unit(self.secs, rhs.secs, carry);
        let (kilos, overflow_a) = self.kilos.overflowing_add(rhs.kilos);
        let (kilos, overflow_b) = kilos.overflowing_add(carry);

        (
            Self {
                kilos,
                secs,
                millis,
                micros,
            },
            overflow_a || overflow_b,
        )
    }

    /// Add two durations, wrapping around past [`Duration::MAX`].
    #[must_use]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Add two durations, returning `None` if the sum does not fit.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.overflowing_add(rhs) {
            (sum, false) => Some(sum),
            (_, true) => None,
        }
    }

    /// Subtract `rhs` from `self` modulo the wrap-around point. When `self`
    /// was read after `rhs` on the same clock, this is the time between the
    /// two readings even if the clock wrapped once in between.
    #[must_use]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        let (micros, borrow) = sub_unit(self.micros, rhs.micros, 0);
        let (millis, borrow) = sub_unit(self.millis, rhs.millis, borrow);
        let (secs, borrow) = sub_unit(self.secs, rhs.secs, borrow);
        let kilos = self.kilos.wrapping_sub(rhs.kilos).wrapping_sub(borrow);

        Self {
            kilos,
            secs,
            millis,
            micros,
        }
    }
}

/// Add two sub-kilo units and an incoming carry (0 or 1), returning the
/// unit and the outgoing carry.
const fn add_unit(a: u16, b: u16, carry: u16) -> (u16, u16) {
    let sum = a + b + carry;
    if sum >= 1000 { (sum - 1000, 1) } else { (sum, 0) }
}

/// Subtract two sub-kilo units and an incoming borrow (0 or 1), returning
/// the unit and the outgoing borrow.
const fn sub_unit(a: u16, b: u16, borrow: u16) -> (u16, u16) {
    let rhs = b + borrow;
    if a >= rhs { (a - rhs, 0) } else { (a + 1000 - rhs, 1) }
}

impl From<Duration> for core::time::Duration {
    fn from(duration: Duration) -> Self {
        core::time::Duration::from_micros(duration.as_micros())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = u32::from(self.kilos) * 1000 + u32::from(self.secs);
        write!(f, "{}.{:03}{:03} s", secs, self.millis, self.micros)
    }
}
