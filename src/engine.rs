use counter::{Counter, Interrupts, Mode, Speed, Status};

use crate::{
    Duration,
    freeze::Freeze,
    scaling::{self, SelectError},
    timebase::Timebase,
};

/// Runtime options of a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Start counting as soon as [`Clock::init`] succeeds, instead of
    /// waiting for [`Clock::start`].
    pub start_on_init: bool,
}

impl Config {
    /// The configuration given by the `config` crate.
    pub const DEFAULT: Self = Self {
        start_on_init: config::START_ON_INIT,
    };
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Why [`Clock::init`] failed. The clock is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// No prescale of the counter can provide the wished precision.
    Unsatisfiable(SelectError),

    /// The selected prescale has no hardware speed code.
    UnsupportedPrescale(u8),
}

impl From<SelectError> for InitError {
    fn from(error: SelectError) -> Self {
        Self::Unsatisfiable(error)
    }
}

/// The lifecycle state of a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Never successfully initialized.
    Uninitialized,

    /// Configured, counter not receiving clock pulses.
    Stopped,

    /// Configured and counting.
    Running,
}

/// A clock measuring the time elapsed since it was initialized, built from
/// a free-running counter and its period interrupt.
///
/// The time is made of two parts. The coarse part lives in the
/// [`Timebase`] and advances by one counter period each time the counter
/// wraps. The fine part is the raw counter value, worth one tick each.
/// Reading the clock combines both while the counter is frozen.
pub struct Clock<C: Counter> {
    counter: C,
    timebase: &'static Timebase,
    config: Config,

    /// Hardware code of the configured prescale, kept so that starting the
    /// clock is a single register write.
    speed: Option<Speed>,
}

impl<C: Counter> Clock<C> {
    /// Create an uninitialized clock on the given counter, accumulating
    /// coarse time into `timebase`. Nothing is written to the counter until
    /// [`Clock::init`] is called.
    #[must_use]
    pub const fn new(counter: C, timebase: &'static Timebase) -> Self {
        Self::with_config(counter, timebase, Config::DEFAULT)
    }

    #[must_use]
    pub const fn with_config(counter: C, timebase: &'static Timebase, config: Config) -> Self {
        Self {
            counter,
            timebase,
            config,
            speed: None,
        }
    }

    /// Configure the counter for ticks as close as possible to
    /// `wished_precision_us` microseconds, and set the time to zero.
    ///
    /// On success, the counter is set to count through its whole range
    /// with the period interrupt advancing the timebase, and is left
    /// stopped unless [`Config::start_on_init`] is set. May be called
    /// again at any time to reconfigure the clock from scratch.
    ///
    /// # Errors
    /// Returns an [`InitError`] if no usable prescale exists. The counter,
    /// the timebase and the running state are not touched in that case.
    pub fn init(&mut self, wished_precision_us: u16) -> Result<(), InitError> {
        let specs = self.counter.specs();
        let prescale = scaling::select_prescale(wished_precision_us, specs).inspect_err(|error| {
            log::warn!("Cannot provide a {wished_precision_us} us clock: {error:?}");
        })?;
        let speed = specs.speed(prescale).ok_or_else(|| {
            log::warn!("Counter has no speed code for a prescale of 2^{prescale}");
            InitError::UnsupportedPrescale(prescale)
        })?;
        let advancement = scaling::period_duration(prescale, specs);

        self.counter.disable();
        self.counter
            .set_interrupts(self.counter.interrupts() - Interrupts::ON_DONE);

        self.counter.set_mode(Mode::CountToMax);
        self.counter.install_period_handler(self.timebase);
        self.counter.acknowledge(Status::DONE);
        self.counter.set_current(0);
        self.timebase.reset(advancement);
        self.speed = Some(speed);

        self.counter
            .set_interrupts(self.counter.interrupts() | Interrupts::ON_DONE);

        log::info!("Clock initialized with a prescale of 2^{prescale}");
        log::debug!(
            "Clock tick: {}, period: {}",
            scaling::tick_duration(prescale, specs),
            advancement
        );

        if self.config.start_on_init {
            self.start();
        }
        Ok(())
    }

    /// Start or resume counting. Does nothing if the clock is already
    /// running, or if it was never initialized.
    pub fn start(&mut self) {
        match self.speed {
            Some(speed) => {
                log::debug!("Clock started");
                self.counter.enable(speed);
            }
            None => log::debug!("Clock started before initialization, ignored"),
        }
    }

    /// Pause counting. The elapsed time and the configuration are kept,
    /// and [`Clock::start`] resumes from where the clock stopped.
    pub fn stop(&mut self) {
        log::debug!("Clock stopped");
        self.counter.disable();
    }

    /// The time elapsed since the clock was initialized, wrapping around
    /// past [`Duration::MAX`].
    ///
    /// The counter is stopped for the duration of the call so that the
    /// coarse and fine parts are read at the same instant. Those few cycles
    /// are lost: the clock falls slightly behind real time on every call.
    /// Do not use it in a tight polling loop where exact real time matters.
    ///
    /// If the counter completed a period whose interrupt has not been
    /// serviced yet, that period is accounted for here, exactly once.
    ///
    /// Before a successful initialization the counter belongs to nobody:
    /// it is left untouched and only the coarse part is returned.
    pub fn time(&mut self) -> Duration {
        let Some(prescale) = self.prescale() else {
            return self.timebase.elapsed();
        };

        let (coarse, fine, caught_up) = {
            let mut counter = Freeze::new(&mut self.counter);

            let pending = counter.status().contains(Status::DONE);
            if pending {
                self.timebase.advance();
                counter.acknowledge(Status::DONE);
            }

            (self.timebase.elapsed(), counter.current(), pending)
        };

        if caught_up {
            log::trace!("Accounted for a period whose interrupt was not serviced");
        }

        let specs = self.counter.specs();
        coarse.wrapping_add(scaling::ticks_to_duration(u32::from(fine), prescale, specs))
    }

    /// Set the current time. The configuration and the running state are
    /// kept; the counter restarts its period from zero. Before a successful
    /// initialization, only the coarse part is set.
    pub fn set_time(&mut self, time: Duration) {
        if self.speed.is_none() {
            self.timebase.set_elapsed(time);
            return;
        }

        let mut counter = Freeze::new(&mut self.counter);
        counter.acknowledge(Status::DONE);
        counter.set_current(0);
        self.timebase.set_elapsed(time);
    }

    /// Wait until the clock has advanced by at least `interval`, polling
    /// [`Clock::time`]. Wrap-around of the clock during the wait is handled.
    ///
    /// Since every reading pauses the counter, the real time spent here is
    /// longer than `interval`. Returns immediately if the clock is not
    /// running, since it would never advance.
    pub fn delay(&mut self, interval: Duration) {
        if self.state() != State::Running {
            log::warn!("Delay of {interval} on a clock that is not running, ignored");
            return;
        }

        let start = self.time();
        while self.time().wrapping_sub(start) < interval {
            core::hint::spin_loop();
        }
    }

    /// The prescale currently configured, as a power of two.
    #[must_use]
    pub fn prescale(&self) -> Option<u8> {
        self.speed
            .and_then(|speed| self.counter.specs().prescale(speed))
    }

    /// The duration of one counter tick, truncated to whole microseconds.
    /// Zero when unconfigured.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.prescale()
            .map_or(Duration::ZERO, |prescale| {
                scaling::tick_duration(prescale, self.counter.specs())
            })
    }

    /// The resolution of the clock in whole microseconds. Zero means the
    /// clock ticks faster than once per microsecond (or is unconfigured):
    /// readings are then still exact to the microsecond.
    #[must_use]
    pub fn precision_us(&self) -> u16 {
        u16::try_from(self.tick_duration().as_micros()).unwrap_or(u16::MAX)
    }

    /// The time added to the clock each time the counter wraps. Zero when
    /// unconfigured.
    #[must_use]
    pub fn period_duration(&self) -> Duration {
        self.prescale()
            .map_or(Duration::ZERO, |prescale| {
                scaling::period_duration(prescale, self.counter.specs())
            })
    }

    #[must_use]
    pub fn state(&self) -> State {
        match (self.speed, self.counter.speed()) {
            (None, _) => State::Uninitialized,
            (Some(_), None) => State::Stopped,
            (Some(_), Some(_)) => State::Running,
        }
    }

    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    #[must_use]
    pub fn timebase(&self) -> &'static Timebase {
        self.timebase
    }

    /// The underlying counter.
    #[must_use]
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// The underlying counter. Changing its configuration behind the
    /// clock's back breaks the clock until the next [`Clock::init`].
    pub fn counter_mut(&mut self) -> &mut C {
        &mut self.counter
    }
}
