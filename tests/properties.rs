use clock::{
    Clock, Duration, Timebase,
    counter::{Counter, Specs, sim::SimCounter},
    scaling,
};

static SPECS: Specs = Specs {
    base_frequency_hz: 16_000_000,
    width: 8,
    prescales: &[0, 3, 6, 8, 10],
};

fn running_clock(timebase: &'static Timebase, precision_us: u16) -> Clock<SimCounter> {
    let mut clock = Clock::new(SimCounter::new(&SPECS), timebase);
    clock.init(precision_us).unwrap();
    clock.start();
    clock
}

#[test]
fn thousand_periods_at_four_micros() {
    static TIMEBASE: Timebase = Timebase::new();
    let mut clock = running_clock(&TIMEBASE, 4);

    assert_eq!(clock.prescale(), Some(6));
    assert_eq!(clock.period_duration(), Duration::from_micros(1024));

    clock.counter_mut().tick_periods(1000);
    assert_eq!(clock.counter_mut().current(), 0);
    assert_eq!(clock.time(), Duration::from_micros(1_024_000));
}

#[test]
fn readings_never_go_backwards() {
    static TIMEBASE: Timebase = Timebase::new();
    let mut clock = running_clock(&TIMEBASE, 4);

    // A fixed pseudo-random walk, including steps longer than a period.
    let mut state = 0x2545_f491_u32;
    let mut previous = clock.time();
    for _ in 0..2000 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        clock.counter_mut().tick(state % 700);

        let now = clock.time();
        assert!(now >= previous, "{now} < {previous}");
        previous = now;
    }
}

#[test]
fn handler_and_hardware_periods_agree() {
    static BY_HAND: Timebase = Timebase::new();
    static BY_HARDWARE: Timebase = Timebase::new();

    let mut reference = running_clock(&BY_HAND, 16);
    let mut clock = running_clock(&BY_HARDWARE, 16);
    reference.stop();

    for _ in 0..321 {
        BY_HAND.advance();
    }
    clock.counter_mut().tick_periods(321);
    clock.stop();

    assert_eq!(reference.time(), Duration::from_micros(321 * 4096));
    assert_eq!(reference.time(), clock.time());
}

#[test]
fn frozen_counter_reads_are_stable() {
    static TIMEBASE: Timebase = Timebase::new();
    let mut clock = running_clock(&TIMEBASE, 64);

    clock.counter_mut().tick_periods(7);
    clock.stop();
    clock.counter_mut().set_current(200);

    let coarse = Duration::from_micros(7 * clock.period_duration().as_micros());
    let expected = coarse.wrapping_add(scaling::ticks_to_duration(200, 10, &SPECS));
    assert_eq!(expected, Duration::from_micros(7 * 16_384 + 200 * 64));
    for _ in 0..50 {
        assert_eq!(clock.time(), expected);
    }
}

#[test]
fn missed_interrupt_counts_exactly_once() {
    static TIMEBASE: Timebase = Timebase::new();
    let mut clock = running_clock(&TIMEBASE, 4);

    clock.counter_mut().tick_periods(2);
    assert_eq!(clock.time(), Duration::from_micros(2048));

    clock.counter_mut().raise_pending();
    assert_eq!(clock.counter().wraps(), 3);
    assert_eq!(clock.time(), Duration::from_micros(3072));
    assert_eq!(clock.time(), Duration::from_micros(3072));
}

#[test]
fn readings_wrap_around_at_max() {
    static TIMEBASE: Timebase = Timebase::new();
    let mut clock = running_clock(&TIMEBASE, 4);

    let near_end = Duration::MAX.wrapping_sub(Duration::from_micros(500));
    clock.set_time(near_end);
    let before = clock.time();

    clock.counter_mut().tick(256);
    let after = clock.time();

    assert!(after < before);
    assert_eq!(after.wrapping_sub(before), Duration::from_micros(1024));
}
