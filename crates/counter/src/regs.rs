bitflags::bitflags! {
    /// Event flags of a counter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// The counter went past its maximum value and wrapped to zero.
        /// Cleared by acknowledging it, or by the hardware when the
        /// corresponding interrupt routine is entered.
        const DONE = 1 << 0;
    }

    /// Events allowed to raise an interrupt.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupts: u8 {
        /// Raise an interrupt when [`Status::DONE`] is set.
        const ON_DONE = 1 << 0;
    }
}
