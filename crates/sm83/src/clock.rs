//! Wrap-safe reading of the CPU tick counter.
//!
//! The counter is a 16-bit value that rolls over every 65536 T-cycles.
//! Peripherals never compare two readings directly; they ask for the
//! elapsed time between them.

/// Cycles elapsed from `earlier` to `later`, accounting for one rollover.
#[inline]
pub const fn elapsed(earlier: u16, later: u16) -> u16 {
    later.wrapping_sub(earlier)
}

/// Peripheral-side cursor over the CPU tick counter.
///
/// Each call to [`TickObserver::observe`] returns how many T-cycles passed
/// since the previous observation and moves the cursor forward. Callers
/// must observe at least once every 65535 cycles (in practice: once per
/// CPU step) or whole rollovers are lost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickObserver {
    last: u16,
}

impl TickObserver {
    pub const fn new(start: u16) -> Self {
        Self { last: start }
    }

    pub fn observe(&mut self, now: u16) -> u16 {
        let delta = elapsed(self.last, now);
        self.last = now;
        delta
    }

    #[inline]
    pub const fn last(&self) -> u16 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_without_wrap() {
        assert_eq!(elapsed(0x0100, 0x0114), 0x14);
        assert_eq!(elapsed(0x1234, 0x1234), 0);
    }

    #[test]
    fn elapsed_across_rollover() {
        assert_eq!(elapsed(0xFFF0, 0x0004), 0x14);
        assert_eq!(elapsed(0xFFFF, 0x0000), 1);
    }

    #[test]
    fn observer_accumulates_deltas() {
        let mut observer = TickObserver::new(0xFFF8);
        assert_eq!(observer.observe(0xFFFC), 4);
        assert_eq!(observer.observe(0x0010), 0x14);
        assert_eq!(observer.last(), 0x0010);
        assert_eq!(observer.observe(0x0010), 0);
    }
}
