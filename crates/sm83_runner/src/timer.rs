//! DIV/TIMA/TMA/TAC, advanced purely from elapsed CPU cycles.
//!
//! Edge-level quirks (TIMA reload delay, DIV-write glitches) are not
//! modelled; the harness only needs rates that match the published
//! frequencies.

/// DIV ticks at 16384 Hz: once every 256 T-cycles.
const DIV_PERIOD: u32 = 256;

#[derive(Debug, Default)]
pub(crate) struct Timer {
    div: u8,
    div_cycles: u32,
    tima: u8,
    tma: u8,
    tac: u8,
    tima_cycles: u32,
}

impl Timer {
    /// T-cycles per TIMA increment for TAC bits 1-0.
    fn tima_period(&self) -> u32 {
        match self.tac & 0x03 {
            0x00 => 1024,
            0x01 => 16,
            0x02 => 64,
            _ => 256,
        }
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Advance by `cycles` T-cycles. Returns true if TIMA overflowed and
    /// the timer interrupt should be requested.
    pub(crate) fn advance(&mut self, cycles: u16) -> bool {
        self.div_cycles += cycles as u32;
        while self.div_cycles >= DIV_PERIOD {
            self.div_cycles -= DIV_PERIOD;
            self.div = self.div.wrapping_add(1);
        }

        if !self.enabled() {
            return false;
        }

        let period = self.tima_period();
        let mut overflowed = false;
        self.tima_cycles += cycles as u32;
        while self.tima_cycles >= period {
            self.tima_cycles -= period;
            let (next, overflow) = self.tima.overflowing_add(1);
            if overflow {
                self.tima = self.tma;
                overflowed = true;
            } else {
                self.tima = next;
            }
        }
        overflowed
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => self.div,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            // Upper five bits are unused and read as 1.
            _ => self.tac | 0xF8,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Any write clears the whole divider, including the TIMA
            // prescaler that shares it.
            0xFF04 => {
                self.div = 0;
                self.div_cycles = 0;
                self.tima_cycles = 0;
            }
            0xFF05 => self.tima = value,
            0xFF06 => self.tma = value,
            _ => {
                if self.tac & 0x03 != value & 0x03 {
                    self.tima_cycles = 0;
                }
                self.tac = value & 0x07;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_counts_every_256_cycles_and_resets_on_write() {
        let mut timer = Timer::default();
        timer.advance(255);
        assert_eq!(timer.read(0xFF04), 0);
        timer.advance(1);
        assert_eq!(timer.read(0xFF04), 1);
        timer.advance(256 * 3);
        assert_eq!(timer.read(0xFF04), 4);

        timer.write(0xFF04, 0x99);
        assert_eq!(timer.read(0xFF04), 0);
        timer.advance(255);
        assert_eq!(timer.read(0xFF04), 0);
    }

    #[test]
    fn tima_follows_tac_rate() {
        for (tac, period) in [(0x04u8, 1024u16), (0x05, 16), (0x06, 64), (0x07, 256)] {
            let mut timer = Timer::default();
            timer.write(0xFF07, tac);
            timer.advance(period - 1);
            assert_eq!(timer.read(0xFF05), 0, "TAC {tac:#04x}");
            timer.advance(1);
            assert_eq!(timer.read(0xFF05), 1, "TAC {tac:#04x}");
        }
    }

    #[test]
    fn disabled_timer_leaves_tima_alone() {
        let mut timer = Timer::default();
        timer.write(0xFF07, 0x01);
        assert!(!timer.advance(4096));
        assert_eq!(timer.read(0xFF05), 0);
        assert_eq!(timer.read(0xFF07), 0xF9);
    }

    #[test]
    fn overflow_reloads_tma_and_requests_interrupt() {
        let mut timer = Timer::default();
        timer.write(0xFF06, 0xAB);
        timer.write(0xFF05, 0xFF);
        timer.write(0xFF07, 0x05);
        assert!(!timer.advance(15));
        assert!(timer.advance(1));
        assert_eq!(timer.read(0xFF05), 0xAB);
    }
}
