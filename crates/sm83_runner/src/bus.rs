use sm83::{Bus, Interrupt, Interrupts, TickObserver};

use crate::serial::Serial;
use crate::timer::Timer;

/// Size of the directly mapped cartridge ROM window.
pub const ROM_SIZE: usize = 0x8000;

const SB: u16 = 0xFF01;
const SC: u16 = 0xFF02;
const DIV: u16 = 0xFF04;
const TAC: u16 = 0xFF07;
const IF: u16 = 0xFF0F;
const IE: u16 = 0xFFFF;

/// Flat 64 KiB bus with just enough IO for CPU test ROMs: serial output,
/// the timer and the two interrupt registers.
///
/// Writes below 0x8000 are dropped, so a ROM cannot overwrite itself
/// through stray MBC register writes.
pub struct HarnessBus {
    memory: Vec<u8>,
    ie: u8,
    iflag: Interrupts,
    serial: Serial,
    timer: Timer,
    clock: TickObserver,
}

impl HarnessBus {
    /// Map `rom` at 0x0000. Anything past the 32 KiB window is ignored.
    pub fn new(rom: &[u8]) -> Self {
        let mut memory = vec![0; 0x10000];
        let len = rom.len().min(ROM_SIZE);
        if rom.len() > ROM_SIZE {
            log::warn!(
                "ROM is {} bytes; only the first {} are mapped (no bank switching)",
                rom.len(),
                ROM_SIZE
            );
        }
        memory[..len].copy_from_slice(&rom[..len]);

        Self {
            memory,
            ie: 0,
            iflag: Interrupts::empty(),
            serial: Serial::default(),
            timer: Timer::default(),
            clock: TickObserver::default(),
        }
    }

    /// Catch peripherals up with the CPU tick counter.
    ///
    /// Must be called after every CPU step so that no more than one
    /// counter rollover separates two observations.
    pub fn sync(&mut self, now: u16) {
        let elapsed = self.clock.observe(now);
        if self.timer.advance(elapsed) {
            self.request(Interrupt::Timer);
        }
    }

    pub fn request(&mut self, irq: Interrupt) {
        self.iflag |= irq.mask();
    }

    /// Everything sent over the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.serial.output
    }

    /// Side-effect-free read of plain memory, for breakpoint detection.
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }
}

impl Bus for HarnessBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            SB => self.serial.sb,
            SC => self.serial.read_sc(),
            DIV..=TAC => self.timer.read(addr),
            IF => self.iflag.bits() | 0xE0,
            IE => self.ie,
            _ => self.memory[addr as usize],
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {}
            SB => self.serial.write_sb(value),
            SC => {
                if self.serial.write_sc(value) {
                    self.request(Interrupt::Serial);
                }
            }
            DIV..=TAC => self.timer.write(addr, value),
            IF => self.iflag = Interrupts::from_bits_truncate(value),
            IE => self.ie = value,
            _ => self.memory[addr as usize] = value,
        }
    }

    fn interrupt_enable(&mut self) -> u8 {
        self.ie
    }

    fn interrupt_flag(&mut self) -> u8 {
        self.iflag.bits()
    }

    fn acknowledge_interrupt(&mut self, irq: Interrupt) {
        self.iflag.remove(irq.mask());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_is_mapped_and_read_only() {
        let mut bus = HarnessBus::new(&[0x31, 0xFE, 0xFF]);
        assert_eq!(bus.read8(0x0000), 0x31);
        bus.write8(0x0001, 0x00);
        assert_eq!(bus.read8(0x0001), 0xFE);

        bus.write8(0xC000, 0x12);
        assert_eq!(bus.read8(0xC000), 0x12);
    }

    #[test]
    fn interrupt_flag_upper_bits_read_as_one() {
        let mut bus = HarnessBus::new(&[]);
        assert_eq!(bus.read8(0xFF0F), 0xE0);
        bus.write8(0xFF0F, 0xFF);
        assert_eq!(bus.read8(0xFF0F), 0xFF);
        assert_eq!(bus.interrupt_flag(), 0x1F);

        bus.acknowledge_interrupt(Interrupt::VBlank);
        assert_eq!(bus.read8(0xFF0F), 0xFE);
    }

    #[test]
    fn serial_transfer_requests_interrupt() {
        let mut bus = HarnessBus::new(&[]);
        bus.write8(0xFF01, b'o');
        bus.write8(0xFF02, 0x81);
        assert_eq!(bus.serial_output(), b"o");
        assert_eq!(bus.interrupt_flag(), 0x08);
    }

    #[test]
    fn timer_advances_only_through_sync() {
        let mut bus = HarnessBus::new(&[]);
        bus.write8(0xFF07, 0x05);
        bus.sync(0xFFF0);
        // First observation spans 0x0000..0xFFF0.
        bus.write8(0xFF05, 0x00);
        bus.write8(0xFF0F, 0x00);

        // Across the rollover: 0xFFF0 -> 0x0010 is 32 cycles.
        bus.sync(0x0010);
        assert_eq!(bus.read8(0xFF05), 2);
        assert_eq!(bus.interrupt_flag(), 0);
    }
}
