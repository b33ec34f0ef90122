use bitflags::bitflags;

/// Address of the Interrupt Enable register (IE).
pub const INTERRUPT_ENABLE_ADDR: u16 = 0xFFFF;
/// Address of the Interrupt Flag register (IF).
pub const INTERRUPT_FLAG_ADDR: u16 = 0xFF0F;

bitflags! {
    /// The five maskable interrupt lines as they appear in IE and IF.
    ///
    /// Bit order doubles as priority order: the lowest set bit wins.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Interrupts: u8 {
        const VBLANK = 0x01;
        const LCD_STAT = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

/// A single interrupt source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    /// All sources in priority order.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Fixed handler address: 0x40, 0x48, 0x50, 0x58, 0x60.
    #[inline]
    pub const fn vector(self) -> u16 {
        0x0040 + (self as u16) * 8
    }

    #[inline]
    pub const fn mask(self) -> Interrupts {
        Interrupts::from_bits_truncate(1 << (self as u8))
    }

    /// Pick the highest-priority (lowest-numbered) source in `pending`.
    pub fn highest_priority(pending: Interrupts) -> Option<Interrupt> {
        if pending.is_empty() {
            return None;
        }
        Self::ALL
            .get(pending.bits().trailing_zeros() as usize)
            .copied()
    }
}

/// Memory bus as seen by the CPU.
///
/// Both accessors must be total over the 16-bit address space; whatever
/// routing, masking or side effects happen behind them is the bus's
/// business.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Current value of IE. Defaults to a plain read of `$FFFF`.
    fn interrupt_enable(&mut self) -> u8 {
        self.read8(INTERRUPT_ENABLE_ADDR)
    }

    /// Current value of IF. Defaults to a plain read of `$FF0F`.
    fn interrupt_flag(&mut self) -> u8 {
        self.read8(INTERRUPT_FLAG_ADDR)
    }

    /// Clear the IF bit of a serviced interrupt.
    ///
    /// Called by the core while dispatching, in the same step that clears
    /// IME. Implementations must store straight into IF rather than route
    /// through `write8`, so that any write masking the bus applies to CPU
    /// stores cannot swallow the acknowledge.
    fn acknowledge_interrupt(&mut self, irq: Interrupt);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_follow_priority_order() {
        let vectors: Vec<u16> = Interrupt::ALL.iter().map(|irq| irq.vector()).collect();
        assert_eq!(vectors, vec![0x40, 0x48, 0x50, 0x58, 0x60]);
    }

    #[test]
    fn highest_priority_is_lowest_bit() {
        assert_eq!(Interrupt::highest_priority(Interrupts::empty()), None);
        assert_eq!(
            Interrupt::highest_priority(Interrupts::all()),
            Some(Interrupt::VBlank)
        );
        assert_eq!(
            Interrupt::highest_priority(Interrupts::SERIAL | Interrupts::TIMER),
            Some(Interrupt::Timer)
        );
        assert_eq!(
            Interrupt::highest_priority(Interrupts::JOYPAD),
            Some(Interrupt::Joypad)
        );
    }

    #[test]
    fn mask_matches_flag_bits() {
        assert_eq!(Interrupt::VBlank.mask(), Interrupts::VBLANK);
        assert_eq!(Interrupt::Joypad.mask(), Interrupts::JOYPAD);
        assert_eq!(Interrupt::Timer.mask().bits(), 0x04);
    }
}
