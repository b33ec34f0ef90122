use crate::bus::{Bus, Interrupt, Interrupts};

use super::super::Cpu;

impl Cpu {
    /// `IE & IF`, restricted to the five defined lines.
    #[inline]
    pub(in crate::cpu) fn pending_interrupts<B: Bus>(&mut self, bus: &mut B) -> Interrupts {
        let ie = bus.interrupt_enable();
        let iflags = bus.interrupt_flag();
        Interrupts::from_bits_truncate(ie & iflags)
    }

    /// Leave HALT on any pending line, IME or not; leave STOP on a raised
    /// joypad request whether or not it is enabled.
    pub(in crate::cpu) fn wake_on_pending<B: Bus>(&mut self, bus: &mut B, pending: Interrupts) {
        if self.interrupts.halted && !pending.is_empty() {
            self.interrupts.halted = false;
            log::debug!(
                "SM83 wake from HALT: pending=0x{:02X} pc=0x{:04X}",
                pending.bits(),
                self.regs.pc()
            );
        }

        if self.interrupts.stopped {
            let requested = Interrupts::from_bits_truncate(bus.interrupt_flag());
            if requested.contains(Interrupts::JOYPAD) {
                self.interrupts.stopped = false;
                log::debug!("SM83 wake from STOP: pc=0x{:04X}", self.regs.pc());
            }
        }
    }

    /// Service the highest-priority pending interrupt if IME allows it.
    ///
    /// Returns the serviced source and the PC that was pushed. IME is
    /// cleared and the IF bit acknowledged before the push, so the whole
    /// entry sequence is one indivisible unit from the bus's point of view.
    pub(in crate::cpu) fn dispatch_interrupt<B: Bus>(
        &mut self,
        bus: &mut B,
        pending: Interrupts,
    ) -> Option<(Interrupt, u16)> {
        if !self.interrupts.ime.is_enabled() {
            return None;
        }
        let irq = Interrupt::highest_priority(pending)?;

        self.interrupts.ime.disable();
        bus.acknowledge_interrupt(irq);

        let return_pc = self.regs.pc();
        self.push16(bus, return_pc);
        self.regs.set_pc(irq.vector());

        log::debug!(
            "SM83 interrupt: {:?} vector=0x{:04X} return=0x{:04X} sp=0x{:04X} pending=0x{:02X}",
            irq,
            irq.vector(),
            return_pc,
            self.regs.sp(),
            pending.bits(),
        );

        Some((irq, return_pc))
    }
}
