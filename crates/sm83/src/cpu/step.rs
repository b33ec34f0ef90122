use crate::bus::Bus;
use crate::trace::{NoTrace, StepEvent, StepKind, Tracer};

use super::cycles::{IDLE, INTERRUPT_DISPATCH};
use super::{Cpu, CpuError, Decoded, Instr, Reg16, CB_TABLE, PRIMARY_TABLE};

impl Cpu {
    /// Execute one unit of work: an interrupt dispatch, one HALT/STOP idle
    /// slice, or exactly one instruction.
    ///
    /// Returns the T-cycles charged, which have also been added to
    /// [`Cpu::ticks`].
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        self.step_traced(bus, &mut NoTrace)
    }

    /// [`Cpu::step`], reporting the completed step to `tracer`.
    ///
    /// The tracer is called exactly once per successful step and not at all
    /// when the step fails.
    pub fn step_traced<B, T>(&mut self, bus: &mut B, tracer: &mut T) -> Result<u32, CpuError>
    where
        B: Bus,
        T: Tracer + ?Sized,
    {
        if let Some(err) = self.locked {
            return Err(err);
        }

        let pending = self.pending_interrupts(bus);
        self.wake_on_pending(bus, pending);

        let (kind, cycles) = if let Some((irq, return_pc)) = self.dispatch_interrupt(bus, pending) {
            (StepKind::Interrupt { irq, return_pc }, INTERRUPT_DISPATCH)
        } else if self.interrupts.halted || self.interrupts.stopped {
            let kind = StepKind::Idle {
                halted: self.interrupts.halted,
                stopped: self.interrupts.stopped,
            };
            (kind, IDLE)
        } else {
            self.execute_one(bus)?
        };

        self.ticks = self.ticks.wrapping_add(cycles as u16);
        tracer.on_step(&StepEvent {
            kind,
            cycles,
            ticks: self.ticks,
            regs: &self.regs,
        });
        Ok(cycles)
    }

    /// Fetch, decode and run the instruction at PC, then move PC past it.
    fn execute_one<B: Bus>(&mut self, bus: &mut B) -> Result<(StepKind, u32), CpuError> {
        let pc = self.regs.pc();
        let opcode = bus.read8(pc);
        self.pc_advance = 1;
        self.extra_cycles = 0;

        let entry = PRIMARY_TABLE[opcode as usize];
        if entry.instr == Instr::Illegal {
            return Err(self.lock(opcode, pc));
        }

        // A request queued by EI in an earlier step takes effect for the
        // instruction after this one.
        self.interrupts.ime.advance();

        let (decoded, traced_opcode, base) = match entry.instr {
            Instr::Prefix => {
                // CB entries hold the full published cost, prefix fetch included.
                let cb_opcode = self.imm8(bus);
                let cb = CB_TABLE[cb_opcode as usize];
                self.exec_cb(bus, cb.instr);
                (Decoded::Prefixed(cb.instr), cb_opcode, cb.cycles)
            }
            instr => {
                self.exec_instr(bus, instr);
                (Decoded::Primary(instr), opcode, entry.cycles)
            }
        };

        let advance = self.pc_advance.min(3);
        let next = self.regs.pc().wrapping_add(advance as u16);
        self.regs.set_pc(next);

        let cycles = base as u32 + self.extra_cycles as u32;
        let kind = StepKind::Instruction {
            pc,
            opcode: traced_opcode,
            decoded,
        };
        Ok((kind, cycles))
    }

    /// Hard-lock after an opcode hole. State is left exactly as it was
    /// before the fetch.
    fn lock(&mut self, opcode: u8, pc: u16) -> CpuError {
        let err = CpuError::IllegalOpcode { opcode, pc };
        log::error!(
            "SM83 locked: invalid opcode 0x{opcode:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
            sp = self.regs.sp(),
            af = self.regs.get16(Reg16::AF),
            bc = self.regs.get16(Reg16::BC),
            de = self.regs.get16(Reg16::DE),
            hl = self.regs.hl(),
        );
        self.pc_advance = 0;
        self.locked = Some(err);
        err
    }
}
