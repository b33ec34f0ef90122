use crate::bus::Bus;

use super::{Cond, Cpu, Flag, Operand8, Reg16, Reg8};

impl Cpu {
    /// Read the next 8-bit immediate of the instruction in flight.
    ///
    /// Immediates sit right after the bytes consumed so far; PC itself is
    /// only moved once the handler has finished.
    #[inline]
    pub(super) fn imm8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pc().wrapping_add(self.pc_advance as u16);
        self.pc_advance += 1;
        bus.read8(addr)
    }

    /// Little-endian 16-bit immediate.
    #[inline]
    pub(super) fn imm16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.imm8(bus);
        let hi = self.imm8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Address behind a memory operand, with the `(HL+)` / `(HL-)` side
    /// effect applied. Register operands have no address.
    fn operand_addr<B: Bus>(&mut self, bus: &mut B, operand: Operand8) -> Option<u16> {
        let addr = match operand {
            Operand8::Reg(_) | Operand8::Imm => return None,
            Operand8::IndHl => self.regs.hl(),
            Operand8::IndBc => self.regs.get16(Reg16::BC),
            Operand8::IndDe => self.regs.get16(Reg16::DE),
            Operand8::IndHlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Operand8::IndHlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
            Operand8::HighImm => 0xFF00 | self.imm8(bus) as u16,
            Operand8::HighC => 0xFF00 | self.regs.get8(Reg8::C) as u16,
            Operand8::Abs => self.imm16(bus),
        };
        Some(addr)
    }

    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8) -> u8 {
        match operand {
            Operand8::Reg(reg) => self.regs.get8(reg),
            Operand8::Imm => self.imm8(bus),
            _ => match self.operand_addr(bus, operand) {
                Some(addr) => bus.read8(addr),
                None => 0xFF,
            },
        }
    }

    pub(super) fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8, value: u8) {
        match operand {
            Operand8::Reg(reg) => self.regs.set8(reg, value),
            // Never produced by the decoder as a destination.
            Operand8::Imm => {}
            _ => {
                if let Some(addr) = self.operand_addr(bus, operand) {
                    bus.write8(addr, value);
                }
            }
        }
    }

    /// Read-modify-write on a register or `(HL)`: the address is resolved
    /// once, so `(HL)` is read and written at the same location.
    pub(super) fn modify_operand<B, F>(&mut self, bus: &mut B, operand: Operand8, f: F)
    where
        B: Bus,
        F: FnOnce(&mut Self, u8) -> Option<u8>,
    {
        match operand {
            Operand8::Reg(reg) => {
                let value = self.regs.get8(reg);
                if let Some(result) = f(self, value) {
                    self.regs.set8(reg, result);
                }
            }
            _ => {
                let Some(addr) = self.operand_addr(bus, operand) else {
                    return;
                };
                let value = bus.read8(addr);
                if let Some(result) = f(self, value) {
                    bus.write8(addr, result);
                }
            }
        }
    }

    /// Push: high byte at SP-1, low byte at SP-2, so memory reads
    /// little-endian from the new SP.
    #[inline]
    pub(super) fn push16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        let sp = self.regs.sp().wrapping_sub(1);
        bus.write8(sp, hi);
        let sp = sp.wrapping_sub(1);
        bus.write8(sp, lo);
        self.regs.set_sp(sp);
    }

    #[inline]
    pub(super) fn pop16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let sp = self.regs.sp();
        let lo = bus.read8(sp);
        let hi = bus.read8(sp.wrapping_add(1));
        self.regs.set_sp(sp.wrapping_add(2));
        u16::from_le_bytes([lo, hi])
    }

    /// Place an absolute target in PC and suppress the post-step advance.
    #[inline]
    pub(super) fn jump_to(&mut self, addr: u16) {
        self.regs.set_pc(addr);
        self.pc_advance = 0;
    }

    #[inline]
    pub(super) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::Always => true,
            Cond::NotZero => !self.regs.flag(Flag::Zero),
            Cond::Zero => self.regs.flag(Flag::Zero),
            Cond::NotCarry => !self.regs.flag(Flag::Carry),
            Cond::Carry => self.regs.flag(Flag::Carry),
        }
    }
}
