use crate::bus::Bus;

use super::cycles::{CALL_RET_TAKEN_EXTRA, JUMP_TAKEN_EXTRA};
use super::{Cond, Cpu, Flag, Instr};

impl Cpu {
    /// Run one primary-table instruction. `Prefix` and `Illegal` are
    /// handled by the step loop and never reach this point.
    pub(super) fn exec_instr<B: Bus>(&mut self, bus: &mut B, instr: Instr) {
        match instr {
            Instr::Nop | Instr::Prefix | Instr::Illegal => {}
            Instr::Stop => {
                // The byte after 0x10 is padding and is skipped.
                self.imm8(bus);
                self.interrupts.stopped = true;
                log::debug!("SM83 STOP at 0x{:04X}", self.regs.pc());
            }
            Instr::Halt => {
                self.interrupts.halted = true;
                log::debug!("SM83 HALT at 0x{:04X}", self.regs.pc());
            }
            Instr::Di => self.interrupts.ime.disable(),
            Instr::Ei => self.interrupts.ime.request_enable(),
            Instr::Daa => self.alu_daa(),
            Instr::Cpl => {
                let a = self.regs.a();
                self.regs.set_a(!a);
                self.regs.set_flag(Flag::Subtraction, true);
                self.regs.set_flag(Flag::HalfCarry, true);
            }
            Instr::Scf => {
                self.regs.set_flag(Flag::Subtraction, false);
                self.regs.set_flag(Flag::HalfCarry, false);
                self.regs.set_flag(Flag::Carry, true);
            }
            Instr::Ccf => {
                let carry = self.regs.flag(Flag::Carry);
                self.regs.set_flag(Flag::Subtraction, false);
                self.regs.set_flag(Flag::HalfCarry, false);
                self.regs.set_flag(Flag::Carry, !carry);
            }

            Instr::Ld(dst, src) => {
                let value = self.read_operand(bus, src);
                self.write_operand(bus, dst, value);
            }
            Instr::LdImm16(reg) => {
                let value = self.imm16(bus);
                self.regs.set16(reg, value);
            }
            Instr::LdAbsSp => {
                let addr = self.imm16(bus);
                let [lo, hi] = self.regs.sp().to_le_bytes();
                bus.write8(addr, lo);
                bus.write8(addr.wrapping_add(1), hi);
            }
            Instr::LdSpHl => {
                let hl = self.regs.hl();
                self.regs.set_sp(hl);
            }
            Instr::LdHlSpOffset => {
                let offset = self.imm8(bus);
                let sp = self.regs.sp();
                let value = self.alu_add16_signed(sp, offset);
                self.regs.set_hl(value);
            }
            Instr::AddSpOffset => {
                let offset = self.imm8(bus);
                let sp = self.regs.sp();
                let value = self.alu_add16_signed(sp, offset);
                self.regs.set_sp(value);
            }
            Instr::Push(reg) => {
                let value = self.regs.get16(reg);
                self.push16(bus, value);
            }
            Instr::Pop(reg) => {
                // `set16` drops the low nibble of F for POP AF.
                let value = self.pop16(bus);
                self.regs.set16(reg, value);
            }

            Instr::Alu(op, src) => {
                let value = self.read_operand(bus, src);
                self.alu(op, value);
            }
            Instr::Inc(target) => {
                self.modify_operand(bus, target, |cpu, value| Some(cpu.alu_inc8(value)));
            }
            Instr::Dec(target) => {
                self.modify_operand(bus, target, |cpu, value| Some(cpu.alu_dec8(value)));
            }
            Instr::Inc16(reg) => {
                let value = self.regs.get16(reg).wrapping_add(1);
                self.regs.set16(reg, value);
            }
            Instr::Dec16(reg) => {
                let value = self.regs.get16(reg).wrapping_sub(1);
                self.regs.set16(reg, value);
            }
            Instr::AddHl(reg) => {
                let value = self.regs.get16(reg);
                self.alu_add16_hl(value);
            }
            Instr::RotateA(op) => self.alu_rotate_a(op),

            Instr::Jr(cond) => {
                let offset = self.imm8(bus) as i8;
                if self.condition(cond) {
                    // Relative to the address after the operand.
                    let next = self.regs.pc().wrapping_add(self.pc_advance as u16);
                    self.jump_to(next.wrapping_add(offset as i16 as u16));
                    self.taken(cond, JUMP_TAKEN_EXTRA);
                }
            }
            Instr::Jp(cond) => {
                let target = self.imm16(bus);
                if self.condition(cond) {
                    self.jump_to(target);
                    self.taken(cond, JUMP_TAKEN_EXTRA);
                }
            }
            Instr::JpHl => {
                let hl = self.regs.hl();
                self.jump_to(hl);
            }
            Instr::Call(cond) => {
                let target = self.imm16(bus);
                if self.condition(cond) {
                    let ret = self.regs.pc().wrapping_add(self.pc_advance as u16);
                    self.push16(bus, ret);
                    self.jump_to(target);
                    self.taken(cond, CALL_RET_TAKEN_EXTRA);
                }
            }
            Instr::Ret(cond) => {
                if self.condition(cond) {
                    let target = self.pop16(bus);
                    self.jump_to(target);
                    self.taken(cond, CALL_RET_TAKEN_EXTRA);
                }
            }
            Instr::Reti => {
                let target = self.pop16(bus);
                self.jump_to(target);
                self.interrupts.ime.enable_now();
            }
            Instr::Rst(vector) => {
                let ret = self.regs.pc().wrapping_add(1);
                self.push16(bus, ret);
                self.jump_to(vector as u16);
            }
        }
    }

    /// Charge the taken-branch bonus. Unconditional forms already carry
    /// their full cost in the table.
    #[inline]
    fn taken(&mut self, cond: Cond, extra: u8) {
        if cond != Cond::Always {
            self.extra_cycles = extra;
        }
    }
}

