use crate::bus::Bus;

use super::{CbInstr, Cpu};

impl Cpu {
    /// Run one CB-prefixed instruction.
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B, instr: CbInstr) {
        match instr {
            CbInstr::Shift(op, target) => {
                self.modify_operand(bus, target, |cpu, value| Some(cpu.alu_shift(op, value)));
            }
            CbInstr::Bit(bit, target) => {
                // Read-only: `(HL)` is not written back.
                self.modify_operand(bus, target, |cpu, value| {
                    cpu.alu_bit(bit, value);
                    None
                });
            }
            CbInstr::Res(bit, target) => {
                self.modify_operand(bus, target, |_, value| Some(value & !(1 << bit)));
            }
            CbInstr::Set(bit, target) => {
                self.modify_operand(bus, target, |_, value| Some(value | (1 << bit)));
            }
        }
    }
}
