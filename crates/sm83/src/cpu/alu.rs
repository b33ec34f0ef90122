use super::{AluOp, Cpu, Flag, ShiftOp};

impl Cpu {
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => {
                let result = self.alu_sub(value, false);
                self.regs.set_a(result);
            }
            AluOp::Sbc => {
                let result = self.alu_sub(value, true);
                self.regs.set_a(result);
            }
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => {
                self.alu_sub(value, false);
            }
        }
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry_in = (use_carry && self.regs.flag(Flag::Carry)) as u8;

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.set_a(result);
        self.regs.set_flags(result == 0, false, half > 0x0F, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC/CP operation: computes `A - value - carry` and
    /// sets flags, returning the result without storing it.
    ///
    /// Borrows are detected by comparing the subtrahend (plus carry-in)
    /// against the minuend, so `SBC A,$FF` with carry set borrows as it
    /// should even though `$FF + 1` overflows a byte.
    fn alu_sub(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a();
        let carry_in = (use_carry && self.regs.flag(Flag::Carry)) as u8;

        let result = a.wrapping_sub(value).wrapping_sub(carry_in);
        let half = (a & 0x0F) < (value & 0x0F) + carry_in;
        let borrow = (a as u16) < value as u16 + carry_in as u16;

        self.regs.set_flags(result == 0, true, half, borrow);
        result
    }

    #[inline]
    fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);
        self.regs.set_flags(result == 0, false, true, false);
    }

    #[inline]
    fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);
        self.regs.set_flags(result == 0, false, false, false);
    }

    #[inline]
    fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);
        self.regs.set_flags(result == 0, false, false, false);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Uses C, H, N and A to pick a correction value. Updates A, Z, H, C;
    /// leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a();
        let mut adjust: u8 = if self.regs.flag(Flag::Carry) { 0x60 } else { 0x00 };
        if self.regs.flag(Flag::HalfCarry) {
            adjust |= 0x06;
        }

        if !self.regs.flag(Flag::Subtraction) {
            // After an addition.
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            // After a subtraction.
            a = a.wrapping_sub(adjust);
        }

        self.regs.set_flag(Flag::Carry, adjust >= 0x60);
        self.regs.set_flag(Flag::HalfCarry, false);
        self.regs.set_flag(Flag::Zero, a == 0);
        self.regs.set_a(a);
    }

    /// INC r / INC (HL). C is unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.set_flag(Flag::Zero, result == 0);
        self.regs.set_flag(Flag::Subtraction, false);
        self.regs.set_flag(Flag::HalfCarry, value & 0x0F == 0x0F);
        result
    }

    /// DEC r / DEC (HL). C is unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.set_flag(Flag::Zero, result == 0);
        self.regs.set_flag(Flag::Subtraction, true);
        self.regs.set_flag(Flag::HalfCarry, value & 0x0F == 0);
        result
    }

    /// `ADD HL,rr`: Z is unaffected, H and C come from bits 11 and 15.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let result = hl.wrapping_add(value);

        self.regs.set_flag(Flag::Subtraction, false);
        self.regs
            .set_flag(Flag::HalfCarry, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.regs.set_flag(Flag::Carry, hl as u32 + value as u32 > 0xFFFF);

        self.regs.set_hl(result);
    }

    /// `ADD SP,e8` / `LD HL,SP+e8`.
    ///
    /// Z and N are cleared; H and C are the unsigned carries out of bits 3
    /// and 7 of the low byte, whatever the sign of the offset.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.regs.set_flags(
            false,
            false,
            (base & 0x000F) + (offset & 0x000F) > 0x000F,
            (base & 0x00FF) + (offset & 0x00FF) > 0x00FF,
        );
        base.wrapping_add(offset)
    }

    /// Rotate/shift as used by the CB register forms: Z from the result,
    /// C from the bit shifted out, N and H cleared.
    pub(super) fn alu_shift(&mut self, op: ShiftOp, value: u8) -> u8 {
        let carry_in = self.regs.flag(Flag::Carry) as u8;
        let (result, carry) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry_in, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        self.regs.set_flags(result == 0, false, false, carry);
        result
    }

    /// `RLCA`, `RRCA`, `RLA`, `RRA`: like the CB forms but Z is forced off.
    pub(super) fn alu_rotate_a(&mut self, op: ShiftOp) {
        let a = self.regs.a();
        let result = self.alu_shift(op, a);
        self.regs.set_a(result);
        self.regs.set_flag(Flag::Zero, false);
    }

    /// `BIT n,r`: Z is the inverse of the tested bit, C untouched.
    #[inline]
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.regs.set_flag(Flag::Zero, value & (1 << bit) == 0);
        self.regs.set_flag(Flag::Subtraction, false);
        self.regs.set_flag(Flag::HalfCarry, true);
    }
}
