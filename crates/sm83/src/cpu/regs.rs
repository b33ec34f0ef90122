/// 16-bit register pairs plus SP and PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

/// 8-bit views onto the AF/BC/DE/HL pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// Where each 8-bit register lives: owning pair and bit shift within it.
///
/// Indexed by `Reg8 as usize`.
const REG8_LOCATION: [(Reg16, u32); 8] = [
    (Reg16::AF, 8), // A
    (Reg16::AF, 0), // F
    (Reg16::BC, 8), // B
    (Reg16::BC, 0), // C
    (Reg16::DE, 8), // D
    (Reg16::DE, 0), // E
    (Reg16::HL, 8), // H
    (Reg16::HL, 0), // L
];

impl Reg8 {
    #[inline]
    pub const fn location(self) -> (Reg16, u32) {
        REG8_LOCATION[self as usize]
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    Zero = 7,
    Subtraction = 6,
    HalfCarry = 5,
    Carry = 4,
}

impl Flag {
    #[inline]
    const fn mask(self) -> u16 {
        1 << (self as u16)
    }
}

/// Only the upper nibble of F exists in hardware.
const F_MASK: u16 = 0xFFF0;

/// SM83 register file.
///
/// Stored as six 16-bit words; the 8-bit registers are derived views that
/// never disturb the other half of their pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    sp: u16,
    pc: u16,
}

impl Registers {
    /// Register values left behind by the DMG boot ROM when it hands
    /// control to the cartridge at 0x0100 (Pan Docs, "Power Up Sequence").
    pub const fn post_boot() -> Self {
        Self {
            af: 0x01B0,
            bc: 0x0013,
            de: 0x00D8,
            hl: 0x014D,
            sp: 0xFFFE,
            pc: 0x0100,
        }
    }

    #[inline]
    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af,
            Reg16::BC => self.bc,
            Reg16::DE => self.de,
            Reg16::HL => self.hl,
            Reg16::SP => self.sp,
            Reg16::PC => self.pc,
        }
    }

    #[inline]
    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            // Lower 4 bits of F are always zero.
            Reg16::AF => self.af = value & F_MASK,
            Reg16::BC => self.bc = value,
            Reg16::DE => self.de = value,
            Reg16::HL => self.hl = value,
            Reg16::SP => self.sp = value,
            Reg16::PC => self.pc = value,
        }
    }

    #[inline]
    pub fn get8(&self, reg: Reg8) -> u8 {
        let (pair, shift) = reg.location();
        (self.get16(pair) >> shift) as u8
    }

    #[inline]
    pub fn set8(&mut self, reg: Reg8, value: u8) {
        let (pair, shift) = reg.location();
        let keep = self.get16(pair) & !(0x00FF << shift);
        self.set16(pair, keep | ((value as u16) << shift));
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.af & flag.mask() != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.af |= flag.mask();
        } else {
            self.af &= !flag.mask();
        }
    }

    /// Overwrite all four flags at once.
    #[inline]
    pub fn set_flags(&mut self, zero: bool, subtraction: bool, half_carry: bool, carry: bool) {
        self.set_flag(Flag::Zero, zero);
        self.set_flag(Flag::Subtraction, subtraction);
        self.set_flag(Flag::HalfCarry, half_carry);
        self.set_flag(Flag::Carry, carry);
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.get8(Reg8::A)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.set8(Reg8::A, value);
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.get8(Reg8::F)
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl = value;
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.sp
    }

    #[inline]
    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
}
