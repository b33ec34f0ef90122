//! Decoded opcode tables.
//!
//! Both opcode spaces are decoded once, at compile time, from the usual
//! `x/y/z/p/q` bit fields into small instruction descriptors. `exec.rs` and
//! `cb.rs` resolve a descriptor with a single `match`, so there is exactly
//! one implementation per instruction *shape* rather than per opcode.
use std::fmt;

use super::cycles;
use super::regs::{Reg16, Reg8};

/// An 8-bit operand location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand8 {
    Reg(Reg8),
    /// `(HL)`
    IndHl,
    /// `(BC)`
    IndBc,
    /// `(DE)`
    IndDe,
    /// `(HL+)`: HL is incremented after the access.
    IndHlInc,
    /// `(HL-)`: HL is decremented after the access.
    IndHlDec,
    /// `n8`
    Imm,
    /// `($FF00+n8)`
    HighImm,
    /// `($FF00+C)`
    HighC,
    /// `(n16)`
    Abs,
}

/// Branch condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cond {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

/// Accumulator ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// Rotate/shift operation (CB group 0, and the accumulator short forms).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

/// Primary opcode space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    Daa,
    Cpl,
    Scf,
    Ccf,
    /// `LD dst,src`
    Ld(Operand8, Operand8),
    /// `LD rr,n16`
    LdImm16(Reg16),
    /// `LD (n16),SP`
    LdAbsSp,
    /// `LD SP,HL`
    LdSpHl,
    /// `LD HL,SP+e8`
    LdHlSpOffset,
    /// `ADD SP,e8`
    AddSpOffset,
    Push(Reg16),
    Pop(Reg16),
    Alu(AluOp, Operand8),
    Inc(Operand8),
    Dec(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    /// `RLCA`, `RRCA`, `RLA`, `RRA`
    RotateA(ShiftOp),
    Jr(Cond),
    Jp(Cond),
    JpHl,
    Call(Cond),
    Ret(Cond),
    Reti,
    Rst(u8),
    /// `0xCB`: the next byte selects from [`CB_TABLE`].
    Prefix,
    /// One of the 11 opcode holes that hard-lock the CPU.
    Illegal,
}

/// CB-prefixed opcode space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CbInstr {
    Shift(ShiftOp, Operand8),
    Bit(u8, Operand8),
    Res(u8, Operand8),
    Set(u8, Operand8),
}

/// Either half of the instruction set, as reported to tracers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decoded {
    Primary(Instr),
    Prefixed(CbInstr),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub instr: Instr,
    pub cycles: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbEntry {
    pub instr: CbInstr,
    pub cycles: u8,
}

pub static PRIMARY_TABLE: [OpcodeEntry; 256] = build_primary();
pub static CB_TABLE: [CbEntry; 256] = build_cb();

const fn build_primary() -> [OpcodeEntry; 256] {
    let mut table = [OpcodeEntry {
        instr: Instr::Illegal,
        cycles: 0,
    }; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = OpcodeEntry {
            instr: decode(op as u8),
            cycles: cycles::PRIMARY[op],
        };
        op += 1;
    }
    table
}

const fn build_cb() -> [CbEntry; 256] {
    let mut table = [CbEntry {
        instr: CbInstr::Bit(0, Operand8::IndHl),
        cycles: 0,
    }; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = CbEntry {
            instr: decode_cb(op as u8),
            cycles: cycles::CB[op],
        };
        op += 1;
    }
    table
}

/// Register encoding shared by both opcode spaces:
/// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
const fn r8(index: u8) -> Operand8 {
    match index & 0x07 {
        0 => Operand8::Reg(Reg8::B),
        1 => Operand8::Reg(Reg8::C),
        2 => Operand8::Reg(Reg8::D),
        3 => Operand8::Reg(Reg8::E),
        4 => Operand8::Reg(Reg8::H),
        5 => Operand8::Reg(Reg8::L),
        6 => Operand8::IndHl,
        _ => Operand8::Reg(Reg8::A),
    }
}

/// 16-bit pair used by loads and arithmetic: BC, DE, HL, SP.
const fn rp(p: u8) -> Reg16 {
    match p & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

/// 16-bit pair used by PUSH/POP: BC, DE, HL, AF.
const fn rp2(p: u8) -> Reg16 {
    match p & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::AF,
    }
}

const fn cc(index: u8) -> Cond {
    match index & 0x03 {
        0 => Cond::NotZero,
        1 => Cond::Zero,
        2 => Cond::NotCarry,
        _ => Cond::Carry,
    }
}

const fn alu(y: u8) -> AluOp {
    match y & 0x07 {
        0 => AluOp::Add,
        1 => AluOp::Adc,
        2 => AluOp::Sub,
        3 => AluOp::Sbc,
        4 => AluOp::And,
        5 => AluOp::Xor,
        6 => AluOp::Or,
        _ => AluOp::Cp,
    }
}

const fn shift(y: u8) -> ShiftOp {
    match y & 0x07 {
        0 => ShiftOp::Rlc,
        1 => ShiftOp::Rrc,
        2 => ShiftOp::Rl,
        3 => ShiftOp::Rr,
        4 => ShiftOp::Sla,
        5 => ShiftOp::Sra,
        6 => ShiftOp::Swap,
        _ => ShiftOp::Srl,
    }
}

const A: Operand8 = Operand8::Reg(Reg8::A);

/// Decode a primary opcode.
pub const fn decode(op: u8) -> Instr {
    let x = op >> 6;
    let y = (op >> 3) & 0x07;
    let z = op & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match x {
        0 => match z {
            0 => match y {
                0 => Instr::Nop,
                1 => Instr::LdAbsSp,
                2 => Instr::Stop,
                3 => Instr::Jr(Cond::Always),
                _ => Instr::Jr(cc(y - 4)),
            },
            1 => {
                if q == 0 {
                    Instr::LdImm16(rp(p))
                } else {
                    Instr::AddHl(rp(p))
                }
            }
            2 => {
                let mem = match p {
                    0 => Operand8::IndBc,
                    1 => Operand8::IndDe,
                    2 => Operand8::IndHlInc,
                    _ => Operand8::IndHlDec,
                };
                if q == 0 {
                    Instr::Ld(mem, A)
                } else {
                    Instr::Ld(A, mem)
                }
            }
            3 => {
                if q == 0 {
                    Instr::Inc16(rp(p))
                } else {
                    Instr::Dec16(rp(p))
                }
            }
            4 => Instr::Inc(r8(y)),
            5 => Instr::Dec(r8(y)),
            6 => Instr::Ld(r8(y), Operand8::Imm),
            _ => match y {
                0 => Instr::RotateA(ShiftOp::Rlc),
                1 => Instr::RotateA(ShiftOp::Rrc),
                2 => Instr::RotateA(ShiftOp::Rl),
                3 => Instr::RotateA(ShiftOp::Rr),
                4 => Instr::Daa,
                5 => Instr::Cpl,
                6 => Instr::Scf,
                _ => Instr::Ccf,
            },
        },
        1 => {
            if op == 0x76 {
                Instr::Halt
            } else {
                Instr::Ld(r8(y), r8(z))
            }
        }
        2 => Instr::Alu(alu(y), r8(z)),
        _ => match z {
            0 => match y {
                0..=3 => Instr::Ret(cc(y)),
                4 => Instr::Ld(Operand8::HighImm, A),
                5 => Instr::AddSpOffset,
                6 => Instr::Ld(A, Operand8::HighImm),
                _ => Instr::LdHlSpOffset,
            },
            1 => {
                if q == 0 {
                    Instr::Pop(rp2(p))
                } else {
                    match p {
                        0 => Instr::Ret(Cond::Always),
                        1 => Instr::Reti,
                        2 => Instr::JpHl,
                        _ => Instr::LdSpHl,
                    }
                }
            }
            2 => match y {
                0..=3 => Instr::Jp(cc(y)),
                4 => Instr::Ld(Operand8::HighC, A),
                5 => Instr::Ld(Operand8::Abs, A),
                6 => Instr::Ld(A, Operand8::HighC),
                _ => Instr::Ld(A, Operand8::Abs),
            },
            3 => match y {
                0 => Instr::Jp(Cond::Always),
                1 => Instr::Prefix,
                6 => Instr::Di,
                7 => Instr::Ei,
                _ => Instr::Illegal,
            },
            4 => match y {
                0..=3 => Instr::Call(cc(y)),
                _ => Instr::Illegal,
            },
            5 => {
                if q == 0 {
                    Instr::Push(rp2(p))
                } else if p == 0 {
                    Instr::Call(Cond::Always)
                } else {
                    Instr::Illegal
                }
            }
            6 => Instr::Alu(alu(y), Operand8::Imm),
            _ => Instr::Rst(y * 8),
        },
    }
}

/// Decode the byte following a `0xCB` prefix.
pub const fn decode_cb(op: u8) -> CbInstr {
    let y = (op >> 3) & 0x07;
    let target = r8(op);
    match op >> 6 {
        0 => CbInstr::Shift(shift(y), target),
        1 => CbInstr::Bit(y, target),
        2 => CbInstr::Res(y, target),
        _ => CbInstr::Set(y, target),
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand8::Reg(reg) => write!(f, "{reg:?}"),
            Operand8::IndHl => f.write_str("(HL)"),
            Operand8::IndBc => f.write_str("(BC)"),
            Operand8::IndDe => f.write_str("(DE)"),
            Operand8::IndHlInc => f.write_str("(HL+)"),
            Operand8::IndHlDec => f.write_str("(HL-)"),
            Operand8::Imm => f.write_str("n8"),
            Operand8::HighImm => f.write_str("($FF00+n8)"),
            Operand8::HighC => f.write_str("($FF00+C)"),
            Operand8::Abs => f.write_str("(n16)"),
        }
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cond::Always => "",
            Cond::NotZero => "NZ",
            Cond::Zero => "Z",
            Cond::NotCarry => "NC",
            Cond::Carry => "C",
        })
    }
}

impl AluOp {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbc => "SBC",
            AluOp::And => "AND",
            AluOp::Xor => "XOR",
            AluOp::Or => "OR",
            AluOp::Cp => "CP",
        }
    }
}

impl ShiftOp {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        }
    }
}

/// `JP NZ,n16` vs `JP n16`.
fn branch(f: &mut fmt::Formatter<'_>, name: &str, cond: Cond, target: &str) -> fmt::Result {
    match cond {
        Cond::Always if target.is_empty() => f.write_str(name),
        Cond::Always => write!(f, "{name} {target}"),
        _ if target.is_empty() => write!(f, "{name} {cond}"),
        _ => write!(f, "{name} {cond},{target}"),
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instr::Nop => f.write_str("NOP"),
            Instr::Stop => f.write_str("STOP"),
            Instr::Halt => f.write_str("HALT"),
            Instr::Di => f.write_str("DI"),
            Instr::Ei => f.write_str("EI"),
            Instr::Daa => f.write_str("DAA"),
            Instr::Cpl => f.write_str("CPL"),
            Instr::Scf => f.write_str("SCF"),
            Instr::Ccf => f.write_str("CCF"),
            Instr::Ld(dst, src) => write!(f, "LD {dst},{src}"),
            Instr::LdImm16(reg) => write!(f, "LD {reg:?},n16"),
            Instr::LdAbsSp => f.write_str("LD (n16),SP"),
            Instr::LdSpHl => f.write_str("LD SP,HL"),
            Instr::LdHlSpOffset => f.write_str("LD HL,SP+e8"),
            Instr::AddSpOffset => f.write_str("ADD SP,e8"),
            Instr::Push(reg) => write!(f, "PUSH {reg:?}"),
            Instr::Pop(reg) => write!(f, "POP {reg:?}"),
            Instr::Alu(op, src) => write!(f, "{} A,{src}", op.mnemonic()),
            Instr::Inc(target) => write!(f, "INC {target}"),
            Instr::Dec(target) => write!(f, "DEC {target}"),
            Instr::Inc16(reg) => write!(f, "INC {reg:?}"),
            Instr::Dec16(reg) => write!(f, "DEC {reg:?}"),
            Instr::AddHl(reg) => write!(f, "ADD HL,{reg:?}"),
            Instr::RotateA(op) => write!(f, "{}A", op.mnemonic()),
            Instr::Jr(cond) => branch(f, "JR", cond, "e8"),
            Instr::Jp(cond) => branch(f, "JP", cond, "n16"),
            Instr::JpHl => f.write_str("JP HL"),
            Instr::Call(cond) => branch(f, "CALL", cond, "n16"),
            Instr::Ret(cond) => branch(f, "RET", cond, ""),
            Instr::Reti => f.write_str("RETI"),
            Instr::Rst(vector) => write!(f, "RST ${vector:02X}"),
            Instr::Prefix => f.write_str("PREFIX CB"),
            Instr::Illegal => f.write_str("ILLEGAL"),
        }
    }
}

impl fmt::Display for CbInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CbInstr::Shift(op, target) => write!(f, "{} {target}", op.mnemonic()),
            CbInstr::Bit(bit, target) => write!(f, "BIT {bit},{target}"),
            CbInstr::Res(bit, target) => write!(f, "RES {bit},{target}"),
            CbInstr::Set(bit, target) => write!(f, "SET {bit},{target}"),
        }
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Primary(instr) => fmt::Display::fmt(instr, f),
            Decoded::Prefixed(instr) => fmt::Display::fmt(instr, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_eleven_opcode_holes() {
        let holes: Vec<u8> = (0..=255u8)
            .filter(|&op| PRIMARY_TABLE[op as usize].instr == Instr::Illegal)
            .collect();
        assert_eq!(
            holes,
            vec![0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD]
        );
    }

    #[test]
    fn legal_opcodes_have_published_cost_range() {
        for (op, entry) in PRIMARY_TABLE.iter().enumerate() {
            if entry.instr == Instr::Illegal {
                assert_eq!(entry.cycles, 0, "hole {op:#04x}");
            } else {
                assert!((4..=24).contains(&entry.cycles), "{op:#04x}");
            }
        }
        for (op, entry) in CB_TABLE.iter().enumerate() {
            assert!((8..=16).contains(&entry.cycles), "CB {op:#04x}");
        }
    }

    #[test]
    fn spot_check_primary_decode() {
        assert_eq!(decode(0x00), Instr::Nop);
        assert_eq!(decode(0x08), Instr::LdAbsSp);
        assert_eq!(decode(0x18), Instr::Jr(Cond::Always));
        assert_eq!(decode(0x38), Instr::Jr(Cond::Carry));
        assert_eq!(decode(0x22), Instr::Ld(Operand8::IndHlInc, A));
        assert_eq!(decode(0x3A), Instr::Ld(A, Operand8::IndHlDec));
        assert_eq!(decode(0x36), Instr::Ld(Operand8::IndHl, Operand8::Imm));
        assert_eq!(decode(0x76), Instr::Halt);
        assert_eq!(
            decode(0x41),
            Instr::Ld(Operand8::Reg(Reg8::B), Operand8::Reg(Reg8::C))
        );
        assert_eq!(decode(0x9E), Instr::Alu(AluOp::Sbc, Operand8::IndHl));
        assert_eq!(decode(0xE0), Instr::Ld(Operand8::HighImm, A));
        assert_eq!(decode(0xF2), Instr::Ld(A, Operand8::HighC));
        assert_eq!(decode(0xEA), Instr::Ld(Operand8::Abs, A));
        assert_eq!(decode(0xF1), Instr::Pop(Reg16::AF));
        assert_eq!(decode(0xD9), Instr::Reti);
        assert_eq!(decode(0xE9), Instr::JpHl);
        assert_eq!(decode(0xCB), Instr::Prefix);
        assert_eq!(decode(0xCD), Instr::Call(Cond::Always));
        assert_eq!(decode(0xFF), Instr::Rst(0x38));
        assert_eq!(decode(0xF8), Instr::LdHlSpOffset);
    }

    #[test]
    fn spot_check_cb_decode() {
        assert_eq!(
            decode_cb(0x00),
            CbInstr::Shift(ShiftOp::Rlc, Operand8::Reg(Reg8::B))
        );
        assert_eq!(decode_cb(0x36), CbInstr::Shift(ShiftOp::Swap, Operand8::IndHl));
        assert_eq!(decode_cb(0x7C), CbInstr::Bit(7, Operand8::Reg(Reg8::H)));
        assert_eq!(decode_cb(0x86), CbInstr::Res(0, Operand8::IndHl));
        assert_eq!(decode_cb(0xFF), CbInstr::Set(7, A));
    }

    #[test]
    fn mnemonics_read_like_assembler() {
        assert_eq!(decode(0x2A).to_string(), "LD A,(HL+)");
        assert_eq!(decode(0x20).to_string(), "JR NZ,e8");
        assert_eq!(decode(0xC9).to_string(), "RET");
        assert_eq!(decode(0xD8).to_string(), "RET C");
        assert_eq!(decode(0xCD).to_string(), "CALL n16");
        assert_eq!(decode(0x17).to_string(), "RLA");
        assert_eq!(decode(0xEF).to_string(), "RST $28");
        assert_eq!(decode(0xFE).to_string(), "CP A,n8");
        assert_eq!(decode_cb(0x7C).to_string(), "BIT 7,H");
        assert_eq!(decode_cb(0x3E).to_string(), "SRL (HL)");
    }
}
