use std::fmt;

mod alu;
mod cb;
pub mod cycles;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod table;

pub use interrupts::{ImeState, InterruptState};
pub use regs::{Flag, Reg16, Reg8, Registers};
pub use table::{
    decode, decode_cb, AluOp, CbEntry, CbInstr, Cond, Decoded, Instr, OpcodeEntry, Operand8,
    ShiftOp, CB_TABLE, PRIMARY_TABLE,
};

/// Fatal conditions raised by [`Cpu::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuError {
    /// The CPU fetched one of the opcode holes (D3, DB, DD, E3, E4, EB,
    /// EC, ED, F4, FC, FD). Real hardware hangs until power-off; the core
    /// refuses to execute anything further until [`Cpu::reset`].
    IllegalOpcode { opcode: u8, pc: u16 },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::IllegalOpcode { opcode, pc } => {
                write!(f, "illegal opcode 0x{opcode:02X} at 0x{pc:04X}")
            }
        }
    }
}

impl std::error::Error for CpuError {}

/// Sharp SM83 CPU core.
///
/// Owns the register file, the interrupt state and the wrapping tick
/// counter. Everything else lives behind the [`crate::Bus`] passed to
/// [`Cpu::step`].
#[derive(Clone, Debug)]
pub struct Cpu {
    regs: Registers,
    interrupts: InterruptState,
    /// Cumulative T-cycles, wrapping at 65536.
    ticks: u16,
    /// Bytes consumed by the instruction in flight (opcode + immediates).
    /// Control flow that writes PC directly forces this to 0.
    pc_advance: u8,
    /// Cycles added by a taken conditional branch in the current step.
    extra_cycles: u8,
    /// Set once an opcode hole has been executed.
    locked: Option<CpuError>,
}

impl Cpu {
    #[inline]
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    #[inline]
    pub fn interrupt_state(&self) -> InterruptState {
        self.interrupts
    }

    /// Wrapping T-cycle counter. Compare readings with
    /// [`crate::clock::elapsed`], never directly.
    #[inline]
    pub fn ticks(&self) -> u16 {
        self.ticks
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.interrupts.ime.is_enabled()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.interrupts.halted
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.interrupts.stopped
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }
}
