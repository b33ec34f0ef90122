//! Sharp SM83 CPU core.
//!
//! The core fetches, decodes and executes the full SM83 instruction set
//! against a caller-supplied [`Bus`], services the five maskable interrupts
//! and keeps a wrapping 16-bit T-cycle counter that peripherals synchronise
//! against through [`clock::TickObserver`].
pub mod bus;
pub mod clock;
pub mod cpu;
pub mod trace;

pub use bus::{Bus, Interrupt, Interrupts, INTERRUPT_ENABLE_ADDR, INTERRUPT_FLAG_ADDR};
pub use clock::TickObserver;
pub use cpu::{
    AluOp, CbInstr, Cond, Cpu, CpuError, Decoded, Flag, ImeState, Instr, InterruptState, Operand8,
    Reg16, Reg8, Registers, ShiftOp,
};
pub use trace::{NoTrace, StepEvent, StepKind, Tracer};
