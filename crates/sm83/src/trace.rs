//! Optional per-step observation.
//!
//! The core never logs from its hot path. Hosts that want an instruction
//! trace, a coverage map or a conformance log pass a [`Tracer`] to
//! [`crate::Cpu::step_traced`] and get one [`StepEvent`] per step.
use crate::bus::Interrupt;
use crate::cpu::{Decoded, Registers};

/// What a step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// One instruction executed. `opcode` is the byte at `pc`; for CB
    /// instructions it is the byte after the prefix.
    Instruction {
        pc: u16,
        opcode: u8,
        decoded: Decoded,
    },
    /// An interrupt was dispatched; `return_pc` was pushed.
    Interrupt { irq: Interrupt, return_pc: u16 },
    /// HALT or STOP idle.
    Idle { halted: bool, stopped: bool },
}

/// Everything a tracer gets to see, after the step has completed.
#[derive(Clone, Copy, Debug)]
pub struct StepEvent<'a> {
    pub kind: StepKind,
    /// Cycles charged by this step.
    pub cycles: u32,
    /// Tick counter after this step.
    pub ticks: u16,
    pub regs: &'a Registers,
}

pub trait Tracer {
    fn on_step(&mut self, event: &StepEvent<'_>);
}

/// Tracer that ignores everything; used by [`crate::Cpu::step`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl Tracer for NoTrace {
    #[inline(always)]
    fn on_step(&mut self, _event: &StepEvent<'_>) {}
}
