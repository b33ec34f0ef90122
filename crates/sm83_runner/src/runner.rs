use std::fmt;

use anyhow::Result;
use sm83::{Cpu, Reg16, Reg8, StepEvent, StepKind, Tracer};
use typed_builder::TypedBuilder;

use crate::bus::HarnessBus;

/// Roughly 60 seconds of DMG time.
pub const DEFAULT_MAX_CYCLES: u64 = 60 * 4_194_304;

/// `LD B,B`, used by mooneye test ROMs as a software breakpoint.
const LD_B_B: u8 = 0x40;
/// B, C, D, E, H, L after a passing mooneye test.
const MOONEYE_PASS: [u8; 6] = [3, 5, 8, 13, 21, 34];
const MOONEYE_FAIL: [u8; 6] = [0x42; 6];

#[derive(Debug, Clone, TypedBuilder)]
pub struct RunConfig {
    /// Stop after this many T-cycles.
    #[builder(default = DEFAULT_MAX_CYCLES)]
    pub max_cycles: u64,
    /// Log every step at `trace` level.
    #[builder(default = false)]
    pub trace: bool,
    /// Stop as soon as the serial output ends in a "Passed"/"Failed" line.
    #[builder(default = true)]
    pub stop_on_serial: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// The cycle budget ran out before the ROM reported anything.
    Timeout,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Passed
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Timeout => "timed out",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    pub cycles: u64,
    pub steps: u64,
    pub serial: String,
}

/// Logs each step as `PC: MNEMONIC` plus registers, at `trace` level.
#[derive(Debug, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn on_step(&mut self, event: &StepEvent<'_>) {
        let regs = event.regs;
        match event.kind {
            StepKind::Instruction { pc, decoded, .. } => log::trace!(
                "{pc:04X}: {:<16} AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} cy={} t={}",
                decoded.to_string(),
                regs.get16(Reg16::AF),
                regs.get16(Reg16::BC),
                regs.get16(Reg16::DE),
                regs.hl(),
                regs.sp(),
                event.cycles,
                event.ticks,
            ),
            StepKind::Interrupt { irq, return_pc } => log::trace!(
                "---- {irq:?} interrupt, return to {return_pc:04X} t={}",
                event.ticks
            ),
            StepKind::Idle { halted, stopped } => log::trace!(
                "---- idle (halted={halted} stopped={stopped}) t={}",
                event.ticks
            ),
        }
    }
}

/// A CPU wired to a [`HarnessBus`].
pub struct Runner {
    cpu: Cpu,
    bus: HarnessBus,
}

impl Runner {
    pub fn new(rom: &[u8]) -> Self {
        Self {
            cpu: Cpu::new(),
            bus: HarnessBus::new(rom),
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &HarnessBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut HarnessBus {
        &mut self.bus
    }

    /// Step until the ROM reports a result or the budget runs out.
    ///
    /// An illegal opcode aborts the run with the underlying
    /// [`sm83::CpuError`].
    pub fn run(&mut self, config: &RunConfig) -> Result<Report> {
        let mut cycles = 0u64;
        let mut steps = 0u64;
        let mut tracer = LogTracer;

        let outcome = loop {
            if cycles >= config.max_cycles {
                break Outcome::Timeout;
            }
            if let Some(outcome) = self.breakpoint_outcome() {
                break outcome;
            }

            let spent = if config.trace {
                self.cpu.step_traced(&mut self.bus, &mut tracer)?
            } else {
                self.cpu.step(&mut self.bus)?
            };
            self.bus.sync(self.cpu.ticks());
            cycles += spent as u64;
            steps += 1;

            if config.stop_on_serial {
                if let Some(outcome) = serial_outcome(self.bus.serial_output()) {
                    break outcome;
                }
            }
        };

        log::info!("run {outcome} after {steps} steps / {cycles} cycles");
        Ok(Report {
            outcome,
            cycles,
            steps,
            serial: String::from_utf8_lossy(self.bus.serial_output()).into_owned(),
        })
    }

    /// Mooneye-style result: `LD B,B` about to execute with a known
    /// register signature.
    fn breakpoint_outcome(&self) -> Option<Outcome> {
        if self.cpu.is_halted() || self.cpu.is_stopped() {
            return None;
        }
        let regs = self.cpu.registers();
        if self.bus.peek(regs.pc()) != LD_B_B {
            return None;
        }
        let signature =
            [Reg8::B, Reg8::C, Reg8::D, Reg8::E, Reg8::H, Reg8::L].map(|reg| regs.get8(reg));
        match signature {
            MOONEYE_PASS => Some(Outcome::Passed),
            MOONEYE_FAIL => Some(Outcome::Failed),
            _ => None,
        }
    }
}

/// Blargg-style result: the last complete serial line starts with
/// "Passed" or "Failed".
pub fn serial_outcome(output: &[u8]) -> Option<Outcome> {
    if output.last() != Some(&b'\n') {
        return None;
    }
    let text = String::from_utf8_lossy(output);
    let last = text.lines().rev().find(|line| !line.trim().is_empty())?;
    let last = last.trim();
    if last.starts_with("Passed") {
        Some(Outcome::Passed)
    } else if last.starts_with("Failed") {
        Some(Outcome::Failed)
    } else {
        None
    }
}
