//! Headless harness for running CPU conformance ROMs on the `sm83` core.
//!
//! Test ROMs report their result either over the serial port (blargg) or
//! by executing `LD B,B` with a Fibonacci register signature (mooneye).
//! [`Runner`] watches for both.
mod bus;
mod runner;
mod serial;
mod timer;

pub use bus::{HarnessBus, ROM_SIZE};
pub use runner::{
    serial_outcome, LogTracer, Outcome, Report, RunConfig, Runner, DEFAULT_MAX_CYCLES,
};

#[cfg(test)]
mod tests;
