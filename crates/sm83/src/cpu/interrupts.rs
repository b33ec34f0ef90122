mod ime;
mod service;

pub use ime::ImeState;

/// Interrupt gate and low-power state of the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptState {
    pub ime: ImeState,
    pub halted: bool,
    pub stopped: bool,
}
