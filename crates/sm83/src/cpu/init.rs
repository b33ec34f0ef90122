use super::{Cpu, InterruptState, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Create a CPU in the state the DMG boot ROM leaves behind.
    ///
    /// Per Pan Docs, IME is clear when control is handed to the cartridge
    /// at 0x0100; the game enables interrupts itself via EI/RETI.
    pub fn new() -> Self {
        Self {
            regs: Registers::post_boot(),
            interrupts: InterruptState::default(),
            ticks: 0,
            pc_advance: 0,
            extra_cycles: 0,
            locked: None,
        }
    }

    /// Return to the post-boot state. Also clears a lock-up caused by an
    /// illegal opcode and rewinds the tick counter to 0.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
