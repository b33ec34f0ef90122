/// Interrupt master enable, including the one-step delay of `EI`.
///
/// `EI` moves `Disabled` to `PendingEnable`. The step loop calls
/// [`ImeState::advance`] right before it executes the next instruction, so
/// the gate is open for the instruction *after* the one following `EI`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImeState {
    #[default]
    Disabled,
    PendingEnable,
    Enabled,
}

impl ImeState {
    /// Only `Enabled` lets an interrupt through; a pending request does not.
    #[inline]
    pub const fn is_enabled(self) -> bool {
        matches!(self, ImeState::Enabled)
    }

    /// `EI`. Re-executing it while already enabled changes nothing.
    #[inline]
    pub fn request_enable(&mut self) {
        if *self == ImeState::Disabled {
            *self = ImeState::PendingEnable;
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        if *self == ImeState::PendingEnable {
            *self = ImeState::Enabled;
        }
    }

    /// `DI`, interrupt dispatch. Also cancels a pending `EI`.
    #[inline]
    pub fn disable(&mut self) {
        *self = ImeState::Disabled;
    }

    /// `RETI`: no delay.
    #[inline]
    pub fn enable_now(&mut self) {
        *self = ImeState::Enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ei_takes_one_advance_to_open_the_gate() {
        let mut ime = ImeState::default();
        ime.request_enable();
        assert_eq!(ime, ImeState::PendingEnable);
        assert!(!ime.is_enabled());
        ime.advance();
        assert!(ime.is_enabled());
        ime.advance();
        assert!(ime.is_enabled());
    }

    #[test]
    fn di_cancels_pending_enable() {
        let mut ime = ImeState::default();
        ime.request_enable();
        ime.disable();
        ime.advance();
        assert_eq!(ime, ImeState::Disabled);
    }

    #[test]
    fn repeated_ei_does_not_close_an_open_gate() {
        let mut ime = ImeState::Enabled;
        ime.request_enable();
        assert_eq!(ime, ImeState::Enabled);
    }
}
