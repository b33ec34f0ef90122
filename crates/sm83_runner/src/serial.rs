/// Serial port reduced to what test ROMs use: a byte written to SB is
/// "sent" the moment SC requests an internally clocked transfer.
#[derive(Debug, Default)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    /// Returns true when a transfer completed and the serial interrupt
    /// should be requested.
    pub(crate) fn write_sc(&mut self, value: u8) -> bool {
        self.sc = value;
        // Start bit and internal clock.
        if self.sc & 0x81 == 0x81 {
            self.output.push(self.sb);
            self.sc &= !0x80;
            return true;
        }
        false
    }

    /// Unused SC bits read back as 1.
    pub(crate) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_captures_sb_and_clears_start_bit() {
        let mut serial = Serial::default();
        serial.write_sb(b'P');
        assert!(serial.write_sc(0x81));
        assert_eq!(serial.output, b"P");
        assert_eq!(serial.read_sc(), 0x7F);
    }

    #[test]
    fn external_clock_does_not_transfer() {
        let mut serial = Serial::default();
        serial.write_sb(b'x');
        assert!(!serial.write_sc(0x80));
        assert!(serial.output.is_empty());
        assert_eq!(serial.read_sc(), 0xFE);
    }
}
