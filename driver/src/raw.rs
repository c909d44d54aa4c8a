//! Byte-at-a-time reads straight out of a UART's receive FIFO.
//!
//! Some UARTs (the ESP32's among them) expose the FIFO's data register and its
//! read pointer. Reading the data register pops a byte if there is one and
//! returns garbage otherwise; the only way to tell the difference is whether
//! the read pointer moved. This skips the driver's ring buffer entirely.

/// Direct access to a hardware receive FIFO.
pub trait RxFifo {
    /// Current position of the FIFO's read pointer.
    fn read_pointer(&self) -> u32;

    /// Read the FIFO's data register.
    fn read_register(&mut self) -> u8;
}

/// Spin on the data register until the read pointer moves, at most
/// `spin_limit + 1` times.
///
/// Availability checked beforehand is no guarantee: a byte can be counted and
/// then fail to show up, and without the limit this would spin forever.
#[inline]
pub fn pop<F: RxFifo>(fifo: &mut F, spin_limit: u32) -> Option<u8> {
    let before = fifo.read_pointer();
    for _ in 0..=spin_limit {
        let byte = fifo.read_register();
        if fifo.read_pointer() != before {
            return Some(byte);
        }
        core::hint::spin_loop();
    }
    None
}

#[cfg(test)]
mod test {
    use {super::*, quickcheck_macros::quickcheck};

    /// Delivers `byte` on the `ready_after`-th read of the data register.
    struct Slow {
        pointer: u32,
        reads: u32,
        ready_after: u32,
        byte: u8,
    }

    impl RxFifo for Slow {
        fn read_pointer(&self) -> u32 {
            self.pointer
        }

        fn read_register(&mut self) -> u8 {
            self.reads += 1;
            if self.reads >= self.ready_after {
                self.pointer = self.pointer.wrapping_add(1);
                self.byte
            } else {
                0xEE
            }
        }
    }

    #[test]
    fn waits_for_pointer() {
        let mut fifo = Slow {
            pointer: 7,
            reads: 0,
            ready_after: 5,
            byte: 0x42,
        };
        assert_eq!(pop(&mut fifo, 10), Some(0x42));
        assert_eq!(fifo.reads, 5);
    }

    #[test]
    fn gives_up() {
        let mut fifo = Slow {
            pointer: 0,
            reads: 0,
            ready_after: u32::MAX,
            byte: 0x42,
        };
        assert_eq!(pop(&mut fifo, 10), None);
        assert_eq!(fifo.reads, 11);
    }

    #[quickcheck]
    fn delivered_iff_within_limit(ready_after: u8, spin_limit: u8) -> bool {
        let ready_after = u32::from(ready_after).max(1);
        let mut fifo = Slow {
            pointer: u32::MAX,
            reads: 0,
            ready_after,
            byte: 0x42,
        };
        let popped = pop(&mut fifo, u32::from(spin_limit));
        popped.is_some() == (ready_after <= u32::from(spin_limit) + 1)
    }
}
