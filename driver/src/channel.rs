use core::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Frame parameters the bus needs for the length of one transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    /// How long the receiver waits after the last byte before handing a block up.
    pub rx_linger_us: u32,
}

impl LineSettings {
    /// 8N1 at `baud_rate`.
    #[inline]
    pub const fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            rx_linger_us: 50,
        }
    }
}

impl Default for LineSettings {
    #[inline(always)]
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

/// The serial port underneath the bus.
///
/// Other code may own the port between transactions and configure it however
/// it likes; the bus saves that configuration, applies its own, and puts the
/// original back when it is done.
pub trait ByteChannel {
    /// Everything needed to put the port back exactly as it was.
    type Config: Clone;
    type Error: fmt::Debug;

    fn config(&mut self) -> Result<Self::Config, Self::Error>;

    fn configure(&mut self, config: &Self::Config) -> Result<(), Self::Error>;

    /// `current`, adjusted to the frame parameters in `settings`.
    fn bus_config(&self, current: &Self::Config, settings: &LineSettings) -> Self::Config;

    /// Block until every written byte has left the transmitter.
    fn flush(&mut self);

    /// Queue `bytes` for transmission, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> usize;

    /// Bytes received and not yet read. Must not block.
    fn available(&mut self) -> usize;

    /// Read up to `buffer.len()` bytes, waiting at most `timeout_us` for them.
    fn read(&mut self, buffer: &mut [u8], timeout_us: u32) -> usize;

    /// Pop one byte straight out of the hardware receive FIFO, giving up after
    /// `spin_limit` polls. Ports with raw FIFO access usually delegate to
    /// [`crate::raw::pop`].
    ///
    /// Without an override this falls back to a one-byte `read` and hands it
    /// `spin_limit` as its timeout, taken as microseconds.
    #[inline]
    fn pop_raw(&mut self, spin_limit: u32) -> Option<u8> {
        let mut byte = [0];
        if self.read(&mut byte, spin_limit) == 1 {
            let [byte] = byte;
            Some(byte)
        } else {
            None
        }
    }
}

pub trait Delay {
    fn delay_us(&mut self, us: u32);
}

#[cfg(test)]
mod test {
    use super::*;

    /// Reads one queued byte, remembering the timeout it was given.
    struct Buffered {
        byte: Option<u8>,
        timeout_us: Option<u32>,
    }

    impl ByteChannel for Buffered {
        type Config = ();
        type Error = ();

        fn config(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn configure(&mut self, _: &()) -> Result<(), ()> {
            Ok(())
        }

        fn bus_config(&self, _: &(), _: &LineSettings) {}

        fn flush(&mut self) {}

        fn write(&mut self, bytes: &[u8]) -> usize {
            bytes.len()
        }

        fn available(&mut self) -> usize {
            usize::from(self.byte.is_some())
        }

        fn read(&mut self, buffer: &mut [u8], timeout_us: u32) -> usize {
            self.timeout_us = Some(timeout_us);
            match (self.byte.take(), buffer.first_mut()) {
                (Some(byte), Some(slot)) => {
                    *slot = byte;
                    1
                }
                _ => 0,
            }
        }
    }

    #[test]
    fn fallback_pop_reads_with_spin_limit_as_timeout() {
        let mut channel = Buffered {
            byte: Some(0x42),
            timeout_us: None,
        };
        assert_eq!(channel.pop_raw(250), Some(0x42));
        assert_eq!(channel.timeout_us, Some(250));
        assert_eq!(channel.pop_raw(7), None);
        assert_eq!(channel.timeout_us, Some(7));
    }

    #[test]
    fn default_is_8n1() {
        let settings = LineSettings::default();
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.parity, Parity::None);
        assert_eq!(settings.stop_bits, 1);
        assert_eq!(settings.rx_linger_us, 50);
    }
}
