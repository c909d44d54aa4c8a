use {
    super::Packet,
    crate::constants::{HEADER, MAX_PACKET_LEN},
};

/// Wire bytes of one packet, ready to hand to a UART.
#[derive(Clone)]
pub struct Encoded {
    buffer: [u8; MAX_PACKET_LEN],
    len: usize,
}

impl Encoded {
    #[inline(always)]
    const fn new() -> Self {
        Self {
            buffer: [0; MAX_PACKET_LEN],
            len: 0,
        }
    }

    #[inline(always)]
    fn push(&mut self, byte: u8) {
        // Capacity is guaranteed by the length checks in `Packet`'s constructors.
        if let Some(slot) = self.buffer.get_mut(self.len) {
            *slot = byte;
            self.len += 1;
        }
    }

    #[inline]
    fn push_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    #[inline]
    pub fn as_buffer(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}

impl core::fmt::Debug for Encoded {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02X?}", self.as_buffer())
    }
}

impl Packet {
    /// Serialize for the wire:
    /// `FF FF id length instruction [address] [count] parameters... checksum`.
    ///
    /// A synchronized write lays its parameters out as `id, data...` per device.
    #[inline]
    pub fn encode(&self) -> Encoded {
        let mut encoded = Encoded::new();
        encoded.push_all(&HEADER);
        encoded.push(self.id);
        encoded.push(self.length);
        encoded.push(self.instruction);
        if let Some(address) = self.address {
            encoded.push(address);
        }
        if let Some(count) = self.parameter_count {
            encoded.push(count);
        }
        if self.id_list.is_empty() {
            encoded.push_all(&self.data);
        } else {
            let per_device = self.parameter_count.unwrap_or(0) as usize;
            for (i, &id) in self.id_list.iter().enumerate() {
                encoded.push(id);
                let start = i * per_device;
                encoded.push_all(self.data.get(start..start + per_device).unwrap_or(&[]));
            }
        }
        encoded.push(self.checksum);
        encoded
    }
}
