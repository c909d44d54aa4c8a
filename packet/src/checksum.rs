/// Running one's-complement sum over the bytes between the header and the checksum.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Checksum {
    sum: u8,
}

impl Checksum {
    #[inline(always)]
    pub const fn new() -> Self {
        Self { sum: 0 }
    }

    #[inline(always)]
    pub const fn push(&mut self, byte: u8) {
        self.sum = self.sum.wrapping_add(byte);
    }

    #[inline]
    pub const fn push_all(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.push(bytes[i]);
            i += 1;
        }
    }

    #[inline(always)]
    pub const fn collapse(&self) -> u8 {
        !self.sum
    }
}

#[inline]
pub const fn of(bytes: &[u8]) -> u8 {
    let mut checksum = Checksum::new();
    checksum.push_all(bytes);
    checksum.collapse()
}

#[cfg(test)]
mod test {
    use {super::*, quickcheck_macros::quickcheck};

    #[test]
    fn ping_id_1() {
        // FF FF 01 02 01 FB
        assert_eq!(of(&[0x01, 0x02, 0x01]), 0xFB);
    }

    #[test]
    fn read_present_position() {
        // FF FF 01 04 02 24 02 D2
        assert_eq!(of(&[0x01, 0x04, 0x02, 0x24, 0x02]), 0xD2);
    }

    #[quickcheck]
    fn sum_with_checksum_is_all_ones(bytes: Vec<u8>) -> bool {
        let total = bytes.iter().fold(of(&bytes), |acc, &b| acc.wrapping_add(b));
        total == 0xFF
    }

    #[quickcheck]
    fn incremental_matches_batch(a: Vec<u8>, b: Vec<u8>) -> bool {
        let mut checksum = Checksum::new();
        checksum.push_all(&a);
        for &byte in &b {
            checksum.push(byte);
        }
        let joined: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
        checksum.collapse() == of(&joined)
    }
}
