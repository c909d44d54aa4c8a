/// Passive listener that sees every block of bytes the bus reads, valid or not.
///
/// Only for sniffing: it cannot change what a transaction returns.
pub trait Tap {
    fn observe(&mut self, bytes: &[u8]);
}

impl<F: FnMut(&[u8])> Tap for F {
    #[inline(always)]
    fn observe(&mut self, bytes: &[u8]) {
        self(bytes)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoTap;

impl Tap for NoTap {
    #[inline(always)]
    fn observe(&mut self, _: &[u8]) {}
}
