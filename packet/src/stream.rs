use crate::checksum::Checksum;

/// Anything bytes can be pulled out of, a block at a time, under some deadline.
///
/// `fill` returns how many bytes of `buffer` it managed to write before giving
/// up. Anything short of `buffer.len()` means the deadline passed.
pub trait Source {
    fn fill(&mut self, buffer: &mut [u8]) -> usize;
}

impl<S: Source> Source for &mut S {
    #[inline(always)]
    fn fill(&mut self, buffer: &mut [u8]) -> usize {
        S::fill(self, buffer)
    }
}

pub(crate) struct WithChecksum<'sum, S: Source> {
    pub(crate) checksum: &'sum mut Checksum,
    pub(crate) internal: S,
}

impl<S: Source> Source for WithChecksum<'_, S> {
    #[inline]
    fn fill(&mut self, buffer: &mut [u8]) -> usize {
        let n = self.internal.fill(buffer);
        if let Some(filled) = buffer.get(..n) {
            self.checksum.push_all(filled);
        }
        n
    }
}

#[cfg(test)]
pub(crate) struct WithLog<S: Source>(pub(crate) S);

#[cfg(test)]
impl<S: Source> Source for WithLog<S> {
    #[inline]
    fn fill(&mut self, buffer: &mut [u8]) -> usize {
        let n = self.0.fill(buffer);
        println!("Source log: {:02X?}", &buffer[..n]);
        n
    }
}

/// Hands out a fixed slice, then goes quiet.
#[cfg(test)]
pub(crate) struct Slice<'slice> {
    index: usize,
    slice: &'slice [u8],
}

#[cfg(test)]
impl<'slice> Slice<'slice> {
    #[inline]
    pub(crate) fn new(slice: &'slice [u8]) -> Self {
        Self { index: 0, slice }
    }
}

#[cfg(test)]
impl Source for Slice<'_> {
    #[inline]
    fn fill(&mut self, buffer: &mut [u8]) -> usize {
        let rest = &self.slice[self.index..];
        let n = rest.len().min(buffer.len());
        buffer[..n].copy_from_slice(&rest[..n]);
        self.index += n;
        n
    }
}
