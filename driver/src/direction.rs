/// The pin that turns the half-duplex transceiver around.
pub trait DirectionLine {
    fn set_level(&mut self, high: bool);
}

impl<D: DirectionLine> DirectionLine for &mut D {
    #[inline(always)]
    fn set_level(&mut self, high: bool) {
        D::set_level(self, high)
    }
}

/// Which level on the direction line means "transmit". Receive is the other one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polarity {
    pub transmit_level: bool,
}

impl Polarity {
    pub const ACTIVE_LOW: Self = Self {
        transmit_level: false,
    };
    pub const ACTIVE_HIGH: Self = Self {
        transmit_level: true,
    };

    #[inline(always)]
    pub const fn receive_level(self) -> bool {
        !self.transmit_level
    }
}

impl Default for Polarity {
    #[inline(always)]
    fn default() -> Self {
        Self::ACTIVE_LOW
    }
}

#[inline]
pub(crate) fn listen<D: DirectionLine>(line: &mut D, polarity: Polarity) {
    line.set_level(polarity.receive_level());
}

/// Holds the transceiver in transmit ONLY WHILE THIS IS ALIVE.
pub(crate) struct Transmit<'line, D: DirectionLine> {
    line: &'line mut D,
    polarity: Polarity,
}

impl<'line, D: DirectionLine> Transmit<'line, D> {
    #[inline]
    pub(crate) fn new(line: &'line mut D, polarity: Polarity) -> Self {
        let () = line.set_level(polarity.transmit_level);
        Self { line, polarity }
    }
}

impl<D: DirectionLine> Drop for Transmit<'_, D> {
    #[inline]
    fn drop(&mut self) {
        let () = listen(self.line, self.polarity);
    }
}
