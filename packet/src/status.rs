use core::{fmt, ops};

/// Outcome of a transaction, as a combinable set of flags.
///
/// The low seven bits are the device's own error byte, copied verbatim out of
/// its status packet. Everything above is raised by the host side.
#[repr(transparent)]
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Status(u16);

impl Status {
    pub const OK: Self = Self(0);

    pub const INPUT_VOLTAGE: Self = Self(0x0001);
    pub const ANGLE_LIMIT: Self = Self(0x0002);
    pub const OVERHEATING: Self = Self(0x0004);
    pub const RANGE: Self = Self(0x0008);
    pub const CHECKSUM_ERROR: Self = Self(0x0010);
    pub const OVERLOAD: Self = Self(0x0020);
    pub const INSTRUCTION: Self = Self(0x0040);

    pub const COM_ERROR: Self = Self(0x0080);
    pub const TIMEOUT: Self = Self(0x0100);
    pub const BUS_DISABLED: Self = Self(0x0200);
    pub const CONFIGURE_FAILED: Self = Self(0x0400);

    const DEVICE_MASK: u8 = 0x7F;

    const NAMES: [(Self, &'static str); 11] = [
        (Self::INPUT_VOLTAGE, "INPUT_VOLTAGE"),
        (Self::ANGLE_LIMIT, "ANGLE_LIMIT"),
        (Self::OVERHEATING, "OVERHEATING"),
        (Self::RANGE, "RANGE"),
        (Self::CHECKSUM_ERROR, "CHECKSUM_ERROR"),
        (Self::OVERLOAD, "OVERLOAD"),
        (Self::INSTRUCTION, "INSTRUCTION"),
        (Self::COM_ERROR, "COM_ERROR"),
        (Self::TIMEOUT, "TIMEOUT"),
        (Self::BUS_DISABLED, "BUS_DISABLED"),
        (Self::CONFIGURE_FAILED, "CONFIGURE_FAILED"),
    ];

    /// Interpret the error byte of a status packet. The top bit is unused by
    /// Protocol 1.0 devices and is dropped rather than mistaken for `COM_ERROR`.
    #[inline(always)]
    pub const fn from_device(byte: u8) -> Self {
        Self((byte & Self::DEVICE_MASK) as u16)
    }

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline(always)]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Errors the device reported about itself, if any.
    #[inline(always)]
    pub const fn device_errors(self) -> u8 {
        (self.0 as u8) & Self::DEVICE_MASK
    }

    #[inline]
    pub const fn into_result(self) -> Result<(), Self> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}

impl ops::BitOr for Status {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl ops::BitOrAssign for Status {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for Status {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return f.write_str("OK");
        }
        let mut first = true;
        for &(flag, name) in &Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Status {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status(0x{:03X}: {self})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    #[inline]
    fn format(&self, f: defmt::Formatter) {
        if self.is_ok() {
            defmt::write!(f, "OK");
            return;
        }
        let mut first = true;
        for &(flag, name) in &Self::NAMES {
            if self.contains(flag) {
                if !first {
                    defmt::write!(f, " | ");
                }
                defmt::write!(f, "{=str}", name);
                first = false;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use {super::*, quickcheck_macros::quickcheck};

    #[test]
    fn display_combined() {
        let status = Status::COM_ERROR | Status::TIMEOUT;
        assert_eq!(format!("{status}"), "COM_ERROR | TIMEOUT");
        assert_eq!(format!("{}", Status::OK), "OK");
    }

    #[test]
    fn checksum_error_is_combinable() {
        let status = Status::COM_ERROR | Status::CHECKSUM_ERROR;
        assert!(status.contains(Status::CHECKSUM_ERROR));
        assert!(status.contains(Status::COM_ERROR));
        assert!(!status.contains(Status::TIMEOUT));
        assert_eq!(status.into_result(), Err(status));
    }

    #[quickcheck]
    fn device_byte_never_raises_host_flags(byte: u8) -> bool {
        let status = Status::from_device(byte);
        !status.intersects(
            Status::COM_ERROR | Status::TIMEOUT | Status::BUS_DISABLED | Status::CONFIGURE_FAILED,
        ) && status.device_errors() == byte & 0x7F
    }
}
