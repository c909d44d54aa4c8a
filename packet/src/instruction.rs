use core::fmt;

/// Protocol 1.0 instruction opcodes.
#[repr(u8)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(test, derive(strum_macros::VariantArray))]
pub enum Instruction {
    Ping = 0x01,
    Read = 0x02,
    Write = 0x03,
    RegWrite = 0x04,
    Action = 0x05,
    Reset = 0x06,
    SyncWrite = 0x83,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownInstruction {
    pub byte: u8,
}

impl fmt::Display for UnknownInstruction {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown instruction byte `0x{:02X}`", self.byte)
    }
}

impl Instruction {
    #[inline(always)]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_byte(byte: u8) -> Result<Self, UnknownInstruction> {
        match byte {
            0x01 => Ok(Self::Ping),
            0x02 => Ok(Self::Read),
            0x03 => Ok(Self::Write),
            0x04 => Ok(Self::RegWrite),
            0x05 => Ok(Self::Action),
            0x06 => Ok(Self::Reset),
            0x83 => Ok(Self::SyncWrite),
            byte => Err(UnknownInstruction { byte }),
        }
    }

    /// Whether a device is allowed to answer this instruction at all.
    #[inline]
    pub const fn expects_reply(self) -> bool {
        !matches!(self, Self::SyncWrite)
    }
}

impl From<Instruction> for u8 {
    #[inline(always)]
    fn from(instruction: Instruction) -> Self {
        instruction.byte()
    }
}

impl TryFrom<u8> for Instruction {
    type Error = UnknownInstruction;

    #[inline(always)]
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte)
    }
}

impl fmt::Display for Instruction {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Ping => "PING",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::RegWrite => "REG_WRITE",
            Self::Action => "ACTION",
            Self::Reset => "RESET",
            Self::SyncWrite => "SYNC_WRITE",
        })
    }
}
