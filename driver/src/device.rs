//! One device on the bus, addressed by ID, with typed access to its control
//! table.
//!
//! A `Device` doesn't own the bus: every call borrows it, so any number of
//! devices can share one line.

use {
    crate::bus::Transact,
    core::fmt,
    dxl1_packet::{
        Packet, Status,
        constants::MAX_ID,
        control_table::{self, Item},
        packet,
    },
    paste::paste,
};

macro_rules! control_table_methods {
    ($id:ident, $bits:literal) => {
        paste! {
            #[inline]
            pub fn [< read_ $id:snake >]<B: Transact>(
                &mut self,
                bus: &mut B,
            ) -> Result<[< u $bits >], Error> {
                self.[< read_u $bits >](bus, <control_table::$id as Item>::ADDRESS)
            }

            #[inline]
            pub fn [< write_ $id:snake >]<B: Transact>(
                &mut self,
                bus: &mut B,
                value: [< u $bits >],
            ) -> Result<(), Error> {
                self.[< write_u $bits >](bus, <control_table::$id as Item>::ADDRESS, value)
            }
        }
    };
}

/// Which requests a device answers.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(test, derive(strum_macros::VariantArray))]
pub enum StatusReturnLevel {
    PingOnly = 0,
    ReadOnly = 1,
    All = 2,
}

impl StatusReturnLevel {
    /// Anything above 2 is treated as 2.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::PingOnly,
            1 => Self::ReadOnly,
            _ => Self::All,
        }
    }

    #[inline(always)]
    pub const fn answers_reads(self) -> bool {
        !matches!(self, Self::PingOnly)
    }

    #[inline(always)]
    pub const fn answers_writes(self) -> bool {
        matches!(self, Self::All)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The transaction itself reported something other than OK.
    Status(Status),
    Packet(packet::Error),
    /// The device's status return level means it would never answer this.
    Silent { id: u8 },
    UnsupportedBaudRate { baud_rate: u32 },
    ValueTooWide { value: u16, bytes: u8 },
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Status(status) => write!(f, "Transaction failed: {status}"),
            Self::Packet(ref e) => fmt::Display::fmt(e, f),
            Self::Silent { id } => write!(
                f,
                "Dynamixel ID {id} is set to answer pings only, so a read would never get a reply"
            ),
            Self::UnsupportedBaudRate { baud_rate } => {
                write!(f, "Dynamixels can't be set to {baud_rate} baud")
            }
            Self::ValueTooWide { value, bytes } => {
                write!(f, "{value} doesn't fit in a {bytes}-byte register")
            }
        }
    }
}

impl From<Status> for Error {
    #[inline(always)]
    fn from(value: Status) -> Self {
        Self::Status(value)
    }
}

impl From<packet::Error> for Error {
    #[inline(always)]
    fn from(value: packet::Error) -> Self {
        Self::Packet(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Device {
    id: u8,
    status_return_level: StatusReturnLevel,
    status: Status,
}

impl Device {
    /// A device already known to be configured with `status_return_level`.
    #[inline]
    pub const fn new(id: u8, status_return_level: StatusReturnLevel) -> Result<Self, Error> {
        if id > MAX_ID {
            return Err(Error::Packet(packet::Error::InvalidId { id }));
        }
        Ok(Self {
            id,
            status_return_level,
            status: Status::OK,
        })
    }

    /// Ping `id`, then ask it which requests it answers. A device that
    /// ignores the question answers pings only.
    #[inline]
    pub fn init<B: Transact>(bus: &mut B, id: u8) -> Result<Self, Error> {
        let mut device = Self::new(id, StatusReturnLevel::All)?;
        let () = device.ping(bus)?;
        device.status_return_level = match device.read_status_return_level(bus) {
            Ok(byte) => StatusReturnLevel::from_byte(byte),
            Err(Error::Status(status)) if status.contains(Status::TIMEOUT) => {
                debug!("Dynamixel ID {} answers pings only", id);
                StatusReturnLevel::PingOnly
            }
            Err(e) => return Err(e),
        };
        Ok(device)
    }

    #[inline(always)]
    pub const fn id(&self) -> u8 {
        self.id
    }

    #[inline(always)]
    pub const fn status_return_level(&self) -> StatusReturnLevel {
        self.status_return_level
    }

    /// Status of the last transaction.
    #[inline(always)]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[inline]
    fn record(&mut self, status: Status) -> Result<(), Error> {
        self.status = status;
        status.into_result().map_err(Error::Status)
    }

    /// Send a request that is acknowledged only at status return level "all".
    #[inline]
    fn command<B: Transact>(&mut self, bus: &mut B, mut packet: Packet) -> Result<(), Error> {
        let status = if self.status_return_level.answers_writes() {
            bus.transact(&mut packet, 0)
        } else {
            bus.send_only(&mut packet)
        };
        self.record(status)
    }

    #[inline]
    pub fn ping<B: Transact>(&mut self, bus: &mut B) -> Result<(), Error> {
        let mut packet = Packet::ping(self.id)?;
        let status = bus.transact(&mut packet, 0);
        self.record(status)
    }

    /// Fill `buffer` from the control table, starting at `address`.
    #[inline]
    pub fn read<B: Transact>(
        &mut self,
        bus: &mut B,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error> {
        if !self.status_return_level.answers_reads() {
            return Err(Error::Silent { id: self.id });
        }
        let count = u8::try_from(buffer.len()).map_err(|_| packet::Error::TooManyParameters {
            requested: buffer.len(),
        })?;
        let mut packet = Packet::read(self.id, address, count)?;
        let status = bus.transact(&mut packet, count);
        let () = self.record(status)?;
        for (slot, &byte) in buffer.iter_mut().zip(packet.data()) {
            *slot = byte;
        }
        Ok(())
    }

    #[inline]
    pub fn write<B: Transact>(
        &mut self,
        bus: &mut B,
        address: u8,
        bytes: &[u8],
    ) -> Result<(), Error> {
        let packet = Packet::write(self.id, address, bytes)?;
        self.command(bus, packet)
    }

    /// Stage a write that takes effect on the next `action`.
    #[inline]
    pub fn reg_write<B: Transact>(
        &mut self,
        bus: &mut B,
        address: u8,
        bytes: &[u8],
    ) -> Result<(), Error> {
        let packet = Packet::reg_write(self.id, address, bytes)?;
        self.command(bus, packet)
    }

    #[inline]
    pub fn action<B: Transact>(&mut self, bus: &mut B) -> Result<(), Error> {
        let packet = Packet::action(self.id)?;
        self.command(bus, packet)
    }

    #[inline]
    pub fn read_u8<B: Transact>(&mut self, bus: &mut B, address: u8) -> Result<u8, Error> {
        let mut buffer = [0; 1];
        let () = self.read(bus, address, &mut buffer)?;
        Ok(u8::from_le_bytes(buffer))
    }

    #[inline]
    pub fn read_u16<B: Transact>(&mut self, bus: &mut B, address: u8) -> Result<u16, Error> {
        let mut buffer = [0; 2];
        let () = self.read(bus, address, &mut buffer)?;
        Ok(u16::from_le_bytes(buffer))
    }

    #[inline]
    pub fn write_u8<B: Transact>(
        &mut self,
        bus: &mut B,
        address: u8,
        value: u8,
    ) -> Result<(), Error> {
        self.write(bus, address, &value.to_le_bytes())
    }

    #[inline]
    pub fn write_u16<B: Transact>(
        &mut self,
        bus: &mut B,
        address: u8,
        value: u16,
    ) -> Result<(), Error> {
        self.write(bus, address, &value.to_le_bytes())
    }

    /// Read any control table item one or two bytes wide.
    #[inline]
    pub fn read_item<I: Item, B: Transact>(&mut self, bus: &mut B) -> Result<u16, Error> {
        if I::BYTES == 1 {
            self.read_u8(bus, I::ADDRESS).map(u16::from)
        } else {
            self.read_u16(bus, I::ADDRESS)
        }
    }

    #[inline]
    pub fn write_item<I: Item, B: Transact>(
        &mut self,
        bus: &mut B,
        value: u16,
    ) -> Result<(), Error> {
        if I::BYTES == 1 {
            let byte = u8::try_from(value).map_err(|_| Error::ValueTooWide {
                value,
                bytes: I::BYTES,
            })?;
            self.write_u8(bus, I::ADDRESS, byte)
        } else {
            self.write_u16(bus, I::ADDRESS, value)
        }
    }

    /// Change which requests the device answers, and remember the change.
    #[inline]
    pub fn set_status_return_level<B: Transact>(
        &mut self,
        bus: &mut B,
        level: StatusReturnLevel,
    ) -> Result<(), Error> {
        let () = self.write_status_return_level(bus, level as u8)?;
        self.status_return_level = level;
        Ok(())
    }

    /// Set the device's own baud rate. The bus keeps its old rate until told
    /// otherwise with [`crate::Bus::set_baud_rate`].
    #[inline]
    pub fn communication_speed<B: Transact>(
        &mut self,
        bus: &mut B,
        baud_rate: u32,
    ) -> Result<(), Error> {
        let value = match 2_000_000_u32.checked_div(baud_rate).and_then(|q| q.checked_sub(1)) {
            Some(value @ 1..=255) => value as u8,
            _ => return Err(Error::UnsupportedBaudRate { baud_rate }),
        };
        self.write_baud_rate(bus, value)
    }

    control_table_methods!(ModelNumber, 16);
    control_table_methods!(FirmwareVersion, 8);
    control_table_methods!(Id, 8);
    control_table_methods!(BaudRate, 8);
    control_table_methods!(ReturnDelayTime, 8);
    control_table_methods!(CwAngleLimit, 16);
    control_table_methods!(CcwAngleLimit, 16);
    control_table_methods!(TemperatureLimit, 8);
    control_table_methods!(MinVoltageLimit, 8);
    control_table_methods!(MaxVoltageLimit, 8);
    control_table_methods!(MaxTorque, 16);
    control_table_methods!(StatusReturnLevel, 8);
    control_table_methods!(AlarmLed, 8);
    control_table_methods!(Shutdown, 8);
    control_table_methods!(TorqueEnable, 8);
    control_table_methods!(Led, 8);
    control_table_methods!(CwComplianceMargin, 8);
    control_table_methods!(CcwComplianceMargin, 8);
    control_table_methods!(CwComplianceSlope, 8);
    control_table_methods!(CcwComplianceSlope, 8);
    control_table_methods!(GoalPosition, 16);
    control_table_methods!(MovingSpeed, 16);
    control_table_methods!(TorqueLimit, 16);
    control_table_methods!(PresentPosition, 16);
    control_table_methods!(PresentSpeed, 16);
    control_table_methods!(PresentLoad, 16);
    control_table_methods!(PresentVoltage, 8);
    control_table_methods!(PresentTemperature, 8);
    control_table_methods!(Registered, 8);
    control_table_methods!(Moving, 8);
    control_table_methods!(Lock, 8);
    control_table_methods!(Punch, 16);
}
