pub mod recv;
pub mod send;

use {
    crate::{
        checksum::Checksum,
        constants::{BROADCAST_ID, LENGTH_OVERHEAD, MAX_ID, MAX_PARAMETERS, MAX_SYNC_DEVICES},
        instruction::{Instruction, UnknownInstruction},
        status::Status,
    },
    core::fmt,
    heapless::Vec,
};

pub type Parameters = Vec<u8, MAX_PARAMETERS>;
pub type IdList = Vec<u8, MAX_SYNC_DEVICES>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidId { id: u8 },
    TooManyParameters { requested: usize },
    TooManyDevices { requested: usize },
    SyncDataMismatch { devices: usize, bytes_per_device: u8, actual: usize },
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidId { id } => write!(f, "Invalid Dynamixel ID: {id}"),
            Self::TooManyParameters { requested } => write!(
                f,
                "{requested} parameter bytes requested, but a packet can carry at most {MAX_PARAMETERS}"
            ),
            Self::TooManyDevices { requested } => write!(
                f,
                "{requested} devices requested, but a synchronized write can address at most {MAX_SYNC_DEVICES}"
            ),
            Self::SyncDataMismatch {
                devices,
                bytes_per_device,
                actual,
            } => write!(
                f,
                "Synchronized write to {devices} devices at {bytes_per_device} bytes each needs {} data bytes, but {actual} were given",
                devices * bytes_per_device as usize
            ),
        }
    }
}

/// One packet on the wire: a request on the way out, then (overwritten in
/// place) the device's status packet on the way back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Packet {
    id: u8,
    length: u8,
    instruction: u8,
    address: Option<u8>,
    parameter_count: Option<u8>,
    data: Parameters,
    id_list: IdList,
    checksum: u8,
    status: Status,
}

impl Packet {
    #[inline]
    fn build(
        id: u8,
        instruction: u8,
        address: Option<u8>,
        parameter_count: Option<u8>,
        data: &[u8],
        id_list: &[u8],
    ) -> Result<Self, Error> {
        if id > BROADCAST_ID {
            return Err(Error::InvalidId { id });
        }
        let fields = usize::from(address.is_some()) + usize::from(parameter_count.is_some());
        let requested = fields + id_list.len() + data.len();
        if requested > MAX_PARAMETERS {
            return Err(Error::TooManyParameters { requested });
        }
        let mut packet = Self {
            id,
            length: requested as u8 + LENGTH_OVERHEAD,
            instruction,
            address,
            parameter_count,
            data: Vec::from_slice(data).map_err(|_| Error::TooManyParameters { requested })?,
            id_list: Vec::from_slice(id_list).map_err(|_| Error::TooManyDevices {
                requested: id_list.len(),
            })?,
            checksum: 0,
            status: Status::OK,
        };
        packet.checksum = packet.compute_checksum();
        Ok(packet)
    }

    #[inline]
    pub fn ping(id: u8) -> Result<Self, Error> {
        Self::build(id, Instruction::Ping.byte(), None, None, &[], &[])
    }

    /// Ask for `count` bytes of the control table starting at `address`.
    #[inline]
    pub fn read(id: u8, address: u8, count: u8) -> Result<Self, Error> {
        Self::build(
            id,
            Instruction::Read.byte(),
            Some(address),
            Some(count),
            &[],
            &[],
        )
    }

    #[inline]
    pub fn write(id: u8, address: u8, bytes: &[u8]) -> Result<Self, Error> {
        Self::build(id, Instruction::Write.byte(), Some(address), None, bytes, &[])
    }

    /// Like `write`, but the device holds the value until it sees `action`.
    #[inline]
    pub fn reg_write(id: u8, address: u8, bytes: &[u8]) -> Result<Self, Error> {
        Self::build(
            id,
            Instruction::RegWrite.byte(),
            Some(address),
            None,
            bytes,
            &[],
        )
    }

    #[inline]
    pub fn action(id: u8) -> Result<Self, Error> {
        Self::build(id, Instruction::Action.byte(), None, None, &[], &[])
    }

    /// Factory reset. Also resets the device's ID.
    #[inline]
    pub fn reset(id: u8) -> Result<Self, Error> {
        Self::build(id, Instruction::Reset.byte(), None, None, &[], &[])
    }

    /// Broadcast the same `bytes_per_device`-wide register range to several
    /// devices at once. `data` holds each device's bytes back to back, in the
    /// same order as `ids`.
    #[inline]
    pub fn sync_write(
        address: u8,
        bytes_per_device: u8,
        ids: &[u8],
        data: &[u8],
    ) -> Result<Self, Error> {
        if let Some(&id) = ids.iter().find(|&&id| id > MAX_ID) {
            return Err(Error::InvalidId { id });
        }
        if ids.len() > MAX_SYNC_DEVICES {
            return Err(Error::TooManyDevices {
                requested: ids.len(),
            });
        }
        if data.len() != ids.len() * bytes_per_device as usize {
            return Err(Error::SyncDataMismatch {
                devices: ids.len(),
                bytes_per_device,
                actual: data.len(),
            });
        }
        Self::build(
            BROADCAST_ID,
            Instruction::SyncWrite.byte(),
            Some(address),
            Some(bytes_per_device),
            data,
            ids,
        )
    }

    /// A status packet as a device would send it: `error` in place of the
    /// instruction, followed by `parameters`.
    #[inline]
    pub fn reply(id: u8, error: u8, parameters: &[u8]) -> Result<Self, Error> {
        let mut packet = Self::build(id, error, None, None, parameters, &[])?;
        packet.status = Status::from_device(error);
        Ok(packet)
    }

    /// An empty shell for a reply from `id`, to be filled in by decoding.
    #[inline]
    pub const fn awaiting(id: u8) -> Self {
        Self {
            id,
            length: LENGTH_OVERHEAD,
            instruction: 0,
            address: None,
            parameter_count: None,
            data: Vec::new(),
            id_list: Vec::new(),
            checksum: 0,
            status: Status::OK,
        }
    }

    /// The checksum these fields call for, which need not match the one
    /// actually received.
    #[inline]
    pub fn compute_checksum(&self) -> u8 {
        let mut checksum = Checksum::new();
        checksum.push(self.id);
        checksum.push(self.length);
        checksum.push(self.instruction);
        if let Some(address) = self.address {
            checksum.push(address);
        }
        if let Some(count) = self.parameter_count {
            checksum.push(count);
        }
        checksum.push_all(&self.id_list);
        checksum.push_all(&self.data);
        checksum.collapse()
    }

    /// Give up on this exchange: forget everything the request carried and
    /// record why. Nothing left over can be mistaken for a device's reply.
    #[inline]
    pub fn fail(&mut self, status: Status) {
        self.clear_request_fields();
        self.status = status;
    }

    #[inline]
    pub(crate) fn clear_request_fields(&mut self) {
        self.length = LENGTH_OVERHEAD;
        self.instruction = 0;
        self.address = None;
        self.parameter_count = None;
        self.data.clear();
        self.id_list.clear();
        self.checksum = 0;
    }

    #[inline(always)]
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    #[inline(always)]
    pub const fn id(&self) -> u8 {
        self.id
    }

    #[inline(always)]
    pub const fn is_broadcast(&self) -> bool {
        self.id == BROADCAST_ID
    }

    #[inline(always)]
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Raw instruction byte on a request, or the device's error byte on a reply.
    #[inline(always)]
    pub const fn instruction(&self) -> u8 {
        self.instruction
    }

    #[inline(always)]
    pub const fn opcode(&self) -> Result<Instruction, UnknownInstruction> {
        Instruction::from_byte(self.instruction)
    }

    #[inline(always)]
    pub const fn address(&self) -> Option<u8> {
        self.address
    }

    #[inline(always)]
    pub const fn parameter_count(&self) -> Option<u8> {
        self.parameter_count
    }

    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline(always)]
    pub fn id_list(&self) -> &[u8] {
        &self.id_list
    }

    #[inline(always)]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    #[inline(always)]
    pub const fn status(&self) -> Status {
        self.status
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Packet {
    #[inline]
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Packet {{ id: {=u8}, length: {=u8}, instruction: {=u8:#x}, address: {}, parameter_count: {}, data: {=[u8]:x}, id_list: {=[u8]}, checksum: {=u8:#x}, status: {} }}",
            self.id,
            self.length,
            self.instruction,
            self.address,
            self.parameter_count,
            &self.data[..],
            &self.id_list[..],
            self.checksum,
            self.status,
        )
    }
}
