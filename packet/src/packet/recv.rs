use {
    super::Packet,
    crate::{
        checksum::Checksum,
        constants::{HEADER, HEADER_LEN, LENGTH_OVERHEAD},
        status::Status,
        stream::{Source, WithChecksum},
    },
};

impl Packet {
    /// Read the reply to this request out of `source`, overwriting `self`.
    ///
    /// `expected_parameters` is how many parameter bytes the reply must carry;
    /// zero for a bare acknowledgement.
    #[inline]
    pub fn receive<S: Source>(&mut self, mut source: S, expected_parameters: u8) {
        self.clear_request_fields();
        let mut header = [0; HEADER_LEN];
        if source.fill(&mut header) < HEADER_LEN {
            self.status = Status::COM_ERROR | Status::TIMEOUT;
            return;
        }
        self.decode(header, source, expected_parameters);
    }

    /// Validate an already-read header, then read the parameters and checksum it
    /// announces out of `source`, overwriting `self`.
    ///
    /// Whatever was read before a failure stays readable for diagnostics. A bad
    /// checksum in particular keeps the device's error byte in `instruction`
    /// and the parameters in `data`.
    #[inline]
    pub fn decode<S: Source>(
        &mut self,
        header: [u8; HEADER_LEN],
        mut source: S,
        expected_parameters: u8,
    ) {
        self.clear_request_fields();
        let [first, second, id, length, error] = header;

        if [first, second] != HEADER {
            self.status = Status::COM_ERROR;
            return;
        }

        // Another device answering on a shared bus.
        if id != self.id {
            self.status = Status::COM_ERROR;
            return;
        }

        self.length = length;
        if length.checked_sub(LENGTH_OVERHEAD) != Some(expected_parameters) {
            self.status = Status::COM_ERROR;
            return;
        }

        self.instruction = error;
        self.status = Status::from_device(error);

        let mut checksum = Checksum::new();
        checksum.push(id);
        checksum.push(length);
        checksum.push(error);

        self.data.clear();
        if self.data.resize(expected_parameters as usize, 0).is_err() {
            self.status = Status::COM_ERROR;
            return;
        }
        let read = WithChecksum {
            checksum: &mut checksum,
            internal: &mut source,
        }
        .fill(&mut self.data);
        if read < self.data.len() {
            self.data.truncate(read);
            self.status = Status::COM_ERROR | Status::TIMEOUT;
            return;
        }

        let mut received = [0];
        if source.fill(&mut received) < 1 {
            self.status = Status::COM_ERROR | Status::TIMEOUT;
            return;
        }
        let [received] = received;
        self.checksum = received;

        if checksum.collapse() != received {
            self.status = Status::COM_ERROR | Status::CHECKSUM_ERROR;
        }
    }
}

/// Decode a reply expected from `expected_id` into a fresh packet.
#[inline]
pub fn decode<S: Source>(
    header: [u8; HEADER_LEN],
    source: S,
    expected_id: u8,
    expected_parameters: u8,
) -> Packet {
    let mut packet = Packet::awaiting(expected_id);
    packet.decode(header, source, expected_parameters);
    packet
}
