/// Both header bytes of every Protocol 1.0 packet.
pub const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Header bytes, ID, length and instruction/status: everything a receiver
/// needs before it knows how much more to read.
pub const HEADER_LEN: usize = 5;

/// Reserved ID addressing every device at once. Nobody answers it.
pub const BROADCAST_ID: u8 = 0xFE;

/// Largest ID a single device may carry.
pub const MAX_ID: u8 = 0xFD;

/// The length byte counts parameters plus the instruction and checksum.
pub const LENGTH_OVERHEAD: u8 = 2;

/// Most parameter bytes a length byte can describe.
pub const MAX_PARAMETERS: usize = (u8::MAX - LENGTH_OVERHEAD) as usize;

/// Most devices a single synchronized write can address, each taking at
/// least an ID byte and one data byte after the address and size fields.
pub const MAX_SYNC_DEVICES: usize = (MAX_PARAMETERS - 2) / 2;

/// Header, ID, length byte, and everything the length byte covers.
pub const MAX_PACKET_LEN: usize = HEADER.len() + 2 + u8::MAX as usize;
