use dxl1_packet::{
    Packet,
    control_table::{Item, TorqueEnable},
    packet::Error,
};

const IDS: [u8; 3] = [1, 2, 3];

/// Torque on for several devices at once.
fn main() -> Result<(), Error> {
    let packet = Packet::sync_write(TorqueEnable::ADDRESS, TorqueEnable::BYTES, &IDS, &[1; 3])?;
    println!("{:02X?}", packet.encode().as_buffer());
    Ok(())
}
