use dxl1_packet::{
    Packet,
    control_table::{GoalPosition, Item},
    packet::Error,
};

const ID: u8 = 1;

fn main() -> Result<(), Error> {
    let packet = Packet::write(ID, GoalPosition::ADDRESS, &512_u16.to_le_bytes())?;
    println!("{:02X?}", packet.encode().as_buffer());
    Ok(())
}
