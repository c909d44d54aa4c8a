#![cfg_attr(not(test), no_std)]

pub mod checksum;
pub mod constants;
pub mod control_table;
pub mod instruction;
pub mod packet;
pub mod status;
pub mod stream;

pub use {instruction::Instruction, packet::Packet, status::Status};
