#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod channel;
pub mod device;
pub mod direction;
pub mod motor;
pub mod raw;
pub mod tap;

#[cfg(test)]
mod test_util;

pub use {
    bus::{Bus, Settings, Transact, Transaction},
    channel::{ByteChannel, Delay, LineSettings},
    device::Device,
    direction::DirectionLine,
    dxl1_packet as packet,
    motor::Motor,
    tap::Tap,
};
