//! Servo-level conveniences over [`Device`].

use {
    crate::{
        bus::Transact,
        device::{Device, Error, StatusReturnLevel},
    },
    core::ops::{Deref, DerefMut},
    dxl1_packet::control_table::{ANGLE_LIMITS, COMPLIANCE_BLOCK},
};

/// Largest magnitude the speed register takes, in either direction.
pub const MAX_SPEED: u16 = 0x3FF;

/// Set on the speed register to turn clockwise in wheel mode.
pub const CLOCKWISE: u16 = 0x400;

/// Margins and slopes of the position controller, in control table order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComplianceMargins {
    pub cw_margin: u8,
    pub ccw_margin: u8,
    pub cw_slope: u8,
    pub ccw_slope: u8,
}

impl ComplianceMargins {
    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.cw_margin, self.ccw_margin, self.cw_slope, self.ccw_slope]
    }

    #[inline(always)]
    pub const fn from_bytes([cw_margin, ccw_margin, cw_slope, ccw_slope]: [u8; 4]) -> Self {
        Self {
            cw_margin,
            ccw_margin,
            cw_slope,
            ccw_slope,
        }
    }
}

/// The speed register's encoding: magnitude in the low ten bits, direction in
/// bit 10. Magnitudes past [`MAX_SPEED`] saturate.
#[inline]
pub const fn encode_speed(speed: i16) -> u16 {
    let magnitude = speed.unsigned_abs();
    let magnitude = if magnitude > MAX_SPEED {
        MAX_SPEED
    } else {
        magnitude
    };
    if speed < 0 {
        magnitude | CLOCKWISE
    } else {
        magnitude
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Motor(Device);

impl Deref for Motor {
    type Target = Device;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Motor {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Device> for Motor {
    #[inline(always)]
    fn from(value: Device) -> Self {
        Self(value)
    }
}

impl Motor {
    #[inline]
    pub const fn new(id: u8, status_return_level: StatusReturnLevel) -> Result<Self, Error> {
        match Device::new(id, status_return_level) {
            Ok(device) => Ok(Self(device)),
            Err(e) => Err(e),
        }
    }

    #[inline]
    pub fn init<B: Transact>(bus: &mut B, id: u8) -> Result<Self, Error> {
        Device::init(bus, id).map(Self)
    }

    #[inline(always)]
    pub fn into_device(self) -> Device {
        self.0
    }

    /// Spin freely: both angle limits to zero.
    #[inline]
    pub fn wheel_mode<B: Transact>(&mut self, bus: &mut B) -> Result<(), Error> {
        self.0.write(bus, ANGLE_LIMITS, &[0; 4])
    }

    /// Hold positions between `cw_limit` and `ccw_limit`.
    #[inline]
    pub fn joint_mode<B: Transact>(
        &mut self,
        bus: &mut B,
        cw_limit: u16,
        ccw_limit: u16,
    ) -> Result<(), Error> {
        let [cw_lo, cw_hi] = cw_limit.to_le_bytes();
        let [ccw_lo, ccw_hi] = ccw_limit.to_le_bytes();
        self.0.write(bus, ANGLE_LIMITS, &[cw_lo, cw_hi, ccw_lo, ccw_hi])
    }

    #[inline]
    pub fn enable_torque<B: Transact>(&mut self, bus: &mut B, enable: bool) -> Result<(), Error> {
        self.0.write_torque_enable(bus, u8::from(enable))
    }

    /// Negative is clockwise.
    #[inline]
    pub fn speed<B: Transact>(&mut self, bus: &mut B, speed: i16) -> Result<(), Error> {
        self.0.write_moving_speed(bus, encode_speed(speed))
    }

    #[inline]
    pub fn goal_position<B: Transact>(&mut self, bus: &mut B, position: u16) -> Result<(), Error> {
        self.0.write_goal_position(bus, position)
    }

    #[inline]
    pub fn led<B: Transact>(&mut self, bus: &mut B, on: bool) -> Result<(), Error> {
        self.0.write_led(bus, u8::from(on))
    }

    #[inline]
    pub fn current_position<B: Transact>(&mut self, bus: &mut B) -> Result<u16, Error> {
        self.0.read_present_position(bus)
    }

    #[inline]
    pub fn set_compliance_margins<B: Transact>(
        &mut self,
        bus: &mut B,
        margins: ComplianceMargins,
    ) -> Result<(), Error> {
        self.0.write(bus, COMPLIANCE_BLOCK, &margins.to_bytes())
    }

    #[inline]
    pub fn compliance_margins<B: Transact>(
        &mut self,
        bus: &mut B,
    ) -> Result<ComplianceMargins, Error> {
        let mut buffer = [0; 4];
        let () = self.0.read(bus, COMPLIANCE_BLOCK, &mut buffer)?;
        Ok(ComplianceMargins::from_bytes(buffer))
    }

    #[inline]
    pub fn is_moving<B: Transact>(&mut self, bus: &mut B) -> Result<bool, Error> {
        self.0.read_moving(bus).map(|moving| moving != 0)
    }
}
