//! Control table of the AX/MX series under Protocol 1.0.

pub trait Item {
    const ADDRESS: u8;
    const BYTES: u8;
    const DESCRIPTION: &'static str;
}

pub struct ModelNumber;
impl Item for ModelNumber {
    const ADDRESS: u8 = 0;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Model Number";
}

pub struct FirmwareVersion;
impl Item for FirmwareVersion {
    const ADDRESS: u8 = 2;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Firmware Version";
}

pub struct Id;
impl Item for Id {
    const ADDRESS: u8 = 3;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "ID";
}

pub struct BaudRate;
impl Item for BaudRate {
    const ADDRESS: u8 = 4;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Baud Rate";
}

pub struct ReturnDelayTime;
impl Item for ReturnDelayTime {
    const ADDRESS: u8 = 5;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Return Delay Time";
}

pub struct CwAngleLimit;
impl Item for CwAngleLimit {
    const ADDRESS: u8 = 6;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "CW Angle Limit";
}

pub struct CcwAngleLimit;
impl Item for CcwAngleLimit {
    const ADDRESS: u8 = 8;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "CCW Angle Limit";
}

pub struct TemperatureLimit;
impl Item for TemperatureLimit {
    const ADDRESS: u8 = 11;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Temperature Limit";
}

pub struct MinVoltageLimit;
impl Item for MinVoltageLimit {
    const ADDRESS: u8 = 12;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Min Voltage Limit";
}

pub struct MaxVoltageLimit;
impl Item for MaxVoltageLimit {
    const ADDRESS: u8 = 13;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Max Voltage Limit";
}

pub struct MaxTorque;
impl Item for MaxTorque {
    const ADDRESS: u8 = 14;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Max Torque";
}

pub struct StatusReturnLevel;
impl Item for StatusReturnLevel {
    const ADDRESS: u8 = 16;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Status Return Level";
}

pub struct AlarmLed;
impl Item for AlarmLed {
    const ADDRESS: u8 = 17;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Alarm LED";
}

pub struct Shutdown;
impl Item for Shutdown {
    const ADDRESS: u8 = 18;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Shutdown";
}

pub struct TorqueEnable;
impl Item for TorqueEnable {
    const ADDRESS: u8 = 24;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Torque Enable";
}

pub struct Led;
impl Item for Led {
    const ADDRESS: u8 = 25;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "LED";
}

pub struct CwComplianceMargin;
impl Item for CwComplianceMargin {
    const ADDRESS: u8 = 26;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "CW Compliance Margin";
}

pub struct CcwComplianceMargin;
impl Item for CcwComplianceMargin {
    const ADDRESS: u8 = 27;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "CCW Compliance Margin";
}

pub struct CwComplianceSlope;
impl Item for CwComplianceSlope {
    const ADDRESS: u8 = 28;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "CW Compliance Slope";
}

pub struct CcwComplianceSlope;
impl Item for CcwComplianceSlope {
    const ADDRESS: u8 = 29;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "CCW Compliance Slope";
}

pub struct GoalPosition;
impl Item for GoalPosition {
    const ADDRESS: u8 = 30;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Goal Position";
}

pub struct MovingSpeed;
impl Item for MovingSpeed {
    const ADDRESS: u8 = 32;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Moving Speed";
}

pub struct TorqueLimit;
impl Item for TorqueLimit {
    const ADDRESS: u8 = 34;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Torque Limit";
}

pub struct PresentPosition;
impl Item for PresentPosition {
    const ADDRESS: u8 = 36;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Present Position";
}

pub struct PresentSpeed;
impl Item for PresentSpeed {
    const ADDRESS: u8 = 38;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Present Speed";
}

pub struct PresentLoad;
impl Item for PresentLoad {
    const ADDRESS: u8 = 40;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Present Load";
}

pub struct PresentVoltage;
impl Item for PresentVoltage {
    const ADDRESS: u8 = 42;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Present Voltage";
}

pub struct PresentTemperature;
impl Item for PresentTemperature {
    const ADDRESS: u8 = 43;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Present Temperature";
}

pub struct Registered;
impl Item for Registered {
    const ADDRESS: u8 = 44;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Registered";
}

pub struct Moving;
impl Item for Moving {
    const ADDRESS: u8 = 46;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Moving";
}

pub struct Lock;
impl Item for Lock {
    const ADDRESS: u8 = 47;
    const BYTES: u8 = 1;
    const DESCRIPTION: &'static str = "Lock";
}

pub struct Punch;
impl Item for Punch {
    const ADDRESS: u8 = 48;
    const BYTES: u8 = 2;
    const DESCRIPTION: &'static str = "Punch";
}

/// First of the four compliance registers, which sit next to each other.
pub const COMPLIANCE_BLOCK: u8 = CwComplianceMargin::ADDRESS;

/// Both angle limits, CW then CCW, written together as one 32-bit value.
pub const ANGLE_LIMITS: u8 = CwAngleLimit::ADDRESS;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compliance_registers_are_contiguous() {
        assert_eq!(CcwComplianceMargin::ADDRESS, COMPLIANCE_BLOCK + 1);
        assert_eq!(CwComplianceSlope::ADDRESS, COMPLIANCE_BLOCK + 2);
        assert_eq!(CcwComplianceSlope::ADDRESS, COMPLIANCE_BLOCK + 3);
    }

    #[test]
    fn angle_limits_are_contiguous() {
        assert_eq!(
            CcwAngleLimit::ADDRESS,
            CwAngleLimit::ADDRESS + CwAngleLimit::BYTES
        );
    }
}
