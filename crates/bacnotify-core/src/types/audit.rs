/// BACnetAuditOperation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum AuditOperation {
    Read = 0,
    Write = 1,
    Create = 2,
    Delete = 3,
    LifeSafety = 4,
    AcknowledgeAlarm = 5,
    DeviceDisableComm = 6,
    DeviceEnableComm = 7,
    DeviceReset = 8,
    DeviceBackup = 9,
    DeviceRestore = 10,
    Subscription = 11,
    Notification = 12,
    AuditingFailure = 13,
    NetworkChanges = 14,
    General = 15,
}

impl AuditOperation {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Read,
            1 => Self::Write,
            2 => Self::Create,
            3 => Self::Delete,
            4 => Self::LifeSafety,
            5 => Self::AcknowledgeAlarm,
            6 => Self::DeviceDisableComm,
            7 => Self::DeviceEnableComm,
            8 => Self::DeviceReset,
            9 => Self::DeviceBackup,
            10 => Self::DeviceRestore,
            11 => Self::Subscription,
            12 => Self::Notification,
            13 => Self::AuditingFailure,
            14 => Self::NetworkChanges,
            15 => Self::General,
            _ => return None,
        })
    }
}
