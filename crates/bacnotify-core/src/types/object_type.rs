/// BACnet object type identifiers.
///
/// The types that originate or receive alarm and audit traffic are named
/// variants; anything else uses [`Other`](Self::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ObjectType {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Device,
    EventEnrollment,
    MultiStateInput,
    MultiStateOutput,
    NotificationClass,
    MultiStateValue,
    TrendLog,
    LifeSafetyPoint,
    LifeSafetyZone,
    EventLog,
    AccessDoor,
    Timer,
    AccessPoint,
    AlertEnrollment,
    AuditLog,
    AuditReporter,
    Other(u16),
}

impl ObjectType {
    /// Converts this object type to its numeric BACnet identifier.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogOutput => 1,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryOutput => 4,
            Self::BinaryValue => 5,
            Self::Device => 8,
            Self::EventEnrollment => 9,
            Self::MultiStateInput => 13,
            Self::MultiStateOutput => 14,
            Self::NotificationClass => 15,
            Self::MultiStateValue => 19,
            Self::TrendLog => 20,
            Self::LifeSafetyPoint => 21,
            Self::LifeSafetyZone => 22,
            Self::EventLog => 25,
            Self::AccessDoor => 30,
            Self::Timer => 31,
            Self::AccessPoint => 33,
            Self::AlertEnrollment => 52,
            Self::AuditLog => 61,
            Self::AuditReporter => 62,
            Self::Other(v) => v,
        }
    }

    /// Creates an `ObjectType` from its numeric BACnet identifier.
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            1 => Self::AnalogOutput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            4 => Self::BinaryOutput,
            5 => Self::BinaryValue,
            8 => Self::Device,
            9 => Self::EventEnrollment,
            13 => Self::MultiStateInput,
            14 => Self::MultiStateOutput,
            15 => Self::NotificationClass,
            19 => Self::MultiStateValue,
            20 => Self::TrendLog,
            21 => Self::LifeSafetyPoint,
            22 => Self::LifeSafetyZone,
            25 => Self::EventLog,
            30 => Self::AccessDoor,
            31 => Self::Timer,
            33 => Self::AccessPoint,
            52 => Self::AlertEnrollment,
            61 => Self::AuditLog,
            62 => Self::AuditReporter,
            v => Self::Other(v),
        }
    }
}
