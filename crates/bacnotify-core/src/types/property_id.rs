/// BACnet property identifiers used by alarm and audit objects.
///
/// Unlisted identifiers use [`Other`](Self::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyId {
    AckRequired,
    EventState,
    ObjectIdentifier,
    ObjectName,
    PresentValue,
    Priority,
    RecipientList,
    Reliability,
    StatusFlags,
    BufferSize,
    LogBuffer,
    Enable,
    RecordCount,
    TotalRecordCount,
    Other(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::AckRequired => 1,
            Self::EventState => 36,
            Self::ObjectIdentifier => 75,
            Self::ObjectName => 77,
            Self::PresentValue => 85,
            Self::Priority => 86,
            Self::RecipientList => 102,
            Self::Reliability => 103,
            Self::StatusFlags => 111,
            Self::BufferSize => 126,
            Self::LogBuffer => 131,
            Self::Enable => 133,
            Self::RecordCount => 141,
            Self::TotalRecordCount => 145,
            Self::Other(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::AckRequired,
            36 => Self::EventState,
            75 => Self::ObjectIdentifier,
            77 => Self::ObjectName,
            85 => Self::PresentValue,
            86 => Self::Priority,
            102 => Self::RecipientList,
            103 => Self::Reliability,
            111 => Self::StatusFlags,
            126 => Self::BufferSize,
            131 => Self::LogBuffer,
            133 => Self::Enable,
            141 => Self::RecordCount,
            145 => Self::TotalRecordCount,
            v => Self::Other(v),
        }
    }
}
