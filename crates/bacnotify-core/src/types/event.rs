/// BACnetEventState.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum EventState {
    Normal = 0,
    Fault = 1,
    Offnormal = 2,
    HighLimit = 3,
    LowLimit = 4,
    LifeSafetyAlarm = 5,
}

impl EventState {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Fault),
            2 => Some(Self::Offnormal),
            3 => Some(Self::HighLimit),
            4 => Some(Self::LowLimit),
            5 => Some(Self::LifeSafetyAlarm),
            _ => None,
        }
    }
}

/// BACnetNotifyType.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum NotifyType {
    Alarm = 0,
    Event = 1,
    AckNotification = 2,
}

impl NotifyType {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Alarm),
            1 => Some(Self::Event),
            2 => Some(Self::AckNotification),
            _ => None,
        }
    }
}

/// BACnetEventType.
///
/// Standard algorithms are named variants. Vendor algorithms occupy
/// 64..=65535 and are carried as [`Proprietary`](Self::Proprietary); their
/// parameters always travel in the complex-event-type form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventType {
    ChangeOfBitstring,
    ChangeOfState,
    ChangeOfValue,
    CommandFailure,
    FloatingLimit,
    OutOfRange,
    ComplexEventType,
    ChangeOfLifeSafety,
    Extended,
    BufferReady,
    UnsignedRange,
    AccessEvent,
    DoubleOutOfRange,
    SignedOutOfRange,
    UnsignedOutOfRange,
    ChangeOfCharacterstring,
    ChangeOfStatusFlags,
    ChangeOfReliability,
    None,
    ChangeOfDiscreteValue,
    ChangeOfTimer,
    Proprietary(u16),
}

impl EventType {
    pub const PROPRIETARY_MIN: u32 = 64;
    pub const PROPRIETARY_MAX: u32 = 65535;

    pub const fn to_u32(self) -> u32 {
        match self {
            Self::ChangeOfBitstring => 0,
            Self::ChangeOfState => 1,
            Self::ChangeOfValue => 2,
            Self::CommandFailure => 3,
            Self::FloatingLimit => 4,
            Self::OutOfRange => 5,
            Self::ComplexEventType => 6,
            Self::ChangeOfLifeSafety => 8,
            Self::Extended => 9,
            Self::BufferReady => 10,
            Self::UnsignedRange => 11,
            Self::AccessEvent => 13,
            Self::DoubleOutOfRange => 14,
            Self::SignedOutOfRange => 15,
            Self::UnsignedOutOfRange => 16,
            Self::ChangeOfCharacterstring => 17,
            Self::ChangeOfStatusFlags => 18,
            Self::ChangeOfReliability => 19,
            Self::None => 20,
            Self::ChangeOfDiscreteValue => 21,
            Self::ChangeOfTimer => 22,
            Self::Proprietary(v) => v as u32,
        }
    }

    /// Maps a wire value to an event type. Reserved values (7, 12,
    /// 23..=63) and values above the proprietary range have no mapping.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::ChangeOfBitstring),
            1 => Some(Self::ChangeOfState),
            2 => Some(Self::ChangeOfValue),
            3 => Some(Self::CommandFailure),
            4 => Some(Self::FloatingLimit),
            5 => Some(Self::OutOfRange),
            6 => Some(Self::ComplexEventType),
            8 => Some(Self::ChangeOfLifeSafety),
            9 => Some(Self::Extended),
            10 => Some(Self::BufferReady),
            11 => Some(Self::UnsignedRange),
            13 => Some(Self::AccessEvent),
            14 => Some(Self::DoubleOutOfRange),
            15 => Some(Self::SignedOutOfRange),
            16 => Some(Self::UnsignedOutOfRange),
            17 => Some(Self::ChangeOfCharacterstring),
            18 => Some(Self::ChangeOfStatusFlags),
            19 => Some(Self::ChangeOfReliability),
            20 => Some(Self::None),
            21 => Some(Self::ChangeOfDiscreteValue),
            22 => Some(Self::ChangeOfTimer),
            v if v >= Self::PROPRIETARY_MIN && v <= Self::PROPRIETARY_MAX => {
                Some(Self::Proprietary(v as u16))
            }
            _ => None,
        }
    }

    /// False for a `Proprietary` value below 64, which would collide with a
    /// standard or reserved event type on the wire.
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Proprietary(v) => v as u32 >= Self::PROPRIETARY_MIN,
            _ => true,
        }
    }

    /// True for event types whose parameters use the complex-event-type
    /// sequence of property values.
    pub const fn uses_complex_parameters(self) -> bool {
        match self {
            Self::ComplexEventType => true,
            Self::Proprietary(_) => self.is_valid(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventState, EventType, NotifyType};

    #[test]
    fn event_type_wire_values() {
        for raw in 0..=70u32 {
            if let Some(kind) = EventType::from_u32(raw) {
                assert_eq!(kind.to_u32(), raw);
            }
        }
        assert_eq!(EventType::from_u32(7), None);
        assert_eq!(EventType::from_u32(12), None);
        assert_eq!(EventType::from_u32(40), None);
        assert_eq!(EventType::from_u32(64), Some(EventType::Proprietary(64)));
        assert_eq!(EventType::from_u32(65536), None);
        assert!(EventType::Proprietary(700).uses_complex_parameters());
        assert!(!EventType::OutOfRange.uses_complex_parameters());
    }

    #[test]
    fn proprietary_below_64_is_invalid() {
        assert!(EventType::Proprietary(64).is_valid());
        assert!(!EventType::Proprietary(5).is_valid());
        assert!(!EventType::Proprietary(5).uses_complex_parameters());
        assert!(EventType::OutOfRange.is_valid());
    }

    #[test]
    fn state_and_notify_values() {
        assert_eq!(EventState::from_u32(3), Some(EventState::HighLimit));
        assert_eq!(EventState::from_u32(6), None);
        assert_eq!(NotifyType::from_u32(2), Some(NotifyType::AckNotification));
        assert_eq!(NotifyType::AckNotification.to_u32(), 2);
    }
}
