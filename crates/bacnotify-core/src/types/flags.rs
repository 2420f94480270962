//! Fixed-width BACnet bit strings modelled as flag sets.
//!
//! Each set here is at most eight bits wide, so its wire form is a single
//! data octet. BACnet numbers bits from the most significant bit of that
//! octet, which is the reverse of the flag bit order used in memory.

use bitflags::bitflags;

/// A flag set transmitted as a one-octet BACnet bit string.
pub trait OctetFlags: Copy {
    /// Number of meaningful bits on the wire.
    const BIT_COUNT: u8;

    fn to_raw(self) -> u8;
    fn from_raw_truncate(raw: u8) -> Self;

    /// The data octet as transmitted.
    fn to_octet(self) -> u8 {
        self.to_raw().reverse_bits()
    }

    /// Rebuilds the set from a data octet, ignoring bits beyond the
    /// `valid_bits` actually carried by the sender.
    fn from_octet(octet: u8, valid_bits: usize) -> Self {
        let mask = if valid_bits >= 8 {
            0xFF
        } else {
            !(0xFFu8 >> valid_bits)
        };
        Self::from_raw_truncate((octet & mask).reverse_bits())
    }
}

macro_rules! octet_flags {
    ($name:ident, $count:expr) => {
        impl OctetFlags for $name {
            const BIT_COUNT: u8 = $count;

            fn to_raw(self) -> u8 {
                self.bits()
            }

            fn from_raw_truncate(raw: u8) -> Self {
                Self::from_bits_truncate(raw)
            }
        }
    };
}

bitflags! {
    /// BACnetStatusFlags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        const IN_ALARM = 1 << 0;
        const FAULT = 1 << 1;
        const OVERRIDDEN = 1 << 2;
        const OUT_OF_SERVICE = 1 << 3;
    }
}

bitflags! {
    /// BACnetDaysOfWeek, Monday first.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DaysOfWeek: u8 {
        const MONDAY = 1 << 0;
        const TUESDAY = 1 << 1;
        const WEDNESDAY = 1 << 2;
        const THURSDAY = 1 << 3;
        const FRIDAY = 1 << 4;
        const SATURDAY = 1 << 5;
        const SUNDAY = 1 << 6;
    }
}

impl DaysOfWeek {
    /// The flag for a BACnet weekday number (1 = Monday ..= 7 = Sunday).
    pub const fn from_weekday(weekday: u8) -> Option<Self> {
        if weekday >= 1 && weekday <= 7 {
            Some(Self::from_bits_truncate(1 << (weekday - 1)))
        } else {
            None
        }
    }
}

bitflags! {
    /// BACnetEventTransitionBits.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EventTransitionBits: u8 {
        const TO_OFFNORMAL = 1 << 0;
        const TO_FAULT = 1 << 1;
        const TO_NORMAL = 1 << 2;
    }
}

bitflags! {
    /// BACnetLogStatus.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LogStatus: u8 {
        const LOG_DISABLED = 1 << 0;
        const BUFFER_PURGED = 1 << 1;
        const LOG_INTERRUPTED = 1 << 2;
    }
}

bitflags! {
    /// BACnetResultFlags of a ReadRange acknowledgement.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ResultFlags: u8 {
        const FIRST_ITEM = 1 << 0;
        const LAST_ITEM = 1 << 1;
        const MORE_ITEMS = 1 << 2;
    }
}

octet_flags!(StatusFlags, 4);
octet_flags!(DaysOfWeek, 7);
octet_flags!(EventTransitionBits, 3);
octet_flags!(LogStatus, 3);
octet_flags!(ResultFlags, 3);
