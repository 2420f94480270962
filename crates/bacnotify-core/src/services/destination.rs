//! BACnetDestination and BACnetRecipient, the entries of a Notification
//! Class recipient list.

use crate::encoding::{
    primitives::{
        decode_app_boolean, decode_app_flags, decode_app_octet_string, decode_app_time,
        decode_app_unsigned, decode_ctx_object_id, encode_app_boolean, encode_app_flags,
        encode_app_octet_string, encode_app_time, encode_app_unsigned, encode_closing_tag,
        encode_ctx_object_id, encode_opening_tag, narrow,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening, Tag},
    writer::Writer,
    Encode,
};
use crate::services::property_refs::require_device;
use crate::types::{
    DateTime, DaysOfWeek, EventTransitionBits, ObjectId, Time, BACNET_MAX_INSTANCE,
};
use crate::{DecodeError, EncodeError};

/// Longest MAC address a recipient can carry.
pub const MAX_MAC_LEN: usize = 7;

/// UDP port appended to dotted IPv4 MACs that do not name one.
pub const BACNET_BIP_DEFAULT_PORT: u16 = 0xBAC0;

pub type MacAddress = heapless::Vec<u8, MAX_MAC_LEN>;

/// BACnetAddress: network number plus MAC. An empty MAC is a broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacnetAddress {
    pub net: u16,
    pub mac: MacAddress,
}

impl BacnetAddress {
    pub fn new(net: u16, mac: &[u8]) -> Result<Self, EncodeError> {
        let mac = MacAddress::from_slice(mac).map_err(|_| EncodeError::InvalidLength)?;
        Ok(Self { net, mac })
    }

    /// B/IP address: four IPv4 octets followed by the port, big-endian.
    pub fn ipv4(net: u16, ip: [u8; 4], port: u16) -> Self {
        let mut mac = MacAddress::new();
        // Six octets always fit in MAX_MAC_LEN.
        let _ = mac.extend_from_slice(&ip);
        let _ = mac.extend_from_slice(&port.to_be_bytes());
        Self { net, mac }
    }
}

/// BACnetRecipient choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recipient {
    Device(ObjectId),
    Address(BacnetAddress),
}

impl Recipient {
    /// The device recipient that marks an unused recipient list slot.
    pub const WILDCARD: Self = Self::Device(ObjectId::device(BACNET_MAX_INSTANCE));

    pub fn is_wildcard(&self) -> bool {
        *self == Self::WILDCARD
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Device(id) => encode_ctx_object_id(w, 0, *id),
            Self::Address(address) => {
                encode_opening_tag(w, 1)?;
                encode_app_unsigned(w, u32::from(address.net))?;
                encode_app_octet_string(w, &address.mac)?;
                encode_closing_tag(w, 1)
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match Tag::peek(r)? {
            Tag::Context { tag_num: 0, .. } => {
                Ok(Self::Device(require_device(decode_ctx_object_id(r, 0)?)?))
            }
            Tag::Opening { tag_num: 1 } => {
                expect_opening(r, 1)?;
                let net = narrow::<u16>(decode_app_unsigned(r)?)?;
                let mac = MacAddress::from_slice(decode_app_octet_string(r)?)
                    .map_err(|_| DecodeError::InvalidLength)?;
                expect_closing(r, 1)?;
                Ok(Self::Address(BacnetAddress { net, mac }))
            }
            _ => Err(DecodeError::InvalidTag),
        }
    }

    /// Recipient wrapped in an opening/closing pair, as audit notifications
    /// carry it.
    pub fn encode_ctx(&self, w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
        encode_opening_tag(w, tag_num)?;
        self.encode(w)?;
        encode_closing_tag(w, tag_num)
    }

    pub fn decode_ctx(r: &mut Reader<'_>, tag_num: u8) -> Result<Self, DecodeError> {
        expect_opening(r, tag_num)?;
        let recipient = Self::decode(r)?;
        expect_closing(r, tag_num)?;
        Ok(recipient)
    }
}

impl Default for Recipient {
    fn default() -> Self {
        Self::WILDCARD
    }
}

/// BACnetDestination.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub valid_days: DaysOfWeek,
    pub from_time: Time,
    pub to_time: Time,
    pub recipient: Recipient,
    pub process_id: u32,
    pub confirmed: bool,
    pub transitions: EventTransitionBits,
}

impl Default for Destination {
    /// Every day, all day, to the wildcard device, for no transitions.
    fn default() -> Self {
        Self {
            valid_days: DaysOfWeek::all(),
            from_time: Time::START_OF_DAY,
            to_time: Time::END_OF_DAY,
            recipient: Recipient::WILDCARD,
            process_id: 0,
            confirmed: false,
            transitions: EventTransitionBits::empty(),
        }
    }
}

impl Destination {
    pub fn is_wildcard(&self) -> bool {
        self.recipient.is_wildcard()
    }

    /// True when a transition of kind `transition` happening at `now` is
    /// delivered to this destination.
    pub fn accepts(&self, transition: EventTransitionBits, now: DateTime) -> bool {
        if !self.transitions.contains(transition) || transition.is_empty() {
            return false;
        }
        let Some(day) = DaysOfWeek::from_weekday(now.date.weekday) else {
            return false;
        };
        self.valid_days.contains(day) && self.from_time <= now.time && now.time <= self.to_time
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            valid_days: decode_app_flags(r)?,
            from_time: decode_app_time(r)?,
            to_time: decode_app_time(r)?,
            recipient: Recipient::decode(r)?,
            process_id: decode_app_unsigned(r)?,
            confirmed: decode_app_boolean(r)?,
            transitions: decode_app_flags(r)?,
        })
    }
}

impl Encode for Destination {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_app_flags(w, self.valid_days)?;
        encode_app_time(w, self.from_time)?;
        encode_app_time(w, self.to_time)?;
        self.recipient.encode(w)?;
        encode_app_unsigned(w, self.process_id)?;
        encode_app_boolean(w, self.confirmed)?;
        encode_app_flags(w, self.transitions)
    }
}

#[cfg(test)]
mod tests {
    use super::{BacnetAddress, Destination, Recipient, MAX_MAC_LEN};
    use crate::encoding::{reader::Reader, writer::Writer, Encode};
    use crate::types::{
        Date, DateTime, DaysOfWeek, EventTransitionBits, ObjectId, ObjectType, Time,
    };
    use crate::{DecodeError, EncodeError};

    fn monday_at(time: Time) -> DateTime {
        DateTime::new(
            Date {
                year_since_1900: 126,
                month: 10,
                day: 19,
                weekday: 1,
            },
            time,
        )
    }

    #[test]
    fn device_destination_bytes() {
        let dest = Destination {
            valid_days: DaysOfWeek::MONDAY | DaysOfWeek::TUESDAY | DaysOfWeek::FRIDAY,
            recipient: Recipient::Device(ObjectId::device(15)),
            process_id: 1,
            confirmed: true,
            transitions: EventTransitionBits::all(),
            ..Destination::default()
        };
        let mut buf = [0u8; 64];
        let n = dest.encode_into(Some(&mut buf)).unwrap();
        assert_eq!(
            &buf[..n],
            &[
                0x82, 0x01, 0xC8, // valid days
                0xB4, 0x00, 0x00, 0x00, 0x00, // from
                0xB4, 0x17, 0x3B, 0x3B, 0x63, // to
                0x0C, 0x02, 0x00, 0x00, 0x0F, // [0] device 15
                0x21, 0x01, // process id
                0x11, // confirmed
                0x82, 0x05, 0xE0, // transitions
            ]
        );
        let mut r = Reader::new(&buf[..n]);
        assert_eq!(Destination::decode(&mut r).unwrap(), dest);
        assert!(r.is_empty());
    }

    #[test]
    fn address_recipient_roundtrip() {
        let dest = Destination {
            recipient: Recipient::Address(BacnetAddress::ipv4(5, [192, 168, 0, 1], 0xBAC0)),
            transitions: EventTransitionBits::TO_FAULT,
            ..Destination::default()
        };
        let mut buf = [0u8; 64];
        let n = dest.encode_into(Some(&mut buf)).unwrap();
        assert_eq!(n, dest.encoded_len().unwrap());
        let mut r = Reader::new(&buf[..n]);
        assert_eq!(Destination::decode(&mut r).unwrap(), dest);
    }

    #[test]
    fn recipient_must_be_a_device_or_an_address() {
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        Recipient::Device(ObjectId::new(ObjectType::AnalogInput, 3))
            .encode(&mut w)
            .unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(
            Recipient::decode(&mut r).unwrap_err(),
            DecodeError::InvalidValue
        );

        let mut r = Reader::new(&[0x21, 0x05]);
        assert_eq!(Recipient::decode(&mut r).unwrap_err(), DecodeError::InvalidTag);
    }

    #[test]
    fn oversized_mac_is_rejected() {
        assert_eq!(
            BacnetAddress::new(1, &[0; MAX_MAC_LEN + 1]).unwrap_err(),
            EncodeError::InvalidLength
        );
        let bytes = [0x1E, 0x21, 0x01, 0x65, 0x08, 0, 0, 0, 0, 0, 0, 0, 0, 0x1F];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            Recipient::decode(&mut r).unwrap_err(),
            DecodeError::InvalidLength
        );
    }

    #[test]
    fn wrapped_recipient() {
        let recipient = Recipient::Address(BacnetAddress::new(0, &[0x10]).unwrap());
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        recipient.encode_ctx(&mut w, 2).unwrap();
        assert_eq!(
            w.as_written(),
            &[0x2E, 0x1E, 0x21, 0x00, 0x61, 0x10, 0x1F, 0x2F]
        );
        let mut r = Reader::new(w.as_written());
        assert_eq!(Recipient::decode_ctx(&mut r, 2).unwrap(), recipient);
    }

    #[test]
    fn default_is_the_wildcard() {
        let dest = Destination::default();
        assert!(dest.is_wildcard());
        assert_eq!(dest.valid_days, DaysOfWeek::all());
        assert!(dest.transitions.is_empty());
    }

    #[test]
    fn acceptance_window() {
        let dest = Destination {
            valid_days: DaysOfWeek::MONDAY,
            from_time: Time::new(8, 0, 0, 0),
            to_time: Time::new(17, 0, 0, 0),
            recipient: Recipient::Device(ObjectId::device(1)),
            transitions: EventTransitionBits::TO_OFFNORMAL,
            ..Destination::default()
        };
        let noon = monday_at(Time::new(12, 0, 0, 0));
        assert!(dest.accepts(EventTransitionBits::TO_OFFNORMAL, noon));
        assert!(!dest.accepts(EventTransitionBits::TO_NORMAL, noon));
        assert!(dest.accepts(
            EventTransitionBits::TO_OFFNORMAL,
            monday_at(Time::new(17, 0, 0, 0))
        ));
        assert!(!dest.accepts(
            EventTransitionBits::TO_OFFNORMAL,
            monday_at(Time::new(17, 0, 0, 1))
        ));

        let mut tuesday = noon;
        tuesday.date.weekday = 2;
        assert!(!dest.accepts(EventTransitionBits::TO_OFFNORMAL, tuesday));
        tuesday.date.weekday = 255;
        assert!(!dest.accepts(EventTransitionBits::TO_OFFNORMAL, tuesday));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_roundtrip() {
        let dest = Destination {
            recipient: Recipient::Address(BacnetAddress::new(7, &[0x0A, 0x0B]).unwrap()),
            transitions: EventTransitionBits::TO_NORMAL,
            ..Destination::default()
        };
        let json = serde_json::to_string(&dest).unwrap();
        assert_eq!(serde_json::from_str::<Destination>(&json).unwrap(), dest);
    }
}
