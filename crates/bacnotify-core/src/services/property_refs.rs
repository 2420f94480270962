//! Small constructed types shared by the notification and audit codecs.

use crate::encoding::{
    primitives::{
        decode_ctx_boolean, decode_ctx_object_id, decode_ctx_octet_string, decode_ctx_signed,
        decode_ctx_unsigned, decode_unsigned, encode_closing_tag, encode_ctx_boolean,
        encode_ctx_enumerated, encode_ctx_object_id, encode_ctx_octet_string, encode_ctx_signed,
        encode_ctx_unsigned, encode_opening_tag, narrow,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening, Tag},
    writer::Writer,
};
use crate::services::{
    decode_optional_ctx,
    value_codec::{decode_application_data_value, encode_application_data_value},
};
use crate::types::{DataValue, ObjectId, ObjectType, PropertyId};
use crate::{DecodeError, EncodeError};

/// BACnetPropertyReference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyReference {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl PropertyReference {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_enumerated(w, 0, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, 1, index)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 0)?);
        let array_index = decode_optional_ctx(r, 1, decode_ctx_unsigned)?;
        Ok(Self {
            property_id,
            array_index,
        })
    }
}

/// BACnetDeviceObjectPropertyReference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceObjectPropertyReference {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub device_id: Option<ObjectId>,
}

impl DeviceObjectPropertyReference {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_ctx_enumerated(w, 1, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, 2, index)?;
        }
        if let Some(device_id) = self.device_id {
            encode_ctx_object_id(w, 3, device_id)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_ctx_object_id(r, 0)?,
            property_id: PropertyId::from_u32(decode_ctx_unsigned(r, 1)?),
            array_index: decode_optional_ctx(r, 2, decode_ctx_unsigned)?,
            device_id: decode_optional_ctx(r, 3, decode_ctx_object_id)?,
        })
    }
}

/// BACnetDeviceObjectReference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceObjectReference {
    pub device_id: Option<ObjectId>,
    pub object_id: ObjectId,
}

impl DeviceObjectReference {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some(device_id) = self.device_id {
            encode_ctx_object_id(w, 0, device_id)?;
        }
        encode_ctx_object_id(w, 1, self.object_id)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            device_id: decode_optional_ctx(r, 0, decode_ctx_object_id)?,
            object_id: decode_ctx_object_id(r, 1)?,
        })
    }
}

/// BACnetPropertyValue carrying a single application-tagged value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyValue<'a> {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: DataValue<'a>,
    pub priority: Option<u8>,
}

impl<'a> PropertyValue<'a> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_enumerated(w, 0, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, 1, index)?;
        }
        encode_opening_tag(w, 2)?;
        encode_application_data_value(w, &self.value)?;
        encode_closing_tag(w, 2)?;
        if let Some(priority) = self.priority {
            if !(1..=16).contains(&priority) {
                return Err(EncodeError::ValueOutOfRange);
            }
            encode_ctx_unsigned(w, 3, priority as u32)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 0)?);
        let array_index = decode_optional_ctx(r, 1, decode_ctx_unsigned)?;
        expect_opening(r, 2)?;
        let value = decode_application_data_value(r)?;
        expect_closing(r, 2)?;
        let priority = match decode_optional_ctx(r, 3, decode_ctx_unsigned)? {
            Some(p @ 1..=16) => Some(p as u8),
            Some(_) => return Err(DecodeError::ValueOutOfRange),
            None => None,
        };
        Ok(Self {
            property_id,
            array_index,
            value,
            priority,
        })
    }
}

/// BACnetDeviceObjectPropertyValue, the `propertyValue` choice of an
/// extended event's parameter list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceObjectPropertyValue<'a> {
    pub device_id: ObjectId,
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: DataValue<'a>,
}

impl<'a> DeviceObjectPropertyValue<'a> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.device_id)?;
        encode_ctx_object_id(w, 1, self.object_id)?;
        encode_ctx_enumerated(w, 2, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, 3, index)?;
        }
        encode_opening_tag(w, 4)?;
        encode_application_data_value(w, &self.value)?;
        encode_closing_tag(w, 4)
    }

    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let device_id = decode_ctx_object_id(r, 0)?;
        let object_id = decode_ctx_object_id(r, 1)?;
        let property_id = PropertyId::from_u32(decode_ctx_unsigned(r, 2)?);
        let array_index = decode_optional_ctx(r, 3, decode_ctx_unsigned)?;
        expect_opening(r, 4)?;
        let value = decode_application_data_value(r)?;
        expect_closing(r, 4)?;
        Ok(Self {
            device_id,
            object_id,
            property_id,
            array_index,
            value,
        })
    }
}

/// BACnetAuthenticationFactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationFactor<'a> {
    pub format_type: u32,
    pub format_class: u32,
    pub value: &'a [u8],
}

impl<'a> AuthenticationFactor<'a> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_enumerated(w, 0, self.format_type)?;
        encode_ctx_unsigned(w, 1, self.format_class)?;
        encode_ctx_octet_string(w, 2, self.value)
    }

    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        Ok(Self {
            format_type: decode_ctx_unsigned(r, 0)?,
            format_class: decode_ctx_unsigned(r, 1)?,
            value: decode_ctx_octet_string(r, 2)?,
        })
    }
}

/// BACnetPropertyStates as carried by change-of-state notifications.
///
/// Choice 0 is a boolean and choice 36 a signed integer; every other choice
/// is an enumeration or unsigned value and keeps its choice number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStates {
    BooleanValue(bool),
    IntegerValue(i32),
    Enumerated { choice: u8, value: u32 },
}

impl PropertyStates {
    pub const BOOLEAN_VALUE: u8 = 0;
    pub const BINARY_VALUE: u8 = 1;
    pub const EVENT_TYPE: u8 = 2;
    pub const POLARITY: u8 = 3;
    pub const PROGRAM_CHANGE: u8 = 4;
    pub const PROGRAM_STATE: u8 = 5;
    pub const REASON_FOR_HALT: u8 = 6;
    pub const RELIABILITY: u8 = 7;
    pub const STATE: u8 = 8;
    pub const SYSTEM_STATUS: u8 = 9;
    pub const UNITS: u8 = 10;
    pub const UNSIGNED_VALUE: u8 = 11;
    pub const LIFE_SAFETY_MODE: u8 = 12;
    pub const LIFE_SAFETY_STATE: u8 = 13;
    pub const INTEGER_VALUE: u8 = 36;

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match *self {
            Self::BooleanValue(v) => encode_ctx_boolean(w, Self::BOOLEAN_VALUE, v),
            Self::IntegerValue(v) => encode_ctx_signed(w, Self::INTEGER_VALUE, v),
            Self::Enumerated { choice, value } => {
                if choice == Self::BOOLEAN_VALUE || choice == Self::INTEGER_VALUE {
                    return Err(EncodeError::ValueOutOfRange);
                }
                encode_ctx_enumerated(w, choice, value)
            }
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match Tag::peek(r)? {
            Tag::Context {
                tag_num: Self::BOOLEAN_VALUE,
                ..
            } => Ok(Self::BooleanValue(decode_ctx_boolean(r, Self::BOOLEAN_VALUE)?)),
            Tag::Context {
                tag_num: Self::INTEGER_VALUE,
                ..
            } => Ok(Self::IntegerValue(decode_ctx_signed(r, Self::INTEGER_VALUE)?)),
            Tag::Context { tag_num, len } => {
                Tag::decode(r)?;
                Ok(Self::Enumerated {
                    choice: tag_num,
                    value: decode_unsigned(r, len as usize)?,
                })
            }
            _ => Err(DecodeError::InvalidTag),
        }
    }
}

/// Requires `id` to name a device object.
pub(crate) fn require_device(id: ObjectId) -> Result<ObjectId, DecodeError> {
    if id.object_type() == ObjectType::Device {
        Ok(id)
    } else {
        Err(DecodeError::InvalidValue)
    }
}

/// Narrows a decoded priority into 1..=16.
pub(crate) fn decode_priority(value: u32) -> Result<u8, DecodeError> {
    match narrow::<u8>(value)? {
        p @ 1..=16 => Ok(p),
        _ => Err(DecodeError::ValueOutOfRange),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AuthenticationFactor, DeviceObjectPropertyReference, DeviceObjectPropertyValue,
        PropertyStates, PropertyValue,
    };
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{DataValue, ObjectId, ObjectType, PropertyId};
    use crate::DecodeError;

    #[test]
    fn property_states_choices() {
        for state in [
            PropertyStates::BooleanValue(true),
            PropertyStates::IntegerValue(-40),
            PropertyStates::Enumerated {
                choice: PropertyStates::BINARY_VALUE,
                value: 1,
            },
            PropertyStates::Enumerated {
                choice: PropertyStates::UNSIGNED_VALUE,
                value: 900,
            },
        ] {
            let mut buf = [0u8; 16];
            let mut w = Writer::new(&mut buf);
            state.encode(&mut w).unwrap();
            let mut r = Reader::new(w.as_written());
            assert_eq!(PropertyStates::decode(&mut r).unwrap(), state);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn integer_state_uses_extended_tag_number() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        PropertyStates::IntegerValue(5).encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0xF9, 36, 0x05]);
    }

    #[test]
    fn property_value_with_priority() {
        let value = PropertyValue {
            property_id: PropertyId::PresentValue,
            array_index: None,
            value: DataValue::Real(21.5),
            priority: Some(8),
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        value.encode(&mut w).unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(PropertyValue::decode(&mut r).unwrap(), value);
    }

    #[test]
    fn property_value_priority_out_of_range() {
        // [0] 85, [2] { app unsigned 1 }, [3] 17
        let bytes = [0x09, 0x55, 0x2E, 0x21, 0x01, 0x2F, 0x39, 0x11];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            PropertyValue::decode(&mut r).unwrap_err(),
            DecodeError::ValueOutOfRange
        );
    }

    #[test]
    fn references_roundtrip() {
        let reference = DeviceObjectPropertyReference {
            object_id: ObjectId::new(ObjectType::TrendLog, 2),
            property_id: PropertyId::LogBuffer,
            array_index: None,
            device_id: Some(ObjectId::device(99)),
        };
        let factor = AuthenticationFactor {
            format_type: 2,
            format_class: 1,
            value: &[0xAA, 0x55],
        };
        let device_value = DeviceObjectPropertyValue {
            device_id: ObjectId::device(1),
            object_id: ObjectId::new(ObjectType::AnalogValue, 4),
            property_id: PropertyId::PresentValue,
            array_index: Some(1),
            value: DataValue::Unsigned(3),
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        reference.encode(&mut w).unwrap();
        factor.encode(&mut w).unwrap();
        device_value.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(DeviceObjectPropertyReference::decode(&mut r).unwrap(), reference);
        assert_eq!(AuthenticationFactor::decode(&mut r).unwrap(), factor);
        assert_eq!(DeviceObjectPropertyValue::decode(&mut r).unwrap(), device_value);
        assert!(r.is_empty());
    }
}
