//! BACnetNotificationParameters: the event-values union of an
//! EventNotification, one arm per event algorithm.
//!
//! Every arm is wrapped in an opening/closing tag whose number is the event
//! type, except the complex-event-type arm which always uses tag 6 and is
//! shared by all proprietary event types.

use heapless::Vec;

use crate::encoding::{
    primitives::{
        decode_ctx_bit_string, decode_ctx_character_string, decode_ctx_datetime,
        decode_ctx_double, decode_ctx_enumerated, decode_ctx_flags, decode_ctx_real,
        decode_ctx_signed, decode_ctx_timestamp, decode_ctx_unsigned, encode_closing_tag,
        encode_ctx_bit_string, encode_ctx_character_string, encode_ctx_datetime,
        encode_ctx_double, encode_ctx_enumerated, encode_ctx_flags, encode_ctx_null,
        encode_ctx_real, encode_ctx_signed, encode_ctx_timestamp, encode_ctx_unsigned,
        encode_opening_tag, narrow,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening, next_is_closing, next_is_opening, Tag},
    writer::Writer,
};
use crate::services::{
    decode_optional_ctx,
    property_refs::{
        AuthenticationFactor, DeviceObjectPropertyReference, DeviceObjectPropertyValue,
        DeviceObjectReference, PropertyStates, PropertyValue,
    },
    value_codec::{decode_application_data_value, encode_application_data_value},
};
use crate::types::{BitString, DataValue, DateTime, EventType, StatusFlags, TimeStamp};
use crate::{DecodeError, EncodeError};

/// Most property values kept for a complex-event-type, change-of-reliability
/// or extended notification.
pub const MAX_COMPLEX_EVENT_PARAMETERS: usize = 5;

/// Inner tag number of the complex-event-type arm.
pub const COMPLEX_EVENT_TYPE_TAG: u8 = 6;

pub type PropertyValues<'a> = Vec<PropertyValue<'a>, MAX_COMPLEX_EVENT_PARAMETERS>;
pub type ExtendedParameters<'a> = Vec<ExtendedParameter<'a>, MAX_COMPLEX_EVENT_PARAMETERS>;

/// New value reported by a change-of-value notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeOfValueNew<'a> {
    ChangedBits(BitString<'a>),
    ChangedValue(f32),
}

/// New value reported by a change-of-discrete-value notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscreteValue<'a> {
    Value(DataValue<'a>),
    DateTime(DateTime),
}

/// One entry of an extended notification's parameter list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtendedParameter<'a> {
    Value(DataValue<'a>),
    PropertyValue(DeviceObjectPropertyValue<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationParameters<'a> {
    ChangeOfBitstring {
        referenced_bitstring: BitString<'a>,
        status_flags: StatusFlags,
    },
    ChangeOfState {
        new_state: PropertyStates,
        status_flags: StatusFlags,
    },
    ChangeOfValue {
        new_value: ChangeOfValueNew<'a>,
        status_flags: StatusFlags,
    },
    CommandFailure {
        command_value: DataValue<'a>,
        status_flags: StatusFlags,
        feedback_value: DataValue<'a>,
    },
    FloatingLimit {
        reference_value: f32,
        status_flags: StatusFlags,
        setpoint_value: f32,
        error_limit: f32,
    },
    OutOfRange {
        exceeding_value: f32,
        status_flags: StatusFlags,
        deadband: f32,
        exceeded_limit: f32,
    },
    /// Used by complex-event-type and by every proprietary event type.
    ComplexEventType(PropertyValues<'a>),
    ChangeOfLifeSafety {
        new_state: u32,
        new_mode: u32,
        status_flags: StatusFlags,
        operation_expected: u32,
    },
    Extended {
        vendor_id: u16,
        extended_event_type: u32,
        parameters: ExtendedParameters<'a>,
    },
    BufferReady {
        buffer_property: DeviceObjectPropertyReference,
        previous_notification: u32,
        current_notification: u32,
    },
    UnsignedRange {
        exceeding_value: u32,
        status_flags: StatusFlags,
        exceeded_limit: u32,
    },
    AccessEvent {
        access_event: u32,
        status_flags: StatusFlags,
        access_event_tag: u32,
        access_event_time: TimeStamp,
        access_credential: DeviceObjectReference,
        authentication_factor: Option<AuthenticationFactor<'a>>,
    },
    DoubleOutOfRange {
        exceeding_value: f64,
        status_flags: StatusFlags,
        deadband: f64,
        exceeded_limit: f64,
    },
    SignedOutOfRange {
        exceeding_value: i32,
        status_flags: StatusFlags,
        deadband: u32,
        exceeded_limit: i32,
    },
    UnsignedOutOfRange {
        exceeding_value: u32,
        status_flags: StatusFlags,
        deadband: u32,
        exceeded_limit: u32,
    },
    ChangeOfCharacterstring {
        changed_value: &'a str,
        status_flags: StatusFlags,
        alarm_value: &'a str,
    },
    ChangeOfStatusFlags {
        present_value: Option<DataValue<'a>>,
        referenced_flags: StatusFlags,
    },
    ChangeOfReliability {
        reliability: u32,
        status_flags: StatusFlags,
        property_values: PropertyValues<'a>,
    },
    None,
    ChangeOfDiscreteValue {
        new_value: DiscreteValue<'a>,
        status_flags: StatusFlags,
    },
    ChangeOfTimer {
        new_state: u32,
        status_flags: StatusFlags,
        update_time: DateTime,
        last_state_change: Option<u32>,
        initial_timeout: Option<u32>,
        expiration_time: Option<DateTime>,
    },
}

impl<'a> NotificationParameters<'a> {
    /// Tag number wrapping this arm inside event-values.
    pub const fn inner_tag(&self) -> u8 {
        match self {
            Self::ChangeOfBitstring { .. } => 0,
            Self::ChangeOfState { .. } => 1,
            Self::ChangeOfValue { .. } => 2,
            Self::CommandFailure { .. } => 3,
            Self::FloatingLimit { .. } => 4,
            Self::OutOfRange { .. } => 5,
            Self::ComplexEventType(_) => COMPLEX_EVENT_TYPE_TAG,
            Self::ChangeOfLifeSafety { .. } => 8,
            Self::Extended { .. } => 9,
            Self::BufferReady { .. } => 10,
            Self::UnsignedRange { .. } => 11,
            Self::AccessEvent { .. } => 13,
            Self::DoubleOutOfRange { .. } => 14,
            Self::SignedOutOfRange { .. } => 15,
            Self::UnsignedOutOfRange { .. } => 16,
            Self::ChangeOfCharacterstring { .. } => 17,
            Self::ChangeOfStatusFlags { .. } => 18,
            Self::ChangeOfReliability { .. } => 19,
            Self::None => 20,
            Self::ChangeOfDiscreteValue { .. } => 21,
            Self::ChangeOfTimer { .. } => 22,
        }
    }

    /// True when this arm may accompany `event_type`.
    pub fn fits(&self, event_type: EventType) -> bool {
        if !event_type.is_valid() {
            return false;
        }
        match self {
            Self::ComplexEventType(_) => event_type.uses_complex_parameters(),
            _ => {
                !event_type.uses_complex_parameters()
                    && event_type.to_u32() == self.inner_tag() as u32
            }
        }
    }

    /// Writes the arm including its inner opening and closing tags.
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let tag = self.inner_tag();
        if let Self::None = self {
            return encode_ctx_null(w, tag);
        }

        encode_opening_tag(w, tag)?;
        match self {
            Self::ChangeOfBitstring {
                referenced_bitstring,
                status_flags,
            } => {
                encode_ctx_bit_string(w, 0, *referenced_bitstring)?;
                encode_ctx_flags(w, 1, *status_flags)?;
            }
            Self::ChangeOfState {
                new_state,
                status_flags,
            } => {
                encode_opening_tag(w, 0)?;
                new_state.encode(w)?;
                encode_closing_tag(w, 0)?;
                encode_ctx_flags(w, 1, *status_flags)?;
            }
            Self::ChangeOfValue {
                new_value,
                status_flags,
            } => {
                encode_opening_tag(w, 0)?;
                match new_value {
                    ChangeOfValueNew::ChangedBits(bits) => encode_ctx_bit_string(w, 0, *bits)?,
                    ChangeOfValueNew::ChangedValue(value) => encode_ctx_real(w, 1, *value)?,
                }
                encode_closing_tag(w, 0)?;
                encode_ctx_flags(w, 1, *status_flags)?;
            }
            Self::CommandFailure {
                command_value,
                status_flags,
                feedback_value,
            } => {
                encode_wrapped_value(w, 0, command_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_wrapped_value(w, 2, feedback_value)?;
            }
            Self::FloatingLimit {
                reference_value,
                status_flags,
                setpoint_value,
                error_limit,
            } => {
                encode_ctx_real(w, 0, *reference_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_real(w, 2, *setpoint_value)?;
                encode_ctx_real(w, 3, *error_limit)?;
            }
            Self::OutOfRange {
                exceeding_value,
                status_flags,
                deadband,
                exceeded_limit,
            } => {
                encode_ctx_real(w, 0, *exceeding_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_real(w, 2, *deadband)?;
                encode_ctx_real(w, 3, *exceeded_limit)?;
            }
            Self::ComplexEventType(values) => {
                for value in values {
                    value.encode(w)?;
                }
            }
            Self::ChangeOfLifeSafety {
                new_state,
                new_mode,
                status_flags,
                operation_expected,
            } => {
                encode_ctx_enumerated(w, 0, *new_state)?;
                encode_ctx_enumerated(w, 1, *new_mode)?;
                encode_ctx_flags(w, 2, *status_flags)?;
                encode_ctx_enumerated(w, 3, *operation_expected)?;
            }
            Self::Extended {
                vendor_id,
                extended_event_type,
                parameters,
            } => {
                encode_ctx_unsigned(w, 0, *vendor_id as u32)?;
                encode_ctx_unsigned(w, 1, *extended_event_type)?;
                encode_opening_tag(w, 2)?;
                for parameter in parameters {
                    match parameter {
                        ExtendedParameter::Value(value) => encode_application_data_value(w, value)?,
                        ExtendedParameter::PropertyValue(value) => {
                            encode_opening_tag(w, 0)?;
                            value.encode(w)?;
                            encode_closing_tag(w, 0)?;
                        }
                    }
                }
                encode_closing_tag(w, 2)?;
            }
            Self::BufferReady {
                buffer_property,
                previous_notification,
                current_notification,
            } => {
                encode_opening_tag(w, 0)?;
                buffer_property.encode(w)?;
                encode_closing_tag(w, 0)?;
                encode_ctx_unsigned(w, 1, *previous_notification)?;
                encode_ctx_unsigned(w, 2, *current_notification)?;
            }
            Self::UnsignedRange {
                exceeding_value,
                status_flags,
                exceeded_limit,
            } => {
                encode_ctx_unsigned(w, 0, *exceeding_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_unsigned(w, 2, *exceeded_limit)?;
            }
            Self::AccessEvent {
                access_event,
                status_flags,
                access_event_tag,
                access_event_time,
                access_credential,
                authentication_factor,
            } => {
                encode_ctx_enumerated(w, 0, *access_event)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_unsigned(w, 2, *access_event_tag)?;
                encode_ctx_timestamp(w, 3, *access_event_time)?;
                encode_opening_tag(w, 4)?;
                access_credential.encode(w)?;
                encode_closing_tag(w, 4)?;
                if let Some(factor) = authentication_factor {
                    encode_opening_tag(w, 5)?;
                    factor.encode(w)?;
                    encode_closing_tag(w, 5)?;
                }
            }
            Self::DoubleOutOfRange {
                exceeding_value,
                status_flags,
                deadband,
                exceeded_limit,
            } => {
                encode_ctx_double(w, 0, *exceeding_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_double(w, 2, *deadband)?;
                encode_ctx_double(w, 3, *exceeded_limit)?;
            }
            Self::SignedOutOfRange {
                exceeding_value,
                status_flags,
                deadband,
                exceeded_limit,
            } => {
                encode_ctx_signed(w, 0, *exceeding_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_unsigned(w, 2, *deadband)?;
                encode_ctx_signed(w, 3, *exceeded_limit)?;
            }
            Self::UnsignedOutOfRange {
                exceeding_value,
                status_flags,
                deadband,
                exceeded_limit,
            } => {
                encode_ctx_unsigned(w, 0, *exceeding_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_unsigned(w, 2, *deadband)?;
                encode_ctx_unsigned(w, 3, *exceeded_limit)?;
            }
            Self::ChangeOfCharacterstring {
                changed_value,
                status_flags,
                alarm_value,
            } => {
                encode_ctx_character_string(w, 0, changed_value)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_character_string(w, 2, alarm_value)?;
            }
            Self::ChangeOfStatusFlags {
                present_value,
                referenced_flags,
            } => {
                if let Some(value) = present_value {
                    encode_wrapped_value(w, 0, value)?;
                }
                encode_ctx_flags(w, 1, *referenced_flags)?;
            }
            Self::ChangeOfReliability {
                reliability,
                status_flags,
                property_values,
            } => {
                encode_ctx_enumerated(w, 0, *reliability)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_opening_tag(w, 2)?;
                for value in property_values {
                    value.encode(w)?;
                }
                encode_closing_tag(w, 2)?;
            }
            Self::ChangeOfDiscreteValue {
                new_value,
                status_flags,
            } => {
                encode_opening_tag(w, 0)?;
                match new_value {
                    DiscreteValue::Value(value) => encode_application_data_value(w, value)?,
                    DiscreteValue::DateTime(datetime) => encode_ctx_datetime(w, 0, *datetime)?,
                }
                encode_closing_tag(w, 0)?;
                encode_ctx_flags(w, 1, *status_flags)?;
            }
            Self::ChangeOfTimer {
                new_state,
                status_flags,
                update_time,
                last_state_change,
                initial_timeout,
                expiration_time,
            } => {
                encode_ctx_enumerated(w, 0, *new_state)?;
                encode_ctx_flags(w, 1, *status_flags)?;
                encode_ctx_datetime(w, 2, *update_time)?;
                if let Some(transition) = last_state_change {
                    encode_ctx_enumerated(w, 3, *transition)?;
                }
                if let Some(timeout) = initial_timeout {
                    encode_ctx_unsigned(w, 4, *timeout)?;
                }
                if let Some(expiration) = expiration_time {
                    encode_ctx_datetime(w, 5, *expiration)?;
                }
            }
            Self::None => {}
        }
        encode_closing_tag(w, tag)
    }

    /// Decodes one arm, starting at its inner tag, for a notification whose
    /// event-type field is `event_type`.
    pub fn decode(r: &mut Reader<'a>, event_type: EventType) -> Result<Self, DecodeError> {
        let tag = Tag::decode(r)?;
        if matches!(tag, Tag::Context { tag_num: 20, len: 0 }) && event_type == EventType::None {
            return Ok(Self::None);
        }
        let Tag::Opening { tag_num } = tag else {
            return Err(DecodeError::InvalidTag);
        };

        let params = if tag_num == COMPLEX_EVENT_TYPE_TAG {
            Self::ComplexEventType(decode_property_values(r, COMPLEX_EVENT_TYPE_TAG)?)
        } else if event_type.uses_complex_parameters() {
            return Err(DecodeError::Unsupported);
        } else if tag_num as u32 != event_type.to_u32() {
            return Err(DecodeError::InvalidTag);
        } else {
            Self::decode_arm(r, event_type)?
        };

        expect_closing(r, tag_num)?;
        Ok(params)
    }

    fn decode_arm(r: &mut Reader<'a>, event_type: EventType) -> Result<Self, DecodeError> {
        Ok(match event_type {
            EventType::ChangeOfBitstring => Self::ChangeOfBitstring {
                referenced_bitstring: decode_ctx_bit_string(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
            },
            EventType::ChangeOfState => {
                expect_opening(r, 0)?;
                let new_state = PropertyStates::decode(r)?;
                expect_closing(r, 0)?;
                Self::ChangeOfState {
                    new_state,
                    status_flags: decode_ctx_flags(r, 1)?,
                }
            }
            EventType::ChangeOfValue => {
                expect_opening(r, 0)?;
                let new_value = match Tag::peek(r)? {
                    Tag::Context { tag_num: 0, .. } => {
                        ChangeOfValueNew::ChangedBits(decode_ctx_bit_string(r, 0)?)
                    }
                    Tag::Context { tag_num: 1, .. } => {
                        ChangeOfValueNew::ChangedValue(decode_ctx_real(r, 1)?)
                    }
                    _ => return Err(DecodeError::InvalidTag),
                };
                expect_closing(r, 0)?;
                Self::ChangeOfValue {
                    new_value,
                    status_flags: decode_ctx_flags(r, 1)?,
                }
            }
            EventType::CommandFailure => Self::CommandFailure {
                command_value: decode_wrapped_value(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                feedback_value: decode_wrapped_value(r, 2)?,
            },
            EventType::FloatingLimit => Self::FloatingLimit {
                reference_value: decode_ctx_real(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                setpoint_value: decode_ctx_real(r, 2)?,
                error_limit: decode_ctx_real(r, 3)?,
            },
            EventType::OutOfRange => Self::OutOfRange {
                exceeding_value: decode_ctx_real(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                deadband: decode_ctx_real(r, 2)?,
                exceeded_limit: decode_ctx_real(r, 3)?,
            },
            EventType::ChangeOfLifeSafety => Self::ChangeOfLifeSafety {
                new_state: decode_ctx_enumerated(r, 0)?,
                new_mode: decode_ctx_enumerated(r, 1)?,
                status_flags: decode_ctx_flags(r, 2)?,
                operation_expected: decode_ctx_enumerated(r, 3)?,
            },
            EventType::Extended => {
                let vendor_id = narrow(decode_ctx_unsigned(r, 0)?)?;
                let extended_event_type = decode_ctx_unsigned(r, 1)?;
                expect_opening(r, 2)?;
                let mut parameters = Vec::new();
                while !next_is_closing(r, 2) {
                    let parameter = if next_is_opening(r, 0) {
                        expect_opening(r, 0)?;
                        let value = DeviceObjectPropertyValue::decode(r)?;
                        expect_closing(r, 0)?;
                        ExtendedParameter::PropertyValue(value)
                    } else {
                        ExtendedParameter::Value(decode_application_data_value(r)?)
                    };
                    parameters
                        .push(parameter)
                        .map_err(|_| DecodeError::CapacityExceeded)?;
                }
                expect_closing(r, 2)?;
                Self::Extended {
                    vendor_id,
                    extended_event_type,
                    parameters,
                }
            }
            EventType::BufferReady => {
                expect_opening(r, 0)?;
                let buffer_property = DeviceObjectPropertyReference::decode(r)?;
                expect_closing(r, 0)?;
                Self::BufferReady {
                    buffer_property,
                    previous_notification: decode_ctx_unsigned(r, 1)?,
                    current_notification: decode_ctx_unsigned(r, 2)?,
                }
            }
            EventType::UnsignedRange => Self::UnsignedRange {
                exceeding_value: decode_ctx_unsigned(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                exceeded_limit: decode_ctx_unsigned(r, 2)?,
            },
            EventType::AccessEvent => {
                let access_event = decode_ctx_enumerated(r, 0)?;
                let status_flags = decode_ctx_flags(r, 1)?;
                let access_event_tag = decode_ctx_unsigned(r, 2)?;
                let access_event_time = decode_ctx_timestamp(r, 3)?;
                expect_opening(r, 4)?;
                let access_credential = DeviceObjectReference::decode(r)?;
                expect_closing(r, 4)?;
                let authentication_factor = if next_is_opening(r, 5) {
                    expect_opening(r, 5)?;
                    let factor = AuthenticationFactor::decode(r)?;
                    expect_closing(r, 5)?;
                    Some(factor)
                } else {
                    None
                };
                Self::AccessEvent {
                    access_event,
                    status_flags,
                    access_event_tag,
                    access_event_time,
                    access_credential,
                    authentication_factor,
                }
            }
            EventType::DoubleOutOfRange => Self::DoubleOutOfRange {
                exceeding_value: decode_ctx_double(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                deadband: decode_ctx_double(r, 2)?,
                exceeded_limit: decode_ctx_double(r, 3)?,
            },
            EventType::SignedOutOfRange => Self::SignedOutOfRange {
                exceeding_value: decode_ctx_signed(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                deadband: decode_ctx_unsigned(r, 2)?,
                exceeded_limit: decode_ctx_signed(r, 3)?,
            },
            EventType::UnsignedOutOfRange => Self::UnsignedOutOfRange {
                exceeding_value: decode_ctx_unsigned(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                deadband: decode_ctx_unsigned(r, 2)?,
                exceeded_limit: decode_ctx_unsigned(r, 3)?,
            },
            EventType::ChangeOfCharacterstring => Self::ChangeOfCharacterstring {
                changed_value: decode_ctx_character_string(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                alarm_value: decode_ctx_character_string(r, 2)?,
            },
            EventType::ChangeOfStatusFlags => {
                let present_value = if next_is_opening(r, 0) {
                    Some(decode_wrapped_value(r, 0)?)
                } else {
                    None
                };
                Self::ChangeOfStatusFlags {
                    present_value,
                    referenced_flags: decode_ctx_flags(r, 1)?,
                }
            }
            EventType::ChangeOfReliability => Self::ChangeOfReliability {
                reliability: decode_ctx_enumerated(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                property_values: {
                    expect_opening(r, 2)?;
                    decode_property_values(r, 2)?
                },
            },
            // The empty form with opening and closing tags.
            EventType::None => Self::None,
            EventType::ChangeOfDiscreteValue => {
                expect_opening(r, 0)?;
                let new_value = if next_is_opening(r, 0) {
                    DiscreteValue::DateTime(decode_ctx_datetime(r, 0)?)
                } else {
                    DiscreteValue::Value(decode_application_data_value(r)?)
                };
                expect_closing(r, 0)?;
                Self::ChangeOfDiscreteValue {
                    new_value,
                    status_flags: decode_ctx_flags(r, 1)?,
                }
            }
            EventType::ChangeOfTimer => Self::ChangeOfTimer {
                new_state: decode_ctx_enumerated(r, 0)?,
                status_flags: decode_ctx_flags(r, 1)?,
                update_time: decode_ctx_datetime(r, 2)?,
                last_state_change: decode_optional_ctx(r, 3, decode_ctx_enumerated)?,
                initial_timeout: decode_optional_ctx(r, 4, decode_ctx_unsigned)?,
                expiration_time: if next_is_opening(r, 5) {
                    Some(decode_ctx_datetime(r, 5)?)
                } else {
                    None
                },
            },
            EventType::ComplexEventType | EventType::Proprietary(_) => {
                return Err(DecodeError::Unsupported)
            }
        })
    }
}

fn encode_wrapped_value(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &DataValue<'_>,
) -> Result<(), EncodeError> {
    encode_opening_tag(w, tag_num)?;
    encode_application_data_value(w, value)?;
    encode_closing_tag(w, tag_num)
}

fn decode_wrapped_value<'a>(r: &mut Reader<'a>, tag_num: u8) -> Result<DataValue<'a>, DecodeError> {
    expect_opening(r, tag_num)?;
    let value = decode_application_data_value(r)?;
    expect_closing(r, tag_num)?;
    Ok(value)
}

/// Reads property values up to, but not including, closing tag `tag_num`.
fn decode_property_values<'a>(
    r: &mut Reader<'a>,
    tag_num: u8,
) -> Result<PropertyValues<'a>, DecodeError> {
    let mut values = Vec::new();
    while !next_is_closing(r, tag_num) {
        let value = PropertyValue::decode(r)?;
        values
            .push(value)
            .map_err(|_| DecodeError::CapacityExceeded)?;
    }
    Ok(values)
}
