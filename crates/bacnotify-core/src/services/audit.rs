//! Audit Value and BACnetAuditNotification.
//!
//! Audit notifications are kept by value in Audit Log buffers, so unlike
//! the event notification body they own their strings.

use crate::encoding::{
    primitives::{
        decode_ctx_character_string, decode_ctx_enumerated, decode_ctx_object_id,
        decode_ctx_timestamp, decode_ctx_unsigned, encode_app_boolean, encode_app_double,
        encode_app_enumerated, encode_app_null, encode_app_real, encode_app_signed,
        encode_app_unsigned, encode_closing_tag, encode_ctx_character_string,
        encode_ctx_enumerated, encode_ctx_object_id, encode_ctx_timestamp, encode_ctx_unsigned,
        encode_opening_tag, narrow,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening},
    writer::Writer,
    Encode,
};
use crate::services::{
    decode_optional_constructed, decode_optional_ctx,
    destination::Recipient,
    known,
    property_refs::{decode_priority, PropertyReference},
    value_codec::decode_application_data_value,
};
use crate::types::{AuditOperation, DataValue, ObjectId, TimeStamp};
use crate::{DecodeError, EncodeError};

/// Longest source or target comment kept with a notification, in bytes.
pub const MAX_AUDIT_COMMENT_LEN: usize = 64;

pub type AuditComment = heapless::String<MAX_AUDIT_COMMENT_LEN>;

/// The primitive value recorded as an audit target or current value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuditValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    Enumerated(u32),
}

impl AuditValue {
    /// Equality where two reals match unless one is strictly less or greater
    /// than the other, so a NaN matches any value of its type.
    pub fn same(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Real(a), Self::Real(b)) => !(a < b || a > b),
            (Self::Double(a), Self::Double(b)) => !(a < b || a > b),
            (a, b) => a == b,
        }
    }

    /// Decodes one application-tagged value. Application types outside the
    /// audit subset are unsupported.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(match decode_application_data_value(r)? {
            DataValue::Null => Self::Null,
            DataValue::Boolean(v) => Self::Boolean(v),
            DataValue::Unsigned(v) => Self::Unsigned(v),
            DataValue::Signed(v) => Self::Signed(v),
            DataValue::Real(v) => Self::Real(v),
            DataValue::Double(v) => Self::Double(v),
            DataValue::Enumerated(v) => Self::Enumerated(v),
            _ => return Err(DecodeError::Unsupported),
        })
    }

    pub fn encode_ctx(&self, w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
        encode_opening_tag(w, tag_num)?;
        self.encode(w)?;
        encode_closing_tag(w, tag_num)
    }

    pub fn decode_ctx(r: &mut Reader<'_>, tag_num: u8) -> Result<Self, DecodeError> {
        expect_opening(r, tag_num)?;
        let value = Self::decode(r)?;
        expect_closing(r, tag_num)?;
        Ok(value)
    }
}

impl Encode for AuditValue {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match *self {
            Self::Null => encode_app_null(w),
            Self::Boolean(v) => encode_app_boolean(w, v),
            Self::Unsigned(v) => encode_app_unsigned(w, v),
            Self::Signed(v) => encode_app_signed(w, v),
            Self::Real(v) => encode_app_real(w, v),
            Self::Double(v) => encode_app_double(w, v),
            Self::Enumerated(v) => encode_app_enumerated(w, v),
        }
    }
}

/// BACnetAuditNotification.
///
/// Only the operation and the two devices are required; every `None` field
/// is left off the wire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditNotification {
    pub source_timestamp: Option<TimeStamp>,
    pub target_timestamp: Option<TimeStamp>,
    pub source_device: Recipient,
    pub source_object: Option<ObjectId>,
    pub operation: AuditOperation,
    pub source_comment: Option<AuditComment>,
    pub target_comment: Option<AuditComment>,
    pub invoke_id: Option<u8>,
    pub source_user_id: Option<u16>,
    pub source_user_role: Option<u8>,
    pub target_device: Recipient,
    pub target_object: Option<ObjectId>,
    pub target_property: Option<PropertyReference>,
    pub target_priority: Option<u8>,
    pub target_value: Option<AuditValue>,
    pub current_value: Option<AuditValue>,
    /// BACnet error code of a failed operation.
    pub result: Option<u32>,
}

fn decode_comment(r: &mut Reader<'_>, tag_num: u8) -> Result<AuditComment, DecodeError> {
    let mut comment = AuditComment::new();
    comment
        .push_str(decode_ctx_character_string(r, tag_num)?)
        .map_err(|_| DecodeError::CapacityExceeded)?;
    Ok(comment)
}

fn decode_property_reference(
    r: &mut Reader<'_>,
    tag_num: u8,
) -> Result<PropertyReference, DecodeError> {
    expect_opening(r, tag_num)?;
    let reference = PropertyReference::decode(r)?;
    expect_closing(r, tag_num)?;
    Ok(reference)
}

impl AuditNotification {
    pub fn new(operation: AuditOperation, source_device: Recipient, target_device: Recipient) -> Self {
        Self {
            source_timestamp: None,
            target_timestamp: None,
            source_device,
            source_object: None,
            operation,
            source_comment: None,
            target_comment: None,
            invoke_id: None,
            source_user_id: None,
            source_user_role: None,
            target_device,
            target_object: None,
            target_property: None,
            target_priority: None,
            target_value: None,
            current_value: None,
            result: None,
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let source_timestamp = decode_optional_constructed(r, 0, decode_ctx_timestamp)?;
        let target_timestamp = decode_optional_constructed(r, 1, decode_ctx_timestamp)?;
        let source_device = Recipient::decode_ctx(r, 2)?;
        let source_object = decode_optional_ctx(r, 3, decode_ctx_object_id)?;
        let operation = known(decode_ctx_unsigned(r, 4)?, AuditOperation::from_u32)?;
        let source_comment = decode_optional_ctx(r, 5, decode_comment)?;
        let target_comment = decode_optional_ctx(r, 6, decode_comment)?;
        let invoke_id = decode_optional_ctx(r, 7, decode_ctx_unsigned)?
            .map(narrow::<u8>)
            .transpose()?;
        let source_user_id = decode_optional_ctx(r, 8, decode_ctx_unsigned)?
            .map(narrow::<u16>)
            .transpose()?;
        let source_user_role = decode_optional_ctx(r, 9, decode_ctx_unsigned)?
            .map(narrow::<u8>)
            .transpose()?;
        let target_device = Recipient::decode_ctx(r, 10)?;
        let target_object = decode_optional_ctx(r, 11, decode_ctx_object_id)?;
        let target_property = decode_optional_constructed(r, 12, decode_property_reference)?;
        let target_priority = decode_optional_ctx(r, 13, decode_ctx_unsigned)?
            .map(decode_priority)
            .transpose()?;
        let target_value = decode_optional_constructed(r, 14, AuditValue::decode_ctx)?;
        let current_value = decode_optional_constructed(r, 15, AuditValue::decode_ctx)?;
        let result = decode_optional_ctx(r, 16, decode_ctx_enumerated)?;

        Ok(Self {
            source_timestamp,
            target_timestamp,
            source_device,
            source_object,
            operation,
            source_comment,
            target_comment,
            invoke_id,
            source_user_id,
            source_user_role,
            target_device,
            target_object,
            target_property,
            target_priority,
            target_value,
            current_value,
            result,
        })
    }

    /// Decodes a notification wrapped in opening/closing tag `tag_num`.
    pub fn decode_ctx(r: &mut Reader<'_>, tag_num: u8) -> Result<Self, DecodeError> {
        expect_opening(r, tag_num)?;
        let notification = Self::decode(r)?;
        expect_closing(r, tag_num)?;
        Ok(notification)
    }
}

impl Encode for AuditNotification {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some(ts) = self.source_timestamp {
            encode_ctx_timestamp(w, 0, ts)?;
        }
        if let Some(ts) = self.target_timestamp {
            encode_ctx_timestamp(w, 1, ts)?;
        }
        self.source_device.encode_ctx(w, 2)?;
        if let Some(id) = self.source_object {
            encode_ctx_object_id(w, 3, id)?;
        }
        encode_ctx_unsigned(w, 4, self.operation.to_u32())?;
        if let Some(comment) = &self.source_comment {
            encode_ctx_character_string(w, 5, comment)?;
        }
        if let Some(comment) = &self.target_comment {
            encode_ctx_character_string(w, 6, comment)?;
        }
        if let Some(invoke_id) = self.invoke_id {
            encode_ctx_unsigned(w, 7, u32::from(invoke_id))?;
        }
        if let Some(user_id) = self.source_user_id {
            encode_ctx_unsigned(w, 8, u32::from(user_id))?;
        }
        if let Some(role) = self.source_user_role {
            encode_ctx_unsigned(w, 9, u32::from(role))?;
        }
        self.target_device.encode_ctx(w, 10)?;
        if let Some(id) = self.target_object {
            encode_ctx_object_id(w, 11, id)?;
        }
        if let Some(reference) = &self.target_property {
            encode_opening_tag(w, 12)?;
            reference.encode(w)?;
            encode_closing_tag(w, 12)?;
        }
        if let Some(priority) = self.target_priority {
            if !(1..=16).contains(&priority) {
                return Err(EncodeError::ValueOutOfRange);
            }
            encode_ctx_unsigned(w, 13, u32::from(priority))?;
        }
        if let Some(value) = &self.target_value {
            value.encode_ctx(w, 14)?;
        }
        if let Some(value) = &self.current_value {
            value.encode_ctx(w, 15)?;
        }
        if let Some(code) = self.result {
            encode_ctx_enumerated(w, 16, code)?;
        }
        Ok(())
    }
}
