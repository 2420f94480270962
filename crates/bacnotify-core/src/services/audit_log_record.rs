//! BACnetAuditLogRecord, one entry of an Audit Log buffer.

use crate::encoding::{
    primitives::{
        decode_ctx_flags, decode_ctx_real, decode_datetime, encode_closing_tag, encode_ctx_flags,
        encode_ctx_real, encode_datetime, encode_opening_tag,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening, Tag},
    writer::Writer,
    Encode,
};
use crate::services::audit::AuditNotification;
use crate::types::{DateTime, LogStatus};
use crate::{DecodeError, EncodeError};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuditLogDatum {
    /// `[0]` log-disabled, buffer-purged and log-interrupted flags.
    LogStatus(LogStatus),
    /// `[1]` a recorded audit notification.
    Notification(AuditNotification),
    /// `[2]` clock adjustment in seconds.
    TimeChange(f32),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditLogRecord {
    pub timestamp: DateTime,
    pub datum: AuditLogDatum,
}

impl AuditLogRecord {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_opening(r, 0)?;
        let timestamp = decode_datetime(r)?;
        expect_closing(r, 0)?;

        expect_opening(r, 1)?;
        let datum = match Tag::peek(r)? {
            Tag::Context { tag_num: 0, .. } => AuditLogDatum::LogStatus(decode_ctx_flags(r, 0)?),
            Tag::Opening { tag_num: 1 } => {
                AuditLogDatum::Notification(AuditNotification::decode_ctx(r, 1)?)
            }
            Tag::Context { tag_num: 2, .. } => AuditLogDatum::TimeChange(decode_ctx_real(r, 2)?),
            _ => return Err(DecodeError::InvalidTag),
        };
        expect_closing(r, 1)?;

        Ok(Self { timestamp, datum })
    }
}

impl Encode for AuditLogRecord {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_opening_tag(w, 0)?;
        encode_datetime(w, self.timestamp)?;
        encode_closing_tag(w, 0)?;

        encode_opening_tag(w, 1)?;
        match &self.datum {
            AuditLogDatum::LogStatus(status) => encode_ctx_flags(w, 0, *status)?,
            AuditLogDatum::Notification(notification) => {
                encode_opening_tag(w, 1)?;
                notification.encode(w)?;
                encode_closing_tag(w, 1)?;
            }
            AuditLogDatum::TimeChange(seconds) => encode_ctx_real(w, 2, *seconds)?,
        }
        encode_closing_tag(w, 1)
    }
}
