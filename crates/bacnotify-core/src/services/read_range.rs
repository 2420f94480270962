//! ReadRange request and acknowledgement bodies, used to page through an
//! Audit Log buffer.

use crate::encoding::{
    primitives::{
        decode_app_signed, decode_app_unsigned, decode_ctx_flags, decode_ctx_object_id,
        decode_ctx_unsigned, decode_datetime, encode_closing_tag, encode_ctx_enumerated,
        encode_ctx_flags, encode_ctx_object_id, encode_ctx_unsigned, encode_datetime,
        encode_app_signed, encode_app_unsigned, encode_opening_tag,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening, read_constructed, Tag},
    writer::Writer,
    Encode,
};
use crate::services::{audit_log_record::AuditLogRecord, decode_optional_ctx};
use crate::types::{DateTime, ObjectId, PropertyId, ResultFlags};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_RANGE: u8 = 0x1A;

/// Which items a ReadRange asks for. A negative count reads backwards from
/// the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRangeSpecifier {
    ByPosition { reference_index: u32, count: i32 },
    BySequenceNumber { reference_sequence: u32, count: i32 },
    ByTime { reference_time: DateTime, count: i32 },
    ReadAll,
}

impl ReadRangeSpecifier {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match *self {
            Self::ByPosition {
                reference_index,
                count,
            } => {
                encode_opening_tag(w, 3)?;
                encode_app_unsigned(w, reference_index)?;
                encode_app_signed(w, count)?;
                encode_closing_tag(w, 3)
            }
            Self::BySequenceNumber {
                reference_sequence,
                count,
            } => {
                encode_opening_tag(w, 6)?;
                encode_app_unsigned(w, reference_sequence)?;
                encode_app_signed(w, count)?;
                encode_closing_tag(w, 6)
            }
            Self::ByTime {
                reference_time,
                count,
            } => {
                encode_opening_tag(w, 7)?;
                encode_datetime(w, reference_time)?;
                encode_app_signed(w, count)?;
                encode_closing_tag(w, 7)
            }
            Self::ReadAll => Ok(()),
        }
    }

    /// Decodes the optional range. End of input, or a tag other than an
    /// opening tag, means read-all; a tag that cannot be read is an error.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.is_empty() {
            return Ok(Self::ReadAll);
        }
        let Tag::Opening { tag_num } = Tag::peek(r)? else {
            return Ok(Self::ReadAll);
        };
        let range = match tag_num {
            3 => {
                expect_opening(r, 3)?;
                Self::ByPosition {
                    reference_index: decode_app_unsigned(r)?,
                    count: decode_app_signed(r)?,
                }
            }
            6 => {
                expect_opening(r, 6)?;
                Self::BySequenceNumber {
                    reference_sequence: decode_app_unsigned(r)?,
                    count: decode_app_signed(r)?,
                }
            }
            7 => {
                expect_opening(r, 7)?;
                Self::ByTime {
                    reference_time: decode_datetime(r)?,
                    count: decode_app_signed(r)?,
                }
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        expect_closing(r, tag_num)?;
        Ok(range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRangeRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub range: ReadRangeSpecifier,
}

impl ReadRangeRequest {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_ctx_object_id(r, 0)?,
            property_id: PropertyId::from_u32(decode_ctx_unsigned(r, 1)?),
            array_index: decode_optional_ctx(r, 2, decode_ctx_unsigned)?,
            range: ReadRangeSpecifier::decode(r)?,
        })
    }
}

impl Encode for ReadRangeRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_ctx_enumerated(w, 1, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, 2, index)?;
        }
        self.range.encode(w)
    }
}

/// ReadRange-ACK body. `item_data` holds the already encoded items that sit
/// between opening and closing tag 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRangeAck<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub result_flags: ResultFlags,
    pub item_count: u32,
    pub item_data: &'a [u8],
    pub first_sequence_number: Option<u32>,
}

impl<'a> ReadRangeAck<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        Ok(Self {
            object_id: decode_ctx_object_id(r, 0)?,
            property_id: PropertyId::from_u32(decode_ctx_unsigned(r, 1)?),
            array_index: decode_optional_ctx(r, 2, decode_ctx_unsigned)?,
            result_flags: decode_ctx_flags(r, 3)?,
            item_count: decode_ctx_unsigned(r, 4)?,
            item_data: read_constructed(r, 5)?,
            first_sequence_number: decode_optional_ctx(r, 6, decode_ctx_unsigned)?,
        })
    }

    /// Iterates over `item_data` as Audit Log records.
    pub fn audit_log_records(&self) -> AuditLogRecords<'a> {
        AuditLogRecords {
            r: Reader::new(self.item_data),
        }
    }

    /// Decodes every item as an Audit Log record.
    #[cfg(feature = "alloc")]
    pub fn decode_audit_log_records(&self) -> Result<alloc::vec::Vec<AuditLogRecord>, DecodeError> {
        self.audit_log_records().collect()
    }
}

/// Iterator over consecutive encoded Audit Log records. Stops after the
/// first error.
pub struct AuditLogRecords<'a> {
    r: Reader<'a>,
}

impl Iterator for AuditLogRecords<'_> {
    type Item = Result<AuditLogRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.r.is_empty() {
            return None;
        }
        let record = AuditLogRecord::decode(&mut self.r);
        if record.is_err() {
            self.r = Reader::new(&[]);
        }
        Some(record)
    }
}

impl Encode for ReadRangeAck<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_ctx_enumerated(w, 1, self.property_id.to_u32())?;
        if let Some(index) = self.array_index {
            encode_ctx_unsigned(w, 2, index)?;
        }
        encode_ctx_flags(w, 3, self.result_flags)?;
        encode_ctx_unsigned(w, 4, self.item_count)?;
        encode_opening_tag(w, 5)?;
        w.write_all(self.item_data)?;
        encode_closing_tag(w, 5)?;
        if let Some(sequence) = self.first_sequence_number {
            encode_ctx_unsigned(w, 6, sequence)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadRangeAck, ReadRangeRequest, ReadRangeSpecifier};
    use crate::encoding::{reader::Reader, Encode};
    use crate::services::audit_log_record::{AuditLogDatum, AuditLogRecord};
    use crate::types::{Date, DateTime, ObjectId, ObjectType, PropertyId, ResultFlags, Time};
    use crate::DecodeError;

    fn log_buffer(range: ReadRangeSpecifier) -> ReadRangeRequest {
        ReadRangeRequest {
            object_id: ObjectId::new(ObjectType::AuditLog, 1),
            property_id: PropertyId::LogBuffer,
            array_index: None,
            range,
        }
    }

    #[test]
    fn by_position_bytes() {
        let req = log_buffer(ReadRangeSpecifier::ByPosition {
            reference_index: 1,
            count: -2,
        });
        let mut buf = [0u8; 32];
        let n = req.encode_into(Some(&mut buf)).unwrap();
        assert_eq!(
            &buf[..n],
            &[
                0x0C, 0x0F, 0x40, 0x00, 0x01, // [0] audit-log 1
                0x19, 0x83, // [1] log-buffer
                0x3E, 0x21, 0x01, 0x31, 0xFE, 0x3F,
            ]
        );
        let mut r = Reader::new(&buf[..n]);
        assert_eq!(ReadRangeRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn every_range_roundtrips() {
        let when = DateTime::new(
            Date {
                year_since_1900: 126,
                month: 10,
                day: 19,
                weekday: 1,
            },
            Time::new(12, 0, 0, 0),
        );
        for range in [
            ReadRangeSpecifier::BySequenceNumber {
                reference_sequence: 70_000,
                count: 10,
            },
            ReadRangeSpecifier::ByTime {
                reference_time: when,
                count: -1,
            },
            ReadRangeSpecifier::ReadAll,
        ] {
            let req = log_buffer(range);
            let mut buf = [0u8; 48];
            let n = req.encode_into(Some(&mut buf)).unwrap();
            let mut r = Reader::new(&buf[..n]);
            assert_eq!(ReadRangeRequest::decode(&mut r).unwrap(), req);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn unknown_range_choice() {
        let mut r = Reader::new(&[0x0C, 0x0F, 0x40, 0x00, 0x01, 0x19, 0x83, 0x4E, 0x4F]);
        assert_eq!(
            ReadRangeRequest::decode(&mut r).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    #[test]
    fn unreadable_range_tag_is_an_error() {
        assert_eq!(
            ReadRangeSpecifier::decode(&mut Reader::new(&[])).unwrap(),
            ReadRangeSpecifier::ReadAll
        );
        // extended tag number byte missing
        assert_eq!(
            ReadRangeSpecifier::decode(&mut Reader::new(&[0xFE])).unwrap_err(),
            DecodeError::UnexpectedEof
        );
        let mut r = Reader::new(&[0x0C, 0x0F, 0x40, 0x00, 0x01, 0x19, 0x83, 0xFE]);
        assert_eq!(
            ReadRangeRequest::decode(&mut r).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn ack_carries_items_verbatim() {
        let items = [0x21, 0x01, 0x21, 0x02];
        let ack = ReadRangeAck {
            object_id: ObjectId::new(ObjectType::AuditLog, 1),
            property_id: PropertyId::LogBuffer,
            array_index: None,
            result_flags: ResultFlags::FIRST_ITEM | ResultFlags::LAST_ITEM,
            item_count: 2,
            item_data: &items,
            first_sequence_number: Some(7),
        };
        let mut buf = [0u8; 48];
        let n = ack.encode_into(Some(&mut buf)).unwrap();
        assert_eq!(&buf[7..10], &[0x3A, 0x05, 0xC0]);
        let mut r = Reader::new(&buf[..n]);
        assert_eq!(ReadRangeAck::decode(&mut r).unwrap(), ack);
        assert!(r.is_empty());
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn items_decode_as_audit_log_records() {
        let record = AuditLogRecord {
            timestamp: DateTime::new(
                Date {
                    year_since_1900: 126,
                    month: 1,
                    day: 5,
                    weekday: 1,
                },
                Time::new(0, 0, 0, 0),
            ),
            datum: AuditLogDatum::TimeChange(1.0),
        };
        let mut items = [0u8; 64];
        let n = record.encode_into(Some(&mut items)).unwrap();
        let mut doubled = items[..n].to_vec();
        doubled.extend_from_slice(&items[..n]);

        let ack = ReadRangeAck {
            object_id: ObjectId::new(ObjectType::AuditLog, 1),
            property_id: PropertyId::LogBuffer,
            array_index: None,
            result_flags: ResultFlags::all(),
            item_count: 2,
            item_data: &doubled,
            first_sequence_number: Some(1),
        };
        assert_eq!(
            ack.decode_audit_log_records().unwrap(),
            vec![record.clone(), record]
        );

        let truncated = ReadRangeAck {
            item_data: &doubled[..n + 3],
            ..ack
        };
        let results: Vec<_> = truncated.audit_log_records().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1], Err(DecodeError::UnexpectedEof));
    }
}
