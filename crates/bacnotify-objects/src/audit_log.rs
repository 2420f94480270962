//! Audit Log object.
//!
//! Records are kept in a bounded buffer, oldest first. Each record carries a
//! sequence number taken from Total_Record_Count, which skips zero when it
//! wraps. Reads go through ReadRange on Log_Buffer.

use crate::ObjectError;
use bacnotify_core::encoding::Encode;
use bacnotify_core::services::audit::AuditNotification;
use bacnotify_core::services::audit_log_record::{AuditLogDatum, AuditLogRecord};
use bacnotify_core::services::read_range::{ReadRangeAck, ReadRangeRequest, ReadRangeSpecifier};
use bacnotify_core::types::{DateTime, LogStatus, ObjectId, ObjectType, PropertyId, ResultFlags};
use bacnotify_core::EncodeError;
use std::collections::VecDeque;

pub const DEFAULT_BUFFER_SIZE: usize = 128;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    sequence: u32,
    record: AuditLogRecord,
}

#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
    instance: u32,
    buffer_size: usize,
    enabled: bool,
}

impl AuditLogBuilder {
    /// Number of records kept before the oldest is evicted. At least one.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> AuditLog {
        AuditLog {
            instance: self.instance,
            enabled: self.enabled,
            buffer_size: self.buffer_size,
            entries: VecDeque::with_capacity(self.buffer_size),
            total_record_count: 0,
        }
    }
}

/// Items selected by a ReadRange, already encoded into the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeResult {
    pub result_flags: ResultFlags,
    pub item_count: u32,
    /// Present for by-sequence-number and by-time reads that found items.
    pub first_sequence_number: Option<u32>,
    /// Bytes written.
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog {
    instance: u32,
    enabled: bool,
    buffer_size: usize,
    entries: VecDeque<Entry>,
    total_record_count: u32,
}

impl AuditLog {
    pub fn builder(instance: u32) -> AuditLogBuilder {
        AuditLogBuilder {
            instance,
            buffer_size: DEFAULT_BUFFER_SIZE,
            enabled: true,
        }
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::new(ObjectType::AuditLog, self.instance)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn record_count(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn total_record_count(&self) -> u32 {
        self.total_record_count
    }

    /// Buffered records with their sequence numbers, oldest first.
    pub fn records(&self) -> impl Iterator<Item = (u32, &AuditLogRecord)> {
        self.entries
            .iter()
            .map(|entry| (entry.sequence, &entry.record))
    }

    /// Logs an audit notification. Returns `false` while the log is
    /// disabled. A notification with the same operation, source device and
    /// target device as a buffered one replaces it and keeps its sequence
    /// number.
    pub fn insert_notification(&mut self, notification: AuditNotification, now: DateTime) -> bool {
        if !self.enabled {
            log::debug!("audit log {}: disabled, dropping notification", self.instance);
            return false;
        }

        let merged = self.entries.iter_mut().find(|entry| {
            matches!(
                &entry.record.datum,
                AuditLogDatum::Notification(existing) if same_target(existing, &notification)
            )
        });
        let record = AuditLogRecord {
            timestamp: now,
            datum: AuditLogDatum::Notification(notification),
        };
        if let Some(entry) = merged {
            log::debug!(
                "audit log {}: merged into record {}",
                self.instance,
                entry.sequence
            );
            entry.record = record;
        } else {
            self.push(record);
        }
        true
    }

    /// Logs a status record. Status records are written even while the log
    /// is disabled.
    pub fn insert_status(&mut self, status: LogStatus, now: DateTime) {
        self.push(AuditLogRecord {
            timestamp: now,
            datum: AuditLogDatum::LogStatus(status),
        });
    }

    /// Logs a clock change of `seconds`.
    pub fn insert_time_change(&mut self, seconds: f32, now: DateTime) {
        self.push(AuditLogRecord {
            timestamp: now,
            datum: AuditLogDatum::TimeChange(seconds),
        });
    }

    /// Writes Enable. A change of state is logged as a status record with
    /// log-disabled set or cleared.
    pub fn set_enabled(&mut self, enabled: bool, now: DateTime) {
        if enabled == self.enabled {
            return;
        }
        if enabled {
            self.enabled = true;
            self.insert_status(LogStatus::empty(), now);
        } else {
            self.insert_status(LogStatus::LOG_DISABLED, now);
            self.enabled = false;
        }
    }

    /// Empties the buffer and logs buffer-purged.
    pub fn purge(&mut self, now: DateTime) {
        self.entries.clear();
        self.insert_status(LogStatus::BUFFER_PURGED, now);
    }

    /// Writes Record_Count. Only zero is accepted, and it purges the log.
    pub fn write_record_count(&mut self, value: u32, now: DateTime) -> Result<(), ObjectError> {
        if value != 0 {
            log::warn!(
                "audit log {}: rejected record count write of {value}",
                self.instance
            );
            return Err(ObjectError::ValueOutOfRange);
        }
        self.purge(now);
        Ok(())
    }

    /// Encodes the records selected by `range` into `buf`, stopping before
    /// the first record that does not fit.
    pub fn read_range(
        &self,
        range: ReadRangeSpecifier,
        buf: &mut [u8],
    ) -> Result<RangeResult, ObjectError> {
        let mut result = RangeResult {
            result_flags: ResultFlags::empty(),
            item_count: 0,
            first_sequence_number: None,
            len: 0,
        };
        let Some((start, end)) = self.select(range) else {
            return Ok(result);
        };

        let mut last = None;
        for index in start..end {
            match self.entries[index]
                .record
                .encode_into(Some(&mut buf[result.len..]))
            {
                Ok(n) => {
                    result.len += n;
                    result.item_count += 1;
                    last = Some(index);
                }
                Err(EncodeError::BufferTooSmall) => {
                    result.result_flags |= ResultFlags::MORE_ITEMS;
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        let Some(last) = last else {
            return Ok(result);
        };
        if start == 0 {
            result.result_flags |= ResultFlags::FIRST_ITEM;
        }
        if last + 1 == self.entries.len() {
            result.result_flags |= ResultFlags::LAST_ITEM;
        }
        if matches!(
            range,
            ReadRangeSpecifier::BySequenceNumber { .. } | ReadRangeSpecifier::ByTime { .. }
        ) {
            result.first_sequence_number = Some(self.entries[start].sequence);
        }
        Ok(result)
    }

    /// Answers a ReadRange request on this object's Log_Buffer. The items
    /// are encoded into `buf`, which the returned ack borrows.
    pub fn read_range_ack<'b>(
        &self,
        request: &ReadRangeRequest,
        buf: &'b mut [u8],
    ) -> Result<ReadRangeAck<'b>, ObjectError> {
        if request.object_id != self.object_id() {
            return Err(ObjectError::UnknownObject(request.object_id));
        }
        if request.property_id != PropertyId::LogBuffer || request.array_index.is_some() {
            return Err(ObjectError::PropertyIsNotAList(request.property_id));
        }
        let result = self.read_range(request.range, buf)?;
        let buf: &'b [u8] = buf;
        Ok(ReadRangeAck {
            object_id: request.object_id,
            property_id: PropertyId::LogBuffer,
            array_index: None,
            result_flags: result.result_flags,
            item_count: result.item_count,
            item_data: &buf[..result.len],
            first_sequence_number: result.first_sequence_number,
        })
    }

    fn push(&mut self, record: AuditLogRecord) {
        if self.entries.len() >= self.buffer_size {
            self.entries.pop_front();
        }
        self.total_record_count = match self.total_record_count {
            u32::MAX => 1,
            n => n + 1,
        };
        self.entries.push_back(Entry {
            sequence: self.total_record_count,
            record,
        });
    }

    /// Half-open index range of the buffered records `range` asks for.
    fn select(&self, range: ReadRangeSpecifier) -> Option<(usize, usize)> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let (start, end) = match range {
            ReadRangeSpecifier::ReadAll => (0, len),
            ReadRangeSpecifier::ByPosition {
                reference_index,
                count,
            } => {
                let reference = i64::from(reference_index);
                let (first, last) = if count < 0 {
                    ((reference + i64::from(count) + 1).max(1), reference)
                } else {
                    (reference, reference + i64::from(count) - 1)
                };
                if first < 1 || first > len as i64 {
                    return None;
                }
                (first as usize - 1, last.min(len as i64) as usize)
            }
            ReadRangeSpecifier::BySequenceNumber {
                reference_sequence,
                count,
            } => {
                let span = count.unsigned_abs();
                let begin = if count < 0 {
                    reference_sequence.wrapping_sub(span - 1)
                } else {
                    reference_sequence
                };
                let in_range = |entry: &Entry| entry.sequence.wrapping_sub(begin) < span;
                let start = self.entries.iter().position(in_range)?;
                let last = self.entries.iter().rposition(in_range)?;
                (start, last + 1)
            }
            ReadRangeSpecifier::ByTime {
                reference_time,
                count,
            } => {
                let span = count.unsigned_abs() as usize;
                if count < 0 {
                    let last = self
                        .entries
                        .iter()
                        .rposition(|entry| entry.record.timestamp < reference_time)?;
                    (last + 1 - span.min(last + 1), last + 1)
                } else {
                    let start = self
                        .entries
                        .iter()
                        .position(|entry| entry.record.timestamp > reference_time)?;
                    (start, start.saturating_add(span).min(len))
                }
            }
        };
        (start < end).then_some((start, end))
    }
}

fn same_target(a: &AuditNotification, b: &AuditNotification) -> bool {
    a.operation == b.operation
        && a.source_device == b.source_device
        && a.target_device == b.target_device
}
