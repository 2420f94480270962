#![no_main]

use bacnotify_core::encoding::{reader::Reader, Encode};
use bacnotify_core::services::audit_log_record::AuditLogRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(record) = AuditLogRecord::decode(&mut r) {
        let mut buf = [0u8; 1024];
        let _ = record.encode_into(Some(&mut buf));
    }
});
