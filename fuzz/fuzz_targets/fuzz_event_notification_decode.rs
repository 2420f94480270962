#![no_main]

use bacnotify_core::encoding::{reader::Reader, Encode};
use bacnotify_core::services::event_notification::EventNotification;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = EventNotification::decode_apdu(data);

    let mut r = Reader::new(data);
    if let Ok(notification) = EventNotification::decode(&mut r) {
        let consumed = data.len() - r.remaining();
        assert_eq!(EventNotification::validate(data).ok(), Some(consumed));
        let mut buf = [0u8; 1500];
        let _ = notification.encode_into(Some(&mut buf));
    }
});
