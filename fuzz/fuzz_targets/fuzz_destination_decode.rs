#![no_main]

use bacnotify_core::encoding::{reader::Reader, Encode};
use bacnotify_core::services::destination::Destination;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    let Ok(destination) = Destination::decode(&mut r) else {
        return;
    };
    let mut buf = [0u8; 64];
    let n = destination
        .encode_into(Some(&mut buf))
        .expect("decoded destination re-encodes");
    let mut again = Reader::new(&buf[..n]);
    assert_eq!(Destination::decode(&mut again).ok(), Some(destination));
});
