#![no_main]

use bacnotify_core::services::destination::Destination;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(destination) = text.parse::<Destination>() {
        let canonical = destination.to_string();
        assert_eq!(canonical.parse::<Destination>().ok(), Some(destination));
    }
});
