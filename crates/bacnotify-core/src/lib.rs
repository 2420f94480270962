//! BACnet application-layer codecs for alarm and audit traffic.
//!
//! `bacnotify-core` encodes and decodes the BACnet structures that carry
//! alarm and audit information between devices: the EventNotification
//! service body with every notification-parameter arm, the Destination /
//! Recipient structure used by Notification Class recipient lists (plus its
//! ASCII configuration form), and the Audit Value, Audit Notification and
//! Audit Log Record structures. Decoding is zero-copy and bounds-checked;
//! encoding writes into a caller-owned buffer and can be run in measuring
//! mode first to size that buffer.
//!
//! # Feature flags
//!
//! - **`std`** (default): `std::error::Error` implementations.
//! - **`alloc`** (default): helpers that collect into a `Vec`.
//! - **`serde`**: `Serialize`/`Deserialize` on owned value types.
//! - **`defmt`**: `defmt::Format` for embedded logging.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU headers for confirmed and unconfirmed requests.
pub mod apdu;
/// Binary encoding primitives, tag system, and zero-copy reader/writer.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// Service payload and constructed-type codecs.
pub mod services;
/// Core BACnet data types.
pub mod types;

pub use error::{DecodeError, EncodeError, ServiceFailure};
pub use services::audit::MAX_AUDIT_COMMENT_LEN;
pub use services::destination::MAX_MAC_LEN;
pub use services::event_parameters::MAX_COMPLEX_EVENT_PARAMETERS;
pub use types::BACNET_MAX_INSTANCE;
