//! Server-side BACnet objects for alarm and audit reporting.
//!
//! [`NotificationClass`] owns the recipient list that event notifications
//! are fanned out to and [`AuditLog`] buffers audit records for ReadRange.
//! Both sit on the codecs in `bacnotify-core` and log through the `log`
//! facade.

pub mod audit_log;
pub mod error;
pub mod notification_class;

pub use audit_log::{AuditLog, AuditLogBuilder, RangeResult};
pub use error::ObjectError;
pub use notification_class::{
    DispatchSummary, NotificationClass, NotificationSink, RecipientList, Transition,
};
