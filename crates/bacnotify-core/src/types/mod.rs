pub mod audit;
pub mod bit_string;
pub mod data_value;
pub mod date_time;
pub mod event;
pub mod flags;
pub mod object_id;
pub mod object_type;
pub mod property_id;
pub mod spec;

pub use audit::AuditOperation;
pub use bit_string::BitString;
pub use data_value::DataValue;
pub use date_time::{Date, DateTime, Time, TimeStamp};
pub use event::{EventState, EventType, NotifyType};
pub use flags::{
    DaysOfWeek, EventTransitionBits, LogStatus, OctetFlags, ResultFlags, StatusFlags,
};
pub use object_id::{ObjectId, BACNET_MAX_INSTANCE};
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use spec::{ErrorClass, ErrorCode, MaxApdu, RejectReason};
