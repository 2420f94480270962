/// Confirmed-service request header and the replies a receiver sends back.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-service request header.
pub mod unconfirmed;

pub use confirmed::{ConfirmedRequestHeader, ErrorPdu, RejectPdu, SimpleAck};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequestHeader;
