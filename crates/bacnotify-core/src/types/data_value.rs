use crate::types::{BitString, Date, ObjectId, Time};

/// One primitive application-tagged value, borrowing strings and bit
/// strings from the decode buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataValue<'a> {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(&'a [u8]),
    CharacterString(&'a str),
    BitString(BitString<'a>),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
}
