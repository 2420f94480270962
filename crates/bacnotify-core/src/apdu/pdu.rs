/// APDU type, carried in the high nibble of the first APDU octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0,
    UnconfirmedRequest = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
    Reject = 6,
    Abort = 7,
}

impl ApduType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ConfirmedRequest),
            1 => Some(Self::UnconfirmedRequest),
            2 => Some(Self::SimpleAck),
            3 => Some(Self::ComplexAck),
            4 => Some(Self::SegmentAck),
            5 => Some(Self::Error),
            6 => Some(Self::Reject),
            7 => Some(Self::Abort),
            _ => None,
        }
    }

    /// Type of the APDU starting with `first_octet`.
    pub fn of(first_octet: u8) -> Option<Self> {
        Self::from_u8(first_octet >> 4)
    }
}

#[cfg(test)]
mod tests {
    use super::ApduType;

    #[test]
    fn type_is_high_nibble() {
        assert_eq!(ApduType::of(0x00), Some(ApduType::ConfirmedRequest));
        assert_eq!(ApduType::of(0x10), Some(ApduType::UnconfirmedRequest));
        assert_eq!(ApduType::of(0x50), Some(ApduType::Error));
        assert_eq!(ApduType::of(0x80), None);
    }
}
