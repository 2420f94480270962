use crate::types::{ErrorClass, ErrorCode, RejectReason};
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    BufferTooSmall,
    ValueOutOfRange,
    InvalidLength,
    /// The notification parameters belong to a different event type.
    InconsistentParameters,
    Unsupported,
    Message(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InconsistentParameters => f.write_str("inconsistent parameters"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    UnexpectedEof,
    InvalidTag,
    InvalidLength,
    InvalidValue,
    /// A decoded number does not fit the field it is destined for.
    ValueOutOfRange,
    /// More entries than a fixed-capacity field can hold.
    CapacityExceeded,
    Unsupported,
    Message(&'static str),
}

impl DecodeError {
    /// Classifies the error the way a BACnet server answers it: malformed
    /// input is rejected, structurally valid but unusable input is an error.
    pub const fn failure(self) -> ServiceFailure {
        match self {
            Self::UnexpectedEof => ServiceFailure::Reject(RejectReason::MissingRequiredParameter),
            Self::InvalidTag => ServiceFailure::Reject(RejectReason::InvalidTag),
            Self::InvalidLength | Self::InvalidValue => {
                ServiceFailure::Reject(RejectReason::InvalidParameterDataType)
            }
            Self::Unsupported => ServiceFailure::Reject(RejectReason::UndefinedEnumeration),
            Self::Message(_) => ServiceFailure::Reject(RejectReason::Other),
            Self::ValueOutOfRange => ServiceFailure::Error {
                class: ErrorClass::Property,
                code: ErrorCode::ValueOutOfRange,
            },
            Self::CapacityExceeded => ServiceFailure::Error {
                class: ErrorClass::Resources,
                code: ErrorCode::NoSpaceToAddListElement,
            },
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidTag => f.write_str("invalid tag"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InvalidValue => f.write_str("invalid value"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::CapacityExceeded => f.write_str("capacity exceeded"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Protocol-level answer to a request that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceFailure {
    /// Answer with a Reject-PDU carrying this reason.
    Reject(RejectReason),
    /// Answer with an Error-PDU.
    Error { class: ErrorClass, code: ErrorCode },
}

impl ServiceFailure {
    pub const fn is_reject(self) -> bool {
        matches!(self, Self::Reject(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, ServiceFailure};
    use crate::types::{ErrorClass, ErrorCode, RejectReason};

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(
            DecodeError::InvalidTag.failure(),
            ServiceFailure::Reject(RejectReason::InvalidTag)
        );
        assert!(DecodeError::UnexpectedEof.failure().is_reject());
        assert!(DecodeError::Unsupported.failure().is_reject());
    }

    #[test]
    fn range_errors_are_not_rejects() {
        assert_eq!(
            DecodeError::ValueOutOfRange.failure(),
            ServiceFailure::Error {
                class: ErrorClass::Property,
                code: ErrorCode::ValueOutOfRange,
            }
        );
        assert!(!DecodeError::CapacityExceeded.failure().is_reject());
    }
}
