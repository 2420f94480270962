use bacnotify_core::types::{ErrorClass, ErrorCode, ObjectId, PropertyId};
use bacnotify_core::{DecodeError, EncodeError, ServiceFailure};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ObjectError {
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("list element {first_failed_element} is malformed: {source}")]
    InvalidListElement {
        first_failed_element: u32,
        source: DecodeError,
    },
    #[error("no space to add list element {first_failed_element}")]
    NoSpaceToAddListElement { first_failed_element: u32 },
    #[error("list element {first_failed_element} not found")]
    ListElementNotFound { first_failed_element: u32 },
    #[error("no space to write property")]
    NoSpaceToWriteProperty,
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),
    #[error("property {0:?} is not a list")]
    PropertyIsNotAList(PropertyId),
    #[error("value out of range")]
    ValueOutOfRange,
}

impl ObjectError {
    /// The error class and code to put in an Error-PDU. `None` means the
    /// request should be rejected or aborted instead.
    pub fn error_class_code(&self) -> Option<(ErrorClass, ErrorCode)> {
        match self {
            Self::Encode(EncodeError::ValueOutOfRange) | Self::ValueOutOfRange => {
                Some((ErrorClass::Property, ErrorCode::ValueOutOfRange))
            }
            Self::Encode(_) => None,
            Self::Decode(err) => match err.failure() {
                ServiceFailure::Error { class, code } => Some((class, code)),
                ServiceFailure::Reject(_) => None,
            },
            Self::InvalidListElement { .. } => {
                Some((ErrorClass::Property, ErrorCode::InvalidDataType))
            }
            Self::NoSpaceToAddListElement { .. } => {
                Some((ErrorClass::Resources, ErrorCode::NoSpaceToAddListElement))
            }
            Self::ListElementNotFound { .. } => {
                Some((ErrorClass::Services, ErrorCode::ListElementNotFound))
            }
            Self::NoSpaceToWriteProperty => {
                Some((ErrorClass::Resources, ErrorCode::NoSpaceToWriteProperty))
            }
            Self::UnknownObject(_) => Some((ErrorClass::Object, ErrorCode::UnknownObject)),
            Self::PropertyIsNotAList(_) => {
                Some((ErrorClass::Services, ErrorCode::PropertyIsNotAList))
            }
        }
    }

    /// First failing element, 1-based, for list-element errors.
    pub fn first_failed_element(&self) -> Option<u32> {
        match *self {
            Self::InvalidListElement {
                first_failed_element,
                ..
            }
            | Self::NoSpaceToAddListElement {
                first_failed_element,
            }
            | Self::ListElementNotFound {
                first_failed_element,
            } => Some(first_failed_element),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectError;
    use bacnotify_core::types::{ErrorClass, ErrorCode};
    use bacnotify_core::{DecodeError, EncodeError};

    #[test]
    fn list_errors_carry_class_and_code() {
        let err = ObjectError::NoSpaceToAddListElement {
            first_failed_element: 2,
        };
        assert_eq!(
            err.error_class_code(),
            Some((ErrorClass::Resources, ErrorCode::NoSpaceToAddListElement))
        );
        assert_eq!(err.first_failed_element(), Some(2));
        assert_eq!(err.to_string(), "no space to add list element 2");
    }

    #[test]
    fn malformed_input_is_not_an_error_pdu() {
        assert_eq!(
            ObjectError::from(DecodeError::InvalidTag).error_class_code(),
            None
        );
        assert_eq!(
            ObjectError::from(EncodeError::BufferTooSmall).error_class_code(),
            None
        );
        assert_eq!(
            ObjectError::from(DecodeError::CapacityExceeded).error_class_code(),
            Some((ErrorClass::Resources, ErrorCode::NoSpaceToAddListElement))
        );
    }
}
