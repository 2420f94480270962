pub mod audit;
pub mod audit_log_record;
pub mod destination;
pub mod destination_text;
pub mod event_notification;
pub mod event_parameters;
pub mod property_refs;
pub mod read_range;
pub mod value_codec;

use crate::encoding::{
    reader::Reader,
    tag::{next_is_context, next_is_opening},
};
use crate::DecodeError;

/// Decodes a context-tagged field only when the next tag carries
/// `tag_num`; any other tag leaves the reader untouched.
pub(crate) fn decode_optional_ctx<'a, T>(
    r: &mut Reader<'a>,
    tag_num: u8,
    decode: impl FnOnce(&mut Reader<'a>, u8) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    if next_is_context(r, tag_num) {
        decode(r, tag_num).map(Some)
    } else {
        Ok(None)
    }
}

/// Like [`decode_optional_ctx`] for fields wrapped in opening/closing tag
/// `tag_num`; `decode` consumes the wrapper itself.
pub(crate) fn decode_optional_constructed<'a, T>(
    r: &mut Reader<'a>,
    tag_num: u8,
    decode: impl FnOnce(&mut Reader<'a>, u8) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    if next_is_opening(r, tag_num) {
        decode(r, tag_num).map(Some)
    } else {
        Ok(None)
    }
}

/// Narrows an enumerated value through a `from_u32` style mapping.
pub(crate) fn known<T>(value: u32, map: impl FnOnce(u32) -> Option<T>) -> Result<T, DecodeError> {
    map(value).ok_or(DecodeError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::decode_optional_ctx;
    use crate::encoding::{primitives::decode_ctx_unsigned, reader::Reader};

    #[test]
    fn optional_field_leaves_other_tags_unread() {
        let mut r = Reader::new(&[0x19, 0x05]);
        assert_eq!(
            decode_optional_ctx(&mut r, 0, decode_ctx_unsigned).unwrap(),
            None
        );
        assert_eq!(r.position(), 0);
        assert_eq!(
            decode_optional_ctx(&mut r, 1, decode_ctx_unsigned).unwrap(),
            Some(5)
        );
        assert!(r.is_empty());
    }
}
