use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Largest usable tag number; 255 is reserved by the extended tag form.
pub const MAX_TAG_NUMBER: u8 = 254;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::SignedInt),
            4 => Ok(Self::Real),
            5 => Ok(Self::Double),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            8 => Ok(Self::BitString),
            9 => Ok(Self::Enumerated),
            10 => Ok(Self::Date),
            11 => Ok(Self::Time),
            12 => Ok(Self::ObjectId),
            _ => Err(DecodeError::InvalidTag),
        }
    }
}

/// One tag header as it appears on the wire.
///
/// For application and context tags `len` is the length/value field: the
/// content length in bytes, except for application booleans where it is
/// the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: AppTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

impl Tag {
    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Tag::Application { tag, len } => encode_with_meta(w, tag as u8, false, len),
            Tag::Context { tag_num, len } => encode_with_meta(w, tag_num, true, len),
            Tag::Opening { tag_num } => encode_open_close(w, tag_num, true),
            Tag::Closing { tag_num } => encode_open_close(w, tag_num, false),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let first = r.read_u8()?;
        let class_context = (first & 0b0000_1000) != 0;

        let mut tag_num = (first >> 4) & 0x0f;
        if tag_num == 0x0f {
            tag_num = r.read_u8()?;
            if tag_num > MAX_TAG_NUMBER {
                return Err(DecodeError::InvalidTag);
            }
        }

        let len_val = first & 0x07;

        if class_context && len_val == 6 {
            return Ok(Tag::Opening { tag_num });
        }
        if class_context && len_val == 7 {
            return Ok(Tag::Closing { tag_num });
        }

        let len = decode_len(r, len_val)?;
        if class_context {
            Ok(Tag::Context { tag_num, len })
        } else {
            Ok(Tag::Application {
                tag: AppTag::from_u8(tag_num)?,
                len,
            })
        }
    }

    /// Decodes the next tag without consuming it.
    pub fn peek(r: &Reader<'_>) -> Result<Self, DecodeError> {
        let mut probe = *r;
        Self::decode(&mut probe)
    }

    pub const fn is_opening(self, number: u8) -> bool {
        matches!(self, Tag::Opening { tag_num } if tag_num == number)
    }

    pub const fn is_closing(self, number: u8) -> bool {
        matches!(self, Tag::Closing { tag_num } if tag_num == number)
    }

    pub const fn is_context(self, number: u8) -> bool {
        matches!(self, Tag::Context { tag_num, .. } if tag_num == number)
    }
}

/// True when the next tag is context tag `number`. Truncated or malformed
/// input reports `false` and is diagnosed by the decode that follows.
pub fn next_is_context(r: &Reader<'_>, number: u8) -> bool {
    Tag::peek(r).is_ok_and(|tag| tag.is_context(number))
}

pub fn next_is_opening(r: &Reader<'_>, number: u8) -> bool {
    Tag::peek(r).is_ok_and(|tag| tag.is_opening(number))
}

pub fn next_is_closing(r: &Reader<'_>, number: u8) -> bool {
    Tag::peek(r).is_ok_and(|tag| tag.is_closing(number))
}

pub fn expect_opening(r: &mut Reader<'_>, number: u8) -> Result<(), DecodeError> {
    if Tag::decode(r)?.is_opening(number) {
        Ok(())
    } else {
        Err(DecodeError::InvalidTag)
    }
}

pub fn expect_closing(r: &mut Reader<'_>, number: u8) -> Result<(), DecodeError> {
    if Tag::decode(r)?.is_closing(number) {
        Ok(())
    } else {
        Err(DecodeError::InvalidTag)
    }
}

/// Deepest nesting [`read_constructed`] follows inside the outer pair.
pub const MAX_CONSTRUCTED_DEPTH: usize = 16;

/// Consumes opening tag `number`, everything up to its matching closing
/// tag and the closing tag itself, returning the enclosed bytes untouched.
/// Every nested closing tag must carry the number of its opening tag.
pub fn read_constructed<'a>(r: &mut Reader<'a>, number: u8) -> Result<&'a [u8], DecodeError> {
    expect_opening(r, number)?;
    let mut body = *r;
    let mut open: heapless::Vec<u8, MAX_CONSTRUCTED_DEPTH> = heapless::Vec::new();
    loop {
        let before = r.position();
        match Tag::decode(r)? {
            Tag::Opening { tag_num } => {
                open.push(tag_num).map_err(|_| DecodeError::CapacityExceeded)?;
            }
            Tag::Closing { tag_num } => match open.pop() {
                Some(inner) if inner == tag_num => {}
                Some(_) => return Err(DecodeError::InvalidTag),
                None if tag_num == number => {
                    return body.read_exact(before - body.position());
                }
                None => return Err(DecodeError::InvalidTag),
            },
            Tag::Application {
                tag: AppTag::Boolean,
                ..
            } => {}
            Tag::Application { len, .. } | Tag::Context { len, .. } => {
                r.read_exact(len as usize)?;
            }
        }
    }
}

fn encode_with_meta(
    w: &mut Writer<'_>,
    tag_num: u8,
    is_context: bool,
    len: u32,
) -> Result<(), EncodeError> {
    if tag_num > MAX_TAG_NUMBER {
        return Err(EncodeError::ValueOutOfRange);
    }
    let mut first: u8 = 0;

    if tag_num <= 14 {
        first |= tag_num << 4;
    } else {
        first |= 0xF0;
    }

    if is_context {
        first |= 0b0000_1000;
    }

    let len_code = if len <= 4 { len as u8 } else { 5 };

    first |= len_code;
    w.write_u8(first)?;

    if tag_num > 14 {
        w.write_u8(tag_num)?;
    }

    if len_code == 5 {
        if len <= 253 {
            w.write_u8(len as u8)?;
        } else if len <= 65535 {
            w.write_u8(254)?;
            w.write_be_u16(len as u16)?;
        } else {
            w.write_u8(255)?;
            w.write_be_u32(len)?;
        }
    }

    Ok(())
}

fn encode_open_close(w: &mut Writer<'_>, tag_num: u8, opening: bool) -> Result<(), EncodeError> {
    if tag_num > MAX_TAG_NUMBER {
        return Err(EncodeError::ValueOutOfRange);
    }
    let mut first: u8 = 0b0000_1000;

    if tag_num <= 14 {
        first |= tag_num << 4;
    } else {
        first |= 0xF0;
    }

    first |= if opening { 6 } else { 7 };
    w.write_u8(first)?;

    if tag_num > 14 {
        w.write_u8(tag_num)?;
    }

    Ok(())
}

fn decode_len(r: &mut Reader<'_>, len_code: u8) -> Result<u32, DecodeError> {
    match len_code {
        0..=4 => Ok(len_code as u32),
        5 => {
            let v = r.read_u8()?;
            if v <= 253 {
                Ok(v as u32)
            } else if v == 254 {
                Ok(r.read_be_u16()? as u32)
            } else {
                r.read_be_u32()
            }
        }
        _ => Err(DecodeError::InvalidLength),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        next_is_closing, next_is_context, read_constructed, AppTag, Tag, MAX_CONSTRUCTED_DEPTH,
    };
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::{DecodeError, EncodeError};

    #[test]
    fn roundtrip_application_tag() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        Tag::Application {
            tag: AppTag::UnsignedInt,
            len: 3,
        }
        .encode(&mut w)
        .unwrap();
        assert_eq!(w.as_written(), &[0x23]);

        let mut r = Reader::new(w.as_written());
        let t = Tag::decode(&mut r).unwrap();
        assert_eq!(
            t,
            Tag::Application {
                tag: AppTag::UnsignedInt,
                len: 3
            }
        );
    }

    #[test]
    fn roundtrip_extended() {
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        Tag::Context {
            tag_num: 30,
            len: 300,
        }
        .encode(&mut w)
        .unwrap();
        assert_eq!(w.as_written(), &[0xFD, 30, 254, 0x01, 0x2C]);

        let mut r = Reader::new(w.as_written());
        let t = Tag::decode(&mut r).unwrap();
        assert_eq!(
            t,
            Tag::Context {
                tag_num: 30,
                len: 300
            }
        );
    }

    #[test]
    fn opening_and_closing_tags() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        Tag::Opening { tag_num: 12 }.encode(&mut w).unwrap();
        Tag::Closing { tag_num: 20 }.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0xCE, 0xFF, 20]);

        let mut r = Reader::new(w.as_written());
        assert!(Tag::decode(&mut r).unwrap().is_opening(12));
        assert!(next_is_closing(&r, 20));
        assert!(!next_is_context(&r, 20));
        assert!(Tag::decode(&mut r).unwrap().is_closing(20));
    }

    #[test]
    fn reserved_tag_number_is_rejected() {
        let mut r = Reader::new(&[0xF9, 0xFF, 0x00]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::InvalidTag);

        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        assert_eq!(
            Tag::Opening { tag_num: 255 }.encode(&mut w).unwrap_err(),
            EncodeError::ValueOutOfRange
        );
    }

    #[test]
    fn truncated_extended_length_fails() {
        let mut r = Reader::new(&[0x25, 254, 0x01]);
        assert_eq!(Tag::decode(&mut r).unwrap_err(), DecodeError::UnexpectedEof);
    }

    #[test]
    fn constructed_body_skips_nested_values() {
        // [5] { TRUE, [1] { [0] 7 }, 0x11 } then one trailing byte
        let bytes = [0x5E, 0x11, 0x1E, 0x09, 0x07, 0x1F, 0x21, 0x11, 0x5F, 0xAA];
        let mut r = Reader::new(&bytes);
        assert_eq!(read_constructed(&mut r, 5).unwrap(), &bytes[1..8]);
        assert_eq!(r.remaining(), 1);

        let mut r = Reader::new(&[0x5E, 0x21, 0x11, 0x6F]);
        assert_eq!(
            read_constructed(&mut r, 5).unwrap_err(),
            DecodeError::InvalidTag
        );
        let mut r = Reader::new(&[0x5E, 0x21]);
        assert_eq!(
            read_constructed(&mut r, 5).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn constructed_body_checks_nested_closing_numbers() {
        // [5] { [1] { [0] 7 } closed as [2] }
        let mut r = Reader::new(&[0x5E, 0x1E, 0x09, 0x07, 0x2F, 0x5F]);
        assert_eq!(
            read_constructed(&mut r, 5).unwrap_err(),
            DecodeError::InvalidTag
        );

        let mut bytes = [0x1E; MAX_CONSTRUCTED_DEPTH + 2];
        bytes[0] = 0x5E;
        let mut r = Reader::new(&bytes);
        assert_eq!(
            read_constructed(&mut r, 5).unwrap_err(),
            DecodeError::CapacityExceeded
        );
    }
}
