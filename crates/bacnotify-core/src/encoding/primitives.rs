use crate::encoding::{
    reader::Reader,
    tag::{expect_closing, expect_opening, AppTag, Tag},
    writer::Writer,
};
use crate::types::{BitString, Date, DateTime, ObjectId, OctetFlags, Time, TimeStamp};
use crate::{DecodeError, EncodeError};

/// Character set 0: UTF-8 (ANSI X3.4 compatible).
pub const CHARACTER_UTF8: u8 = 0;

/// Where a primitive value lands: an application tag of its own type, or a
/// context tag chosen by the enclosing structure.
#[derive(Debug, Clone, Copy)]
enum Slot {
    App(AppTag),
    Ctx(u8),
}

impl Slot {
    fn header(self, len: u32) -> Tag {
        match self {
            Slot::App(tag) => Tag::Application { tag, len },
            Slot::Ctx(tag_num) => Tag::Context { tag_num, len },
        }
    }
}

pub(crate) fn u32_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

/// Narrows a decoded unsigned value into a smaller field.
pub fn narrow<T: TryFrom<u32>>(value: u32) -> Result<T, DecodeError> {
    T::try_from(value).map_err(|_| DecodeError::ValueOutOfRange)
}

fn unsigned_bytes(value: u32) -> ([u8; 4], usize) {
    let len = if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFF_FFFF {
        3
    } else {
        4
    };
    (value.to_be_bytes(), len)
}

fn signed_bytes(value: i32) -> ([u8; 4], usize) {
    let len = if (-128..=127).contains(&value) {
        1
    } else if (-32768..=32767).contains(&value) {
        2
    } else if (-8_388_608..=8_388_607).contains(&value) {
        3
    } else {
        4
    };
    (value.to_be_bytes(), len)
}

pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let (bytes, len) = unsigned_bytes(value);
    w.write_all(&bytes[4 - len..])?;
    Ok(len)
}

/// Decodes up to eight content octets as an unsigned integer.
pub fn decode_unsigned64(r: &mut Reader<'_>, len: usize) -> Result<u64, DecodeError> {
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u64;
    for b in r.read_exact(len)? {
        value = (value << 8) | *b as u64;
    }
    Ok(value)
}

/// Decodes an unsigned integer destined for a 32-bit field. Wider encodings
/// are accepted only when the value still fits.
pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    u32::try_from(decode_unsigned64(r, len)?).map_err(|_| DecodeError::ValueOutOfRange)
}

pub fn encode_signed(w: &mut Writer<'_>, value: i32) -> Result<usize, EncodeError> {
    let (bytes, len) = signed_bytes(value);
    w.write_all(&bytes[4 - len..])?;
    Ok(len)
}

pub fn decode_signed(r: &mut Reader<'_>, len: usize) -> Result<i32, DecodeError> {
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength);
    }

    let bytes = r.read_exact(len)?;
    let mut out = [0u8; 8];
    out[8 - len..].copy_from_slice(bytes);
    if (bytes[0] & 0x80) != 0 {
        for b in &mut out[..8 - len] {
            *b = 0xFF;
        }
    }
    i32::try_from(i64::from_be_bytes(out)).map_err(|_| DecodeError::ValueOutOfRange)
}

fn encode_unsigned_in(w: &mut Writer<'_>, slot: Slot, value: u32) -> Result<(), EncodeError> {
    let (bytes, len) = unsigned_bytes(value);
    slot.header(len as u32).encode(w)?;
    w.write_all(&bytes[4 - len..])
}

fn encode_signed_in(w: &mut Writer<'_>, slot: Slot, value: i32) -> Result<(), EncodeError> {
    let (bytes, len) = signed_bytes(value);
    slot.header(len as u32).encode(w)?;
    w.write_all(&bytes[4 - len..])
}

fn encode_content_in(w: &mut Writer<'_>, slot: Slot, content: &[u8]) -> Result<(), EncodeError> {
    slot.header(u32_len(content.len())?).encode(w)?;
    w.write_all(content)
}

fn encode_character_string_in(
    w: &mut Writer<'_>,
    slot: Slot,
    value: &str,
) -> Result<(), EncodeError> {
    let bytes = value.as_bytes();
    slot.header(u32_len(bytes.len().saturating_add(1))?)
        .encode(w)?;
    w.write_u8(CHARACTER_UTF8)?;
    w.write_all(bytes)
}

fn encode_bit_string_in(
    w: &mut Writer<'_>,
    slot: Slot,
    value: BitString<'_>,
) -> Result<(), EncodeError> {
    if value.unused_bits > 7 || (value.data.is_empty() && value.unused_bits != 0) {
        return Err(EncodeError::ValueOutOfRange);
    }
    slot.header(u32_len(value.data.len().saturating_add(1))?)
        .encode(w)?;
    w.write_u8(value.unused_bits)?;
    w.write_all(value.data)
}

fn encode_flags_in<F: OctetFlags>(w: &mut Writer<'_>, slot: Slot, flags: F) -> Result<(), EncodeError> {
    slot.header(2).encode(w)?;
    w.write_u8(8 - F::BIT_COUNT)?;
    w.write_u8(flags.to_octet())
}

pub fn encode_app_null(w: &mut Writer<'_>) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::Null,
        len: 0,
    }
    .encode(w)
}

pub fn encode_app_boolean(w: &mut Writer<'_>, value: bool) -> Result<(), EncodeError> {
    Tag::Application {
        tag: AppTag::Boolean,
        len: value as u32,
    }
    .encode(w)
}

pub fn encode_app_unsigned(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_unsigned_in(w, Slot::App(AppTag::UnsignedInt), value)
}

pub fn encode_app_enumerated(w: &mut Writer<'_>, value: u32) -> Result<(), EncodeError> {
    encode_unsigned_in(w, Slot::App(AppTag::Enumerated), value)
}

pub fn encode_app_signed(w: &mut Writer<'_>, value: i32) -> Result<(), EncodeError> {
    encode_signed_in(w, Slot::App(AppTag::SignedInt), value)
}

pub fn encode_app_real(w: &mut Writer<'_>, value: f32) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::App(AppTag::Real), &value.to_be_bytes())
}

pub fn encode_app_double(w: &mut Writer<'_>, value: f64) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::App(AppTag::Double), &value.to_be_bytes())
}

pub fn encode_app_octet_string(w: &mut Writer<'_>, value: &[u8]) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::App(AppTag::OctetString), value)
}

pub fn encode_app_character_string(w: &mut Writer<'_>, value: &str) -> Result<(), EncodeError> {
    encode_character_string_in(w, Slot::App(AppTag::CharacterString), value)
}

pub fn encode_app_bit_string(w: &mut Writer<'_>, value: BitString<'_>) -> Result<(), EncodeError> {
    encode_bit_string_in(w, Slot::App(AppTag::BitString), value)
}

pub fn encode_app_flags<F: OctetFlags>(w: &mut Writer<'_>, flags: F) -> Result<(), EncodeError> {
    encode_flags_in(w, Slot::App(AppTag::BitString), flags)
}

pub fn encode_app_date(w: &mut Writer<'_>, value: Date) -> Result<(), EncodeError> {
    encode_content_in(
        w,
        Slot::App(AppTag::Date),
        &[value.year_since_1900, value.month, value.day, value.weekday],
    )
}

pub fn encode_app_time(w: &mut Writer<'_>, value: Time) -> Result<(), EncodeError> {
    encode_content_in(
        w,
        Slot::App(AppTag::Time),
        &[value.hour, value.minute, value.second, value.hundredths],
    )
}

pub fn encode_app_object_id(w: &mut Writer<'_>, value: ObjectId) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::App(AppTag::ObjectId), &value.raw().to_be_bytes())
}

pub fn encode_ctx_null(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    Tag::Context { tag_num, len: 0 }.encode(w)
}

pub fn encode_ctx_boolean(w: &mut Writer<'_>, tag_num: u8, value: bool) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::Ctx(tag_num), &[value as u8])
}

pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_num: u8, value: u32) -> Result<(), EncodeError> {
    encode_unsigned_in(w, Slot::Ctx(tag_num), value)
}

pub fn encode_ctx_enumerated(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: u32,
) -> Result<(), EncodeError> {
    encode_unsigned_in(w, Slot::Ctx(tag_num), value)
}

pub fn encode_ctx_signed(w: &mut Writer<'_>, tag_num: u8, value: i32) -> Result<(), EncodeError> {
    encode_signed_in(w, Slot::Ctx(tag_num), value)
}

pub fn encode_ctx_real(w: &mut Writer<'_>, tag_num: u8, value: f32) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::Ctx(tag_num), &value.to_be_bytes())
}

pub fn encode_ctx_double(w: &mut Writer<'_>, tag_num: u8, value: f64) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::Ctx(tag_num), &value.to_be_bytes())
}

pub fn encode_ctx_octet_string(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &[u8],
) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::Ctx(tag_num), value)
}

pub fn encode_ctx_character_string(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: &str,
) -> Result<(), EncodeError> {
    encode_character_string_in(w, Slot::Ctx(tag_num), value)
}

pub fn encode_ctx_bit_string(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: BitString<'_>,
) -> Result<(), EncodeError> {
    encode_bit_string_in(w, Slot::Ctx(tag_num), value)
}

pub fn encode_ctx_flags<F: OctetFlags>(
    w: &mut Writer<'_>,
    tag_num: u8,
    flags: F,
) -> Result<(), EncodeError> {
    encode_flags_in(w, Slot::Ctx(tag_num), flags)
}

pub fn encode_ctx_object_id(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: ObjectId,
) -> Result<(), EncodeError> {
    encode_content_in(w, Slot::Ctx(tag_num), &value.raw().to_be_bytes())
}

pub fn encode_opening_tag(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    Tag::Opening { tag_num }.encode(w)
}

pub fn encode_closing_tag(w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
    Tag::Closing { tag_num }.encode(w)
}

/// BACnetDateTime: application date followed by application time.
pub fn encode_datetime(w: &mut Writer<'_>, value: DateTime) -> Result<(), EncodeError> {
    encode_app_date(w, value.date)?;
    encode_app_time(w, value.time)
}

pub fn encode_ctx_datetime(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: DateTime,
) -> Result<(), EncodeError> {
    encode_opening_tag(w, tag_num)?;
    encode_datetime(w, value)?;
    encode_closing_tag(w, tag_num)
}

/// BACnetTimeStamp wrapped in opening/closing tag `tag_num`.
pub fn encode_ctx_timestamp(
    w: &mut Writer<'_>,
    tag_num: u8,
    value: TimeStamp,
) -> Result<(), EncodeError> {
    encode_opening_tag(w, tag_num)?;
    match value {
        TimeStamp::Time(time) => encode_content_in(
            w,
            Slot::Ctx(0),
            &[time.hour, time.minute, time.second, time.hundredths],
        )?,
        TimeStamp::SequenceNumber(seq) => encode_ctx_unsigned(w, 1, seq)?,
        TimeStamp::DateTime(datetime) => encode_ctx_datetime(w, 2, datetime)?,
    }
    encode_closing_tag(w, tag_num)
}

fn expect_app(r: &mut Reader<'_>, expected: AppTag) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Application { tag, len } if tag == expected => Ok(len),
        _ => Err(DecodeError::InvalidTag),
    }
}

fn expect_ctx(r: &mut Reader<'_>, expected_tag_num: u8) -> Result<u32, DecodeError> {
    match Tag::decode(r)? {
        Tag::Context { tag_num, len } if tag_num == expected_tag_num => Ok(len),
        _ => Err(DecodeError::InvalidTag),
    }
}

fn fixed<const N: usize>(r: &mut Reader<'_>, len: u32) -> Result<[u8; N], DecodeError> {
    if len as usize != N {
        return Err(DecodeError::InvalidLength);
    }
    r.read_array()
}

pub fn decode_real(r: &mut Reader<'_>, len: u32) -> Result<f32, DecodeError> {
    Ok(f32::from_be_bytes(fixed(r, len)?))
}

pub fn decode_double(r: &mut Reader<'_>, len: u32) -> Result<f64, DecodeError> {
    Ok(f64::from_be_bytes(fixed(r, len)?))
}

pub fn decode_date(r: &mut Reader<'_>, len: u32) -> Result<Date, DecodeError> {
    let [year_since_1900, month, day, weekday] = fixed(r, len)?;
    Ok(Date {
        year_since_1900,
        month,
        day,
        weekday,
    })
}

pub fn decode_time(r: &mut Reader<'_>, len: u32) -> Result<Time, DecodeError> {
    let [hour, minute, second, hundredths] = fixed(r, len)?;
    Ok(Time::new(hour, minute, second, hundredths))
}

pub fn decode_object_id(r: &mut Reader<'_>, len: u32) -> Result<ObjectId, DecodeError> {
    Ok(ObjectId::from_raw(u32::from_be_bytes(fixed(r, len)?)))
}

pub fn decode_character_string<'a>(r: &mut Reader<'a>, len: u32) -> Result<&'a str, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len as usize)?;
    if raw[0] != CHARACTER_UTF8 {
        return Err(DecodeError::Unsupported);
    }
    core::str::from_utf8(&raw[1..]).map_err(|_| DecodeError::InvalidValue)
}

pub fn decode_bit_string<'a>(r: &mut Reader<'a>, len: u32) -> Result<BitString<'a>, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len as usize)?;
    let unused_bits = raw[0];
    if unused_bits > 7 || (raw.len() == 1 && unused_bits != 0) {
        return Err(DecodeError::InvalidValue);
    }
    Ok(BitString::new(unused_bits, &raw[1..]))
}

pub fn decode_flags<F: OctetFlags>(r: &mut Reader<'_>, len: u32) -> Result<F, DecodeError> {
    let bits = decode_bit_string(r, len)?;
    match bits.data.first() {
        Some(octet) => Ok(F::from_octet(*octet, bits.bit_count())),
        None => Ok(F::from_raw_truncate(0)),
    }
}

pub fn decode_app_boolean(r: &mut Reader<'_>) -> Result<bool, DecodeError> {
    match expect_app(r, AppTag::Boolean)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::InvalidValue),
    }
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let len = expect_app(r, AppTag::UnsignedInt)?;
    decode_unsigned(r, len as usize)
}

pub fn decode_app_enumerated(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let len = expect_app(r, AppTag::Enumerated)?;
    decode_unsigned(r, len as usize)
}

pub fn decode_app_signed(r: &mut Reader<'_>) -> Result<i32, DecodeError> {
    let len = expect_app(r, AppTag::SignedInt)?;
    decode_signed(r, len as usize)
}

pub fn decode_app_real(r: &mut Reader<'_>) -> Result<f32, DecodeError> {
    let len = expect_app(r, AppTag::Real)?;
    decode_real(r, len)
}

pub fn decode_app_double(r: &mut Reader<'_>) -> Result<f64, DecodeError> {
    let len = expect_app(r, AppTag::Double)?;
    decode_double(r, len)
}

pub fn decode_app_octet_string<'a>(r: &mut Reader<'a>) -> Result<&'a [u8], DecodeError> {
    let len = expect_app(r, AppTag::OctetString)?;
    r.read_exact(len as usize)
}

pub fn decode_app_character_string<'a>(r: &mut Reader<'a>) -> Result<&'a str, DecodeError> {
    let len = expect_app(r, AppTag::CharacterString)?;
    decode_character_string(r, len)
}

pub fn decode_app_bit_string<'a>(r: &mut Reader<'a>) -> Result<BitString<'a>, DecodeError> {
    let len = expect_app(r, AppTag::BitString)?;
    decode_bit_string(r, len)
}

pub fn decode_app_flags<F: OctetFlags>(r: &mut Reader<'_>) -> Result<F, DecodeError> {
    let len = expect_app(r, AppTag::BitString)?;
    decode_flags(r, len)
}

pub fn decode_app_date(r: &mut Reader<'_>) -> Result<Date, DecodeError> {
    let len = expect_app(r, AppTag::Date)?;
    decode_date(r, len)
}

pub fn decode_app_time(r: &mut Reader<'_>) -> Result<Time, DecodeError> {
    let len = expect_app(r, AppTag::Time)?;
    decode_time(r, len)
}

pub fn decode_app_object_id(r: &mut Reader<'_>) -> Result<ObjectId, DecodeError> {
    let len = expect_app(r, AppTag::ObjectId)?;
    decode_object_id(r, len)
}

pub fn decode_ctx_null(r: &mut Reader<'_>, tag_num: u8) -> Result<(), DecodeError> {
    match expect_ctx(r, tag_num)? {
        0 => Ok(()),
        _ => Err(DecodeError::InvalidLength),
    }
}

pub fn decode_ctx_boolean(r: &mut Reader<'_>, tag_num: u8) -> Result<bool, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    let [value] = fixed::<1>(r, len)?;
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::InvalidValue),
    }
}

pub fn decode_ctx_unsigned(r: &mut Reader<'_>, tag_num: u8) -> Result<u32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_unsigned(r, len as usize)
}

pub fn decode_ctx_enumerated(r: &mut Reader<'_>, tag_num: u8) -> Result<u32, DecodeError> {
    decode_ctx_unsigned(r, tag_num)
}

pub fn decode_ctx_signed(r: &mut Reader<'_>, tag_num: u8) -> Result<i32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_signed(r, len as usize)
}

pub fn decode_ctx_real(r: &mut Reader<'_>, tag_num: u8) -> Result<f32, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_real(r, len)
}

pub fn decode_ctx_double(r: &mut Reader<'_>, tag_num: u8) -> Result<f64, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_double(r, len)
}

pub fn decode_ctx_octet_string<'a>(
    r: &mut Reader<'a>,
    tag_num: u8,
) -> Result<&'a [u8], DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    r.read_exact(len as usize)
}

pub fn decode_ctx_character_string<'a>(
    r: &mut Reader<'a>,
    tag_num: u8,
) -> Result<&'a str, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_character_string(r, len)
}

pub fn decode_ctx_bit_string<'a>(
    r: &mut Reader<'a>,
    tag_num: u8,
) -> Result<BitString<'a>, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_bit_string(r, len)
}

pub fn decode_ctx_flags<F: OctetFlags>(r: &mut Reader<'_>, tag_num: u8) -> Result<F, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_flags(r, len)
}

pub fn decode_ctx_object_id(r: &mut Reader<'_>, tag_num: u8) -> Result<ObjectId, DecodeError> {
    let len = expect_ctx(r, tag_num)?;
    decode_object_id(r, len)
}

pub fn decode_datetime(r: &mut Reader<'_>) -> Result<DateTime, DecodeError> {
    let date = decode_app_date(r)?;
    let time = decode_app_time(r)?;
    Ok(DateTime::new(date, time))
}

pub fn decode_ctx_datetime(r: &mut Reader<'_>, tag_num: u8) -> Result<DateTime, DecodeError> {
    expect_opening(r, tag_num)?;
    let datetime = decode_datetime(r)?;
    expect_closing(r, tag_num)?;
    Ok(datetime)
}

pub fn decode_ctx_timestamp(r: &mut Reader<'_>, tag_num: u8) -> Result<TimeStamp, DecodeError> {
    expect_opening(r, tag_num)?;
    let timestamp = match Tag::decode(r)? {
        Tag::Context { tag_num: 0, len } => TimeStamp::Time(decode_time(r, len)?),
        Tag::Context { tag_num: 1, len } => {
            TimeStamp::SequenceNumber(decode_unsigned(r, len as usize)?)
        }
        Tag::Opening { tag_num: 2 } => {
            let datetime = decode_datetime(r)?;
            expect_closing(r, 2)?;
            TimeStamp::DateTime(datetime)
        }
        _ => return Err(DecodeError::InvalidTag),
    };
    expect_closing(r, tag_num)?;
    Ok(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Date, DateTime, StatusFlags, Time, TimeStamp};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unsigned_roundtrip(v in any::<u32>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = encode_unsigned(&mut w, v).unwrap();
            let mut r = Reader::new(w.as_written());
            let got = decode_unsigned(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }

        #[test]
        fn app_unsigned_roundtrip(v in any::<u32>()) {
            let mut b = [0u8; 16];
            let mut w = Writer::new(&mut b);
            encode_app_unsigned(&mut w, v).unwrap();
            let mut r = Reader::new(w.as_written());
            let got = decode_app_unsigned(&mut r).unwrap();
            prop_assert_eq!(got, v);
        }

        #[test]
        fn signed_roundtrip(v in any::<i32>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = encode_signed(&mut w, v).unwrap();
            let mut r = Reader::new(w.as_written());
            let got = decode_signed(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }

        #[test]
        fn ctx_signed_roundtrip(v in any::<i32>()) {
            let mut b = [0u8; 16];
            let mut w = Writer::new(&mut b);
            encode_ctx_signed(&mut w, 3, v).unwrap();
            let mut r = Reader::new(w.as_written());
            let got = decode_ctx_signed(&mut r, 3).unwrap();
            prop_assert_eq!(got, v);
        }
    }

    #[test]
    fn forty_bit_unsigned_is_out_of_range() {
        let mut r = Reader::new(&[0x01, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(
            decode_unsigned(&mut r, 5).unwrap_err(),
            DecodeError::ValueOutOfRange
        );

        let mut r = Reader::new(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(decode_unsigned(&mut r, 5).unwrap(), u32::MAX);
    }

    #[test]
    fn wide_signed_values() {
        let mut r = Reader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(decode_signed(&mut r, 5).unwrap(), -2);

        let mut r = Reader::new(&[0x01, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(
            decode_signed(&mut r, 5).unwrap_err(),
            DecodeError::ValueOutOfRange
        );
    }

    #[test]
    fn narrowing_checks_width() {
        assert_eq!(narrow::<u8>(255).unwrap(), 255);
        assert_eq!(narrow::<u8>(256).unwrap_err(), DecodeError::ValueOutOfRange);
        assert_eq!(narrow::<u16>(65_535).unwrap(), 65_535);
    }

    #[test]
    fn ctx_character_string_roundtrip() {
        let mut b = [0u8; 32];
        let mut w = Writer::new(&mut b);
        encode_ctx_character_string(&mut w, 2, "hello").unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(decode_ctx_character_string(&mut r, 2).unwrap(), "hello");
    }

    #[test]
    fn character_string_length_beyond_buffer_fails() {
        let mut r = Reader::new(&[0x2D, 0x10, 0x00, b'h', b'i']);
        assert_eq!(
            decode_ctx_character_string(&mut r, 2).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn context_boolean_has_one_content_octet() {
        let mut b = [0u8; 4];
        let mut w = Writer::new(&mut b);
        encode_ctx_boolean(&mut w, 9, true).unwrap();
        assert_eq!(w.as_written(), &[0x99, 0x01]);
        let mut r = Reader::new(w.as_written());
        assert!(decode_ctx_boolean(&mut r, 9).unwrap());
    }

    #[test]
    fn status_flags_encoding() {
        let mut b = [0u8; 8];
        let mut w = Writer::new(&mut b);
        encode_ctx_flags(&mut w, 1, StatusFlags::IN_ALARM).unwrap();
        assert_eq!(w.as_written(), &[0x1A, 0x04, 0x80]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(
            decode_ctx_flags::<StatusFlags>(&mut r, 1).unwrap(),
            StatusFlags::IN_ALARM
        );
    }

    #[test]
    fn wrong_context_tag_is_rejected() {
        let mut b = [0u8; 8];
        let mut w = Writer::new(&mut b);
        encode_ctx_unsigned(&mut w, 4, 7).unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(
            decode_ctx_unsigned(&mut r, 5).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    #[test]
    fn real_with_wrong_length_is_rejected() {
        let mut r = Reader::new(&[0x0B, 0x00, 0x00, 0x00]);
        assert_eq!(
            decode_ctx_real(&mut r, 0).unwrap_err(),
            DecodeError::InvalidLength
        );
    }

    #[test]
    fn timestamp_choices_roundtrip() {
        let datetime = DateTime::new(
            Date {
                year_since_1900: 124,
                month: 5,
                day: 17,
                weekday: 5,
            },
            Time::new(13, 45, 0, 12),
        );
        for ts in [
            TimeStamp::Time(Time::new(1, 2, 3, 4)),
            TimeStamp::SequenceNumber(70_000),
            TimeStamp::DateTime(datetime),
        ] {
            let mut b = [0u8; 32];
            let mut w = Writer::new(&mut b);
            encode_ctx_timestamp(&mut w, 3, ts).unwrap();
            let mut r = Reader::new(w.as_written());
            assert_eq!(decode_ctx_timestamp(&mut r, 3).unwrap(), ts);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn timestamp_with_wrong_closing_tag_fails() {
        let mut b = [0u8; 16];
        let mut w = Writer::new(&mut b);
        encode_opening_tag(&mut w, 3).unwrap();
        encode_ctx_unsigned(&mut w, 1, 5).unwrap();
        encode_closing_tag(&mut w, 4).unwrap();
        let mut r = Reader::new(w.as_written());
        assert_eq!(
            decode_ctx_timestamp(&mut r, 3).unwrap_err(),
            DecodeError::InvalidTag
        );
    }
}
