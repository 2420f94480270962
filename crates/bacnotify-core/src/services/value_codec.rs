use crate::encoding::{
    primitives::{
        decode_bit_string, decode_character_string, decode_date, decode_double, decode_object_id,
        decode_real, decode_signed, decode_time, decode_unsigned, encode_app_bit_string,
        encode_app_boolean, encode_app_character_string, encode_app_date, encode_app_double,
        encode_app_enumerated, encode_app_null, encode_app_object_id, encode_app_octet_string,
        encode_app_real, encode_app_signed, encode_app_time, encode_app_unsigned,
    },
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
    Encode,
};
use crate::types::DataValue;
use crate::{DecodeError, EncodeError};

pub fn encode_application_data_value(
    w: &mut Writer<'_>,
    value: &DataValue<'_>,
) -> Result<(), EncodeError> {
    match *value {
        DataValue::Null => encode_app_null(w),
        DataValue::Boolean(v) => encode_app_boolean(w, v),
        DataValue::Unsigned(v) => encode_app_unsigned(w, v),
        DataValue::Signed(v) => encode_app_signed(w, v),
        DataValue::Real(v) => encode_app_real(w, v),
        DataValue::Double(v) => encode_app_double(w, v),
        DataValue::OctetString(v) => encode_app_octet_string(w, v),
        DataValue::CharacterString(v) => encode_app_character_string(w, v),
        DataValue::BitString(v) => encode_app_bit_string(w, v),
        DataValue::Enumerated(v) => encode_app_enumerated(w, v),
        DataValue::Date(v) => encode_app_date(w, v),
        DataValue::Time(v) => encode_app_time(w, v),
        DataValue::ObjectId(v) => encode_app_object_id(w, v),
    }
}

pub fn decode_application_data_value<'a>(r: &mut Reader<'a>) -> Result<DataValue<'a>, DecodeError> {
    let tag = Tag::decode(r)?;
    decode_application_data_value_from_tag(r, tag)
}

/// Decodes the content of an application value whose tag has already been
/// read. Context and constructed tags are not application data.
pub fn decode_application_data_value_from_tag<'a>(
    r: &mut Reader<'a>,
    tag: Tag,
) -> Result<DataValue<'a>, DecodeError> {
    let Tag::Application { tag, len } = tag else {
        return Err(DecodeError::InvalidTag);
    };

    Ok(match tag {
        AppTag::Null => {
            if len != 0 {
                return Err(DecodeError::InvalidLength);
            }
            DataValue::Null
        }
        AppTag::Boolean => match len {
            0 => DataValue::Boolean(false),
            1 => DataValue::Boolean(true),
            _ => return Err(DecodeError::InvalidValue),
        },
        AppTag::UnsignedInt => DataValue::Unsigned(decode_unsigned(r, len as usize)?),
        AppTag::SignedInt => DataValue::Signed(decode_signed(r, len as usize)?),
        AppTag::Real => DataValue::Real(decode_real(r, len)?),
        AppTag::Double => DataValue::Double(decode_double(r, len)?),
        AppTag::OctetString => DataValue::OctetString(r.read_exact(len as usize)?),
        AppTag::CharacterString => DataValue::CharacterString(decode_character_string(r, len)?),
        AppTag::BitString => DataValue::BitString(decode_bit_string(r, len)?),
        AppTag::Enumerated => DataValue::Enumerated(decode_unsigned(r, len as usize)?),
        AppTag::Date => DataValue::Date(decode_date(r, len)?),
        AppTag::Time => DataValue::Time(decode_time(r, len)?),
        AppTag::ObjectId => DataValue::ObjectId(decode_object_id(r, len)?),
    })
}

impl Encode for DataValue<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_application_data_value(w, self)
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_application_data_value, encode_application_data_value};
    use crate::encoding::{reader::Reader, writer::Writer, Encode};
    use crate::types::{BitString, DataValue, Date, ObjectId, ObjectType, Time};
    use crate::DecodeError;

    #[test]
    fn every_application_value_roundtrips() {
        let values = [
            DataValue::Null,
            DataValue::Boolean(true),
            DataValue::Boolean(false),
            DataValue::Unsigned(70_000),
            DataValue::Signed(-300),
            DataValue::Real(72.5),
            DataValue::Double(-1.25),
            DataValue::OctetString(&[1, 2, 3]),
            DataValue::CharacterString("lobby"),
            DataValue::BitString(BitString::new(4, &[0b1010_0000])),
            DataValue::Enumerated(3),
            DataValue::Date(Date {
                year_since_1900: 126,
                month: 10,
                day: 19,
                weekday: 1,
            }),
            DataValue::Time(Time::new(8, 30, 0, 0)),
            DataValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 12)),
        ];

        for value in values {
            let mut buf = [0u8; 32];
            let mut w = Writer::new(&mut buf);
            encode_application_data_value(&mut w, &value).unwrap();
            assert_eq!(w.position(), value.encoded_len().unwrap());
            let mut r = Reader::new(w.as_written());
            assert_eq!(decode_application_data_value(&mut r).unwrap(), value);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn context_tag_is_not_application_data() {
        let mut r = Reader::new(&[0x09, 0x01]);
        assert_eq!(
            decode_application_data_value(&mut r).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    #[test]
    fn null_with_content_is_rejected() {
        let mut r = Reader::new(&[0x01, 0x00]);
        assert_eq!(
            decode_application_data_value(&mut r).unwrap_err(),
            DecodeError::InvalidLength
        );
    }
}
