use crate::apdu::{ApduType, ConfirmedRequestHeader, UnconfirmedRequestHeader};
use crate::encoding::{
    primitives::{
        decode_ctx_boolean, decode_ctx_character_string, decode_ctx_enumerated,
        decode_ctx_object_id, decode_ctx_timestamp, decode_ctx_unsigned, encode_closing_tag,
        encode_ctx_boolean, encode_ctx_character_string, encode_ctx_enumerated,
        encode_ctx_object_id, encode_ctx_timestamp, encode_ctx_unsigned, encode_opening_tag,
        narrow,
    },
    reader::Reader,
    tag::{expect_closing, expect_opening},
    writer::Writer,
    Encode,
};
use crate::services::{decode_optional_ctx, event_parameters::NotificationParameters, known};
use crate::types::{EventState, EventType, NotifyType, ObjectId, TimeStamp};
use crate::{DecodeError, EncodeError};

pub const SERVICE_CONFIRMED_EVENT_NOTIFICATION: u8 = 0x02;
pub const SERVICE_UNCONFIRMED_EVENT_NOTIFICATION: u8 = 0x03;

/// Fields carried only by alarm and event notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct EventValues<'a> {
    pub ack_required: bool,
    pub from_state: EventState,
    pub parameters: NotificationParameters<'a>,
}

/// Notify type together with the fields that depend on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Notify<'a> {
    Alarm(EventValues<'a>),
    Event(EventValues<'a>),
    AckNotification,
}

impl<'a> Notify<'a> {
    pub const fn notify_type(&self) -> NotifyType {
        match self {
            Self::Alarm(_) => NotifyType::Alarm,
            Self::Event(_) => NotifyType::Event,
            Self::AckNotification => NotifyType::AckNotification,
        }
    }

    pub const fn values(&self) -> Option<&EventValues<'a>> {
        match self {
            Self::Alarm(values) | Self::Event(values) => Some(values),
            Self::AckNotification => None,
        }
    }

    pub fn values_mut(&mut self) -> Option<&mut EventValues<'a>> {
        match self {
            Self::Alarm(values) | Self::Event(values) => Some(values),
            Self::AckNotification => None,
        }
    }
}

/// The ConfirmedEventNotification / UnconfirmedEventNotification request
/// body.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNotification<'a> {
    pub process_id: u32,
    pub initiating_device_id: ObjectId,
    pub event_object_id: ObjectId,
    pub timestamp: TimeStamp,
    pub notification_class: u32,
    pub priority: u8,
    pub event_type: EventType,
    pub message_text: Option<&'a str>,
    pub notify: Notify<'a>,
    pub to_state: EventState,
}

impl<'a> EventNotification<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let process_id = decode_ctx_unsigned(r, 0)?;
        let initiating_device_id = decode_ctx_object_id(r, 1)?;
        let event_object_id = decode_ctx_object_id(r, 2)?;
        let timestamp = decode_ctx_timestamp(r, 3)?;
        let notification_class = decode_ctx_unsigned(r, 4)?;
        let priority = narrow(decode_ctx_unsigned(r, 5)?)?;
        let event_type = known(decode_ctx_enumerated(r, 6)?, EventType::from_u32)?;
        let message_text = decode_optional_ctx(r, 7, decode_ctx_character_string)?;
        let notify_type = known(decode_ctx_enumerated(r, 8)?, NotifyType::from_u32)?;

        let (ack_required, from_state) = if notify_type == NotifyType::AckNotification {
            (false, EventState::Normal)
        } else {
            let ack_required = decode_optional_ctx(r, 9, decode_ctx_boolean)?.unwrap_or(false);
            let from_state = match decode_optional_ctx(r, 10, decode_ctx_enumerated)? {
                Some(raw) => known(raw, EventState::from_u32)?,
                None => EventState::Normal,
            };
            (ack_required, from_state)
        };

        let to_state = known(decode_ctx_enumerated(r, 11)?, EventState::from_u32)?;

        let notify = match notify_type {
            NotifyType::AckNotification => Notify::AckNotification,
            NotifyType::Alarm | NotifyType::Event => {
                expect_opening(r, 12)?;
                let parameters = NotificationParameters::decode(r, event_type)?;
                expect_closing(r, 12)?;
                let values = EventValues {
                    ack_required,
                    from_state,
                    parameters,
                };
                if notify_type == NotifyType::Alarm {
                    Notify::Alarm(values)
                } else {
                    Notify::Event(values)
                }
            }
        };

        Ok(Self {
            process_id,
            initiating_device_id,
            event_object_id,
            timestamp,
            notification_class,
            priority,
            event_type,
            message_text,
            notify,
            to_state,
        })
    }

    /// Checks that `body` holds one well-formed notification and returns
    /// the number of bytes it occupies.
    pub fn validate(body: &[u8]) -> Result<usize, DecodeError> {
        let mut r = Reader::new(body);
        EventNotification::decode(&mut r)?;
        Ok(r.position())
    }

    /// Decodes a complete confirmed or unconfirmed EventNotification APDU.
    /// The invoke id is present for the confirmed form.
    pub fn decode_apdu(apdu: &'a [u8]) -> Result<(Option<u8>, Self), DecodeError> {
        let first = *apdu.first().ok_or(DecodeError::UnexpectedEof)?;
        let mut r = Reader::new(apdu);
        let invoke_id = match ApduType::of(first) {
            Some(ApduType::ConfirmedRequest) => {
                let header = ConfirmedRequestHeader::decode(&mut r)?;
                if header.segmented
                    || header.service_choice != SERVICE_CONFIRMED_EVENT_NOTIFICATION
                {
                    return Err(DecodeError::Unsupported);
                }
                Some(header.invoke_id)
            }
            Some(ApduType::UnconfirmedRequest) => {
                let header = UnconfirmedRequestHeader::decode(&mut r)?;
                if header.service_choice != SERVICE_UNCONFIRMED_EVENT_NOTIFICATION {
                    return Err(DecodeError::Unsupported);
                }
                None
            }
            _ => return Err(DecodeError::InvalidValue),
        };
        Ok((invoke_id, Self::decode(&mut r)?))
    }
}

impl Encode for EventNotification<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if !self.event_type.is_valid() {
            return Err(EncodeError::ValueOutOfRange);
        }
        if let Some(values) = self.notify.values() {
            if !values.parameters.fits(self.event_type) {
                return Err(EncodeError::InconsistentParameters);
            }
        }

        encode_ctx_unsigned(w, 0, self.process_id)?;
        encode_ctx_object_id(w, 1, self.initiating_device_id)?;
        encode_ctx_object_id(w, 2, self.event_object_id)?;
        encode_ctx_timestamp(w, 3, self.timestamp)?;
        encode_ctx_unsigned(w, 4, self.notification_class)?;
        encode_ctx_unsigned(w, 5, self.priority as u32)?;
        encode_ctx_enumerated(w, 6, self.event_type.to_u32())?;
        if let Some(text) = self.message_text {
            encode_ctx_character_string(w, 7, text)?;
        }
        encode_ctx_enumerated(w, 8, self.notify.notify_type().to_u32())?;
        if let Some(values) = self.notify.values() {
            encode_ctx_boolean(w, 9, values.ack_required)?;
            encode_ctx_enumerated(w, 10, values.from_state.to_u32())?;
        }
        encode_ctx_enumerated(w, 11, self.to_state.to_u32())?;
        if let Some(values) = self.notify.values() {
            encode_opening_tag(w, 12)?;
            values.parameters.encode(w)?;
            encode_closing_tag(w, 12)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedEventNotificationRequest<'a> {
    pub invoke_id: u8,
    pub notification: EventNotification<'a>,
}

impl Encode for ConfirmedEventNotificationRequest<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::unsegmented(self.invoke_id, SERVICE_CONFIRMED_EVENT_NOTIFICATION)
            .encode(w)?;
        self.notification.encode(w)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnconfirmedEventNotificationRequest<'a> {
    pub notification: EventNotification<'a>,
}

impl Encode for UnconfirmedEventNotificationRequest<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_UNCONFIRMED_EVENT_NOTIFICATION,
        }
        .encode(w)?;
        self.notification.encode(w)
    }
}
