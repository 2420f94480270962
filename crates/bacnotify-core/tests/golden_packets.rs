use bacnotify_core::encoding::reader::Reader;
use bacnotify_core::encoding::Encode;
use bacnotify_core::services::audit::{AuditNotification, AuditValue};
use bacnotify_core::services::audit_log_record::{AuditLogDatum, AuditLogRecord};
use bacnotify_core::services::destination::{Destination, Recipient};
use bacnotify_core::services::event_notification::{
    ConfirmedEventNotificationRequest, EventNotification, EventValues, Notify,
    UnconfirmedEventNotificationRequest,
};
use bacnotify_core::services::event_parameters::NotificationParameters;
use bacnotify_core::services::read_range::{ReadRangeRequest, ReadRangeSpecifier};
use bacnotify_core::types::{
    AuditOperation, Date, DateTime, DaysOfWeek, EventState, EventTransitionBits, EventType,
    ObjectId, ObjectType, PropertyId, StatusFlags, Time, TimeStamp,
};
use bacnotify_core::DecodeError;
use proptest::prelude::*;

const ALARM_BODY: [u8; 55] = [
    0x09, 0x01, // [0] process id 1
    0x1C, 0x02, 0x03, 0xF7, 0xA1, // [1] device,260001
    0x2C, 0x00, 0x00, 0x00, 0x00, // [2] analog-input,0
    0x3E, 0x0C, 0x0A, 0x0F, 0x00, 0x00, 0x3F, // [3] time 10:15:00.00
    0x49, 0x04, // [4] class 4
    0x59, 0x64, // [5] priority 100
    0x69, 0x05, // [6] out-of-range
    0x89, 0x00, // [8] alarm
    0x99, 0x01, // [9] ack required
    0xA9, 0x00, // [10] from normal
    0xB9, 0x03, // [11] to high-limit
    0xCE, 0x5E, // [12] [5]
    0x0C, 0x42, 0x91, 0x00, 0x00, // exceeding 72.5
    0x1A, 0x04, 0x80, // in-alarm
    0x2C, 0x40, 0x00, 0x00, 0x00, // deadband 2.0
    0x3C, 0x42, 0x8C, 0x00, 0x00, // limit 70.0
    0x5F, 0xCF,
];

fn out_of_range_alarm() -> EventNotification<'static> {
    EventNotification {
        process_id: 1,
        initiating_device_id: ObjectId::device(260001),
        event_object_id: ObjectId::new(ObjectType::AnalogInput, 0),
        timestamp: TimeStamp::Time(Time::new(10, 15, 0, 0)),
        notification_class: 4,
        priority: 100,
        event_type: EventType::OutOfRange,
        message_text: None,
        notify: Notify::Alarm(EventValues {
            ack_required: true,
            from_state: EventState::Normal,
            parameters: NotificationParameters::OutOfRange {
                exceeding_value: 72.5,
                status_flags: StatusFlags::IN_ALARM,
                deadband: 2.0,
                exceeded_limit: 70.0,
            },
        }),
        to_state: EventState::HighLimit,
    }
}

fn encode_vec<E: Encode>(value: &E) -> Vec<u8> {
    let mut buf = vec![0u8; value.encoded_len().unwrap()];
    let n = value.encode_into(Some(&mut buf)).unwrap();
    buf.truncate(n);
    buf
}

#[test]
fn unconfirmed_alarm_frame_matches_fixture() {
    let bytes = encode_vec(&UnconfirmedEventNotificationRequest {
        notification: out_of_range_alarm(),
    });
    assert_eq!(&bytes[..2], &[0x10, 0x03]);
    assert_eq!(&bytes[2..], &ALARM_BODY);

    let (invoke_id, decoded) = EventNotification::decode_apdu(&bytes).unwrap();
    assert_eq!(invoke_id, None);
    assert_eq!(decoded, out_of_range_alarm());
}

#[test]
fn confirmed_alarm_frame_matches_fixture() {
    let bytes = encode_vec(&ConfirmedEventNotificationRequest {
        invoke_id: 7,
        notification: out_of_range_alarm(),
    });
    assert_eq!(&bytes[..4], &[0x00, 0x05, 0x07, 0x02]);
    assert_eq!(&bytes[4..], &ALARM_BODY);

    let (invoke_id, decoded) = EventNotification::decode_apdu(&bytes).unwrap();
    assert_eq!(invoke_id, Some(7));
    assert_eq!(decoded, out_of_range_alarm());
}

#[test]
fn alarm_body_decodes_to_expected_fields() {
    let mut r = Reader::new(&ALARM_BODY);
    let decoded = EventNotification::decode(&mut r).unwrap();
    assert!(r.is_empty());
    assert_eq!(decoded.notify.notify_type(), out_of_range_alarm().notify.notify_type());
    let values = decoded.notify.values().unwrap();
    assert!(values.ack_required);
    match values.parameters {
        NotificationParameters::OutOfRange {
            exceeding_value,
            exceeded_limit,
            ..
        } => {
            assert_eq!(exceeding_value, 72.5);
            assert_eq!(exceeded_limit, 70.0);
        }
        ref other => panic!("unexpected parameters {other:?}"),
    }
}

#[test]
fn other_service_choice_is_unsupported() {
    let mut frame = vec![0x10, 0x08];
    frame.extend_from_slice(&ALARM_BODY);
    assert_eq!(
        EventNotification::decode_apdu(&frame).unwrap_err(),
        DecodeError::Unsupported
    );
}

#[test]
fn destination_text_encodes_to_fixture() {
    let dest: Destination = "(ValidDays=[1,2,5];FromTime=0:00:00.00;ToTime=23:59:59.99;\
        Recipient=Device(type=8,instance=15);ProcessIdentifier=0;ConfirmedNotify=false;\
        Transitions=[to-offnormal,to-normal])"
        .parse()
        .unwrap();
    assert_eq!(
        dest.valid_days,
        DaysOfWeek::MONDAY | DaysOfWeek::TUESDAY | DaysOfWeek::FRIDAY
    );
    assert_eq!(
        dest.transitions,
        EventTransitionBits::TO_OFFNORMAL | EventTransitionBits::TO_NORMAL
    );

    let bytes = encode_vec(&dest);
    assert_eq!(
        bytes,
        [
            0x82, 0x01, 0xC8, // valid days
            0xB4, 0x00, 0x00, 0x00, 0x00, // from
            0xB4, 0x17, 0x3B, 0x3B, 0x63, // to
            0x0C, 0x02, 0x00, 0x00, 0x0F, // [0] device 15
            0x21, 0x00, // process id
            0x10, // unconfirmed
            0x82, 0x05, 0xA0, // transitions
        ]
    );
    let mut r = Reader::new(&bytes);
    assert_eq!(Destination::decode(&mut r).unwrap(), dest);
}

#[test]
fn audit_log_record_with_notification_roundtrips() {
    let mut notification = AuditNotification::new(
        AuditOperation::Write,
        Recipient::Device(ObjectId::device(1)),
        Recipient::Device(ObjectId::device(2)),
    );
    notification.target_object = Some(ObjectId::new(ObjectType::AnalogValue, 3));
    notification.target_priority = Some(8);
    notification.target_value = Some(AuditValue::Real(21.5));

    let record = AuditLogRecord {
        timestamp: DateTime::new(
            Date {
                year_since_1900: 126,
                month: 10,
                day: 19,
                weekday: 1,
            },
            Time::new(9, 30, 0, 0),
        ),
        datum: AuditLogDatum::Notification(notification),
    };
    let bytes = encode_vec(&record);
    assert_eq!(&bytes[..2], &[0x0E, 0xA4]);
    assert_eq!(&bytes[12..14], &[0x1E, 0x1E]);
    assert_eq!(&bytes[bytes.len() - 2..], &[0x1F, 0x1F]);

    let mut r = Reader::new(&bytes);
    assert_eq!(AuditLogRecord::decode(&mut r).unwrap(), record);
    assert!(r.is_empty());
}

#[test]
fn read_range_by_sequence_matches_fixture() {
    let bytes = encode_vec(&ReadRangeRequest {
        object_id: ObjectId::new(ObjectType::AuditLog, 1),
        property_id: PropertyId::LogBuffer,
        array_index: None,
        range: ReadRangeSpecifier::BySequenceNumber {
            reference_sequence: 300,
            count: 5,
        },
    });
    assert_eq!(
        bytes,
        [
            0x0C, 0x0F, 0x40, 0x00, 0x01, 0x19, 0x83, 0x6E, 0x22, 0x01, 0x2C, 0x31, 0x05, 0x6F,
        ]
    );
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..96)) {
        let _ = EventNotification::decode_apdu(&data);
        let _ = EventNotification::decode(&mut Reader::new(&data));
        let _ = Destination::decode(&mut Reader::new(&data));
        let _ = AuditLogRecord::decode(&mut Reader::new(&data));
        if let Ok(text) = core::str::from_utf8(&data) {
            let _ = text.parse::<Destination>();
        }
    }

    #[test]
    fn truncated_alarm_never_decodes(cut in 0usize..ALARM_BODY.len()) {
        let mut r = Reader::new(&ALARM_BODY[..cut]);
        prop_assert!(EventNotification::decode(&mut r).is_err());
    }

    #[test]
    fn destination_survives_the_wire(
        days in 0u8..0x80,
        process_id in any::<u32>(),
        confirmed in any::<bool>(),
        instance in 0u32..=4_194_303,
    ) {
        let dest = Destination {
            valid_days: DaysOfWeek::from_bits_truncate(days),
            recipient: Recipient::Device(ObjectId::device(instance)),
            process_id,
            confirmed,
            transitions: EventTransitionBits::all(),
            ..Destination::default()
        };
        let bytes = encode_vec(&dest);
        for cut in 0..bytes.len() {
            prop_assert!(Destination::decode(&mut Reader::new(&bytes[..cut])).is_err());
        }
        prop_assert_eq!(Destination::decode(&mut Reader::new(&bytes)).unwrap(), dest);
    }
}
