//! Notification Class object.
//!
//! Holds the per-transition priorities, the ack-required transitions and
//! the Recipient_List that event notifications are fanned out to. The
//! recipient list has a fixed number of slots; an empty slot is `None` and
//! never appears on the wire.

use crate::ObjectError;
use bacnotify_core::encoding::{reader::Reader, writer::Writer, Encode};
use bacnotify_core::services::destination::Destination;
use bacnotify_core::services::event_notification::{
    ConfirmedEventNotificationRequest, EventNotification, UnconfirmedEventNotificationRequest,
};
use bacnotify_core::types::{
    DateTime, EventState, EventTransitionBits, ObjectId, ObjectType,
};
use bacnotify_core::{DecodeError, EncodeError};
use core::fmt;

/// Priority used for every transition until configured.
pub const DEFAULT_PRIORITY: u8 = 255;

/// The three event transitions a Notification Class distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    ToOffnormal = 0,
    ToFault = 1,
    ToNormal = 2,
}

impl Transition {
    /// Every off-normal state (including the limit and life-safety alarm
    /// states) counts as to-offnormal.
    pub const fn from_to_state(state: EventState) -> Self {
        match state {
            EventState::Normal => Self::ToNormal,
            EventState::Fault => Self::ToFault,
            EventState::Offnormal
            | EventState::HighLimit
            | EventState::LowLimit
            | EventState::LifeSafetyAlarm => Self::ToOffnormal,
        }
    }

    pub const fn bit(self) -> EventTransitionBits {
        match self {
            Self::ToOffnormal => EventTransitionBits::TO_OFFNORMAL,
            Self::ToFault => EventTransitionBits::TO_FAULT,
            Self::ToNormal => EventTransitionBits::TO_NORMAL,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Where encoded event notifications go. Implemented by the transport.
pub trait NotificationSink {
    type Error: fmt::Display;

    /// Delivers one encoded confirmed or unconfirmed EventNotification
    /// APDU to `destination`.
    fn send(&mut self, destination: &Destination, apdu: &[u8]) -> Result<(), Self::Error>;

    /// Invoke id for the next confirmed request.
    fn next_invoke_id(&mut self) -> u8 {
        0
    }
}

/// Outcome of one [`NotificationClass::dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    /// Recipients whose transitions, days or time window did not match.
    pub skipped: usize,
    /// Recipients whose sink returned an error.
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationClass<const N: usize> {
    instance: u32,
    priorities: [u8; 3],
    ack_required: EventTransitionBits,
    recipients: [Option<Destination>; N],
}

impl<const N: usize> NotificationClass<N> {
    pub fn new(instance: u32) -> Self {
        Self {
            instance,
            priorities: [DEFAULT_PRIORITY; 3],
            ack_required: EventTransitionBits::empty(),
            recipients: core::array::from_fn(|_| None),
        }
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::new(ObjectType::NotificationClass, self.instance)
    }

    /// Priorities in to-offnormal, to-fault, to-normal order.
    pub fn priorities(&self) -> [u8; 3] {
        self.priorities
    }

    pub fn set_priorities(&mut self, priorities: [u8; 3]) {
        self.priorities = priorities;
    }

    pub fn priority(&self, transition: Transition) -> u8 {
        self.priorities[transition.index()]
    }

    pub fn set_priority(&mut self, transition: Transition, priority: u8) {
        self.priorities[transition.index()] = priority;
    }

    pub fn ack_required(&self) -> EventTransitionBits {
        self.ack_required
    }

    pub fn set_ack_required(&mut self, transitions: EventTransitionBits) {
        self.ack_required = transitions;
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Occupied recipient slots in slot order.
    pub fn recipients(&self) -> impl Iterator<Item = &Destination> {
        self.recipients.iter().flatten()
    }

    /// The Recipient_List property value, ready to encode.
    pub fn recipient_list(&self) -> RecipientList<'_> {
        RecipientList {
            slots: &self.recipients,
        }
    }

    /// Replaces the whole Recipient_List with the destinations encoded in
    /// `data`. Wildcard destinations leave their slot empty.
    pub fn write_recipient_list(&mut self, data: &[u8]) -> Result<(), ObjectError> {
        let mut slots: [Option<Destination>; N] = core::array::from_fn(|_| None);
        let mut used = 0;
        let mut r = Reader::new(data);
        while !r.is_empty() {
            let destination = Destination::decode(&mut r)?;
            if destination.is_wildcard() {
                continue;
            }
            let slot = slots
                .get_mut(used)
                .ok_or(ObjectError::NoSpaceToWriteProperty)?;
            *slot = Some(destination);
            used += 1;
        }
        self.recipients = slots;
        Ok(())
    }

    /// AddListElement on Recipient_List. An element whose recipient is
    /// already listed replaces that entry; anything else takes the first
    /// free slot. Either every element is applied or none is.
    pub fn add_list_element(&mut self, data: &[u8]) -> Result<(), ObjectError> {
        let elements = decode_elements(data)?;
        let mut slots = self.recipients.clone();
        for (number, element) in (1u32..).zip(elements) {
            if element.is_wildcard() {
                continue;
            }
            let mut updated = false;
            for existing in slots.iter_mut().flatten() {
                if existing.recipient == element.recipient {
                    *existing = element.clone();
                    updated = true;
                }
            }
            if updated {
                continue;
            }
            let free = slots
                .iter_mut()
                .find(|slot| slot.is_none())
                .ok_or(ObjectError::NoSpaceToAddListElement {
                    first_failed_element: number,
                })?;
            *free = Some(element);
        }
        self.recipients = slots;
        Ok(())
    }

    /// RemoveListElement on Recipient_List. Fails without removing
    /// anything when one of the elements is not listed.
    pub fn remove_list_element(&mut self, data: &[u8]) -> Result<(), ObjectError> {
        let elements = decode_elements(data)?;
        for (number, element) in (1u32..).zip(&elements) {
            if !self
                .recipients()
                .any(|existing| existing.recipient == element.recipient)
            {
                return Err(ObjectError::ListElementNotFound {
                    first_failed_element: number,
                });
            }
        }
        for element in &elements {
            for slot in self.recipients.iter_mut() {
                if slot
                    .as_ref()
                    .is_some_and(|existing| existing.recipient == element.recipient)
                {
                    *slot = None;
                }
            }
        }
        Ok(())
    }

    /// Fills in the class, priority and ack-required fields that this
    /// object owns.
    pub fn prepare(&self, notification: &mut EventNotification<'_>) {
        let transition = Transition::from_to_state(notification.to_state);
        notification.notification_class = self.instance;
        notification.priority = self.priority(transition);
        if let Some(values) = notification.notify.values_mut() {
            values.ack_required = self.ack_required.contains(transition.bit());
        }
    }

    /// Sends `notification` to every recipient that accepts its transition
    /// at `now`. Each APDU is encoded into `buf`; sink failures are logged
    /// and counted but do not stop the fan-out.
    pub fn dispatch<S: NotificationSink>(
        &self,
        notification: &mut EventNotification<'_>,
        now: DateTime,
        buf: &mut [u8],
        sink: &mut S,
    ) -> Result<DispatchSummary, ObjectError> {
        self.prepare(notification);
        let transition = Transition::from_to_state(notification.to_state).bit();
        let mut summary = DispatchSummary::default();

        for destination in self.recipients() {
            if !destination.accepts(transition, now) {
                log::debug!(
                    "notification class {}: {} not active for {:?}",
                    self.instance,
                    destination.recipient,
                    transition
                );
                summary.skipped += 1;
                continue;
            }

            notification.process_id = destination.process_id;
            let len = if destination.confirmed {
                ConfirmedEventNotificationRequest {
                    invoke_id: sink.next_invoke_id(),
                    notification: notification.clone(),
                }
                .encode_into(Some(&mut *buf))?
            } else {
                UnconfirmedEventNotificationRequest {
                    notification: notification.clone(),
                }
                .encode_into(Some(&mut *buf))?
            };

            match sink.send(destination, &buf[..len]) {
                Ok(()) => summary.sent += 1,
                Err(err) => {
                    log::warn!(
                        "notification class {}: send to {} failed: {err}",
                        self.instance,
                        destination.recipient
                    );
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }
}

fn decode_elements(data: &[u8]) -> Result<Vec<Destination>, ObjectError> {
    let mut elements = Vec::new();
    let mut r = Reader::new(data);
    while !r.is_empty() {
        let destination =
            Destination::decode(&mut r).map_err(|source: DecodeError| {
                ObjectError::InvalidListElement {
                    first_failed_element: elements.len() as u32 + 1,
                    source,
                }
            })?;
        elements.push(destination);
    }
    Ok(elements)
}

/// Recipient_List encoder over the occupied slots.
#[derive(Debug, Clone, Copy)]
pub struct RecipientList<'a> {
    slots: &'a [Option<Destination>],
}

impl Encode for RecipientList<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        for destination in self.slots.iter().flatten() {
            destination.encode(w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchSummary, NotificationClass, NotificationSink, Transition};
    use crate::ObjectError;
    use bacnotify_core::encoding::Encode;
    use bacnotify_core::services::destination::{Destination, Recipient};
    use bacnotify_core::services::event_notification::{
        EventNotification, EventValues, Notify,
    };
    use bacnotify_core::services::event_parameters::NotificationParameters;
    use bacnotify_core::types::{
        Date, DateTime, DaysOfWeek, EventState, EventTransitionBits, EventType, ObjectId,
        ObjectType, StatusFlags, Time, TimeStamp,
    };

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn device_destination(instance: u32, process_id: u32) -> Destination {
        Destination {
            recipient: Recipient::Device(ObjectId::device(instance)),
            process_id,
            transitions: EventTransitionBits::all(),
            ..Destination::default()
        }
    }

    fn encode_all(destinations: &[Destination]) -> Vec<u8> {
        let mut out = Vec::new();
        for destination in destinations {
            let mut buf = [0u8; 64];
            let n = destination.encode_into(Some(&mut buf)).unwrap();
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    fn monday_noon() -> DateTime {
        DateTime::new(
            Date {
                year_since_1900: 126,
                month: 10,
                day: 19,
                weekday: 1,
            },
            Time::new(12, 0, 0, 0),
        )
    }

    fn high_limit_alarm() -> EventNotification<'static> {
        EventNotification {
            process_id: 0,
            initiating_device_id: ObjectId::device(100),
            event_object_id: ObjectId::new(ObjectType::AnalogInput, 0),
            timestamp: TimeStamp::SequenceNumber(1),
            notification_class: 0,
            priority: 0,
            event_type: EventType::OutOfRange,
            message_text: None,
            notify: Notify::Alarm(EventValues {
                ack_required: false,
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

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<u8>>,
        fail: bool,
    }

    impl NotificationSink for Recorder {
        type Error = &'static str;

        fn send(&mut self, _destination: &Destination, apdu: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err("link down");
            }
            self.frames.push(apdu.to_vec());
            Ok(())
        }

        fn next_invoke_id(&mut self) -> u8 {
            9
        }
    }

    #[test]
    fn new_class_has_defaults() {
        let nc = NotificationClass::<4>::new(3);
        assert_eq!(nc.priorities(), [255, 255, 255]);
        assert!(nc.ack_required().is_empty());
        assert_eq!(nc.recipients().count(), 0);
        assert_eq!(nc.object_id(), ObjectId::new(ObjectType::NotificationClass, 3));
        assert_eq!(nc.recipient_list().encoded_len().unwrap(), 0);
    }

    #[test]
    fn to_states_map_to_transitions() {
        for (state, transition) in [
            (EventState::Normal, Transition::ToNormal),
            (EventState::Fault, Transition::ToFault),
            (EventState::Offnormal, Transition::ToOffnormal),
            (EventState::HighLimit, Transition::ToOffnormal),
            (EventState::LowLimit, Transition::ToOffnormal),
            (EventState::LifeSafetyAlarm, Transition::ToOffnormal),
        ] {
            assert_eq!(Transition::from_to_state(state), transition);
        }
    }

    #[test]
    fn add_updates_matching_recipient() {
        let mut nc = NotificationClass::<2>::new(1);
        nc.add_list_element(&encode_all(&[device_destination(10, 1)]))
            .unwrap();
        nc.add_list_element(&encode_all(&[device_destination(10, 2)]))
            .unwrap();
        let listed: Vec<_> = nc.recipients().collect();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].process_id, 2);
    }

    #[test]
    fn add_without_space_changes_nothing() {
        let mut nc = NotificationClass::<2>::new(1);
        nc.add_list_element(&encode_all(&[device_destination(10, 1)]))
            .unwrap();
        let err = nc
            .add_list_element(&encode_all(&[
                device_destination(11, 1),
                device_destination(12, 1),
            ]))
            .unwrap_err();
        assert_eq!(
            err,
            ObjectError::NoSpaceToAddListElement {
                first_failed_element: 2
            }
        );
        assert_eq!(nc.recipients().count(), 1);
    }

    #[test]
    fn malformed_element_is_numbered() {
        let mut nc = NotificationClass::<2>::new(1);
        let mut data = encode_all(&[device_destination(10, 1)]);
        data.extend_from_slice(&[0x82, 0x01]);
        let err = nc.add_list_element(&data).unwrap_err();
        assert_eq!(err.first_failed_element(), Some(2));
        assert_eq!(nc.recipients().count(), 0);
    }

    #[test]
    fn remove_requires_every_element() {
        let mut nc = NotificationClass::<4>::new(1);
        nc.add_list_element(&encode_all(&[
            device_destination(10, 1),
            device_destination(11, 1),
        ]))
        .unwrap();

        let err = nc
            .remove_list_element(&encode_all(&[
                device_destination(10, 1),
                device_destination(99, 1),
            ]))
            .unwrap_err();
        assert_eq!(
            err,
            ObjectError::ListElementNotFound {
                first_failed_element: 2
            }
        );
        assert_eq!(nc.recipients().count(), 2);

        nc.remove_list_element(&encode_all(&[device_destination(10, 7)]))
            .unwrap();
        let listed: Vec<_> = nc.recipients().collect();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].recipient,
            Recipient::Device(ObjectId::device(11))
        );
    }

    #[test]
    fn recipient_list_write_and_read_back() {
        let mut nc = NotificationClass::<2>::new(1);
        let written = [
            device_destination(10, 1),
            Destination::default(),
            device_destination(11, 2),
        ];
        nc.write_recipient_list(&encode_all(&written)).unwrap();
        assert_eq!(nc.recipients().count(), 2);

        let mut buf = [0u8; 128];
        let n = nc.recipient_list().encode_into(Some(&mut buf)).unwrap();
        assert_eq!(&buf[..n], encode_all(&[written[0].clone(), written[2].clone()]));

        let too_many = encode_all(&[
            device_destination(1, 1),
            device_destination(2, 1),
            device_destination(3, 1),
        ]);
        assert_eq!(
            nc.write_recipient_list(&too_many).unwrap_err(),
            ObjectError::NoSpaceToWriteProperty
        );
        assert_eq!(nc.recipients().count(), 2);
    }

    #[test]
    fn dispatch_fills_class_fields_and_skips_inactive() {
        init_logger();
        let mut nc = NotificationClass::<4>::new(7);
        nc.set_priorities([10, 20, 30]);
        nc.set_ack_required(EventTransitionBits::TO_OFFNORMAL);
        let mut confirmed = device_destination(10, 42);
        confirmed.confirmed = true;
        let mut sunday_only = device_destination(11, 43);
        sunday_only.valid_days = DaysOfWeek::SUNDAY;
        let mut normal_only = device_destination(12, 44);
        normal_only.transitions = EventTransitionBits::TO_NORMAL;
        nc.add_list_element(&encode_all(&[confirmed, sunday_only, normal_only]))
            .unwrap();

        let mut notification = high_limit_alarm();
        let mut recorder = Recorder::default();
        let mut buf = [0u8; 128];
        let summary = nc
            .dispatch(&mut notification, monday_noon(), &mut buf, &mut recorder)
            .unwrap();
        assert_eq!(
            summary,
            DispatchSummary {
                sent: 1,
                skipped: 2,
                failed: 0
            }
        );

        let frame = &recorder.frames[0];
        assert_eq!(&frame[..4], &[0x00, 0x05, 9, 0x02]);
        let (invoke_id, sent) = EventNotification::decode_apdu(frame).unwrap();
        assert_eq!(invoke_id, Some(9));
        assert_eq!(sent.process_id, 42);
        assert_eq!(sent.notification_class, 7);
        assert_eq!(sent.priority, 10);
        assert!(sent.notify.values().unwrap().ack_required);
    }

    #[test]
    fn sink_failures_are_counted() {
        init_logger();
        let mut nc = NotificationClass::<2>::new(7);
        nc.add_list_element(&encode_all(&[
            device_destination(10, 1),
            device_destination(11, 2),
        ]))
        .unwrap();
        let mut recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut buf = [0u8; 128];
        let summary = nc
            .dispatch(&mut high_limit_alarm(), monday_noon(), &mut buf, &mut recorder)
            .unwrap();
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.sent, 0);
    }

    #[test]
    fn short_buffer_stops_dispatch() {
        let mut nc = NotificationClass::<1>::new(7);
        nc.add_list_element(&encode_all(&[device_destination(10, 1)]))
            .unwrap();
        let mut buf = [0u8; 8];
        let err = nc
            .dispatch(
                &mut high_limit_alarm(),
                monday_noon(),
                &mut buf,
                &mut Recorder::default(),
            )
            .unwrap_err();
        assert_eq!(err.error_class_code(), None);
    }
}
