//! ASCII form of a [`Destination`], as used in configuration files and
//! command lines:
//!
//! ```text
//! (ValidDays=[1,2,5];FromTime=0:00:00.00;ToTime=23:59:59.99;Recipient=Device(type=8,instance=15);ProcessIdentifier=0;ConfirmedNotify=false;Transitions=[to-offnormal,to-normal])
//! ```
//!
//! Days are numbered 1 (Monday) to 7 (Sunday). An address recipient is
//! written `Address(net=N,mac=M)` where `M` is either a dotted IPv4 address
//! with an optional `:port` or colon separated hex octets.
//!
//! Parsing starts from [`Destination::default`] and accepts the keywords in
//! any order. Input that ends while the parser is skipping separators is
//! accepted with whatever has been read so far.

use core::fmt;
use core::str::FromStr;

use crate::services::destination::{
    BacnetAddress, Destination, MacAddress, Recipient, BACNET_BIP_DEFAULT_PORT,
};
use crate::types::{DaysOfWeek, EventTransitionBits, ObjectId, ObjectType, Time, BACNET_MAX_INSTANCE};

const TRANSITION_NAMES: [(EventTransitionBits, &str); 3] = [
    (EventTransitionBits::TO_OFFNORMAL, "to-offnormal"),
    (EventTransitionBits::TO_FAULT, "to-fault"),
    (EventTransitionBits::TO_NORMAL, "to-normal"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A required literal such as `(`, `=` or `;` is missing.
    Expected(&'static str),
    UnknownKeyword,
    InvalidDay,
    InvalidBoolean,
    InvalidTransition,
    InvalidRecipient,
    InvalidMac,
    ValueOutOfRange,
}

/// Rejected destination text, with the byte offset where parsing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::Expected(token) => write!(f, "expected `{token}`")?,
            ParseErrorKind::UnknownKeyword => f.write_str("unknown keyword")?,
            ParseErrorKind::InvalidDay => f.write_str("day must be 1..7")?,
            ParseErrorKind::InvalidBoolean => f.write_str("expected `true` or `false`")?,
            ParseErrorKind::InvalidTransition => f.write_str("unknown transition")?,
            ParseErrorKind::InvalidRecipient => f.write_str("invalid recipient")?,
            ParseErrorKind::InvalidMac => f.write_str("invalid MAC address")?,
            ParseErrorKind::ValueOutOfRange => f.write_str("value out of range")?,
        }
        write!(f, " at offset {}", self.position)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// `Device(type=8,instance=I)` or `Address(net=N,mac=xx:xx)`. A broadcast
/// address has no MAC octets and prints as `mac=)`, which the parser does
/// not accept, so broadcast recipients do not survive a text round trip.
impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(id) => write!(
                f,
                "Device(type={},instance={})",
                id.object_type().to_u16(),
                id.instance()
            ),
            Self::Address(address) => {
                write!(f, "Address(net={},mac=", address.net)?;
                for (i, octet) in address.mac.iter().enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{octet:02x}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_time(f: &mut fmt::Formatter<'_>, time: Time) -> fmt::Result {
    write!(
        f,
        "{}:{:02}:{:02}.{:02}",
        time.hour, time.minute, time.second, time.hundredths
    )
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(ValidDays=[")?;
        let mut first = true;
        for weekday in 1..=7u8 {
            let Some(day) = DaysOfWeek::from_weekday(weekday) else {
                continue;
            };
            if self.valid_days.contains(day) {
                if !first {
                    f.write_str(",")?;
                }
                write!(f, "{weekday}")?;
                first = false;
            }
        }
        f.write_str("];FromTime=")?;
        write_time(f, self.from_time)?;
        f.write_str(";ToTime=")?;
        write_time(f, self.to_time)?;
        write!(
            f,
            ";Recipient={};ProcessIdentifier={};ConfirmedNotify={};Transitions=[",
            self.recipient, self.process_id, self.confirmed
        )?;
        let mut first = true;
        for (bit, name) in TRANSITION_NAMES {
            if self.transitions.contains(bit) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str("])")
    }
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    ValidDays,
    FromTime,
    ToTime,
    Recipient,
    ProcessIdentifier,
    ConfirmedNotify,
    Transitions,
}

const KEYWORDS: [(&str, Keyword); 7] = [
    ("ValidDays", Keyword::ValidDays),
    ("FromTime", Keyword::FromTime),
    ("ToTime", Keyword::ToTime),
    ("Recipient", Keyword::Recipient),
    ("ProcessIdentifier", Keyword::ProcessIdentifier),
    ("ConfirmedNotify", Keyword::ConfirmedNotify),
    ("Transitions", Keyword::Transitions),
];

#[derive(Debug, Clone, Copy)]
enum Phase {
    Start,
    Keyword,
    ValueSpacer(Keyword),
    Value(Keyword),
    PairSpacer,
}

/// Why the phase loop stopped early.
enum Interrupt {
    /// Input ran out while skipping; everything read so far stands.
    End,
    Fail(ParseError),
}

const fn is_white(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

struct Cursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a [u8] {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn fail(&self, kind: ParseErrorKind) -> Interrupt {
        Interrupt::Fail(ParseError {
            kind,
            position: self.pos,
        })
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> Result<u8, Interrupt> {
        loop {
            match self.peek() {
                None => return Err(Interrupt::End),
                Some(c) if pred(c) => self.pos += 1,
                Some(c) => return Ok(c),
            }
        }
    }

    /// Skips whitespace and returns the next character.
    fn skip_whitespace(&mut self) -> Result<u8, Interrupt> {
        self.skip_while(is_white)
    }

    fn eat(&mut self, word: &str) -> bool {
        if self.rest().starts_with(word.as_bytes()) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, word: &'static str) -> Result<(), Interrupt> {
        if self.eat(word) {
            Ok(())
        } else {
            Err(self.fail(ParseErrorKind::Expected(word)))
        }
    }

    /// Reads at most `max_digits` decimal digits; no digits reads as zero.
    fn number<T: TryFrom<u64>>(&mut self, max_digits: usize) -> Result<T, Interrupt> {
        let start = self.pos;
        let mut value = 0u64;
        while let Some(c @ b'0'..=b'9') = self.peek() {
            if self.pos - start == max_digits {
                break;
            }
            value = value * 10 + u64::from(c - b'0');
            self.pos += 1;
        }
        T::try_from(value).map_err(|_| self.fail(ParseErrorKind::ValueOutOfRange))
    }
}

impl FromStr for Destination {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dest = Destination::default();
        let mut cur = Cursor {
            text: s.as_bytes(),
            pos: 0,
        };
        match parse_into(&mut dest, &mut cur) {
            Ok(()) | Err(Interrupt::End) => Ok(dest),
            Err(Interrupt::Fail(err)) => Err(err),
        }
    }
}

fn parse_into(dest: &mut Destination, cur: &mut Cursor<'_>) -> Result<(), Interrupt> {
    let mut phase = Phase::Start;
    while cur.pos < cur.text.len() {
        phase = match phase {
            Phase::Start => {
                cur.skip_whitespace()?;
                cur.expect("(")?;
                Phase::Keyword
            }
            Phase::Keyword => {
                cur.skip_whitespace()?;
                let Some(&(word, keyword)) = KEYWORDS
                    .iter()
                    .find(|(word, _)| cur.rest().starts_with(word.as_bytes()))
                else {
                    return Err(cur.fail(ParseErrorKind::UnknownKeyword));
                };
                cur.pos += word.len();
                Phase::ValueSpacer(keyword)
            }
            Phase::ValueSpacer(keyword) => {
                cur.skip_whitespace()?;
                cur.expect("=")?;
                cur.skip_while(|c| c == b'[' || is_white(c))?;
                Phase::Value(keyword)
            }
            Phase::Value(keyword) => {
                parse_value(dest, cur, keyword)?;
                Phase::PairSpacer
            }
            Phase::PairSpacer => {
                cur.skip_while(|c| c == b')' || c == b']' || is_white(c))?;
                cur.expect(";")?;
                cur.skip_whitespace()?;
                Phase::Keyword
            }
        };
    }
    Ok(())
}

fn parse_value(
    dest: &mut Destination,
    cur: &mut Cursor<'_>,
    keyword: Keyword,
) -> Result<(), Interrupt> {
    match keyword {
        Keyword::ValidDays => {
            dest.valid_days = DaysOfWeek::empty();
            parse_list(cur, |cur| match cur.peek() {
                Some(c @ b'1'..=b'7') => {
                    dest.valid_days |= DaysOfWeek::from_bits_truncate(1 << (c - b'1'));
                    cur.pos += 1;
                    Ok(())
                }
                _ => Err(cur.fail(ParseErrorKind::InvalidDay)),
            })
        }
        Keyword::FromTime => {
            dest.from_time = parse_time(cur)?;
            Ok(())
        }
        Keyword::ToTime => {
            dest.to_time = parse_time(cur)?;
            Ok(())
        }
        Keyword::ProcessIdentifier => {
            cur.skip_whitespace()?;
            dest.process_id = cur.number(10)?;
            Ok(())
        }
        Keyword::ConfirmedNotify => {
            cur.skip_whitespace()?;
            dest.confirmed = if cur.eat("true") {
                true
            } else if cur.eat("false") {
                false
            } else {
                return Err(cur.fail(ParseErrorKind::InvalidBoolean));
            };
            Ok(())
        }
        Keyword::Transitions => {
            dest.transitions = EventTransitionBits::empty();
            parse_list(cur, |cur| {
                for (bit, name) in TRANSITION_NAMES {
                    if cur.eat(name) {
                        dest.transitions |= bit;
                        return Ok(());
                    }
                }
                Err(cur.fail(ParseErrorKind::InvalidTransition))
            })
        }
        Keyword::Recipient => {
            dest.recipient = parse_recipient(cur)?;
            Ok(())
        }
    }
}

/// Comma separated items up to and including the closing `]`.
fn parse_list<'a>(
    cur: &mut Cursor<'a>,
    mut item: impl FnMut(&mut Cursor<'a>) -> Result<(), Interrupt>,
) -> Result<(), Interrupt> {
    let mut want_item = true;
    loop {
        if cur.skip_whitespace()? == b']' {
            cur.pos += 1;
            return Ok(());
        }
        if want_item {
            item(cur)?;
        } else {
            cur.expect(",")?;
        }
        want_item = !want_item;
    }
}

fn parse_time(cur: &mut Cursor<'_>) -> Result<Time, Interrupt> {
    cur.skip_whitespace()?;
    let hour = cur.number(2)?;
    cur.expect(":")?;
    let minute = cur.number(2)?;
    let (second, hundredths) = if cur.eat(":") {
        let second = cur.number(2)?;
        let hundredths = if cur.eat(".") { cur.number(2)? } else { 0 };
        (second, hundredths)
    } else {
        (0, 0)
    };
    Ok(Time::new(hour, minute, second, hundredths))
}

/// `Device(type=8,instance=I)` or `Address(net=N,mac=M)`.
fn parse_recipient(cur: &mut Cursor<'_>) -> Result<Recipient, Interrupt> {
    // Spacing inside the parentheses is free.
    fn field<T: TryFrom<u64>>(
        cur: &mut Cursor<'_>,
        name: &'static str,
        max_digits: usize,
    ) -> Result<T, Interrupt> {
        cur.skip_whitespace()?;
        cur.expect(name)?;
        cur.skip_whitespace()?;
        cur.expect("=")?;
        cur.skip_whitespace()?;
        cur.number(max_digits)
    }

    if cur.eat("Device") {
        cur.skip_whitespace()?;
        cur.expect("(")?;
        let object_type: u16 = field(cur, "type", 6)?;
        if ObjectType::from_u16(object_type) != ObjectType::Device {
            return Err(cur.fail(ParseErrorKind::InvalidRecipient));
        }
        cur.skip_whitespace()?;
        cur.expect(",")?;
        let instance: u32 = field(cur, "instance", 10)?;
        if instance > BACNET_MAX_INSTANCE {
            return Err(cur.fail(ParseErrorKind::ValueOutOfRange));
        }
        cur.skip_whitespace()?;
        cur.expect(")")?;
        Ok(Recipient::Device(ObjectId::device(instance)))
    } else if cur.eat("Address") {
        cur.skip_whitespace()?;
        cur.expect("(")?;
        let net: u16 = field(cur, "net", 6)?;
        cur.skip_whitespace()?;
        cur.expect(",")?;
        cur.skip_whitespace()?;
        cur.expect("mac")?;
        cur.skip_whitespace()?;
        cur.expect("=")?;
        cur.skip_whitespace()?;
        let mac = parse_mac(cur.rest()).ok_or_else(|| cur.fail(ParseErrorKind::InvalidMac))?;
        cur.skip_while(|c| c != b')')?;
        cur.pos += 1;
        Ok(Recipient::Address(BacnetAddress { net, mac }))
    } else {
        Err(cur.fail(ParseErrorKind::InvalidRecipient))
    }
}

/// Dotted IPv4 with an optional `:port` (a six-octet B/IP MAC), otherwise
/// up to seven colon separated hex octets.
fn parse_mac(text: &[u8]) -> Option<MacAddress> {
    parse_ipv4_mac(text).or_else(|| parse_hex_mac(text))
}

fn parse_ipv4_mac(text: &[u8]) -> Option<MacAddress> {
    let mut cur = Cursor { text, pos: 0 };
    let mut ip = [0u8; 4];
    for (i, octet) in ip.iter_mut().enumerate() {
        if i > 0 && !cur.eat(".") {
            return None;
        }
        let start = cur.pos;
        *octet = cur.number(3).ok()?;
        if cur.pos == start {
            return None;
        }
    }
    let mut port = BACNET_BIP_DEFAULT_PORT;
    if cur.eat(":") {
        let start = cur.pos;
        let value: u16 = cur.number(5).ok()?;
        if cur.pos > start {
            port = value;
        }
    }
    Some(BacnetAddress::ipv4(0, ip, port).mac)
}

/// Up to `MAX_MAC_LEN` hex octets joined by `:`. An empty MAC is refused.
fn parse_hex_mac(text: &[u8]) -> Option<MacAddress> {
    let mut mac = MacAddress::new();
    let mut pos = 0;
    loop {
        let digits = text[pos..]
            .iter()
            .take(2)
            .take_while(|c| c.is_ascii_hexdigit())
            .count();
        if digits == 0 {
            break;
        }
        let octet = core::str::from_utf8(&text[pos..pos + digits])
            .ok()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())?;
        mac.push(octet).ok()?;
        pos += digits;
        if text.get(pos) != Some(&b':') {
            break;
        }
        pos += 1;
    }
    if mac.is_empty() {
        None
    } else {
        Some(mac)
    }
}
