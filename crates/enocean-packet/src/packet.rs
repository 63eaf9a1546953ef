use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use enocean_eep::{
    decode_field, encode_field, DataSet, DecodedField, EepError, EepValue, ProfileKey,
    ProfileStore,
};
use enocean_frame::{self as frame, ParseResult, Telegram};
use tracing::{debug, warn};

use crate::address::{address_to_int, format_address};
use crate::error::{PacketError, Result};
use crate::radio::{parse_radio, RadioInfo, MIN_RADIO_LEN, TRAILER_LEN};
use crate::response::{Event, Response};
use crate::rorg;
use crate::ute::{parse_ute, UteInfo, UTE_LEN};

/// What a telegram turned out to be once its type and RORG were inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum PacketKind {
    /// Any packet type without a dedicated model, or a radio telegram too short to parse.
    Generic,
    Radio(RadioInfo),
    UteTeachIn(RadioInfo, UteInfo),
    Response(Response),
    Event(Event),
}

/// Field set chosen by `select_eep`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedProfile {
    pub key: ProfileKey,
    pub data: Arc<DataSet>,
}

/// One ESP3 packet with its derived fields.
///
/// The raw `data`/`optional` bytes are the source of truth; `status`, `rorg`
/// and the sender/destination are read from them. Use the setters so derived
/// state stays consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    packet_type: u8,
    data: Vec<u8>,
    optional: Vec<u8>,
    kind: PacketKind,
    rorg_func: Option<u8>,
    rorg_type: Option<u8>,
    selected: Option<SelectedProfile>,
    parsed: BTreeMap<String, DecodedField>,
}

impl Packet {
    /// Build a packet from its raw sections and classify it.
    pub fn new(packet_type: u8, data: Vec<u8>, optional: Vec<u8>) -> Self {
        let mut packet = Self {
            packet_type,
            data,
            optional,
            kind: PacketKind::Generic,
            rorg_func: None,
            rorg_type: None,
            selected: None,
            parsed: BTreeMap::new(),
        };
        packet.classify();
        packet
    }

    pub fn from_telegram(telegram: Telegram) -> Self {
        Self::new(
            telegram.packet_type,
            telegram.data.to_vec(),
            telegram.optional.to_vec(),
        )
    }

    /// Decode the first telegram in `buf`.
    ///
    /// Same contract as [`enocean_frame::parse`]: keep accumulating and
    /// re-supply the returned remainder.
    pub fn parse(buf: &[u8]) -> (ParseResult, &[u8], Option<Packet>) {
        let (result, rest, telegram) = frame::parse(buf);
        (result, rest, telegram.map(Self::from_telegram))
    }

    /// Serialize to wire bytes with freshly computed checksums.
    pub fn build(&self) -> Result<Vec<u8>> {
        Ok(self.to_telegram().to_bytes()?)
    }

    /// Decode the first ESP2 telegram in `buf`; same contract as [`Packet::parse`].
    pub fn parse_esp2(buf: &[u8]) -> (ParseResult, &[u8], Option<Packet>) {
        let (result, rest, telegram) = frame::esp2::parse(buf);
        (result, rest, telegram.map(Self::from_telegram))
    }

    /// Serialize in ESP2 framing. Packets with optional bytes cannot be sent this way.
    pub fn build_esp2(&self) -> Result<Vec<u8>> {
        Ok(frame::esp2::to_bytes(&self.to_telegram())?)
    }

    /// Packet type, data and optional sections.
    pub fn into_parts(self) -> (u8, Vec<u8>, Vec<u8>) {
        (self.packet_type, self.data, self.optional)
    }

    pub fn to_telegram(&self) -> Telegram {
        Telegram::new(self.packet_type, self.data.clone(), self.optional.clone())
    }

    fn classify(&mut self) {
        self.rorg_func = None;
        self.rorg_type = None;
        self.selected = None;
        self.parsed.clear();

        self.kind = match self.packet_type {
            frame::RADIO if self.data.len() >= MIN_RADIO_LEN => {
                let (radio, embedded) = parse_radio(&self.data, &self.optional);
                if let Some(eep) = embedded {
                    self.rorg_func = Some(eep.func);
                    self.rorg_type = Some(eep.type_);
                }
                if self.data[0] == rorg::UTE && self.data.len() >= UTE_LEN {
                    let (ute, func, type_) = parse_ute(&self.data);
                    self.rorg_func = Some(func);
                    self.rorg_type = Some(type_);
                    let radio = RadioInfo {
                        contains_eep: true,
                        ..radio
                    };
                    PacketKind::UteTeachIn(radio, ute)
                } else {
                    PacketKind::Radio(radio)
                }
            }
            frame::RADIO => {
                warn!(len = self.data.len(), "radio telegram too short, kept as generic packet");
                PacketKind::Generic
            }
            frame::RESPONSE if !self.data.is_empty() => PacketKind::Response(Response {
                return_code: self.data[0],
                data: self.data[1..].to_vec(),
            }),
            frame::EVENT if !self.data.is_empty() => PacketKind::Event(Event {
                code: self.data[0],
                data: self.data[1..].to_vec(),
            }),
            _ => PacketKind::Generic,
        };
    }

    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn optional(&self) -> &[u8] {
        &self.optional
    }

    pub fn kind(&self) -> &PacketKind {
        &self.kind
    }

    /// Replace the data section and re-derive everything from it.
    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
        self.classify();
    }

    /// Replace the optional section and re-derive everything from it.
    pub fn set_optional(&mut self, optional: Vec<u8>) {
        self.optional = optional;
        self.classify();
    }

    /// RORG of a radio telegram, 0 for other packet types.
    pub fn rorg(&self) -> u8 {
        match self.packet_type {
            frame::RADIO => self.data.first().copied().unwrap_or(rorg::UNDEFINED),
            _ => rorg::UNDEFINED,
        }
    }

    /// Status byte: the last data byte of a radio telegram, 0 otherwise.
    pub fn status(&self) -> u8 {
        match self.payload_range() {
            Some(_) => self.data[self.data.len() - 1],
            None => 0,
        }
    }

    /// Overwrite the status byte of a radio telegram. No-op for other packets.
    pub fn set_status(&mut self, status: u8) {
        if self.payload_range().is_some() {
            let last = self.data.len() - 1;
            self.data[last] = status;
        }
    }

    /// Repeater hop count (low nibble of the status byte).
    pub fn repeater_count(&self) -> u8 {
        self.status() & 0x0F
    }

    pub fn radio(&self) -> Option<&RadioInfo> {
        match &self.kind {
            PacketKind::Radio(radio) | PacketKind::UteTeachIn(radio, _) => Some(radio),
            _ => None,
        }
    }

    pub fn ute(&self) -> Option<&UteInfo> {
        match &self.kind {
            PacketKind::UteTeachIn(_, ute) => Some(ute),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match &self.kind {
            PacketKind::Response(response) => Some(response),
            _ => None,
        }
    }

    pub fn event(&self) -> Option<&Event> {
        match &self.kind {
            PacketKind::Event(event) => Some(event),
            _ => None,
        }
    }

    pub fn learn(&self) -> bool {
        self.radio().is_some_and(|radio| radio.learn)
    }

    pub fn contains_eep(&self) -> bool {
        self.radio().is_some_and(|radio| radio.contains_eep)
    }

    pub fn sender(&self) -> Option<[u8; 4]> {
        self.radio().map(|radio| radio.sender)
    }

    pub fn sender_hex(&self) -> Option<String> {
        self.radio().map(|radio| format_address(&radio.sender))
    }

    pub fn sender_int(&self) -> Option<u32> {
        self.radio().map(|radio| address_to_int(&radio.sender))
    }

    pub fn destination(&self) -> Option<[u8; 4]> {
        self.radio().map(|radio| radio.destination)
    }

    pub fn destination_hex(&self) -> Option<String> {
        self.radio().map(|radio| format_address(&radio.destination))
    }

    pub fn destination_int(&self) -> Option<u32> {
        self.radio().map(|radio| address_to_int(&radio.destination))
    }

    /// Received signal strength; `None` for non-radio packets or when the
    /// optional section does not carry it.
    pub fn dbm(&self) -> Option<i16> {
        self.radio().and_then(|radio| radio.dbm)
    }

    /// FUNC of the selected profile, or the one announced by a teach-in telegram.
    pub fn rorg_func(&self) -> Option<u8> {
        self.rorg_func
    }

    /// TYPE of the selected profile, or the one announced by a teach-in telegram.
    pub fn rorg_type(&self) -> Option<u8> {
        self.rorg_type
    }

    /// Values decoded so far by `parse_eep`, keyed by shortcut.
    pub fn parsed(&self) -> &BTreeMap<String, DecodedField> {
        &self.parsed
    }

    pub fn selected_profile(&self) -> Option<&SelectedProfile> {
        self.selected.as_ref()
    }

    fn payload_range(&self) -> Option<Range<usize>> {
        match self.kind {
            PacketKind::Radio(_) | PacketKind::UteTeachIn(..) => {
                Some(1..self.data.len() - TRAILER_LEN)
            }
            _ => None,
        }
    }

    /// Payload bits between RORG and sender; empty for non-radio packets.
    pub fn payload(&self) -> &[u8] {
        match self.payload_range() {
            Some(range) => &self.data[range],
            None => &[],
        }
    }

    /// Resolve the profile for this telegram's RORG and the given FUNC/TYPE.
    ///
    /// Returns false (and clears any previous selection) when the catalog has
    /// no matching field set.
    pub fn select_eep(
        &mut self,
        store: &ProfileStore,
        func: u8,
        type_: u8,
        direction: Option<u8>,
        command: Option<u8>,
    ) -> bool {
        self.rorg_func = Some(func);
        self.rorg_type = Some(type_);

        let key = ProfileKey::new(self.rorg(), func, type_);
        let selected = store
            .find(key.rorg, key.func, key.type_)
            .and_then(|profile| profile.select(direction, command, self.payload()))
            .map(|data| SelectedProfile { key, data });

        if selected.is_none() {
            debug!(profile = %key, ?direction, ?command, "no EEP field set for packet");
        }
        self.selected = selected;
        self.selected.is_some()
    }

    /// Select the profile and decode every field of it into `parsed`.
    ///
    /// Returns the decoded shortcuts in catalog order; empty when no profile matches.
    pub fn parse_eep(
        &mut self,
        store: &ProfileStore,
        func: u8,
        type_: u8,
        direction: Option<u8>,
        command: Option<u8>,
    ) -> Vec<String> {
        if !self.select_eep(store, func, type_, direction, command) {
            return Vec::new();
        }
        self.decode_selected()
    }

    /// Decode every field of the already selected profile into `parsed`.
    pub fn decode_selected(&mut self) -> Vec<String> {
        let Some(selected) = &self.selected else {
            return Vec::new();
        };
        let key = selected.key;
        let set = Arc::clone(&selected.data);

        let status = self.status();
        let payload = self.payload();
        let mut decoded = Vec::with_capacity(set.fields.len());
        for field in &set.fields {
            match decode_field(field, payload, status) {
                Ok(value) => decoded.push((field.shortcut().to_string(), value)),
                Err(err) => warn!(profile = %key, error = %err, "skipping undecodable field"),
            }
        }

        let mut shortcuts = Vec::with_capacity(decoded.len());
        for (shortcut, value) in decoded {
            shortcuts.push(shortcut.clone());
            self.parsed.insert(shortcut, value);
        }
        shortcuts
    }

    /// Encode values into the payload/status of the selected profile.
    ///
    /// All values are applied to a copy first; on error the packet is unchanged.
    /// On success `parsed` and the radio fields reflect the new bytes.
    pub fn set_eep<'a, I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<EepValue>,
    {
        let set = match &self.selected {
            Some(selected) => Arc::clone(&selected.data),
            None => return Err(PacketError::NoProfileSelected),
        };
        let range = self.payload_range().ok_or(PacketError::NotRadio)?;

        let mut payload = self.data[range.clone()].to_vec();
        let mut status = self.status();
        for (shortcut, value) in values {
            let field = set
                .field(shortcut)
                .ok_or_else(|| EepError::FieldNotFound(shortcut.to_string()))?;
            encode_field(field, &value.into(), &mut payload, &mut status)?;
        }

        self.data[range].copy_from_slice(&payload);
        self.set_status(status);
        self.refresh_selected();
        Ok(())
    }

    /// Re-derive radio fields after an in-place write, keeping the selection,
    /// and decode the selected profile again.
    fn refresh_selected(&mut self) {
        let selected = self.selected.take();
        let (func, type_) = (self.rorg_func, self.rorg_type);
        self.classify();
        self.rorg_func = func;
        self.rorg_type = type_;
        self.selected = selected;
        self.decode_selected();
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02X} {} {}",
            self.packet_type,
            hex::encode_upper(&self.data),
            hex::encode_upper(&self.optional)
        )?;
        if !self.parsed.is_empty() {
            let fields: Vec<String> = self
                .parsed
                .iter()
                .map(|(shortcut, field)| format!("{shortcut}={}", field.value))
                .collect();
            write!(f, " {{{}}}", fields.join(", "))?;
        }
        Ok(())
    }
}
