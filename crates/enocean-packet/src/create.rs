use enocean_eep::{bits, EepValue, ProfileKey, ProfileStore};
use enocean_frame as frame;

use crate::address::{BROADCAST, DEFAULT_SENDER};
use crate::error::{PacketError, Result};
use crate::packet::Packet;
use crate::rorg;

/// Parameters for [`Packet::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Must be `RADIO`; kept so callers get a clear error for anything else.
    pub packet_type: u8,
    pub rorg: u8,
    pub func: u8,
    pub type_: u8,
    pub direction: Option<u8>,
    pub command: Option<u8>,
    pub sender: [u8; 4],
    pub destination: [u8; 4],
    /// Teach-in telegram instead of a data telegram (1BS/4BS).
    pub learn: bool,
}

impl CreateOptions {
    pub fn new(rorg: u8, func: u8, type_: u8) -> Self {
        Self {
            packet_type: frame::RADIO,
            rorg,
            func,
            type_,
            direction: None,
            command: None,
            sender: DEFAULT_SENDER,
            destination: BROADCAST,
            learn: false,
        }
    }

    pub fn key(&self) -> ProfileKey {
        ProfileKey::new(self.rorg, self.func, self.type_)
    }
}

impl Packet {
    /// Build a radio telegram for an EEP from field values.
    ///
    /// Supports RPS, 1BS, 4BS and VLD. VLD profiles with several commands need
    /// `options.command`. The result is re-parsed, so `parsed` holds the
    /// values as a receiver would decode them.
    pub fn create<'a, I, V>(
        store: &ProfileStore,
        options: &CreateOptions,
        values: I,
    ) -> Result<Packet>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<EepValue>,
    {
        if options.packet_type != frame::RADIO {
            return Err(PacketError::UnsupportedPacketType(options.packet_type));
        }

        let key = options.key();
        let payload_len = match options.rorg {
            rorg::RPS | rorg::BS1 => 1,
            rorg::BS4 => 4,
            rorg::VLD => store
                .find(key.rorg, key.func, key.type_)
                .and_then(|profile| profile.select(options.direction, options.command, &[]))
                .map(|set| set.bytes.unwrap_or_else(|| set.min_payload_len()))
                .ok_or(PacketError::ProfileNotFound(key))?,
            other => return Err(PacketError::UnsupportedRorg(other)),
        };

        let mut data = Vec::with_capacity(payload_len + 6);
        data.push(options.rorg);
        data.resize(1 + payload_len, 0);
        data.extend_from_slice(&options.sender);
        data.push(0x00);

        if !options.learn {
            match options.rorg {
                rorg::BS1 => data[1] |= 0x08,
                rorg::BS4 => data[4] |= 0x08,
                _ => {}
            }
        }

        if let Some(command) = options.command {
            let selector = store
                .find(key.rorg, key.func, key.type_)
                .and_then(|profile| profile.command.clone());
            if let Some(selector) = selector {
                bits::write_bits(
                    &mut data[1..1 + payload_len],
                    selector.offset,
                    selector.size,
                    u32::from(command),
                );
            }
        }

        let mut optional = Vec::with_capacity(7);
        optional.push(0x03);
        optional.extend_from_slice(&options.destination);
        optional.extend_from_slice(&[0xFF, 0x00]);

        let mut packet = Packet::new(frame::RADIO, data, optional);
        if !packet.select_eep(store, key.func, key.type_, options.direction, options.command) {
            return Err(PacketError::ProfileNotFound(key));
        }
        packet.set_eep(values)?;

        let (packet_type, data, optional) = packet.into_parts();
        let mut packet = Packet::new(packet_type, data, optional);
        packet.parse_eep(store, key.func, key.type_, options.direction, options.command);
        Ok(packet)
    }

    /// Build an ESP2 radio telegram from four raw data bytes.
    ///
    /// ESP2 carries RPS, 1BS and 4BS only, always with four data bytes;
    /// RPS and 1BS use the first of them. The result is re-parsed from its
    /// ESP2 wire form.
    pub fn create_esp2(
        rorg: u8,
        payload: [u8; 4],
        sender: [u8; 4],
        learn: bool,
    ) -> Result<Packet> {
        if !matches!(rorg, rorg::RPS | rorg::BS1 | rorg::BS4) {
            return Err(PacketError::UnsupportedRorg(rorg));
        }

        let mut data = Vec::with_capacity(10);
        data.push(rorg);
        data.extend_from_slice(&payload);
        data.extend_from_slice(&sender);
        data.push(0x00);

        if !learn {
            match rorg {
                rorg::BS1 => data[1] |= 0x08,
                rorg::BS4 => data[4] |= 0x08,
                _ => {}
            }
        }

        let wire = Packet::new(frame::RADIO, data, Vec::new()).build_esp2()?;
        match Packet::parse_esp2(&wire) {
            (_, _, Some(packet)) => Ok(packet),
            (result, _, None) => Err(PacketError::Esp2Roundtrip(result)),
        }
    }

    /// COMMON_COMMAND telegram addressed to the transceiver.
    pub fn common_command(code: u8, payload: &[u8]) -> Packet {
        let mut data = Vec::with_capacity(1 + payload.len());
        data.push(code);
        data.extend_from_slice(payload);
        Packet::new(frame::COMMON_COMMAND, data, Vec::new())
    }
}
