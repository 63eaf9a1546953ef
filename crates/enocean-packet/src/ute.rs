//! Universal teach-in (UTE) query parsing and response construction.

use serde::Serialize;

use crate::codes::ute_request;
use crate::error::{PacketError, Result};
use crate::packet::{Packet, PacketKind};
use crate::radio::TRAILER_LEN;
use crate::rorg;

/// RORG + DB6..DB0 + sender + status.
pub(crate) const UTE_LEN: usize = 8 + TRAILER_LEN;

const BIDIRECTIONAL_BIT: u8 = 0x80;
const NO_RESPONSE_BIT: u8 = 0x40;
const COMMAND_RESPONSE: u8 = 0x01;

/// Fields of a UTE teach-in query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UteInfo {
    pub unidirectional: bool,
    pub response_expected: bool,
    /// One of [`ute_request`] `TEACH_IN`, `DELETE`, `NOT_SPECIFIC`.
    pub request_type: u8,
    /// Number of channels to teach in (0xFF: all).
    pub channels: u8,
    pub manufacturer: u16,
    /// RORG of the announced profile.
    pub rorg_of_eep: u8,
}

impl UteInfo {
    pub fn bidirectional(&self) -> bool {
        !self.unidirectional
    }

    /// True for teach-in and "not specific" requests.
    pub fn teach_in(&self) -> bool {
        self.request_type != ute_request::DELETE
    }

    pub fn delete(&self) -> bool {
        self.request_type == ute_request::DELETE
    }
}

/// Parse DB6..DB0; returns the info plus the announced FUNC and TYPE.
pub(crate) fn parse_ute(data: &[u8]) -> (UteInfo, u8, u8) {
    let db6 = data[1];
    let info = UteInfo {
        unidirectional: db6 & BIDIRECTIONAL_BIT == 0,
        response_expected: db6 & NO_RESPONSE_BIT == 0,
        request_type: (db6 >> 4) & 0x03,
        channels: data[2],
        manufacturer: (u16::from(data[4] & 0x07) << 8) | u16::from(data[3]),
        rorg_of_eep: data[7],
    };
    (info, data[6], data[5])
}

impl Packet {
    /// Build the UTE response to this teach-in query.
    ///
    /// `sender` is the responder's own address (usually the transceiver base
    /// id); the query's sender becomes the destination. `code` is one of
    /// [`crate::codes::ute_response`].
    pub fn create_response_packet(&self, sender: [u8; 4], code: u8) -> Result<Packet> {
        let radio = match self.kind() {
            PacketKind::UteTeachIn(radio, _) => radio,
            _ => return Err(PacketError::NotUteTeachIn),
        };

        let mut data = Vec::with_capacity(UTE_LEN);
        data.push(rorg::UTE);
        data.push(BIDIRECTIONAL_BIT | ((code & 0x03) << 4) | COMMAND_RESPONSE);
        data.extend_from_slice(&self.data()[2..8]);
        data.extend_from_slice(&sender);
        data.push(0x00);

        let mut optional = Vec::with_capacity(7);
        optional.push(0x03);
        optional.extend_from_slice(&radio.sender);
        optional.extend_from_slice(&[0xFF, 0x00]);

        Ok(Packet::new(enocean_frame::RADIO, data, optional))
    }
}
