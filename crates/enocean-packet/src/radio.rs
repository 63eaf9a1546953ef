use serde::Serialize;

use enocean_eep::bits;

use crate::address::BROADCAST;
use crate::rorg;

/// Sender (4 bytes) + status (1 byte) trail every radio payload.
pub(crate) const TRAILER_LEN: usize = 5;

/// RORG + sender + status; the payload may be empty.
pub(crate) const MIN_RADIO_LEN: usize = 1 + TRAILER_LEN;

const OPTIONAL_LEN: usize = 7;
const LEARN_BIT: u8 = 0x08;
const EEP_PRESENT_BIT: u8 = 0x80;

/// Fields common to every ERP1 radio telegram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioInfo {
    pub sender: [u8; 4],
    pub destination: [u8; 4],
    /// Signal strength; unknown when the optional section is absent or short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbm: Option<i16>,
    /// False when the telegram is a regular data telegram (1BS/4BS).
    pub learn: bool,
    /// Set for 4BS teach-in telegrams that announce their profile.
    pub contains_eep: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<u16>,
}

/// Profile announced by a 4BS teach-in telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EmbeddedEep {
    pub func: u8,
    pub type_: u8,
}

pub(crate) fn parse_radio(data: &[u8], optional: &[u8]) -> (RadioInfo, Option<EmbeddedEep>) {
    let len = data.len();
    let mut sender = [0u8; 4];
    sender.copy_from_slice(&data[len - TRAILER_LEN..len - 1]);

    let mut destination = BROADCAST;
    let mut dbm = None;
    if optional.len() >= OPTIONAL_LEN {
        destination.copy_from_slice(&optional[1..5]);
        dbm = Some(-i16::from(optional[5]));
    }

    let mut info = RadioInfo {
        sender,
        destination,
        dbm,
        learn: true,
        contains_eep: false,
        manufacturer: None,
    };
    let mut embedded = None;

    match data[0] {
        rorg::BS1 if len >= 2 + TRAILER_LEN => info.learn = data[1] & LEARN_BIT == 0,
        rorg::BS4 if len >= 5 + TRAILER_LEN => {
            info.learn = data[4] & LEARN_BIT == 0;
            if info.learn {
                info.contains_eep = data[4] & EEP_PRESENT_BIT != 0;
            }
            if info.contains_eep {
                let payload = &data[1..5];
                let read = |offset, size| bits::read_bits(payload, offset, size).unwrap_or(0);
                embedded = Some(EmbeddedEep {
                    func: read(0, 6) as u8,
                    type_: read(6, 7) as u8,
                });
                info.manufacturer = Some(read(13, 11) as u16);
            }
        }
        _ => {}
    }

    (info, embedded)
}
