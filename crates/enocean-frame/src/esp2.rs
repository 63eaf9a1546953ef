//! ESP2 framing, spoken by older gateways and bus couplers.
//!
//! ```text
//! ┌──────┬──────┬──────────────────┬─────┬───────────┬──────────┐
//! │ 0xA5 │ 0x5A │ HSEQ(3) | LEN(5) │ ORG │ data, id, │ checksum │
//! │      │      │                  │     │ status    │          │
//! └──────┴──────┴──────────────────┴─────┴───────────┴──────────┘
//! ```
//!
//! `LEN` counts the bytes after the header, checksum included. The checksum
//! is the low byte of the sum over header and data. ESP2 has no optional
//! section, and radio telegrams name their type with an ORG code instead of
//! the ESP3 RORG; decoded telegrams carry the RORG so the packet layer
//! handles both framings alike. The 3-bit sequence field is carried as the
//! telegram's packet type.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::codec::{ParseResult, Telegram};
use crate::error::{FrameError, Result};

/// Two-byte sync at the start of every ESP2 telegram.
pub const SYNC: [u8; 2] = [0xA5, 0x5A];

/// Sync (2) + header byte (1).
pub const HEADER_SIZE: usize = 3;

/// Largest data section the 5-bit length can describe (one byte goes to the checksum).
pub const MAX_DATA_LEN: usize = 0x1F - 1;

/// Largest value of the 3-bit sequence field.
pub const MAX_SEQUENCE: u8 = 0x07;

pub const ORG_RPS: u8 = 0x05;
pub const ORG_BS1: u8 = 0x06;
pub const ORG_BS4: u8 = 0x07;

const RORG_RPS: u8 = 0xF6;
const RORG_BS1: u8 = 0xD5;
const RORG_BS4: u8 = 0xA5;

/// ESP2 ORG code to ESP3 RORG; other values pass through.
pub fn org_to_rorg(org: u8) -> u8 {
    match org {
        ORG_RPS => RORG_RPS,
        ORG_BS1 => RORG_BS1,
        ORG_BS4 => RORG_BS4,
        other => other,
    }
}

/// ESP3 RORG to ESP2 ORG code; other values pass through.
pub fn rorg_to_org(rorg: u8) -> u8 {
    match rorg {
        RORG_RPS => ORG_RPS,
        RORG_BS1 => ORG_BS1,
        RORG_BS4 => ORG_BS4,
        other => other,
    }
}

/// Low byte of the sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Encode a telegram in ESP2 framing.
///
/// `data` starts with the RORG, which is written as its ORG code.
pub fn encode_telegram(packet_type: u8, data: &[u8], dst: &mut BytesMut) -> Result<()> {
    if packet_type > MAX_SEQUENCE {
        return Err(FrameError::Esp2PacketType(packet_type));
    }
    if data.is_empty() || data.len() > MAX_DATA_LEN {
        return Err(FrameError::Esp2Length { size: data.len() });
    }

    let header = (packet_type << 5) | (data.len() as u8 + 1);
    let org = rorg_to_org(data[0]);
    let sum = checksum(&data[1..]).wrapping_add(header).wrapping_add(org);

    dst.reserve(HEADER_SIZE + data.len() + 1);
    dst.put_slice(&SYNC);
    dst.put_u8(header);
    dst.put_u8(org);
    dst.put_slice(&data[1..]);
    dst.put_u8(sum);
    Ok(())
}

/// Serialize a telegram in ESP2 framing; the optional section must be empty.
pub fn to_bytes(telegram: &Telegram) -> Result<Vec<u8>> {
    if !telegram.optional.is_empty() {
        return Err(FrameError::Esp2Optional {
            size: telegram.optional.len(),
        });
    }
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + telegram.data.len() + 1);
    encode_telegram(telegram.packet_type, &telegram.data, &mut buf)?;
    Ok(buf.to_vec())
}

/// Decode an ESP2 telegram from a buffer.
///
/// Same contract as [`crate::decode_telegram`]: `Ok(None)` while incomplete,
/// corrupt bytes are consumed before the error is returned.
pub fn decode_telegram(src: &mut BytesMut) -> Result<Option<Telegram>> {
    match scan(&src[..]) {
        Scan::Incomplete { skip } => {
            src.advance(skip);
            Ok(None)
        }
        Scan::Corrupt { skip, error } => {
            src.advance(skip);
            Err(error)
        }
        Scan::Complete { skip, telegram } => {
            src.advance(skip);
            Ok(Some(telegram))
        }
    }
}

/// Slice-based ESP2 decoder with the result codes of [`crate::parse`].
///
/// Bytes that cannot start a telegram are dropped from the remainder.
pub fn parse(buf: &[u8]) -> (ParseResult, &[u8], Option<Telegram>) {
    match scan(buf) {
        Scan::Incomplete { skip } => (ParseResult::Incomplete, &buf[skip..], None),
        Scan::Corrupt { skip, error } => {
            warn!(%error, "dropping corrupt ESP2 telegram");
            (ParseResult::CrcMismatch, &buf[skip..], None)
        }
        Scan::Complete { skip, telegram } => (ParseResult::Ok, &buf[skip..], Some(telegram)),
    }
}

enum Scan {
    Incomplete { skip: usize },
    Corrupt { skip: usize, error: FrameError },
    Complete { skip: usize, telegram: Telegram },
}

fn scan(buf: &[u8]) -> Scan {
    let Some(start) = buf.windows(2).position(|pair| pair == SYNC) else {
        // A trailing first sync byte may still be completed by the next chunk.
        let keep = usize::from(buf.last() == Some(&SYNC[0]));
        return Scan::Incomplete {
            skip: buf.len() - keep,
        };
    };
    let frame = &buf[start..];

    if frame.len() < HEADER_SIZE {
        return Scan::Incomplete { skip: start };
    }

    // The header is not checksummed on its own: on any error only the sync is skipped.
    let len = usize::from(frame[2] & 0x1F);
    if len < 2 {
        return Scan::Corrupt {
            skip: start + SYNC.len(),
            error: FrameError::Esp2Length {
                size: len.saturating_sub(1),
            },
        };
    }

    let total = HEADER_SIZE + len;
    if frame.len() < total {
        return Scan::Incomplete { skip: start };
    }

    let computed = checksum(&frame[2..total - 1]);
    let received = frame[total - 1];
    if computed != received {
        return Scan::Corrupt {
            skip: start + SYNC.len(),
            error: FrameError::Esp2Checksum { computed, received },
        };
    }

    let mut data = frame[HEADER_SIZE..total - 1].to_vec();
    data[0] = org_to_rorg(data[0]);
    Scan::Complete {
        skip: start + total,
        telegram: Telegram {
            packet_type: frame[2] >> 5,
            data: Bytes::from(data),
            optional: Bytes::new(),
        },
    }
}
