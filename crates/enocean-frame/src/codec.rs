use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::crc8::{self, crc8};
use crate::error::{FrameError, Result};

/// Frame header: sync (1) + data length (2) + optional length (1) + type (1) + CRC8 (1).
pub const HEADER_SIZE: usize = 6;

/// Marks the start of every telegram.
pub const SYNC_BYTE: u8 = 0x55;

/// Largest telegram the length fields can describe.
pub const MAX_TELEGRAM_LEN: usize = HEADER_SIZE + u16::MAX as usize + u8::MAX as usize + 1;

/// A validated telegram: packet type plus its raw data and optional sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telegram {
    pub packet_type: u8,
    pub data: Bytes,
    pub optional: Bytes,
}

impl Telegram {
    pub fn new(packet_type: u8, data: impl Into<Bytes>, optional: impl Into<Bytes>) -> Self {
        Self {
            packet_type,
            data: data.into(),
            optional: optional.into(),
        }
    }

    /// The total wire size of this telegram (header + sections + data CRC).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.data.len() + self.optional.len() + 1
    }

    /// Serialize into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        encode_telegram(self.packet_type, &self.data, &self.optional, &mut buf)?;
        Ok(buf.to_vec())
    }
}

/// Outcome of [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParseResult {
    Ok = 0x00,
    Incomplete = 0x01,
    CrcMismatch = 0x03,
}

/// Encode a telegram into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────┬──────────┬─────────┬──────┬──────┬──────────┬──────────┬──────┐
/// │ 0x55 │ data len │ opt len │ type │ CRC8 │ data     │ optional │ CRC8 │
/// │      │ (2B BE)  │ (1B)    │ (1B) │ hdr  │          │          │ data │
/// └──────┴──────────┴─────────┴──────┴──────┴──────────┴──────────┴──────┘
/// ```
///
/// Both checksums are always recomputed from the given sections.
pub fn encode_telegram(
    packet_type: u8,
    data: &[u8],
    optional: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let data_len =
        u16::try_from(data.len()).map_err(|_| FrameError::DataTooLarge { size: data.len() })?;
    let opt_len = u8::try_from(optional.len()).map_err(|_| FrameError::OptionalTooLarge {
        size: optional.len(),
    })?;

    let header = {
        let len = data_len.to_be_bytes();
        [len[0], len[1], opt_len, packet_type]
    };

    dst.reserve(HEADER_SIZE + data.len() + optional.len() + 1);
    dst.put_u8(SYNC_BYTE);
    dst.put_slice(&header);
    dst.put_u8(crc8(&header));
    dst.put_slice(data);
    dst.put_slice(optional);
    dst.put_u8(crc8::update(crc8(data), optional));
    Ok(())
}

/// Decode a telegram from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete telegram yet;
/// bytes before the first sync byte are discarded, the sync byte is kept.
/// On a checksum error the offending bytes are consumed and the error is
/// returned, so the next call resynchronizes on the following sync byte.
/// On success, consumes the telegram bytes from the buffer.
pub fn decode_telegram(src: &mut BytesMut, max_telegram_len: usize) -> Result<Option<Telegram>> {
    match scan(&src[..], max_telegram_len) {
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

/// Slice-based decoder: returns the result, the unconsumed rest of `buf`,
/// and the telegram when one was found.
///
/// If `buf` holds no sync byte at all it is returned untouched.
pub fn parse(buf: &[u8]) -> (ParseResult, &[u8], Option<Telegram>) {
    match scan(buf, MAX_TELEGRAM_LEN) {
        Scan::Incomplete { skip } => (ParseResult::Incomplete, &buf[skip..], None),
        Scan::Corrupt { skip, error } => {
            warn!(%error, "dropping corrupt telegram");
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

fn scan(buf: &[u8], max_telegram_len: usize) -> Scan {
    let Some(start) = buf.iter().position(|&byte| byte == SYNC_BYTE) else {
        return Scan::Incomplete { skip: 0 };
    };
    let frame = &buf[start..];

    if frame.len() < HEADER_SIZE {
        return Scan::Incomplete { skip: start };
    }

    // A bad header means the lengths are garbage: step over the sync byte only.
    let computed = crc8(&frame[1..5]);
    if computed != frame[5] {
        return Scan::Corrupt {
            skip: start + 1,
            error: FrameError::HeaderCrc {
                computed,
                received: frame[5],
            },
        };
    }

    let data_len = u16::from_be_bytes([frame[1], frame[2]]) as usize;
    let opt_len = frame[3] as usize;
    let total = HEADER_SIZE + data_len + opt_len + 1;

    if total > max_telegram_len {
        return Scan::Corrupt {
            skip: start + 1,
            error: FrameError::TelegramTooLarge {
                size: total,
                max: max_telegram_len,
            },
        };
    }

    if frame.len() < total {
        return Scan::Incomplete { skip: start };
    }

    let computed = crc8(&frame[HEADER_SIZE..total - 1]);
    let received = frame[total - 1];
    if computed != received {
        return Scan::Corrupt {
            skip: start + total,
            error: FrameError::DataCrc { computed, received },
        };
    }

    let data_end = HEADER_SIZE + data_len;
    Scan::Complete {
        skip: start + total,
        telegram: Telegram {
            packet_type: frame[4],
            data: Bytes::copy_from_slice(&frame[HEADER_SIZE..data_end]),
            optional: Bytes::copy_from_slice(&frame[data_end..data_end + opt_len]),
        },
    }
}

/// Configuration for the telegram reader.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest telegram accepted from the stream. Default: [`MAX_TELEGRAM_LEN`].
    pub max_telegram_len: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_telegram_len: MAX_TELEGRAM_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet_type::{COMMON_COMMAND, RADIO, RESPONSE};

    const RADIO_VLD: [u8; 29] = [
        0x55, 0x00, 0x0F, 0x07, 0x01, 0x2B, 0xD2, 0xDD, 0xDD, 0xDD, 0xDD, 0xDD, 0xDD, 0xDD, 0xDD,
        0xDD, 0x00, 0x80, 0x35, 0xC4, 0x00, 0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0x4D, 0x00, 0x36,
    ];

    #[test]
    fn test_decode_reference_telegrams() {
        let cases: [(&[u8], u8, usize, usize); 7] = [
            (&RADIO_VLD, RADIO, 15, 7),
            (
                &[0x55, 0x00, 0x05, 0x00, 0x05, 0xDB, 0x01, 0x00, 0x00, 0x00, 0x0A, 0x54],
                COMMON_COMMAND,
                5,
                0,
            ),
            (&[0x55, 0x00, 0x01, 0x00, 0x05, 0x70, 0x02, 0x0E], COMMON_COMMAND, 1, 0),
            (&[0x55, 0x00, 0x01, 0x00, 0x05, 0x70, 0x08, 0x38], COMMON_COMMAND, 1, 0),
            (
                &[0x55, 0x00, 0x05, 0x00, 0x02, 0xCE, 0x00, 0xFF, 0x80, 0x00, 0x00, 0xDA],
                RESPONSE,
                5,
                0,
            ),
            (
                &[
                    0x55, 0x00, 0x19, 0x00, 0x07, 0x8D, 0x12, 0x12, 0x07, 0xFF, 0xFF, 0xFF, 0xFF,
                    0xFF, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A,
                    0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0xDA,
                ],
                0x07,
                25,
                0,
            ),
            (
                &[
                    0x55, 0x00, 0x0C, 0x00, 0x07, 0xEF, 0x00, 0x04, 0x07, 0xFF, 0xFF, 0xFF, 0xFF,
                    0xFF, 0x00, 0x00, 0x00, 0x00, 0x65,
                ],
                0x07,
                12,
                0,
            ),
        ];

        for (wire, packet_type, data_len, opt_len) in cases {
            let (result, rest, telegram) = parse(wire);
            assert_eq!(result, ParseResult::Ok, "wire {wire:02X?}");
            assert!(rest.is_empty());
            let telegram = telegram.unwrap();
            assert_eq!(telegram.packet_type, packet_type);
            assert_eq!(telegram.data.len(), data_len);
            assert_eq!(telegram.optional.len(), opt_len);
            assert_eq!(telegram.to_bytes().unwrap(), wire);
        }
    }

    #[test]
    fn test_trailing_bytes_are_returned() {
        let wire = [
            0x55, 0x00, 0x05, 0x01, 0x02, 0xDB, 0x00, 0xFF, 0x9E, 0x55, 0x00, 0x0A, 0x79, 0xFF,
            0xFF, 0xFF,
        ];
        let (result, rest, telegram) = parse(&wire);
        assert_eq!(result, ParseResult::Ok);
        assert_eq!(rest, &[0xFF, 0xFF, 0xFF]);
        let telegram = telegram.unwrap();
        assert_eq!(telegram.data.as_ref(), &[0x00, 0xFF, 0x9E, 0x55, 0x00]);
        assert_eq!(telegram.optional.as_ref(), &[0x0A]);
    }

    #[test]
    fn test_failing_telegrams() {
        let mut data_flip = RADIO_VLD;
        data_flip[8] = 0xDC;
        let mut crc_flip = RADIO_VLD;
        crc_flip[28] = 0x37;
        let mut header_flip = RADIO_VLD;
        header_flip[5] = 0x1B;

        for wire in [&data_flip[..], &crc_flip[..], &header_flip[..]] {
            let (result, _, telegram) = parse(wire);
            assert_eq!(result, ParseResult::CrcMismatch);
            assert!(telegram.is_none());
        }

        for wire in [&[0x55, 0x00, 0x01, 0x00, 0x05, 0x70, 0x38][..], &[0x55, 0x00, 0x01][..]] {
            let (result, rest, telegram) = parse(wire);
            assert_eq!(result, ParseResult::Incomplete);
            assert_eq!(rest, wire);
            assert!(telegram.is_none());
        }
    }

    #[test]
    fn test_every_single_byte_flip_is_detected() {
        for index in 1..RADIO_VLD.len() {
            let mut wire = RADIO_VLD;
            wire[index] ^= 0x01;
            let (result, _, _) = parse(&wire);
            assert_ne!(result, ParseResult::Ok, "flip at {index} went unnoticed");
        }
    }

    #[test]
    fn test_no_sync_byte_leaves_buffer_untouched() {
        let wire = [0x00, 0x01, 0x02];
        let (result, rest, telegram) = parse(&wire);
        assert_eq!(result, ParseResult::Incomplete);
        assert_eq!(rest, &wire);
        assert!(telegram.is_none());
    }

    #[test]
    fn test_garbage_before_sync_is_discarded() {
        let mut wire = vec![0x00, 0xAA];
        wire.extend_from_slice(&RADIO_VLD[..3]);
        let (result, rest, _) = parse(&wire);
        assert_eq!(result, ParseResult::Incomplete);
        assert_eq!(rest, &RADIO_VLD[..3]);
    }

    #[test]
    fn test_data_crc_mismatch_skips_whole_telegram() {
        let mut wire = RADIO_VLD.to_vec();
        wire[10] = 0x00;
        wire.extend_from_slice(&RADIO_VLD);
        let (result, rest, _) = parse(&wire);
        assert_eq!(result, ParseResult::CrcMismatch);
        assert_eq!(rest, &RADIO_VLD);
    }

    #[test]
    fn test_header_crc_mismatch_skips_sync_byte_only() {
        let mut wire = RADIO_VLD;
        wire[5] = 0x1B;
        let (result, rest, _) = parse(&wire);
        assert_eq!(result, ParseResult::CrcMismatch);
        assert_eq!(rest, &wire[1..]);
    }

    #[test]
    fn test_chunked_delivery() {
        for split in 1..RADIO_VLD.len() {
            let mut buf = BytesMut::from(&RADIO_VLD[..split]);
            assert!(decode_telegram(&mut buf, MAX_TELEGRAM_LEN)
                .unwrap()
                .is_none());
            buf.extend_from_slice(&RADIO_VLD[split..]);
            let telegram = decode_telegram(&mut buf, MAX_TELEGRAM_LEN)
                .unwrap()
                .unwrap();
            assert_eq!(telegram.to_bytes().unwrap(), RADIO_VLD);
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn test_multiple_telegrams() {
        let mut buf = BytesMut::new();
        encode_telegram(RADIO, &[0xF6, 0x50, 0x00, 0x29, 0x89, 0x79, 0x30], &[], &mut buf).unwrap();
        encode_telegram(COMMON_COMMAND, &[0x08], &[], &mut buf).unwrap();

        let first = decode_telegram(&mut buf, MAX_TELEGRAM_LEN)
            .unwrap()
            .unwrap();
        assert_eq!(first.packet_type, RADIO);
        let second = decode_telegram(&mut buf, MAX_TELEGRAM_LEN)
            .unwrap()
            .unwrap();
        assert_eq!(second.packet_type, COMMON_COMMAND);
        assert_eq!(second.data.as_ref(), &[0x08]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_corrupt_then_valid() {
        let mut wire = RADIO_VLD.to_vec();
        wire[28] = 0x00;
        wire.extend_from_slice(&RADIO_VLD);
        let mut buf = BytesMut::from(wire.as_slice());

        let err = decode_telegram(&mut buf, MAX_TELEGRAM_LEN).unwrap_err();
        assert!(matches!(err, FrameError::DataCrc { received: 0x00, .. }));
        assert!(err.is_corrupt());

        let telegram = decode_telegram(&mut buf, MAX_TELEGRAM_LEN)
            .unwrap()
            .unwrap();
        assert_eq!(telegram.data.len(), 15);
    }

    #[test]
    fn test_decode_telegram_too_large() {
        let mut buf = BytesMut::from(&RADIO_VLD[..]);
        let err = decode_telegram(&mut buf, 16).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TelegramTooLarge { size: 29, max: 16 }
        ));
        assert_eq!(buf.len(), RADIO_VLD.len() - 1);
    }

    #[test]
    fn test_encode_limits() {
        let mut buf = BytesMut::new();
        let data = vec![0u8; u16::MAX as usize + 1];
        assert!(matches!(
            encode_telegram(RADIO, &data, &[], &mut buf),
            Err(FrameError::DataTooLarge { .. })
        ));
        let optional = vec![0u8; 256];
        assert!(matches!(
            encode_telegram(RADIO, &[], &optional, &mut buf),
            Err(FrameError::OptionalTooLarge { size: 256 })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_sections() {
        let telegram = Telegram::new(0x08, Bytes::new(), Bytes::new());
        let wire = telegram.to_bytes().unwrap();
        assert_eq!(wire.len(), telegram.wire_size());
        let (result, _, decoded) = parse(&wire);
        assert_eq!(result, ParseResult::Ok);
        assert_eq!(decoded.unwrap(), telegram);
    }
}
