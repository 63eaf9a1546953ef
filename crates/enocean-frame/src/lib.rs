//! ESP3 telegram framing for EnOcean transceivers.
//!
//! Every telegram on the serial line is framed with:
//! - A sync byte (`0x55`) for stream resynchronization
//! - A header: 2-byte big-endian data length, 1-byte optional length, 1-byte packet type
//! - A CRC8 over the header, then data and optional bytes, then a CRC8 over both
//!
//! The decoder survives arbitrary chunking: partial telegrams stay in the
//! caller's buffer until the rest arrives.
//!
//! The [`esp2`] module frames the same [`Telegram`] in the older ESP2 format.

pub mod codec;
pub mod crc8;
pub mod error;
pub mod esp2;
pub mod packet_type;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_telegram, encode_telegram, parse, FrameConfig, ParseResult, Telegram, HEADER_SIZE,
    MAX_TELEGRAM_LEN, SYNC_BYTE,
};
pub use crc8::crc8;
pub use error::{FrameError, Result};
pub use packet_type::{
    packet_type_name, COMMON_COMMAND, EVENT, RADIO, RADIO_ADVANCED, RADIO_MESSAGE,
    RADIO_SUB_TEL, REMOTE_MAN_COMMAND, RESERVED, RESPONSE, SMART_ACK_COMMAND,
};
pub use reader::TelegramReader;
pub use writer::TelegramWriter;
