//! ESP3 packet type discriminants.
//!
//! Values not listed here are still carried through the codec untouched;
//! higher layers treat them as generic packets.

pub const RESERVED: u8 = 0x00;

/// ERP1 radio telegram.
pub const RADIO: u8 = 0x01;

/// Reply to a command sent to the transceiver.
pub const RESPONSE: u8 = 0x02;

pub const RADIO_SUB_TEL: u8 = 0x03;

/// Unsolicited notification from the transceiver.
pub const EVENT: u8 = 0x04;

/// Command addressed to the transceiver itself.
pub const COMMON_COMMAND: u8 = 0x05;

pub const SMART_ACK_COMMAND: u8 = 0x06;
pub const REMOTE_MAN_COMMAND: u8 = 0x07;
pub const RADIO_MESSAGE: u8 = 0x09;
pub const RADIO_ADVANCED: u8 = 0x0A;

/// Returns a human-readable name for a packet type.
pub fn packet_type_name(packet_type: u8) -> &'static str {
    match packet_type {
        RESERVED => "RESERVED",
        RADIO => "RADIO_ERP1",
        RESPONSE => "RESPONSE",
        RADIO_SUB_TEL => "RADIO_SUB_TEL",
        EVENT => "EVENT",
        COMMON_COMMAND => "COMMON_COMMAND",
        SMART_ACK_COMMAND => "SMART_ACK_COMMAND",
        REMOTE_MAN_COMMAND => "REMOTE_MAN_COMMAND",
        RADIO_MESSAGE => "RADIO_MESSAGE",
        RADIO_ADVANCED => "RADIO_ADVANCED",
        _ => "UNKNOWN",
    }
}
