//! RORG discriminants (first data byte of a radio telegram).

pub const UNDEFINED: u8 = 0x00;
/// Repeated switch communication (rocker switches).
pub const RPS: u8 = 0xF6;
/// 1-byte communication.
pub const BS1: u8 = 0xD5;
/// 4-byte communication.
pub const BS4: u8 = 0xA5;
/// Variable length data.
pub const VLD: u8 = 0xD2;
/// Manufacturer specific communication.
pub const MSC: u8 = 0xD1;
/// Addressing destination telegram.
pub const ADT: u8 = 0xA6;
pub const SM_LRN_REQ: u8 = 0xC6;
pub const SM_LRN_ANS: u8 = 0xC7;
pub const SM_REC: u8 = 0xA7;
pub const SYS_EX: u8 = 0xC5;
/// Secure telegram.
pub const SEC: u8 = 0x30;
/// Secure telegram with encapsulated RORG.
pub const SEC_ENCAPS: u8 = 0x31;
/// Decrypted secure telegram.
pub const SECD: u8 = 0x32;
pub const SEC_CDM: u8 = 0x33;
pub const SEC_MAN: u8 = 0x34;
/// Secure teach-in.
pub const SEC_TI: u8 = 0x35;
/// Universal teach-in.
pub const UTE: u8 = 0xD4;

/// Short name for a RORG, `"UNKNOWN"` otherwise.
pub fn rorg_name(rorg: u8) -> &'static str {
    match rorg {
        UNDEFINED => "UNDEFINED",
        RPS => "RPS",
        BS1 => "1BS",
        BS4 => "4BS",
        VLD => "VLD",
        MSC => "MSC",
        ADT => "ADT",
        SM_LRN_REQ => "SM_LRN_REQ",
        SM_LRN_ANS => "SM_LRN_ANS",
        SM_REC => "SM_REC",
        SYS_EX => "SYS_EX",
        SEC => "SEC",
        SEC_ENCAPS => "SEC_ENCAPS",
        SECD => "SECD",
        SEC_CDM => "SEC_CDM",
        SEC_MAN => "SEC_MAN",
        SEC_TI => "SEC_TI",
        UTE => "UTE",
        _ => "UNKNOWN",
    }
}
