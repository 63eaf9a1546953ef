//! 4-byte EnOcean device addresses.

/// Broadcast destination.
pub const BROADCAST: [u8; 4] = [0xFF; 4];

/// Placeholder sender for created telegrams; callers normally substitute the transceiver base id.
pub const DEFAULT_SENDER: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// Format as `AA:BB:CC:DD`.
pub fn format_address(address: &[u8; 4]) -> String {
    address
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse `AA:BB:CC:DD`, `AA-BB-CC-DD` or `AABBCCDD`.
pub fn parse_address(text: &str) -> Option<[u8; 4]> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect();
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}

pub fn address_to_int(address: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_parse() {
        let address = [0x01, 0x81, 0xB7, 0x44];
        assert_eq!(format_address(&address), "01:81:B7:44");
        assert_eq!(parse_address("01:81:b7:44"), Some(address));
        assert_eq!(parse_address("0181B744"), Some(address));
        assert_eq!(parse_address("01-81-B7-44"), Some(address));
        assert_eq!(address_to_int(&address), 25_278_276);
        assert_eq!(address_to_int(&DEFAULT_SENDER), 3_735_928_559);
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(parse_address("ASDASDASD"), None);
        assert_eq!(parse_address("01:02:03"), None);
        assert_eq!(parse_address("01:02:03:04:05"), None);
    }
}
